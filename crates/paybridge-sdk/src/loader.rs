//! Script insertion contract.
//!
//! Loaders own the only side effect of the whole layer that touches the
//! page: inserting script elements. The contract is deliberately small so
//! the environment adapter, the in-process default below, and the test
//! doubles stay interchangeable.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::dom::{Document, ScriptElement};
use crate::error::LoadScriptError;
use crate::namespace::Namespace;
use crate::options::{
	LoadOptions, SCRIPT_ID_ATTR, SDK_INTEGRATION_SOURCE, SDK_INTEGRATION_SOURCE_ATTR, ScriptId,
};

/// Inserts SDK script elements and resolves the namespace they attach.
#[async_trait]
pub trait ScriptLoader: Send + Sync {
	/// Ensures the SDK script for `options` is present in the page.
	///
	/// Implementations must be idempotent per `script_id`: when an element
	/// with that identity is already present, the call reuses it instead of
	/// inserting a second one. `Ok(None)` means the script settled but no
	/// namespace appeared under the options' key; callers surface that as a
	/// configuration problem when they first need the namespace.
	async fn load_script(
		&self,
		options: &LoadOptions,
		script_id: &ScriptId,
	) -> Result<Option<Namespace>, LoadScriptError>;

	/// Ensures an auxiliary script is present, keyed by URL.
	async fn load_custom_script(
		&self,
		url: &str,
		attributes: &BTreeMap<String, String>,
	) -> Result<(), LoadScriptError>;
}

/// Loader operating directly on the in-process [`Document`].
///
/// Inserts elements synchronously and resolves namespaces from whatever the
/// environment has installed. Failure injection and gated settlement live
/// in the mock loader, not here.
#[derive(Debug, Clone)]
pub struct DocumentScriptLoader {
	document: Document,
}

impl DocumentScriptLoader {
	/// Creates a loader bound to `document`.
	pub fn new(document: Document) -> Self {
		Self { document }
	}

	/// Document this loader inserts into.
	pub fn document(&self) -> &Document {
		&self.document
	}
}

#[async_trait]
impl ScriptLoader for DocumentScriptLoader {
	async fn load_script(
		&self,
		options: &LoadOptions,
		script_id: &ScriptId,
	) -> Result<Option<Namespace>, LoadScriptError> {
		if self.document.find_script(script_id).is_none() {
			let mut attributes = options.to_attributes();
			attributes.insert(SCRIPT_ID_ATTR.to_string(), script_id.as_str().to_string());
			attributes.insert(
				SDK_INTEGRATION_SOURCE_ATTR.to_string(),
				SDK_INTEGRATION_SOURCE.to_string(),
			);
			self.document
				.insert_script(ScriptElement::new(script_id.clone(), attributes));
		}
		Ok(self.document.namespace(options.namespace_key()))
	}

	async fn load_custom_script(
		&self,
		url: &str,
		attributes: &BTreeMap<String, String>,
	) -> Result<(), LoadScriptError> {
		if url.is_empty() {
			return Err(LoadScriptError::CustomScriptFailed {
				url: url.to_string(),
				reason: "empty URL".to_string(),
			});
		}
		self.document.insert_custom_script(url, attributes.clone());
		Ok(())
	}
}
