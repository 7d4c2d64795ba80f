//! Mock script loader for testing the provider lifecycle.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Notify, RwLock};

use paybridge_sdk::{
	Document, LoadOptions, LoadScriptError, Namespace, SCRIPT_ID_ATTR, SDK_INTEGRATION_SOURCE,
	SDK_INTEGRATION_SOURCE_ATTR, ScriptElement, ScriptId, ScriptLoader,
};

/// Mock script loader for testing.
///
/// This loader inserts elements into the in-process document like the real
/// one and can be configured to fail, to hold every load until released,
/// and to resolve with a preset namespace. Every call is recorded so tests
/// can assert on load counts and the identifiers they carried.
pub struct MockScriptLoader {
	document: Document,
	namespace: Arc<RwLock<Option<Namespace>>>,
	fail_next: Arc<RwLock<bool>>,
	fail_message: Arc<RwLock<String>>,
	gated: Arc<RwLock<bool>>,
	gate: Arc<Notify>,
	load_calls: Arc<RwLock<Vec<ScriptId>>>,
	inserts: Arc<RwLock<usize>>,
	custom_calls: Arc<RwLock<Vec<String>>>,
	fail_custom: Arc<RwLock<bool>>,
}

impl MockScriptLoader {
	/// Creates a loader that resolves without attaching a namespace.
	///
	/// # Arguments
	///
	/// * `document` - Document the mock inserts script elements into
	pub fn new(document: Document) -> Self {
		Self {
			document,
			namespace: Arc::new(RwLock::new(None)),
			fail_next: Arc::new(RwLock::new(false)),
			fail_message: Arc::new(RwLock::new("Mock configured to fail".to_string())),
			gated: Arc::new(RwLock::new(false)),
			gate: Arc::new(Notify::new()),
			load_calls: Arc::new(RwLock::new(Vec::new())),
			inserts: Arc::new(RwLock::new(0)),
			custom_calls: Arc::new(RwLock::new(Vec::new())),
			fail_custom: Arc::new(RwLock::new(false)),
		}
	}

	/// Creates a loader that resolves with the given namespace.
	pub fn with_namespace(document: Document, namespace: Namespace) -> Self {
		let mut loader = Self::new(document);
		loader.namespace = Arc::new(RwLock::new(Some(namespace)));
		loader
	}

	/// Replaces the namespace future loads resolve with.
	pub async fn set_namespace(&self, namespace: Option<Namespace>) {
		*self.namespace.write().await = namespace;
	}

	/// Configures whether loads should fail.
	///
	/// # Arguments
	///
	/// * `fail` - If true, loads return an error until reset
	pub async fn set_fail_next(&self, fail: bool) {
		*self.fail_next.write().await = fail;
	}

	/// Replaces the message failing loads report.
	pub async fn set_fail_message(&self, message: impl Into<String>) {
		*self.fail_message.write().await = message.into();
	}

	/// Configures whether custom script loads should fail.
	pub async fn set_fail_custom(&self, fail: bool) {
		*self.fail_custom.write().await = fail;
	}

	/// Holds every load at its start until [`release`](Self::release).
	pub async fn set_gated(&self, gated: bool) {
		*self.gated.write().await = gated;
	}

	/// Lets one held load proceed.
	pub fn release(&self) {
		self.gate.notify_one();
	}

	/// Number of SDK script loads the mock received.
	pub async fn load_call_count(&self) -> usize {
		self.load_calls.read().await.len()
	}

	/// Identifiers of every SDK script load, in call order.
	pub async fn loaded_ids(&self) -> Vec<ScriptId> {
		self.load_calls.read().await.clone()
	}

	/// Number of loads that actually inserted a new script element.
	pub async fn insert_count(&self) -> usize {
		*self.inserts.read().await
	}

	/// URLs of every custom script load, in call order.
	pub async fn custom_calls(&self) -> Vec<String> {
		self.custom_calls.read().await.clone()
	}

	/// Document the mock inserts into.
	pub fn document(&self) -> &Document {
		&self.document
	}
}

#[async_trait]
impl ScriptLoader for MockScriptLoader {
	async fn load_script(
		&self,
		options: &LoadOptions,
		script_id: &ScriptId,
	) -> Result<Option<Namespace>, LoadScriptError> {
		self.load_calls.write().await.push(script_id.clone());

		if *self.gated.read().await {
			self.gate.notified().await;
		}

		if *self.fail_next.read().await {
			return Err(LoadScriptError::LoadFailed(
				self.fail_message.read().await.clone(),
			));
		}

		if self.document.find_script(script_id).is_none() {
			let mut attributes = options.to_attributes();
			attributes.insert(SCRIPT_ID_ATTR.to_string(), script_id.as_str().to_string());
			attributes.insert(
				SDK_INTEGRATION_SOURCE_ATTR.to_string(),
				SDK_INTEGRATION_SOURCE.to_string(),
			);
			self.document
				.insert_script(ScriptElement::new(script_id.clone(), attributes));
			*self.inserts.write().await += 1;
		}

		Ok(self.namespace.read().await.clone())
	}

	async fn load_custom_script(
		&self,
		url: &str,
		attributes: &BTreeMap<String, String>,
	) -> Result<(), LoadScriptError> {
		self.custom_calls.write().await.push(url.to_string());

		if *self.fail_custom.read().await {
			return Err(LoadScriptError::CustomScriptFailed {
				url: url.to_string(),
				reason: self.fail_message.read().await.clone(),
			});
		}

		self.document.insert_custom_script(url, attributes.clone());
		Ok(())
	}
}
