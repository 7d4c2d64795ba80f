//! Script loading options and the deterministic script identity.
//!
//! The upstream SDK is configured entirely through attributes on its script
//! element. [`LoadOptions`] models the recognized attributes as typed fields
//! and carries everything else in a pass-through map, so one struct both
//! configures the loader and serializes into the element's attribute map.
//!
//! [`ScriptId`] is derived from the full attribute map. Deriving is pure:
//! structurally identical options always produce the same identifier, which
//! is what lets remounts and duplicate providers collapse onto a single
//! script element.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Attribute carrying the derived script identifier on inserted elements.
pub const SCRIPT_ID_ATTR: &str = "data-paybridge-script-id";

/// Attribute marking elements inserted by this integration.
pub const SDK_INTEGRATION_SOURCE_ATTR: &str = "data-sdk-integration-source";

/// Value written to [`SDK_INTEGRATION_SOURCE_ATTR`].
pub const SDK_INTEGRATION_SOURCE: &str = "paybridge";

/// Global key the SDK namespace attaches under unless overridden.
pub const DEFAULT_NAMESPACE_KEY: &str = "paypal";

/// A pass-through option value.
///
/// The SDK accepts string-valued attributes and bare boolean flags; anything
/// richer is rejected structurally before it reaches the script element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
	/// String-valued option
	Text(String),
	/// Boolean flag option
	Flag(bool),
}

impl OptionValue {
	/// Attribute representation of the value.
	pub fn as_attribute(&self) -> String {
		match self {
			Self::Text(text) => text.clone(),
			Self::Flag(flag) => flag.to_string(),
		}
	}
}

impl From<&str> for OptionValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for OptionValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<bool> for OptionValue {
	fn from(value: bool) -> Self {
		Self::Flag(value)
	}
}

/// Options controlling how the SDK script is loaded.
///
/// Recognized keys are typed fields; unrecognized keys ride along in
/// [`extra`](LoadOptions::extra) untouched. Field names serialize in the
/// SDK's kebab-case spelling so the serialized form doubles as the script
/// element's attribute map.
///
/// # Examples
///
/// ```
/// use paybridge_sdk::LoadOptions;
///
/// let options = LoadOptions::new("test-client-id")
/// 	.with_currency("USD")
/// 	.with_components("buttons,marks");
///
/// assert_eq!(options.namespace_key(), "paypal");
/// assert!(options.has_component("buttons"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadOptions {
	/// Merchant client identifier
	#[serde(rename = "client-id", skip_serializing_if = "Option::is_none")]
	pub client_id: Option<String>,

	/// ISO currency code
	#[serde(skip_serializing_if = "Option::is_none")]
	pub currency: Option<String>,

	/// Checkout intent (capture, authorize, ...)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub intent: Option<String>,

	/// Comma-separated list of components to enable
	#[serde(skip_serializing_if = "Option::is_none")]
	pub components: Option<String>,

	/// Merchant account identifier
	#[serde(rename = "merchant-id", skip_serializing_if = "Option::is_none")]
	pub merchant_id: Option<String>,

	/// Enables the SDK debug mode
	#[serde(skip_serializing_if = "Option::is_none")]
	pub debug: Option<bool>,

	/// Global key the namespace attaches under
	#[serde(rename = "data-namespace", skip_serializing_if = "Option::is_none")]
	pub data_namespace: Option<String>,

	/// Pre-fetched client token
	#[serde(rename = "data-client-token", skip_serializing_if = "Option::is_none")]
	pub data_client_token: Option<String>,

	/// User identity token for returning-buyer flows
	#[serde(rename = "data-user-id-token", skip_serializing_if = "Option::is_none")]
	pub data_user_id_token: Option<String>,

	/// Page type hint
	#[serde(rename = "data-page-type", skip_serializing_if = "Option::is_none")]
	pub data_page_type: Option<String>,

	/// Partner attribution identifier
	#[serde(
		rename = "data-partner-attribution-id",
		skip_serializing_if = "Option::is_none"
	)]
	pub data_partner_attribution_id: Option<String>,

	/// Unrecognized options, kept in deterministic order
	#[serde(flatten)]
	pub extra: BTreeMap<String, OptionValue>,
}

impl LoadOptions {
	/// Creates options carrying the given client identifier.
	pub fn new(client_id: impl Into<String>) -> Self {
		Self {
			client_id: Some(client_id.into()),
			..Self::default()
		}
	}

	/// Sets the currency.
	pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
		self.currency = Some(currency.into());
		self
	}

	/// Sets the checkout intent.
	pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
		self.intent = Some(intent.into());
		self
	}

	/// Sets the component list.
	pub fn with_components(mut self, components: impl Into<String>) -> Self {
		self.components = Some(components.into());
		self
	}

	/// Sets the namespace key the SDK attaches under.
	pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.data_namespace = Some(namespace.into());
		self
	}

	/// Adds a pass-through option.
	pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
		self.extra.insert(key.into(), value.into());
		self
	}

	/// Global key the loaded namespace attaches under.
	pub fn namespace_key(&self) -> &str {
		self.data_namespace
			.as_deref()
			.unwrap_or(DEFAULT_NAMESPACE_KEY)
	}

	/// Whether the components option names the given component.
	pub fn has_component(&self, component: &str) -> bool {
		self.components
			.as_deref()
			.map(|list| list.split(',').any(|entry| entry.trim() == component))
			.unwrap_or(false)
	}

	/// Serializes into the script element's attribute map.
	///
	/// Keys come out in deterministic lexicographic order, typed fields and
	/// pass-through extras alike.
	pub fn to_attributes(&self) -> BTreeMap<String, String> {
		let mut attributes = BTreeMap::new();
		let mut put = |key: &str, value: Option<String>| {
			if let Some(value) = value {
				attributes.insert(key.to_string(), value);
			}
		};
		put("client-id", self.client_id.clone());
		put("currency", self.currency.clone());
		put("intent", self.intent.clone());
		put("components", self.components.clone());
		put("merchant-id", self.merchant_id.clone());
		put("debug", self.debug.map(|flag| flag.to_string()));
		put("data-namespace", self.data_namespace.clone());
		put("data-client-token", self.data_client_token.clone());
		put("data-user-id-token", self.data_user_id_token.clone());
		put("data-page-type", self.data_page_type.clone());
		put(
			"data-partner-attribution-id",
			self.data_partner_attribution_id.clone(),
		);
		for (key, value) in &self.extra {
			attributes.insert(key.clone(), value.as_attribute());
		}
		attributes
	}
}

/// Deterministic identity of a script element, derived from its options.
///
/// The identifier is a truncated SHA-256 digest over the canonical attribute
/// serialization, so deriving is stable across processes and insertion
/// order of pass-through options.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScriptId(String);

impl ScriptId {
	/// Derives the identifier for the given options.
	///
	/// # Examples
	///
	/// ```
	/// use paybridge_sdk::{LoadOptions, ScriptId};
	///
	/// let a = ScriptId::derive(&LoadOptions::new("client").with_currency("USD"));
	/// let b = ScriptId::derive(&LoadOptions::new("client").with_currency("USD"));
	/// let c = ScriptId::derive(&LoadOptions::new("client").with_currency("EUR"));
	///
	/// assert_eq!(a, b);
	/// assert_ne!(a, c);
	/// ```
	pub fn derive(options: &LoadOptions) -> Self {
		let mut hasher = Sha256::new();
		for (key, value) in options.to_attributes() {
			hasher.update(key.as_bytes());
			hasher.update(b"=");
			hasher.update(value.as_bytes());
			hasher.update(b";");
		}
		let digest = hex::encode(hasher.finalize());
		Self(format!("paybridge-{}", &digest[..16]))
	}

	/// Identifier as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ScriptId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
