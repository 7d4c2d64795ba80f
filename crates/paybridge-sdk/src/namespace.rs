//! The SDK global and its widget constructors.
//!
//! Loading the script attaches a [`Namespace`] to the document under a
//! configurable key. A namespace is a bag of per-kind factories; resolving
//! a kind that the loaded components do not include is how configuration
//! mistakes surface downstream.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::WidgetError;
use crate::widget::{WidgetHandle, WidgetProps};

/// Widget kinds a namespace can construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
	/// Checkout buttons
	Buttons,
	/// Funding source marks
	Marks,
	/// Pay-later messaging
	Messages,
	/// Card fields parent form
	CardFields,
	/// Card number child field
	CardNumberField,
	/// Card CVV child field
	CardCvvField,
	/// Card expiry child field
	CardExpiryField,
	/// Cardholder name child field
	CardNameField,
}

impl WidgetKind {
	/// Constructor name the SDK publishes for this kind.
	pub fn constructor_name(&self) -> &'static str {
		match self {
			Self::Buttons => "Buttons",
			Self::Marks => "Marks",
			Self::Messages => "Messages",
			Self::CardFields => "CardFields",
			Self::CardNumberField => "CardNumberField",
			Self::CardCvvField => "CardCvvField",
			Self::CardExpiryField => "CardExpiryField",
			Self::CardNameField => "CardNameField",
		}
	}

	/// Entry the loading options' component list must carry for this kind.
	pub fn component_hint(&self) -> &'static str {
		match self {
			Self::Buttons => "buttons",
			Self::Marks => "marks",
			Self::Messages => "messages",
			Self::CardFields
			| Self::CardNumberField
			| Self::CardCvvField
			| Self::CardExpiryField
			| Self::CardNameField => "card-fields",
		}
	}
}

impl fmt::Display for WidgetKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.constructor_name())
	}
}

/// Factory constructing widget instances of one kind.
///
/// Construction is synchronous, mirroring the SDK's constructors; rejected
/// props fail here, everything environment-dependent fails later during
/// render.
pub trait WidgetFactory: Send + Sync {
	/// Constructs an instance from the given props.
	fn create(&self, props: WidgetProps) -> Result<Arc<dyn WidgetHandle>, WidgetError>;
}

struct NamespaceInner {
	key: String,
	version: String,
	factories: RwLock<BTreeMap<WidgetKind, Arc<dyn WidgetFactory>>>,
}

/// A loaded SDK global.
///
/// Cloning is shallow; clones observe the same factory registry.
#[derive(Clone)]
pub struct Namespace {
	inner: Arc<NamespaceInner>,
}

impl Namespace {
	/// Creates an empty namespace registered under `key`.
	pub fn new(key: impl Into<String>) -> Self {
		Self {
			inner: Arc::new(NamespaceInner {
				key: key.into(),
				version: String::from("0.0.0"),
				factories: RwLock::new(BTreeMap::new()),
			}),
		}
	}

	/// Creates a namespace reporting the given SDK version.
	pub fn with_version(key: impl Into<String>, version: impl Into<String>) -> Self {
		Self {
			inner: Arc::new(NamespaceInner {
				key: key.into(),
				version: version.into(),
				factories: RwLock::new(BTreeMap::new()),
			}),
		}
	}

	/// Global key this namespace is attached under.
	pub fn key(&self) -> &str {
		&self.inner.key
	}

	/// Version string the SDK reports.
	pub fn version(&self) -> &str {
		&self.inner.version
	}

	/// Publishes a factory for `kind`, replacing any previous one.
	pub fn register_factory(&self, kind: WidgetKind, factory: Arc<dyn WidgetFactory>) {
		self.inner.factories.write().insert(kind, factory);
	}

	/// Looks up the factory for `kind`.
	pub fn factory(&self, kind: WidgetKind) -> Option<Arc<dyn WidgetFactory>> {
		self.inner.factories.read().get(&kind).cloned()
	}

	/// Whether a factory for `kind` is published.
	pub fn has_factory(&self, kind: WidgetKind) -> bool {
		self.inner.factories.read().contains_key(&kind)
	}

	/// Kinds with published factories.
	pub fn available_kinds(&self) -> Vec<WidgetKind> {
		self.inner.factories.read().keys().copied().collect()
	}
}

impl fmt::Debug for Namespace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Namespace")
			.field("key", &self.inner.key)
			.field("version", &self.inner.version)
			.field("kinds", &self.available_kinds())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn card_field_kinds_share_the_component_hint() {
		assert_eq!(WidgetKind::CardFields.component_hint(), "card-fields");
		assert_eq!(WidgetKind::CardCvvField.component_hint(), "card-fields");
		assert_eq!(WidgetKind::Buttons.component_hint(), "buttons");
	}

	#[test]
	fn kind_serializes_in_kebab_case() {
		let json = serde_json::to_string(&WidgetKind::CardNumberField).unwrap();
		assert_eq!(json, "\"card-number-field\"");
	}

	#[test]
	fn factory_lookup_misses_unpublished_kinds() {
		let namespace = Namespace::new("paypal");
		assert!(!namespace.has_factory(WidgetKind::Buttons));
		assert!(namespace.factory(WidgetKind::Buttons).is_none());
	}
}
