//! Composite card form support.
//!
//! Card fields differ from the free-standing widgets in that several named
//! sub-fields share one parent session instance while mounting and
//! unmounting independently. The [`FieldRegistry`] keeps the per-slot
//! bookkeeping and the [`CardFieldsSession`] ties the parent instance, the
//! registry, and the loaded namespace together.

use std::fmt;

use serde::{Deserialize, Serialize};

use paybridge_sdk::WidgetKind;

pub mod registry;
pub mod session;

pub use registry::FieldRegistry;
pub use session::CardFieldsSession;

/// Named slot of the composite card form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardFieldKind {
	/// Card number input
	Number,
	/// Security code input
	Cvv,
	/// Expiry date input
	Expiry,
	/// Cardholder name input
	Name,
}

impl CardFieldKind {
	/// Widget kind whose factory constructs this field.
	pub fn widget_kind(self) -> WidgetKind {
		match self {
			Self::Number => WidgetKind::CardNumberField,
			Self::Cvv => WidgetKind::CardCvvField,
			Self::Expiry => WidgetKind::CardExpiryField,
			Self::Name => WidgetKind::CardNameField,
		}
	}
}

impl fmt::Display for CardFieldKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Number => "number",
			Self::Cvv => "cvv",
			Self::Expiry => "expiry",
			Self::Name => "name",
		};
		f.write_str(name)
	}
}
