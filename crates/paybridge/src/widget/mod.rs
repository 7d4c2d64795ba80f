//! Mounting widgets into containers.
//!
//! The [`WidgetController`] sits between the script provider and one DOM
//! container. It resolves the widget constructor out of the loaded
//! namespace, owns the resulting instance, and reconciles it against prop
//! updates and script-state changes.

use std::sync::Arc;

use paybridge_sdk::{WidgetFactory, WidgetKind};

use crate::error::BridgeError;
use crate::script::ScriptSession;

pub mod controller;

pub use controller::{MountOutcome, WidgetController};

/// Looks the constructor for `kind` up in the loaded namespace.
///
/// Both failure shapes are consumer configuration mistakes: the namespace
/// never appeared under the configured key, or it lacks the constructor
/// because the matching entry is missing from the components option.
pub(crate) fn resolve_factory(
	session: &ScriptSession,
	kind: WidgetKind,
) -> Result<Arc<dyn WidgetFactory>, BridgeError> {
	let namespace = session.namespace().ok_or_else(|| {
		let key = session.state().options().namespace_key().to_string();
		BridgeError::Configuration(format!(
			"script resolved but no namespace appeared under '{key}'; \
			 check the loading options"
		))
	})?;
	namespace.factory(kind).ok_or_else(|| {
		BridgeError::Configuration(format!(
			"namespace '{}' does not provide the {} constructor; add '{}' to the \
			 components option of the script provider",
			namespace.key(),
			kind.constructor_name(),
			kind.component_hint()
		))
	})
}
