//! Error types for the binding layer.
//!
//! Script load rejection is deliberately absent here: a failed load is
//! ordinary observable state on [`ScriptState`](crate::script::ScriptState),
//! recoverable by resetting options or dispatching a new pending status.
//! Everything in this module is either a caller mistake or a live-instance
//! failure the embedding application should hear about.

use thiserror::Error;

use paybridge_sdk::WidgetError;

use crate::card_fields::CardFieldKind;

/// Binding layer errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
	/// The loaded namespace cannot satisfy the request
	#[error("Configuration error: {0}")]
	Configuration(String),

	/// The widget constructor rejected its props
	#[error("Initialization failed: {0}")]
	Initialization(#[source] WidgetError),

	/// An operation against a live instance failed
	#[error("Render failed: {0}")]
	Render(#[source] WidgetError),

	/// Auxiliary client setup failed
	#[error("Gateway connection failed: {0}")]
	GatewayConnection(String),

	/// A card field slot was registered while already occupied
	#[error("Duplicate registration for card field '{0}'")]
	DuplicateRegistration(CardFieldKind),

	/// A hook ran without its ancestor provider in scope
	#[error("{hook} must be used within a {provider}")]
	MissingProvider {
		/// Name of the misused accessor
		hook: &'static str,
		/// Provider that was expected in scope
		provider: &'static str,
	},
}
