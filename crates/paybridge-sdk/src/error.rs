//! Error types for SDK collaborators.

use thiserror::Error;

/// Script loading errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadScriptError {
	/// Invalid loading options
	#[error("Invalid loading options: {0}")]
	InvalidOptions(String),

	/// The script element was inserted but the SDK failed to load
	#[error("Script load failed: {0}")]
	LoadFailed(String),

	/// Auxiliary script load failure
	#[error("Custom script load failed for {url}: {reason}")]
	CustomScriptFailed {
		/// URL of the rejected script
		url: String,
		/// Environment-reported reason
		reason: String,
	},
}

/// Widget instance errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
	/// The constructor rejected the supplied props
	#[error("Widget construction failed: {0}")]
	Construction(String),

	/// Asynchronous render failure
	#[error("Render failed: {0}")]
	Render(String),

	/// The instance cannot apply prop updates in place
	#[error("Widget does not support prop updates")]
	UpdateUnsupported,

	/// Teardown failure
	#[error("Close failed: {0}")]
	Close(String),

	/// The widget exposes no form state
	#[error("Widget does not expose form state")]
	StateUnavailable,

	/// A handler invocation failed
	#[error("Handler failed: {0}")]
	Handler(String),
}
