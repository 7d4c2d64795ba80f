//! Scope accessors with loud misuse errors.
//!
//! Each accessor reads one provided value out of a [`ContextScope`] and
//! fails with [`BridgeError::MissingProvider`] when the matching provider
//! never populated the scope. That failure is a programmer error meant for
//! an error boundary, so it is returned, never logged and swallowed.

use std::sync::Arc;

use crate::card_fields::CardFieldsSession;
use crate::context::ContextScope;
use crate::error::BridgeError;
use crate::script::{ScriptSession, ScriptState};

fn session_from(scope: &ContextScope, hook: &'static str) -> Result<ScriptSession, BridgeError> {
	scope
		.get::<ScriptSession>()
		.map(|session| (*session).clone())
		.ok_or(BridgeError::MissingProvider {
			hook,
			provider: "ScriptProvider",
		})
}

/// Session handle published by the nearest mounted script provider.
pub fn use_script_session(scope: &ContextScope) -> Result<ScriptSession, BridgeError> {
	session_from(scope, "use_script_session")
}

/// Snapshot of the provider's current loading state.
pub fn use_loading_state(scope: &ContextScope) -> Result<ScriptState, BridgeError> {
	Ok(session_from(scope, "use_loading_state")?.state())
}

/// Card form session published by the nearest card fields host.
pub fn use_card_fields(scope: &ContextScope) -> Result<Arc<CardFieldsSession>, BridgeError> {
	scope
		.get::<CardFieldsSession>()
		.ok_or(BridgeError::MissingProvider {
			hook: "use_card_fields",
			provider: "CardFieldsSession",
		})
}
