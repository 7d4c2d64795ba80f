//! Script state transitions.
//!
//! The reducer is a plain function over the state snapshot; the only side
//! effect it owns is destroying the superseded script element during an
//! options reset, and that happens before the new options are installed so
//! the page never carries two elements for one provider.

use tracing::debug;

use paybridge_sdk::{Document, LoadOptions};

use super::state::{AuxiliaryHandle, LoadingStatus, ScriptState};

/// Actions accepted by the script reducer.
#[derive(Debug, Clone)]
pub enum ScriptAction {
	/// Unconditionally overwrite the loading status.
	SetLoadingStatus {
		/// Status to install
		status: LoadingStatus,
		/// Failure detail, meaningful with [`LoadingStatus::Rejected`]
		message: Option<String>,
	},
	/// Replace the loading options.
	///
	/// Destroys the superseded script element, re-derives the identifier,
	/// and forces the status back to pending.
	ResetOptions(LoadOptions),
	/// Store or clear the out-of-band collaborator instance.
	///
	/// Touches neither the status nor the options.
	SetAuxiliaryInstance(Option<AuxiliaryHandle>),
}

impl ScriptAction {
	/// Shorthand for a pending-status dispatch.
	pub fn pending() -> Self {
		Self::SetLoadingStatus {
			status: LoadingStatus::Pending,
			message: None,
		}
	}

	/// Shorthand for a rejected-status dispatch carrying a failure detail.
	pub fn rejected(message: impl Into<String>) -> Self {
		Self::SetLoadingStatus {
			status: LoadingStatus::Rejected,
			message: Some(message.into()),
		}
	}
}

pub(crate) fn reduce(state: &mut ScriptState, action: ScriptAction, document: &Document) {
	match action {
		ScriptAction::SetLoadingStatus { status, message } => {
			state.apply_status(status, message);
		}
		ScriptAction::ResetOptions(options) => {
			let removed = document.remove_script(state.script_id());
			debug!(
				script_id = %state.script_id(),
				removed,
				"options reset; superseded script element destroyed"
			);
			state.apply_reset(options);
		}
		ScriptAction::SetAuxiliaryInstance(auxiliary) => {
			state.apply_auxiliary(auxiliary);
		}
	}
}
