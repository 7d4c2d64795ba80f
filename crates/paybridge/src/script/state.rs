//! Observable script loading state.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use paybridge_sdk::{LoadOptions, ScriptId};

/// Loading lifecycle of the SDK script.
///
/// There are no terminal states: `Rejected` is recoverable by resetting
/// options or dispatching a new pending status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadingStatus {
	/// Loading was deferred and has not been requested yet
	Initial,
	/// Script element requested, namespace not settled
	Pending,
	/// Namespace available for widget construction
	Resolved,
	/// The load settled with a failure
	Rejected,
}

impl LoadingStatus {
	/// Kebab-case name, matching the serialized form.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Initial => "initial",
			Self::Pending => "pending",
			Self::Resolved => "resolved",
			Self::Rejected => "rejected",
		}
	}
}

impl fmt::Display for LoadingStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Opaque out-of-band collaborator stored alongside the script state.
///
/// Gateways that need a tokenization or checkout client keep it here so
/// every descendant reads the same instance. The state machine never looks
/// inside; consumers downcast to the concrete type they stored.
#[derive(Clone)]
pub struct AuxiliaryHandle {
	inner: Arc<dyn Any + Send + Sync>,
}

impl AuxiliaryHandle {
	/// Wraps a collaborator instance.
	pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
		Self {
			inner: Arc::new(value),
		}
	}

	/// Recovers the concrete collaborator type.
	pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
		Arc::clone(&self.inner).downcast::<T>().ok()
	}

	/// Whether the two handles wrap the same instance.
	pub fn ptr_eq(&self, other: &AuxiliaryHandle) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}
}

impl fmt::Debug for AuxiliaryHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("AuxiliaryHandle(<opaque>)")
	}
}

/// Snapshot of the script provider's state.
///
/// The loading options and the identifier derived from them always agree;
/// both only change together through an options reset.
#[derive(Debug, Clone)]
pub struct ScriptState {
	status: LoadingStatus,
	options: LoadOptions,
	script_id: ScriptId,
	error_message: String,
	auxiliary: Option<AuxiliaryHandle>,
}

impl ScriptState {
	/// Creates the starting state for the given options.
	///
	/// Deferred providers start in [`LoadingStatus::Initial`] and wait for
	/// an explicit pending dispatch; everyone else starts pending.
	pub fn new(options: LoadOptions, deferred: bool) -> Self {
		let script_id = ScriptId::derive(&options);
		Self {
			status: if deferred {
				LoadingStatus::Initial
			} else {
				LoadingStatus::Pending
			},
			options,
			script_id,
			error_message: String::new(),
			auxiliary: None,
		}
	}

	/// Current loading status.
	pub fn status(&self) -> LoadingStatus {
		self.status
	}

	/// Options the script is (being) loaded with.
	pub fn options(&self) -> &LoadOptions {
		&self.options
	}

	/// Identifier derived from the current options.
	pub fn script_id(&self) -> &ScriptId {
		&self.script_id
	}

	/// Failure detail; empty unless the status is rejected.
	pub fn error_message(&self) -> &str {
		&self.error_message
	}

	/// Stored out-of-band collaborator, if any.
	pub fn auxiliary(&self) -> Option<AuxiliaryHandle> {
		self.auxiliary.clone()
	}

	/// Whether loading is deferred and unrequested.
	pub fn is_initial(&self) -> bool {
		self.status == LoadingStatus::Initial
	}

	/// Whether the load is in flight.
	pub fn is_pending(&self) -> bool {
		self.status == LoadingStatus::Pending
	}

	/// Whether the namespace is available.
	pub fn is_resolved(&self) -> bool {
		self.status == LoadingStatus::Resolved
	}

	/// Whether the load settled with a failure.
	pub fn is_rejected(&self) -> bool {
		self.status == LoadingStatus::Rejected
	}

	pub(crate) fn apply_status(&mut self, status: LoadingStatus, message: Option<String>) {
		self.status = status;
		self.error_message = match status {
			LoadingStatus::Rejected => message.unwrap_or_default(),
			_ => String::new(),
		};
	}

	pub(crate) fn apply_reset(&mut self, options: LoadOptions) {
		self.script_id = ScriptId::derive(&options);
		self.options = options;
		self.status = LoadingStatus::Pending;
		self.error_message = String::new();
	}

	pub(crate) fn apply_auxiliary(&mut self, auxiliary: Option<AuxiliaryHandle>) {
		self.auxiliary = auxiliary;
	}
}
