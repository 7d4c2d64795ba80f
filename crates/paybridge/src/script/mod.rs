//! Script loading state machine.
//!
//! Split the way it is consumed: [`state`] is the observable snapshot,
//! [`reducer`] the pure transitions, [`provider`] the owner that spawns
//! loads and hands out sessions.

pub mod provider;
pub mod reducer;
pub mod state;

pub use provider::{ScriptProvider, ScriptSession};
pub use reducer::ScriptAction;
pub use state::{AuxiliaryHandle, LoadingStatus, ScriptState};
