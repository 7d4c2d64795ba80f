//! Paybridge - Framework Binding Layer for Payment SDK Widgets
//!
//! The external payment SDK arrives as a script, attaches a namespace to the
//! page, and hands out long-lived widget instances that render themselves
//! into containers. This crate makes that model livable inside a
//! component-style application: the script is loaded exactly once and its
//! lifecycle exposed as observable state, widgets are mounted and unmounted
//! through one controller with well-defined supersession, and prop changes
//! flow into live instances without forcing remounts.
//!
//! ## Architecture
//!
//! - [`script`]: loading state machine ([`ScriptAction`] reducer), the
//!   [`ScriptProvider`] that owns it, and [`ScriptSession`] handles for
//!   descendants
//! - [`widget`](mod@widget): the mount/unmount controller driving one
//!   [`WidgetHandle`](paybridge_sdk::WidgetHandle) per container
//! - [`proxy`]: stable props facade; handlers indirect through holder cells
//!   so captured callables observe later swaps
//! - [`memo`]: structural-equality memoizer with pointer-stable output
//! - [`card_fields`]: the card form session with its per-field registry
//! - [`gateway`]: auxiliary client layering for SDKs that need an
//!   out-of-band counterpart
//! - [`context`](mod@context) and [`hooks`]: explicit provider-to-descendant
//!   plumbing with loud misuse errors
//!
//! ## Example
//!
//! ```
//! use paybridge::{ContextScope, ScriptProvider, use_script_session};
//! use paybridge_sdk::{Document, DocumentScriptLoader, LoadOptions};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let document = Document::new();
//! let loader = Arc::new(DocumentScriptLoader::new(document.clone()));
//! let provider = ScriptProvider::new(document, loader, LoadOptions::new("client-id"));
//!
//! let scope = ContextScope::new();
//! provider.provide(&scope);
//! provider.mount();
//!
//! let session = use_script_session(&scope).unwrap();
//! let state = session.wait_for(|s| !s.is_pending() && !s.is_initial()).await;
//! assert!(state.is_resolved() || state.is_rejected());
//! # }
//! ```

#![warn(missing_docs)]

// Core modules
pub mod callback;
pub mod context;
pub mod error;
pub mod memo;
pub mod proxy;

// Script lifecycle
pub mod script;

// Widget mounting
pub mod widget;

// Card form sessions
pub mod card_fields;

// Auxiliary client layering
pub mod gateway;

// Hooks API
pub mod hooks;

// Unified prelude for simplified imports
pub mod prelude;

// Re-export commonly used types
pub use callback::ErrorSink;
pub use card_fields::{CardFieldKind, CardFieldsSession, FieldRegistry};
pub use context::ContextScope;
pub use error::BridgeError;
pub use gateway::{GatewayConnector, connect_gateway};
pub use hooks::{use_card_fields, use_loading_state, use_script_session};
pub use memo::DeepMemo;
pub use proxy::ProxyProps;
pub use script::{
	AuxiliaryHandle, LoadingStatus, ScriptAction, ScriptProvider, ScriptSession, ScriptState,
};
pub use widget::{MountOutcome, WidgetController};
