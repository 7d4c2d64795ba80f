//! Paybridge SDK Surface - Collaborator Types for the Binding Layer
//!
//! Everything the binding layer talks to lives here: the loading options and
//! their derived script identity, the in-process document the script elements
//! and namespaces attach to, and the contracts widget instances and script
//! loaders must satisfy.
//!
//! ## Architecture
//!
//! - [`options`]: [`LoadOptions`] with pass-through extras and the
//!   deterministic [`ScriptId`] derived from them
//! - [`dom`](mod@dom): [`Document`] and [`Container`], the injected stand-in
//!   for the host page
//! - [`namespace`]: the SDK global ([`Namespace`]) and its widget factories
//! - [`widget`]: the [`WidgetHandle`] instance contract plus the
//!   [`WidgetProps`]/[`Handler`] value model
//! - [`loader`]: the [`ScriptLoader`] contract and the document-backed
//!   default implementation
//!
//! ## Example
//!
//! ```
//! use paybridge_sdk::{LoadOptions, ScriptId};
//!
//! let options = LoadOptions::new("merchant-client-id");
//! let id = ScriptId::derive(&options);
//!
//! // Structurally identical options always derive the same identity.
//! assert_eq!(id, ScriptId::derive(&options.clone()));
//! ```

#![warn(missing_docs)]

// Core modules
pub mod dom;
pub mod error;
pub mod loader;
pub mod namespace;
pub mod options;
pub mod widget;

// Re-export commonly used types
pub use dom::{Container, Document, ScriptElement};
pub use error::{LoadScriptError, WidgetError};
pub use loader::{DocumentScriptLoader, ScriptLoader};
pub use namespace::{Namespace, WidgetFactory, WidgetKind};
pub use options::{
	DEFAULT_NAMESPACE_KEY, LoadOptions, OptionValue, SCRIPT_ID_ATTR, SDK_INTEGRATION_SOURCE,
	SDK_INTEGRATION_SOURCE_ATTR, ScriptId,
};
pub use widget::{Handler, HandlerFuture, WidgetHandle, WidgetProps};
