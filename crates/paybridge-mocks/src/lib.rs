//! Mock collaborators for paybridge testing.
//!
//! The binding layer treats the script loader and the widget factories as
//! injected collaborators, so tests swap in the mocks from this crate: a
//! script loader with failure injection and gated settlement, and a widget
//! factory whose instances record every render, close, and prop update.

#![warn(missing_docs)]

pub mod script_loader;
pub mod widget_factory;

pub use script_loader::MockScriptLoader;
pub use widget_factory::{MockWidget, MockWidgetFactory, RenderMode};
