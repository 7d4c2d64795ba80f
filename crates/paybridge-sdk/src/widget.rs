//! Widget instance contract and the prop value model.
//!
//! Props crossing the binding boundary come in two shapes: plain values
//! (anything the restricted JSON model can express) and [`Handler`]s,
//! cloneable async callables the SDK invokes on buyer actions. Handlers are
//! deliberately kept out of the value model so prop comparison never has to
//! reason about function identity.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::dom::Container;
use crate::error::WidgetError;
use crate::namespace::WidgetKind;

/// Boxed future a [`Handler`] invocation resolves to.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Value, WidgetError>> + Send>>;

/// A cloneable async callable prop.
///
/// `Handler` wraps the function in an `Arc`, making it cheaply cloneable
/// while keeping a stable identity that survives prop merges.
///
/// # Examples
///
/// ```
/// use paybridge_sdk::Handler;
/// use serde_json::json;
///
/// let on_approve = Handler::from_async(|payload| async move {
/// 	Ok(json!({ "received": payload }))
/// });
/// let clone = on_approve.clone();
/// assert!(on_approve.ptr_eq(&clone));
/// ```
pub struct Handler {
	inner: Arc<dyn Fn(Value) -> HandlerFuture + Send + Sync + 'static>,
}

impl Handler {
	/// Creates a handler from a function returning a boxed future.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(Value) -> HandlerFuture + Send + Sync + 'static,
	{
		Self { inner: Arc::new(f) }
	}

	/// Creates a handler from an async closure.
	pub fn from_async<F, Fut>(f: F) -> Self
	where
		F: Fn(Value) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Value, WidgetError>> + Send + 'static,
	{
		Self {
			inner: Arc::new(move |payload| Box::pin(f(payload))),
		}
	}

	/// Invokes the handler with the given payload.
	pub async fn call(&self, payload: Value) -> Result<Value, WidgetError> {
		(self.inner)(payload).await
	}

	/// Whether the two handlers wrap the same function.
	pub fn ptr_eq(&self, other: &Handler) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}
}

impl Clone for Handler {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl fmt::Debug for Handler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Handler")
			.field("inner", &"<function>")
			.finish()
	}
}

/// Conversion into a [`Handler`].
///
/// Implemented for `Handler` itself and for async closures, so prop
/// builders accept either without ceremony.
pub trait IntoHandler {
	/// Converts self into a [`Handler`].
	fn into_handler(self) -> Handler;
}

impl IntoHandler for Handler {
	fn into_handler(self) -> Handler {
		self
	}
}

impl<F, Fut> IntoHandler for F
where
	F: Fn(Value) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<Value, WidgetError>> + Send + 'static,
{
	fn into_handler(self) -> Handler {
		Handler::from_async(self)
	}
}

/// Props handed to a widget factory.
#[derive(Debug, Clone, Default)]
pub struct WidgetProps {
	/// Plain configuration values in deterministic order
	pub values: BTreeMap<String, Value>,
	/// Callable props, keyed by the SDK's callback names
	pub handlers: BTreeMap<String, Handler>,
}

impl WidgetProps {
	/// Creates empty props.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a plain value.
	pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.values.insert(key.into(), value.into());
		self
	}

	/// Adds a handler.
	pub fn with_handler(mut self, key: impl Into<String>, handler: impl IntoHandler) -> Self {
		self.handlers.insert(key.into(), handler.into_handler());
		self
	}

	/// Looks up a plain value.
	pub fn value(&self, key: &str) -> Option<&Value> {
		self.values.get(key)
	}

	/// Looks up a handler.
	pub fn handler(&self, key: &str) -> Option<Handler> {
		self.handlers.get(key).cloned()
	}
}

/// A live widget instance.
///
/// The mount controller drives instances exclusively through this contract:
/// render into a container, optionally update props in place, close on
/// teardown. Instances without a native eligibility check report eligible.
#[async_trait]
pub trait WidgetHandle: Send + Sync {
	/// Kind this instance was constructed as.
	fn kind(&self) -> WidgetKind;

	/// Whether the instance can render in the current environment.
	fn is_eligible(&self) -> bool {
		true
	}

	/// Renders into `container`, settling only once the SDK finishes.
	async fn render(&self, container: &Container) -> Result<(), WidgetError>;

	/// Tears the instance down.
	///
	/// Callers treat close as best-effort and call it at most once per
	/// instance; failures are reported, never retried.
	async fn close(&self) -> Result<(), WidgetError>;

	/// Whether [`update_props`](Self::update_props) is available.
	fn supports_update(&self) -> bool {
		false
	}

	/// Applies a partial prop update to the live instance.
	async fn update_props(&self, partial: BTreeMap<String, Value>) -> Result<(), WidgetError> {
		let _ = partial;
		Err(WidgetError::UpdateUnsupported)
	}

	/// Current form state, for widgets that collect buyer input.
	async fn get_state(&self) -> Result<Value, WidgetError> {
		Err(WidgetError::StateUnavailable)
	}

	/// Submits collected buyer input.
	async fn submit(&self) -> Result<Value, WidgetError> {
		Err(WidgetError::StateUnavailable)
	}
}
