//! Mock widget factory and instances for testing mount control.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::{Value, json};

use paybridge_sdk::{
	Container, Namespace, WidgetError, WidgetFactory, WidgetHandle, WidgetKind, WidgetProps,
};

/// How mock instances behave when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
	/// Append a child to the container and succeed
	#[default]
	Succeed,
	/// Reject without touching the container
	FailBeforeMarkup,
	/// Append a child to the container, then reject
	FailAfterMarkup,
}

/// Mock widget instance for testing.
///
/// Captures the props it was constructed with and records every render,
/// close, and prop update so tests can assert on instance lifecycles.
pub struct MockWidget {
	kind: WidgetKind,
	props: WidgetProps,
	eligible: bool,
	supports_update: bool,
	render_mode: RenderMode,
	close_error: Option<WidgetError>,
	render_count: AtomicUsize,
	close_count: AtomicUsize,
	updates: Mutex<Vec<BTreeMap<String, Value>>>,
	form_state: RwLock<Value>,
	submit_error: RwLock<Option<String>>,
}

impl MockWidget {
	/// Props the factory was called with.
	pub fn captured_props(&self) -> &WidgetProps {
		&self.props
	}

	/// Number of render calls so far.
	pub fn render_count(&self) -> usize {
		self.render_count.load(Ordering::SeqCst)
	}

	/// Number of close calls so far.
	pub fn close_count(&self) -> usize {
		self.close_count.load(Ordering::SeqCst)
	}

	/// Whether the instance was closed at least once.
	pub fn is_closed(&self) -> bool {
		self.close_count() > 0
	}

	/// Prop updates applied through `update_props`, in call order.
	pub fn recorded_updates(&self) -> Vec<BTreeMap<String, Value>> {
		self.updates.lock().clone()
	}

	/// Replaces the form state `get_state` and `submit` report.
	pub fn set_form_state(&self, state: Value) {
		*self.form_state.write() = state;
	}

	/// Makes `submit` fail with the given message.
	pub fn set_submit_error(&self, message: Option<String>) {
		*self.submit_error.write() = message;
	}
}

#[async_trait]
impl WidgetHandle for MockWidget {
	fn kind(&self) -> WidgetKind {
		self.kind
	}

	fn is_eligible(&self) -> bool {
		self.eligible
	}

	async fn render(&self, container: &Container) -> Result<(), WidgetError> {
		self.render_count.fetch_add(1, Ordering::SeqCst);
		match self.render_mode {
			RenderMode::Succeed => {
				container.append_child();
				Ok(())
			}
			RenderMode::FailBeforeMarkup => {
				Err(WidgetError::Render("Mock configured to fail".to_string()))
			}
			RenderMode::FailAfterMarkup => {
				container.append_child();
				Err(WidgetError::Render("Mock configured to fail".to_string()))
			}
		}
	}

	async fn close(&self) -> Result<(), WidgetError> {
		self.close_count.fetch_add(1, Ordering::SeqCst);
		match &self.close_error {
			Some(close_error) => Err(close_error.clone()),
			None => Ok(()),
		}
	}

	fn supports_update(&self) -> bool {
		self.supports_update
	}

	async fn update_props(&self, partial: BTreeMap<String, Value>) -> Result<(), WidgetError> {
		if !self.supports_update {
			return Err(WidgetError::UpdateUnsupported);
		}
		self.updates.lock().push(partial);
		Ok(())
	}

	async fn get_state(&self) -> Result<Value, WidgetError> {
		Ok(self.form_state.read().clone())
	}

	async fn submit(&self) -> Result<Value, WidgetError> {
		if let Some(message) = self.submit_error.read().clone() {
			return Err(WidgetError::Handler(message));
		}
		Ok(self.form_state.read().clone())
	}
}

/// Mock widget factory for testing.
///
/// Settings apply to instances created afterwards; every created instance
/// stays reachable through [`created`](Self::created) for assertions after
/// the controller has moved on.
pub struct MockWidgetFactory {
	kind: WidgetKind,
	eligible: RwLock<bool>,
	fail_construction: RwLock<bool>,
	render_mode: RwLock<RenderMode>,
	supports_update: RwLock<bool>,
	close_error: RwLock<Option<WidgetError>>,
	created: Mutex<Vec<Arc<MockWidget>>>,
}

impl MockWidgetFactory {
	/// Creates a factory producing eligible, successfully rendering
	/// instances of `kind`.
	pub fn new(kind: WidgetKind) -> Self {
		Self {
			kind,
			eligible: RwLock::new(true),
			fail_construction: RwLock::new(false),
			render_mode: RwLock::new(RenderMode::Succeed),
			supports_update: RwLock::new(false),
			close_error: RwLock::new(None),
			created: Mutex::new(Vec::new()),
		}
	}

	/// Creates a factory and publishes it on `namespace`.
	pub fn install(namespace: &Namespace, kind: WidgetKind) -> Arc<Self> {
		let factory = Arc::new(Self::new(kind));
		namespace.register_factory(kind, Arc::clone(&factory) as Arc<dyn WidgetFactory>);
		factory
	}

	/// Configures eligibility of future instances.
	pub fn set_eligible(&self, eligible: bool) {
		*self.eligible.write() = eligible;
	}

	/// Configures whether construction should fail.
	pub fn set_fail_construction(&self, fail: bool) {
		*self.fail_construction.write() = fail;
	}

	/// Configures how future instances render.
	pub fn set_render_mode(&self, mode: RenderMode) {
		*self.render_mode.write() = mode;
	}

	/// Configures whether future instances accept prop updates.
	pub fn set_supports_update(&self, supported: bool) {
		*self.supports_update.write() = supported;
	}

	/// Makes close fail on future instances.
	pub fn set_close_error(&self, close_error: Option<WidgetError>) {
		*self.close_error.write() = close_error;
	}

	/// Every instance created so far, in creation order.
	pub fn created(&self) -> Vec<Arc<MockWidget>> {
		self.created.lock().clone()
	}

	/// Most recently created instance, if any.
	pub fn last_created(&self) -> Option<Arc<MockWidget>> {
		self.created.lock().last().cloned()
	}

	/// Number of instances created so far.
	pub fn created_count(&self) -> usize {
		self.created.lock().len()
	}
}

impl WidgetFactory for MockWidgetFactory {
	fn create(&self, props: WidgetProps) -> Result<Arc<dyn WidgetHandle>, WidgetError> {
		if *self.fail_construction.read() {
			return Err(WidgetError::Construction(
				"Mock configured to fail".to_string(),
			));
		}
		let widget = Arc::new(MockWidget {
			kind: self.kind,
			props,
			eligible: *self.eligible.read(),
			supports_update: *self.supports_update.read(),
			render_mode: *self.render_mode.read(),
			close_error: self.close_error.read().clone(),
			render_count: AtomicUsize::new(0),
			close_count: AtomicUsize::new(0),
			updates: Mutex::new(Vec::new()),
			form_state: RwLock::new(json!({})),
			submit_error: RwLock::new(None),
		});
		self.created.lock().push(Arc::clone(&widget));
		Ok(widget)
	}
}
