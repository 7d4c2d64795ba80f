//! Parent session for the composite card form.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use paybridge_sdk::{Container, WidgetError, WidgetHandle, WidgetKind, WidgetProps};

use crate::callback::ErrorSink;
use crate::error::BridgeError;
use crate::script::ScriptSession;
use crate::widget::resolve_factory;

use super::{CardFieldKind, FieldRegistry};

/// One card form: a parent SDK instance plus its registered sub-fields.
///
/// The parent is never rendered; it carries form-level state and submit
/// while the individual fields mount into their own containers and come
/// and go independently through [`register_field`](Self::register_field)
/// and [`unregister_field`](Self::unregister_field).
pub struct CardFieldsSession {
	session: ScriptSession,
	parent: Arc<dyn WidgetHandle>,
	registry: FieldRegistry,
}

impl CardFieldsSession {
	/// Builds the parent instance from the loaded namespace.
	///
	/// Requires a resolved script; duplicate field registrations are later
	/// reported through `sink`.
	pub fn create(
		session: &ScriptSession,
		props: WidgetProps,
		sink: ErrorSink,
	) -> Result<Self, BridgeError> {
		let state = session.state();
		if !state.is_resolved() {
			return Err(BridgeError::Configuration(format!(
				"cannot create card fields while the script is {}; wait for the \
				 resolved status",
				state.status()
			)));
		}
		let factory = resolve_factory(session, WidgetKind::CardFields)?;
		let parent = factory.create(props).map_err(BridgeError::Initialization)?;
		Ok(Self {
			session: session.clone(),
			parent,
			registry: FieldRegistry::new(sink),
		})
	}

	/// Whether the SDK considers the card form renderable for this client.
	///
	/// An ineligible form is not an error; callers show fallback content.
	pub fn is_eligible(&self) -> bool {
		self.parent.is_eligible()
	}

	/// Creates, registers, and renders the sub-field for `kind`.
	///
	/// Registering over an occupied slot reports a duplicate through the
	/// sink and still proceeds with the newcomer. A render rejection leaves
	/// the slot occupied, mirroring the close-on-unregister contract.
	pub async fn register_field(
		&self,
		kind: CardFieldKind,
		props: WidgetProps,
		container: &Container,
	) -> Result<(), BridgeError> {
		let factory = resolve_factory(&self.session, kind.widget_kind())?;
		let instance = factory.create(props).map_err(BridgeError::Initialization)?;
		self.registry.register(kind, Arc::clone(&instance));
		instance.render(container).await.map_err(BridgeError::Render)?;
		debug!(field = %kind, container = %container.id(), "card field mounted");
		Ok(())
	}

	/// Closes and forgets the sub-field under `kind`; no-op when absent.
	pub async fn unregister_field(&self, kind: CardFieldKind) {
		if let Some(instance) = self.registry.take(kind) {
			if let Err(close_error) = instance.close().await {
				warn!(%close_error, field = %kind, "card field close failed");
			}
		}
	}

	/// Per-slot bookkeeping, shared with field components.
	pub fn registry(&self) -> &FieldRegistry {
		&self.registry
	}

	/// Slots currently holding a live field.
	pub fn registered_kinds(&self) -> Vec<CardFieldKind> {
		self.registry.registered_kinds()
	}

	/// Whether `kind` currently holds a live field.
	pub fn has_field(&self, kind: CardFieldKind) -> bool {
		self.registry.get(kind).is_some()
	}

	/// Form-level state straight from the parent instance.
	pub async fn form_state(&self) -> Result<Value, WidgetError> {
		self.parent.get_state().await
	}

	/// Submits the form through the parent instance.
	pub async fn submit(&self) -> Result<Value, WidgetError> {
		self.parent.submit().await
	}

	/// Tears the whole form down, fields first, then the parent.
	///
	/// Close failures are logged and swallowed; teardown never fails.
	pub async fn close(&self) {
		for (kind, instance) in self.registry.drain() {
			if let Err(close_error) = instance.close().await {
				warn!(%close_error, field = %kind, "card field close failed");
			}
		}
		if let Err(close_error) = self.parent.close().await {
			warn!(%close_error, "card fields parent close failed");
		}
	}
}

impl fmt::Debug for CardFieldsSession {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CardFieldsSession")
			.field("registered", &self.registered_kinds())
			.finish()
	}
}
