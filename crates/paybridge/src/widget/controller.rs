//! Widget mount/unmount control.
//!
//! One controller owns one container and drives at most one live widget
//! instance into it. A mount attempt only proceeds once the script is
//! resolved; anything earlier parks the controller without error. Errors on
//! the way to a mounted widget are reported through the error sink and
//! returned as an outcome, never thrown past the embedding component.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, error, warn};

use paybridge_sdk::{Container, WidgetHandle, WidgetKind, WidgetProps};

use crate::callback::ErrorSink;
use crate::error::BridgeError;
use crate::memo::DeepMemo;
use crate::proxy::ProxyProps;
use crate::script::ScriptSession;

/// Result of a mount or update attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountOutcome {
	/// The script is not resolved (deferred, pending, or rejected); nothing
	/// was mounted
	AwaitingScript,
	/// The instance rendered into the container
	Mounted,
	/// The SDK reported the widget ineligible; the caller shows a fallback
	Ineligible,
	/// The container left the page while rendering; the failure was benign
	Detached,
	/// The attempt failed; the error was also delivered through the sink
	Failed(BridgeError),
}

/// Drives one widget instance in one container.
///
/// `sync` is called whenever the script state changes, `update` whenever
/// the embedding component re-renders with new props, `unmount` exactly
/// once on teardown.
pub struct WidgetController {
	session: ScriptSession,
	kind: WidgetKind,
	container: Container,
	proxy: ProxyProps,
	instance: Mutex<Option<Arc<dyn WidgetHandle>>>,
	memo: Mutex<DeepMemo<BTreeMap<String, Value>>>,
	sink: ErrorSink,
}

impl WidgetController {
	/// Creates a controller for `kind` rendering into `container`.
	pub fn new(
		session: ScriptSession,
		kind: WidgetKind,
		container: Container,
		props: WidgetProps,
		sink: ErrorSink,
	) -> Self {
		let proxy = ProxyProps::new();
		proxy.merge(&props);
		Self {
			session,
			kind,
			container,
			proxy,
			instance: Mutex::new(None),
			memo: Mutex::new(DeepMemo::new()),
			sink,
		}
	}

	/// Widget kind this controller mounts.
	pub fn kind(&self) -> WidgetKind {
		self.kind
	}

	/// Container this controller renders into.
	pub fn container(&self) -> &Container {
		&self.container
	}

	/// Props facade the live instance reads through.
	pub fn proxy(&self) -> &ProxyProps {
		&self.proxy
	}

	/// Whether a live instance is currently held.
	pub fn is_mounted(&self) -> bool {
		self.instance.lock().is_some()
	}

	/// Reconciles the controller with the current script state.
	///
	/// With the script resolved this supersedes any live instance and
	/// mounts a fresh one from the current props; otherwise it tears the
	/// stale instance down and parks.
	pub async fn sync(&self) -> MountOutcome {
		if !self.session.state().is_resolved() {
			self.close_current("script not resolved").await;
			return MountOutcome::AwaitingScript;
		}
		self.close_current("superseded by remount").await;

		let factory = match super::resolve_factory(&self.session, self.kind) {
			Ok(factory) => factory,
			Err(configuration_error) => return self.fail(configuration_error),
		};

		let instance = match factory.create(self.proxy.snapshot()) {
			Ok(instance) => instance,
			Err(source) => return self.fail(BridgeError::Initialization(source)),
		};

		if !instance.is_eligible() {
			debug!(kind = %self.kind, "widget ineligible; showing fallback");
			if let Err(close_error) = instance.close().await {
				debug!(%close_error, "closing ineligible instance failed");
			}
			return MountOutcome::Ineligible;
		}

		*self.instance.lock() = Some(Arc::clone(&instance));
		self.memo.lock().memoize(self.proxy.values());

		match instance.render(&self.container).await {
			Ok(()) => {
				debug!(kind = %self.kind, container = %self.container.id(), "widget mounted");
				MountOutcome::Mounted
			}
			Err(render_error) => {
				self.instance.lock().take();
				if !self.container.is_connected() || self.container.child_count() == 0 {
					debug!(
						%render_error,
						kind = %self.kind,
						"render rejected against a detached container; ignoring"
					);
					MountOutcome::Detached
				} else {
					self.fail(BridgeError::Render(render_error))
				}
			}
		}
	}

	/// Absorbs a re-render's props.
	///
	/// Handlers swap through the proxy without touching the instance.
	/// Values are diffed structurally: an equal snapshot is a no-op, a
	/// changed one flows through `update_props` when the instance supports
	/// it and forces a remount otherwise.
	pub async fn update(&self, props: WidgetProps) -> MountOutcome {
		self.proxy.merge(&props);

		let changed = {
			let mut memo = self.memo.lock();
			let before = memo.current();
			let after = memo.memoize(self.proxy.values());
			match before {
				Some(before) => !Arc::ptr_eq(&before, &after),
				None => true,
			}
		};
		if !changed {
			debug!(kind = %self.kind, "prop update structurally equal; skipped");
			return if self.is_mounted() {
				MountOutcome::Mounted
			} else {
				MountOutcome::AwaitingScript
			};
		}

		let live = self.instance.lock().clone();
		match live {
			Some(instance) if instance.supports_update() => {
				match instance.update_props(self.proxy.values()).await {
					Ok(()) => {
						debug!(kind = %self.kind, "live instance absorbed prop update");
						MountOutcome::Mounted
					}
					Err(source) => self.fail(BridgeError::Render(source)),
				}
			}
			_ => self.sync().await,
		}
	}

	/// Tears the controller down, closing any live instance.
	pub async fn unmount(&self) {
		self.close_current("controller unmounted").await;
	}

	async fn close_current(&self, reason: &str) {
		let instance = self.instance.lock().take();
		if let Some(instance) = instance {
			debug!(kind = %self.kind, reason, "closing widget instance");
			if let Err(close_error) = instance.close().await {
				warn!(%close_error, kind = %self.kind, "widget close failed");
			}
		}
	}

	fn fail(&self, bridge_error: BridgeError) -> MountOutcome {
		error!(error = %bridge_error, kind = %self.kind, "widget mount failed");
		self.sink.emit(bridge_error.clone());
		MountOutcome::Failed(bridge_error)
	}
}

impl fmt::Debug for WidgetController {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WidgetController")
			.field("kind", &self.kind)
			.field("mounted", &self.is_mounted())
			.finish()
	}
}
