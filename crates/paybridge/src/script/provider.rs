//! Script lifecycle orchestration.
//!
//! One [`ScriptProvider`] owns one script element's lifecycle. The state
//! lives in a watch channel so any number of descendants can snapshot it or
//! await a transition; dispatches funnel through the reducer inside the
//! channel's modify hook, so observers never see a half-applied action.
//!
//! Loads are spawned, never awaited in place. A settling load may find the
//! world moved on: the provider unmounted, or an options reset started a
//! newer load. Both are detected at settle time (mounted flag, load epoch)
//! and the stale settlement is dropped without touching state.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, warn};

use paybridge_sdk::{Document, LoadOptions, Namespace, ScriptLoader};

use super::reducer::{ScriptAction, reduce};
use super::state::{AuxiliaryHandle, LoadingStatus, ScriptState};
use crate::context::ContextScope;

struct ProviderShared {
	document: Document,
	loader: Arc<dyn ScriptLoader>,
	tx: watch::Sender<ScriptState>,
	mounted: AtomicBool,
	load_epoch: AtomicU64,
}

impl ProviderShared {
	fn apply(self: &Arc<Self>, action: ScriptAction) {
		let prior = self.tx.borrow().status();
		let reset = matches!(action, ScriptAction::ResetOptions(_));
		self.tx
			.send_modify(|state| reduce(state, action, &self.document));
		let current = self.tx.borrow().status();
		// A reset while already pending supersedes the in-flight load, so
		// it spawns even though the status did not change.
		if current == LoadingStatus::Pending && (prior != LoadingStatus::Pending || reset) {
			self.spawn_load();
		}
	}

	fn spawn_load(self: &Arc<Self>) {
		let epoch = self.load_epoch.fetch_add(1, Ordering::SeqCst) + 1;
		let (options, script_id) = {
			let state = self.tx.borrow();
			(state.options().clone(), state.script_id().clone())
		};
		debug!(%script_id, epoch, "script load started");
		let shared = Arc::clone(self);
		tokio::spawn(async move {
			let outcome = shared.loader.load_script(&options, &script_id).await;
			if !shared.mounted.load(Ordering::SeqCst) {
				debug!(%script_id, "load settled after unmount; dropped");
				return;
			}
			if shared.load_epoch.load(Ordering::SeqCst) != epoch {
				debug!(%script_id, epoch, "load superseded by newer options; dropped");
				return;
			}
			match outcome {
				Ok(namespace) => {
					if let Some(namespace) = namespace {
						shared
							.document
							.install_namespace(options.namespace_key(), namespace);
					}
					shared.apply(ScriptAction::SetLoadingStatus {
						status: LoadingStatus::Resolved,
						message: None,
					});
				}
				Err(error) => {
					warn!(%error, %script_id, "script load rejected");
					shared.apply(ScriptAction::rejected(error.to_string()));
				}
			}
		});
	}
}

fn dispatch_guarded(shared: &Arc<ProviderShared>, action: ScriptAction) {
	if !shared.mounted.load(Ordering::SeqCst) {
		warn!(?action, "dispatch ignored; provider not mounted");
		return;
	}
	shared.apply(action);
}

/// Owner of one script element's loading lifecycle.
pub struct ScriptProvider {
	shared: Arc<ProviderShared>,
	deferred: bool,
}

impl ScriptProvider {
	/// Creates a provider that starts loading on mount.
	pub fn new(document: Document, loader: Arc<dyn ScriptLoader>, options: LoadOptions) -> Self {
		Self::build(document, loader, options, false)
	}

	/// Creates a provider that waits for an explicit pending dispatch.
	pub fn deferred(
		document: Document,
		loader: Arc<dyn ScriptLoader>,
		options: LoadOptions,
	) -> Self {
		Self::build(document, loader, options, true)
	}

	fn build(
		document: Document,
		loader: Arc<dyn ScriptLoader>,
		options: LoadOptions,
		deferred: bool,
	) -> Self {
		let (tx, _rx) = watch::channel(ScriptState::new(options, deferred));
		Self {
			shared: Arc::new(ProviderShared {
				document,
				loader,
				tx,
				mounted: AtomicBool::new(false),
				load_epoch: AtomicU64::new(0),
			}),
			deferred,
		}
	}

	/// Whether this provider waits for an explicit pending dispatch.
	pub fn is_deferred(&self) -> bool {
		self.deferred
	}

	/// Starts the lifecycle.
	///
	/// Non-deferred providers begin pending, so mounting spawns their
	/// first load. Mounting again after an unmount re-spawns an
	/// interrupted load under a fresh epoch; the orphaned settlement is
	/// dropped when it arrives.
	pub fn mount(&self) {
		self.shared.mounted.store(true, Ordering::SeqCst);
		debug!(deferred = self.deferred, "script provider mounted");
		if self.shared.tx.borrow().status() == LoadingStatus::Pending {
			self.shared.spawn_load();
		}
	}

	/// Stops the lifecycle. In-flight loads settle and are dropped.
	pub fn unmount(&self) {
		self.shared.mounted.store(false, Ordering::SeqCst);
		debug!("script provider unmounted");
	}

	/// Applies an action. Ignored with a warning while unmounted.
	pub fn dispatch(&self, action: ScriptAction) {
		dispatch_guarded(&self.shared, action);
	}

	/// Current state snapshot.
	pub fn state(&self) -> ScriptState {
		self.shared.tx.borrow().clone()
	}

	/// Creates a descendant handle.
	pub fn session(&self) -> ScriptSession {
		ScriptSession {
			shared: Arc::clone(&self.shared),
		}
	}

	/// Publishes a session into `scope` for the hooks to find.
	pub fn provide(&self, scope: &ContextScope) {
		scope.provide(self.session());
	}

	/// Withdraws the published session from `scope`.
	pub fn revoke(&self, scope: &ContextScope) {
		scope.remove::<ScriptSession>();
	}
}

impl fmt::Debug for ScriptProvider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ScriptProvider")
			.field("status", &self.shared.tx.borrow().status())
			.field("deferred", &self.deferred)
			.field("mounted", &self.shared.mounted.load(Ordering::SeqCst))
			.finish()
	}
}

/// Handle descendants use to observe and drive the script lifecycle.
///
/// Sessions are cheap to clone and all observe the same provider.
#[derive(Clone)]
pub struct ScriptSession {
	shared: Arc<ProviderShared>,
}

impl ScriptSession {
	/// Current state snapshot.
	pub fn state(&self) -> ScriptState {
		self.shared.tx.borrow().clone()
	}

	/// Applies an action. Ignored with a warning while unmounted.
	pub fn dispatch(&self, action: ScriptAction) {
		dispatch_guarded(&self.shared, action);
	}

	/// Subscribes to state changes.
	pub fn subscribe(&self) -> watch::Receiver<ScriptState> {
		self.shared.tx.subscribe()
	}

	/// Waits until the state satisfies `predicate`, returning the matching
	/// snapshot. Resolves immediately when the current state already does.
	pub async fn wait_for<F>(&self, predicate: F) -> ScriptState
	where
		F: FnMut(&ScriptState) -> bool,
	{
		let mut rx = self.shared.tx.subscribe();
		match rx.wait_for(predicate).await {
			Ok(state) => state.clone(),
			// The sender lives inside this session, so the channel cannot
			// close while we wait; fall back to the current snapshot.
			Err(_) => self.shared.tx.borrow().clone(),
		}
	}

	/// Namespace the loaded script attached under the current options'
	/// key, if it is available yet.
	pub fn namespace(&self) -> Option<Namespace> {
		let key = self.shared.tx.borrow().options().namespace_key().to_string();
		self.shared.document.namespace(&key)
	}

	/// Stored out-of-band collaborator, if any.
	pub fn auxiliary(&self) -> Option<AuxiliaryHandle> {
		self.shared.tx.borrow().auxiliary()
	}

	/// Document this provider's script element lives in.
	pub fn document(&self) -> &Document {
		&self.shared.document
	}

	pub(crate) fn loader(&self) -> Arc<dyn ScriptLoader> {
		Arc::clone(&self.shared.loader)
	}
}

impl fmt::Debug for ScriptSession {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ScriptSession")
			.field("status", &self.shared.tx.borrow().status())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use paybridge_sdk::DocumentScriptLoader;

	use super::*;

	fn document_with_namespace() -> Document {
		let document = Document::new();
		document.install_namespace("paypal", Namespace::new("paypal"));
		document
	}

	#[tokio::test]
	async fn mounting_resolves_against_an_installed_namespace() {
		let document = document_with_namespace();
		let loader = Arc::new(DocumentScriptLoader::new(document.clone()));
		let provider = ScriptProvider::new(document.clone(), loader, LoadOptions::new("client"));
		let session = provider.session();

		provider.mount();
		let state = session.wait_for(ScriptState::is_resolved).await;

		assert!(state.is_resolved());
		assert_eq!(document.script_count(), 1);
		assert!(session.namespace().is_some());
	}

	#[tokio::test]
	async fn deferred_provider_waits_for_an_explicit_pending_dispatch() {
		let document = document_with_namespace();
		let loader = Arc::new(DocumentScriptLoader::new(document.clone()));
		let provider =
			ScriptProvider::deferred(document.clone(), loader, LoadOptions::new("client"));
		let session = provider.session();

		provider.mount();
		assert!(provider.state().is_initial());
		assert_eq!(document.script_count(), 0);

		session.dispatch(ScriptAction::pending());
		let state = session.wait_for(ScriptState::is_resolved).await;
		assert!(state.is_resolved());
	}

	#[tokio::test]
	async fn dispatch_while_unmounted_leaves_state_untouched() {
		let document = document_with_namespace();
		let loader = Arc::new(DocumentScriptLoader::new(document.clone()));
		let provider = ScriptProvider::new(document, loader, LoadOptions::new("client"));
		let session = provider.session();

		provider.mount();
		session.wait_for(ScriptState::is_resolved).await;
		provider.unmount();

		session.dispatch(ScriptAction::rejected("late failure"));
		assert!(provider.state().is_resolved());
		assert_eq!(provider.state().error_message(), "");
	}

	#[tokio::test]
	async fn sessions_share_one_provider() {
		let document = document_with_namespace();
		let loader = Arc::new(DocumentScriptLoader::new(document.clone()));
		let provider = ScriptProvider::new(document, loader, LoadOptions::new("client"));
		provider.mount();

		let a = provider.session();
		let b = a.clone();
		a.wait_for(ScriptState::is_resolved).await;
		assert!(b.state().is_resolved());
	}
}
