//! In-process stand-in for the host page.
//!
//! The binding layer never reaches for ambient globals. Instead the
//! embedding application hands it a [`Document`], which tracks the script
//! elements the loaders insert and the namespaces those scripts attach, and
//! [`Container`]s, the managed elements widgets render into. Tests drive
//! the same surface the real environment adapter implements.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::RwLock;
use uuid::Uuid;

use crate::namespace::Namespace;
use crate::options::ScriptId;

/// A script element tracked by the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptElement {
	script_id: ScriptId,
	attributes: BTreeMap<String, String>,
}

impl ScriptElement {
	/// Creates an element carrying the given identity and attribute map.
	pub fn new(script_id: ScriptId, attributes: BTreeMap<String, String>) -> Self {
		Self {
			script_id,
			attributes,
		}
	}

	/// Identity the element was inserted under.
	pub fn script_id(&self) -> &ScriptId {
		&self.script_id
	}

	/// Attribute value, if present.
	pub fn attribute(&self, key: &str) -> Option<&str> {
		self.attributes.get(key).map(String::as_str)
	}

	/// Full attribute map.
	pub fn attributes(&self) -> &BTreeMap<String, String> {
		&self.attributes
	}
}

#[derive(Default)]
struct DocumentInner {
	scripts: RwLock<BTreeMap<ScriptId, ScriptElement>>,
	custom_scripts: RwLock<BTreeMap<String, BTreeMap<String, String>>>,
	namespaces: RwLock<BTreeMap<String, Namespace>>,
}

/// The host page: script elements keyed by identity, auxiliary scripts
/// keyed by URL, and the namespaces loaded scripts have attached.
///
/// Cloning is shallow; clones observe the same page.
#[derive(Clone, Default)]
pub struct Document {
	inner: Arc<DocumentInner>,
}

impl Document {
	/// Creates an empty document.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a script element, replacing any element with the same identity.
	pub fn insert_script(&self, element: ScriptElement) {
		self.inner
			.scripts
			.write()
			.insert(element.script_id().clone(), element);
	}

	/// Looks up the script element inserted under `script_id`.
	pub fn find_script(&self, script_id: &ScriptId) -> Option<ScriptElement> {
		self.inner.scripts.read().get(script_id).cloned()
	}

	/// Removes the script element inserted under `script_id`.
	///
	/// Returns whether an element was actually removed. Removing an absent
	/// identity is a no-op.
	pub fn remove_script(&self, script_id: &ScriptId) -> bool {
		self.inner.scripts.write().remove(script_id).is_some()
	}

	/// Number of tracked script elements.
	pub fn script_count(&self) -> usize {
		self.inner.scripts.read().len()
	}

	/// Identities of all tracked script elements.
	pub fn script_ids(&self) -> Vec<ScriptId> {
		self.inner.scripts.read().keys().cloned().collect()
	}

	/// Records an auxiliary script keyed by URL. Idempotent per URL.
	pub fn insert_custom_script(&self, url: &str, attributes: BTreeMap<String, String>) {
		self.inner
			.custom_scripts
			.write()
			.entry(url.to_string())
			.or_insert(attributes);
	}

	/// Whether an auxiliary script with the given URL is present.
	pub fn has_custom_script(&self, url: &str) -> bool {
		self.inner.custom_scripts.read().contains_key(url)
	}

	/// Attaches a namespace under the given global key.
	///
	/// The environment calls this when a loaded script publishes its global.
	pub fn install_namespace(&self, key: impl Into<String>, namespace: Namespace) {
		self.inner.namespaces.write().insert(key.into(), namespace);
	}

	/// Looks up the namespace attached under `key`.
	pub fn namespace(&self, key: &str) -> Option<Namespace> {
		self.inner.namespaces.read().get(key).cloned()
	}

	/// Detaches the namespace under `key`.
	pub fn remove_namespace(&self, key: &str) -> Option<Namespace> {
		self.inner.namespaces.write().remove(key)
	}
}

impl fmt::Debug for Document {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Document")
			.field("scripts", &self.script_count())
			.field("namespaces", &self.inner.namespaces.read().len())
			.finish()
	}
}

#[derive(Debug)]
struct ContainerInner {
	id: Uuid,
	connected: AtomicBool,
	children: AtomicUsize,
}

/// A managed element a widget renders into.
///
/// The controller owns exactly one container per mount point. `connected`
/// mirrors whether the element is still part of the page; render failures
/// against a detached or emptied container are treated as benign.
#[derive(Debug, Clone)]
pub struct Container {
	inner: Arc<ContainerInner>,
}

impl Container {
	/// Creates a connected, empty container.
	pub fn new() -> Self {
		Self {
			inner: Arc::new(ContainerInner {
				id: Uuid::new_v4(),
				connected: AtomicBool::new(true),
				children: AtomicUsize::new(0),
			}),
		}
	}

	/// Stable identity of the container.
	pub fn id(&self) -> Uuid {
		self.inner.id
	}

	/// Whether the element is still attached to the page.
	pub fn is_connected(&self) -> bool {
		self.inner.connected.load(Ordering::SeqCst)
	}

	/// Marks the element as removed from the page.
	pub fn detach(&self) {
		self.inner.connected.store(false, Ordering::SeqCst);
	}

	/// Marks the element as attached again.
	pub fn reattach(&self) {
		self.inner.connected.store(true, Ordering::SeqCst);
	}

	/// Number of child elements widgets have rendered.
	pub fn child_count(&self) -> usize {
		self.inner.children.load(Ordering::SeqCst)
	}

	/// Records markup appended by a rendering widget.
	pub fn append_child(&self) {
		self.inner.children.fetch_add(1, Ordering::SeqCst);
	}

	/// Drops all rendered children.
	pub fn clear(&self) {
		self.inner.children.store(0, Ordering::SeqCst);
	}

	/// Whether the two handles refer to the same element.
	pub fn same_element(&self, other: &Container) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}
}

impl Default for Container {
	fn default() -> Self {
		Self::new()
	}
}
