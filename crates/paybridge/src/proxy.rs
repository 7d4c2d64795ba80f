//! Stable props facade.
//!
//! Widget instances capture their props once at construction and keep them
//! for the life of the instance. Re-rendering the embedding component must
//! therefore not hand the instance new closures directly; it would keep
//! calling the stale ones. [`ProxyProps`] sits in between: the instance
//! receives trampolines whose identity never changes, and each trampoline
//! resolves the current handler through a holder cell at call time.
//!
//! Plain values take the other route: they are snapshotted per render and
//! diffed by the memoizer, so only handlers pay the indirection cost.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use paybridge_sdk::{Handler, WidgetProps};

struct HolderCell {
	current: RwLock<Handler>,
}

struct TrampolineEntry {
	cell: Arc<HolderCell>,
	trampoline: Handler,
}

/// One long-lived proxy per mounted widget.
///
/// `merge` replaces the value snapshot and swaps holder cell contents;
/// reading a handler key always yields the same trampoline, no matter how
/// many merges happened in between.
#[derive(Default)]
pub struct ProxyProps {
	values: RwLock<BTreeMap<String, Value>>,
	handlers: RwLock<BTreeMap<String, TrampolineEntry>>,
}

impl ProxyProps {
	/// Creates an empty proxy.
	pub fn new() -> Self {
		Self::default()
	}

	/// Absorbs the latest render's props.
	///
	/// Values are replaced wholesale. For every handler key, the existing
	/// holder cell is re-pointed at the new handler; keys seen for the
	/// first time get a fresh cell and trampoline. Keys absent from the
	/// new props keep their cell, so trampolines captured earlier resolve
	/// to the last handler ever supplied for that key.
	pub fn merge(&self, props: &WidgetProps) {
		*self.values.write() = props.values.clone();
		let mut handlers = self.handlers.write();
		for (key, handler) in &props.handlers {
			match handlers.entry(key.clone()) {
				Entry::Occupied(entry) => {
					*entry.get().cell.current.write() = handler.clone();
				}
				Entry::Vacant(slot) => {
					slot.insert(Self::entry_for(handler.clone()));
				}
			}
		}
	}

	fn entry_for(handler: Handler) -> TrampolineEntry {
		let cell = Arc::new(HolderCell {
			current: RwLock::new(handler),
		});
		let trampoline = Handler::new({
			let cell = Arc::clone(&cell);
			move |payload| {
				let current = cell.current.read().clone();
				Box::pin(async move { current.call(payload).await })
			}
		});
		TrampolineEntry { cell, trampoline }
	}

	/// Current value snapshot.
	pub fn values(&self) -> BTreeMap<String, Value> {
		self.values.read().clone()
	}

	/// Looks up a plain value.
	pub fn value(&self, key: &str) -> Option<Value> {
		self.values.read().get(key).cloned()
	}

	/// Stable trampoline for a handler key, if one was ever merged.
	pub fn handler(&self, key: &str) -> Option<Handler> {
		self.handlers
			.read()
			.get(key)
			.map(|entry| entry.trampoline.clone())
	}

	/// Handler keys with live holder cells.
	pub fn handler_keys(&self) -> Vec<String> {
		self.handlers.read().keys().cloned().collect()
	}

	/// Props to hand a widget factory: the value snapshot plus the stable
	/// trampolines.
	pub fn snapshot(&self) -> WidgetProps {
		WidgetProps {
			values: self.values(),
			handlers: self
				.handlers
				.read()
				.iter()
				.map(|(key, entry)| (key.clone(), entry.trampoline.clone()))
				.collect(),
		}
	}
}

impl fmt::Debug for ProxyProps {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ProxyProps")
			.field("values", &self.values.read().len())
			.field("handlers", &self.handler_keys())
			.finish()
	}
}
