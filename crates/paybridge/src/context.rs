//! Explicit provider-to-descendant dependency channel.
//!
//! There is no ambient global here. A provider populates a [`ContextScope`]
//! and hands it down; descendants query the scope through the hooks in
//! [`hooks`](crate::hooks). Querying a scope the right provider never
//! touched is a programmer error and fails loudly, not silently.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// A typed bag of provided values, keyed by type.
///
/// Cloning is shallow; clones observe the same entries.
#[derive(Clone, Default)]
pub struct ContextScope {
	entries: Arc<RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>>,
}

impl ContextScope {
	/// Creates an empty scope.
	pub fn new() -> Self {
		Self::default()
	}

	/// Provides a value to descendants, replacing any previous value of the
	/// same type.
	pub fn provide<T: Send + Sync + 'static>(&self, value: T) {
		self.entries
			.write()
			.insert(TypeId::of::<T>(), Arc::new(value));
	}

	/// Looks up the provided value of type `T`.
	pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
		let entry = self.entries.read().get(&TypeId::of::<T>()).cloned()?;
		entry.downcast::<T>().ok()
	}

	/// Removes the provided value of type `T`.
	///
	/// Returns whether a value was present. Providers call this on
	/// unmount so descendants fail loudly instead of reading stale state.
	pub fn remove<T: Send + Sync + 'static>(&self) -> bool {
		self.entries.write().remove(&TypeId::of::<T>()).is_some()
	}

	/// Number of provided entries.
	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	/// Whether nothing is provided.
	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}
}

impl fmt::Debug for ContextScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ContextScope")
			.field("entries", &self.len())
			.finish()
	}
}
