//! Structural-equality memoization.
//!
//! Widget options arrive as fresh allocations on every render even when
//! nothing changed. [`DeepMemo`] collapses those into pointer-stable
//! snapshots: callers compare `Arc` identity instead of re-walking the
//! structure, and downstream effects keyed on identity stop firing.

use std::sync::Arc;

/// Memoizer returning the previously stored allocation while values stay
/// structurally equal.
///
/// # Examples
///
/// ```
/// use paybridge::DeepMemo;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let mut memo = DeepMemo::new();
/// let first = memo.memoize(json!({ "amount": "9.99" }));
/// let second = memo.memoize(json!({ "amount": "9.99" }));
/// let third = memo.memoize(json!({ "amount": "19.99" }));
///
/// assert!(Arc::ptr_eq(&first, &second));
/// assert!(!Arc::ptr_eq(&second, &third));
/// ```
#[derive(Debug)]
pub struct DeepMemo<T: PartialEq> {
	current: Option<Arc<T>>,
}

impl<T: PartialEq> DeepMemo<T> {
	/// Creates an empty memoizer.
	pub fn new() -> Self {
		Self { current: None }
	}

	/// Returns the stored allocation when `value` compares equal to it,
	/// otherwise stores `value` and returns the fresh allocation.
	pub fn memoize(&mut self, value: T) -> Arc<T> {
		match &self.current {
			Some(stored) if **stored == value => Arc::clone(stored),
			_ => {
				let fresh = Arc::new(value);
				self.current = Some(Arc::clone(&fresh));
				fresh
			}
		}
	}

	/// Currently stored allocation, if any.
	pub fn current(&self) -> Option<Arc<T>> {
		self.current.clone()
	}

	/// Drops the stored allocation; the next call stores unconditionally.
	pub fn reset(&mut self) {
		self.current = None;
	}
}

impl<T: PartialEq> Default for DeepMemo<T> {
	fn default() -> Self {
		Self::new()
	}
}
