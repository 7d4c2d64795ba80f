//! Error delivery callback.
//!
//! Sessions and controllers report recoverable failures instead of
//! returning them up a call stack that no longer exists by the time the
//! failure settles. [`ErrorSink`] is the channel: a cloneable callback the
//! embedding application supplies once per session.

use std::fmt;
use std::sync::Arc;

use crate::error::BridgeError;

/// A cloneable callback receiving surfaced [`BridgeError`]s.
///
/// # Examples
///
/// ```
/// use paybridge::{BridgeError, ErrorSink};
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = ErrorSink::new({
/// 	let seen = Arc::clone(&seen);
/// 	move |error| seen.lock().unwrap().push(error)
/// });
///
/// sink.emit(BridgeError::Configuration("missing constructor".into()));
/// assert_eq!(seen.lock().unwrap().len(), 1);
/// ```
pub struct ErrorSink {
	inner: Arc<dyn Fn(BridgeError) + Send + Sync + 'static>,
}

impl ErrorSink {
	/// Creates a sink from a function or closure.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(BridgeError) + Send + Sync + 'static,
	{
		Self { inner: Arc::new(f) }
	}

	/// Sink that records surfaced errors in the log and nothing else.
	///
	/// Used when the embedding application installs no sink of its own.
	pub fn log() -> Self {
		Self::new(|error| tracing::error!(%error, "unhandled binding error"))
	}

	/// Delivers an error to the sink.
	pub fn emit(&self, error: BridgeError) {
		(self.inner)(error);
	}
}

impl Clone for ErrorSink {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl Default for ErrorSink {
	fn default() -> Self {
		Self::log()
	}
}

impl fmt::Debug for ErrorSink {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ErrorSink")
			.field("inner", &"<function>")
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Mutex;

	use super::*;

	#[test]
	fn emit_reaches_the_callback() {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let sink = ErrorSink::new({
			let seen = Arc::clone(&seen);
			move |error| seen.lock().unwrap().push(error)
		});
		sink.emit(BridgeError::Configuration("one".into()));
		sink.emit(BridgeError::Configuration("two".into()));
		assert_eq!(seen.lock().unwrap().len(), 2);
	}

	#[test]
	fn clones_share_the_callback() {
		let seen = Arc::new(Mutex::new(0));
		let sink = ErrorSink::new({
			let seen = Arc::clone(&seen);
			move |_| *seen.lock().unwrap() += 1
		});
		sink.clone().emit(BridgeError::Configuration("x".into()));
		sink.emit(BridgeError::Configuration("y".into()));
		assert_eq!(*seen.lock().unwrap(), 2);
	}

	#[test]
	fn debug_hides_the_function() {
		assert!(format!("{:?}", ErrorSink::log()).contains("<function>"));
	}
}
