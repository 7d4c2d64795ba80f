//! Per-slot bookkeeping for card field instances.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use paybridge_sdk::WidgetHandle;

use crate::callback::ErrorSink;
use crate::error::BridgeError;

use super::CardFieldKind;

/// Tracks at most one live instance per card field slot.
///
/// Registering into an occupied slot reports a duplicate through the error
/// sink yet still installs the newcomer; the displaced instance is handed
/// back to the caller untouched. Regression coverage pins this down, so a
/// change here is a behavior change, not a cleanup.
pub struct FieldRegistry {
	slots: RwLock<BTreeMap<CardFieldKind, Arc<dyn WidgetHandle>>>,
	sink: ErrorSink,
}

impl FieldRegistry {
	/// Creates an empty registry reporting duplicates through `sink`.
	pub fn new(sink: ErrorSink) -> Self {
		Self {
			slots: RwLock::new(BTreeMap::new()),
			sink,
		}
	}

	/// Installs `instance` under `kind`, returning any displaced occupant.
	///
	/// A displaced occupant means the caller registered twice without
	/// unregistering; that is reported once per occurrence through the
	/// error sink while the slot still moves to the newcomer.
	pub fn register(
		&self,
		kind: CardFieldKind,
		instance: Arc<dyn WidgetHandle>,
	) -> Option<Arc<dyn WidgetHandle>> {
		let previous = self.slots.write().insert(kind, instance);
		if previous.is_some() {
			warn!(field = %kind, "card field slot was already occupied; replacing");
			self.sink.emit(BridgeError::DuplicateRegistration(kind));
		}
		previous
	}

	/// Removes and returns the occupant of `kind`, if any.
	pub fn take(&self, kind: CardFieldKind) -> Option<Arc<dyn WidgetHandle>> {
		self.slots.write().remove(&kind)
	}

	/// Current occupant of `kind`, if any.
	pub fn get(&self, kind: CardFieldKind) -> Option<Arc<dyn WidgetHandle>> {
		self.slots.read().get(&kind).cloned()
	}

	/// Slots currently occupied, in slot order.
	pub fn registered_kinds(&self) -> Vec<CardFieldKind> {
		self.slots.read().keys().copied().collect()
	}

	/// Number of occupied slots.
	pub fn len(&self) -> usize {
		self.slots.read().len()
	}

	/// Whether no slot is occupied.
	pub fn is_empty(&self) -> bool {
		self.slots.read().is_empty()
	}

	/// Empties the registry, returning every occupant for teardown.
	pub fn drain(&self) -> Vec<(CardFieldKind, Arc<dyn WidgetHandle>)> {
		std::mem::take(&mut *self.slots.write()).into_iter().collect()
	}
}

impl fmt::Debug for FieldRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldRegistry")
			.field("registered", &self.registered_kinds())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use async_trait::async_trait;
	use parking_lot::Mutex;
	use paybridge_sdk::{Container, WidgetError, WidgetKind};

	use super::*;

	struct NullField(WidgetKind);

	#[async_trait]
	impl WidgetHandle for NullField {
		fn kind(&self) -> WidgetKind {
			self.0
		}

		async fn render(&self, _container: &Container) -> Result<(), WidgetError> {
			Ok(())
		}

		async fn close(&self) -> Result<(), WidgetError> {
			Ok(())
		}
	}

	fn field(kind: CardFieldKind) -> Arc<dyn WidgetHandle> {
		Arc::new(NullField(kind.widget_kind()))
	}

	fn capturing_sink() -> (ErrorSink, Arc<Mutex<Vec<BridgeError>>>) {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let sink = ErrorSink::new({
			let seen = Arc::clone(&seen);
			move |error| seen.lock().push(error)
		});
		(sink, seen)
	}

	#[test]
	fn first_registration_is_silent() {
		let (sink, seen) = capturing_sink();
		let registry = FieldRegistry::new(sink);

		let displaced = registry.register(CardFieldKind::Number, field(CardFieldKind::Number));

		assert!(displaced.is_none());
		assert!(seen.lock().is_empty());
		assert_eq!(registry.registered_kinds(), vec![CardFieldKind::Number]);
	}

	#[test]
	fn duplicate_registration_reports_once_and_still_overwrites() {
		let (sink, seen) = capturing_sink();
		let registry = FieldRegistry::new(sink);
		let first = field(CardFieldKind::Cvv);
		let second = field(CardFieldKind::Cvv);

		registry.register(CardFieldKind::Cvv, Arc::clone(&first));
		let displaced = registry.register(CardFieldKind::Cvv, Arc::clone(&second));

		let errors = seen.lock();
		assert_eq!(*errors, [BridgeError::DuplicateRegistration(CardFieldKind::Cvv)]);
		assert!(Arc::ptr_eq(&displaced.unwrap(), &first));
		assert!(Arc::ptr_eq(&registry.get(CardFieldKind::Cvv).unwrap(), &second));
	}

	#[test]
	fn take_empties_the_slot() {
		let (sink, _) = capturing_sink();
		let registry = FieldRegistry::new(sink);
		registry.register(CardFieldKind::Expiry, field(CardFieldKind::Expiry));

		assert!(registry.take(CardFieldKind::Expiry).is_some());
		assert!(registry.take(CardFieldKind::Expiry).is_none());
		assert!(registry.is_empty());
	}

	#[test]
	fn drain_returns_everything_in_slot_order() {
		let (sink, _) = capturing_sink();
		let registry = FieldRegistry::new(sink);
		registry.register(CardFieldKind::Name, field(CardFieldKind::Name));
		registry.register(CardFieldKind::Number, field(CardFieldKind::Number));

		let drained = registry.drain();

		let kinds: Vec<_> = drained.iter().map(|(kind, _)| *kind).collect();
		assert_eq!(kinds, vec![CardFieldKind::Number, CardFieldKind::Name]);
		assert!(registry.is_empty());
	}
}
