//! Widget controller integration tests
//!
//! Success Criteria:
//! 1. A resolved script mounts the widget and renders it into the container
//! 2. Handler swaps reach the live instance through stable trampolines
//! 3. Structurally equal prop snapshots never touch the live instance
//! 4. Changed values update in place when supported and remount otherwise
//! 5. Configuration and instance failures surface through the error sink
//! 6. Render rejections against empty or detached containers stay benign
//!
//! Test Categories:
//! - Happy Path: 2 tests
//! - Prop Updates: 3 tests
//! - Lifecycle: 3 tests
//! - Error Path: 3 tests
//! - Render Rejection: 1 test (4 cases)
//!
//! Total: 12 tests

use std::sync::{Arc, Mutex};

use paybridge::prelude::*;
use paybridge_mocks::{MockScriptLoader, MockWidgetFactory, RenderMode};
use rstest::*;
use serde_json::{Value, json};

// ============================================================================
// Fixtures
// ============================================================================

async fn resolved_session(namespace: Namespace) -> ScriptSession {
	let document = Document::new();
	let loader: Arc<dyn ScriptLoader> =
		Arc::new(MockScriptLoader::with_namespace(document.clone(), namespace));
	let provider = ScriptProvider::new(
		document,
		loader,
		LoadOptions::new("controller-client").with_components("buttons,card-fields"),
	);
	provider.mount();
	let session = provider.session();
	session.wait_for(ScriptState::is_resolved).await;
	session
}

fn capturing_sink() -> (ErrorSink, Arc<Mutex<Vec<BridgeError>>>) {
	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = ErrorSink::new({
		let seen = Arc::clone(&seen);
		move |error| seen.lock().unwrap().push(error)
	});
	(sink, seen)
}

fn recorder(label: &'static str, log: &Arc<Mutex<Vec<&'static str>>>) -> Handler {
	let log = Arc::clone(log);
	Handler::from_async(move |_| {
		let log = Arc::clone(&log);
		async move {
			log.lock().unwrap().push(label);
			Ok(Value::Null)
		}
	})
}

// ============================================================================
// Happy Path Tests (2 tests)
// ============================================================================

/// Tests that a sync against a resolved script renders into the container
#[tokio::test]
async fn test_sync_mounts_and_renders_into_the_container() {
	let namespace = Namespace::new("paypal");
	let factory = MockWidgetFactory::install(&namespace, WidgetKind::Buttons);
	let session = resolved_session(namespace).await;
	let (sink, errors) = capturing_sink();
	let container = Container::new();
	let controller = WidgetController::new(
		session,
		WidgetKind::Buttons,
		container.clone(),
		WidgetProps::new().with_value("style", json!({ "layout": "vertical" })),
		sink,
	);

	let outcome = controller.sync().await;

	assert_eq!(outcome, MountOutcome::Mounted);
	assert!(controller.is_mounted());
	assert_eq!(container.child_count(), 1);
	assert_eq!(factory.created_count(), 1);
	let widget = factory.last_created().unwrap();
	assert_eq!(
		widget.captured_props().value("style"),
		Some(&json!({ "layout": "vertical" }))
	);
	assert!(errors.lock().unwrap().is_empty());
}

/// Tests that handler swaps reach the live instance without remounting
#[tokio::test]
async fn test_handler_swaps_reach_the_live_instance() {
	let namespace = Namespace::new("paypal");
	let factory = MockWidgetFactory::install(&namespace, WidgetKind::Buttons);
	let session = resolved_session(namespace).await;
	let calls = Arc::new(Mutex::new(Vec::new()));
	let controller = WidgetController::new(
		session,
		WidgetKind::Buttons,
		Container::new(),
		WidgetProps::new().with_handler("onApprove", recorder("first", &calls)),
		ErrorSink::log(),
	);
	controller.sync().await;

	let captured = factory
		.last_created()
		.unwrap()
		.captured_props()
		.handler("onApprove")
		.unwrap();
	captured.call(Value::Null).await.unwrap();

	let outcome = controller
		.update(WidgetProps::new().with_handler("onApprove", recorder("second", &calls)))
		.await;
	captured.call(Value::Null).await.unwrap();

	assert_eq!(outcome, MountOutcome::Mounted);
	assert_eq!(factory.created_count(), 1);
	assert_eq!(*calls.lock().unwrap(), ["first", "second"]);
}

// ============================================================================
// Prop Update Tests (3 tests)
// ============================================================================

/// Tests that a structurally equal snapshot skips the instance entirely
#[tokio::test]
async fn test_equal_values_skip_the_live_instance() {
	let namespace = Namespace::new("paypal");
	let factory = MockWidgetFactory::install(&namespace, WidgetKind::Buttons);
	factory.set_supports_update(true);
	let session = resolved_session(namespace).await;
	let props = WidgetProps::new().with_value("style", json!({ "layout": "vertical" }));
	let controller = WidgetController::new(
		session,
		WidgetKind::Buttons,
		Container::new(),
		props.clone(),
		ErrorSink::log(),
	);
	controller.sync().await;

	let outcome = controller.update(props).await;

	assert_eq!(outcome, MountOutcome::Mounted);
	assert_eq!(factory.created_count(), 1);
	assert!(factory.last_created().unwrap().recorded_updates().is_empty());
}

/// Tests that changed values flow through an in-place update when supported
#[tokio::test]
async fn test_changed_values_update_in_place_when_supported() {
	let namespace = Namespace::new("paypal");
	let factory = MockWidgetFactory::install(&namespace, WidgetKind::Messages);
	factory.set_supports_update(true);
	let session = resolved_session(namespace).await;
	let controller = WidgetController::new(
		session,
		WidgetKind::Messages,
		Container::new(),
		WidgetProps::new().with_value("amount", json!("10.00")),
		ErrorSink::log(),
	);
	controller.sync().await;

	let outcome = controller
		.update(WidgetProps::new().with_value("amount", json!("25.00")))
		.await;

	assert_eq!(outcome, MountOutcome::Mounted);
	assert_eq!(factory.created_count(), 1);
	let widget = factory.last_created().unwrap();
	assert_eq!(widget.render_count(), 1);
	let updates = widget.recorded_updates();
	assert_eq!(updates.len(), 1);
	assert_eq!(updates[0].get("amount"), Some(&json!("25.00")));
}

/// Tests that changed values force a remount when updates are unsupported
#[tokio::test]
async fn test_changed_values_remount_without_update_support() {
	let namespace = Namespace::new("paypal");
	let factory = MockWidgetFactory::install(&namespace, WidgetKind::Buttons);
	let session = resolved_session(namespace).await;
	let controller = WidgetController::new(
		session,
		WidgetKind::Buttons,
		Container::new(),
		WidgetProps::new().with_value("amount", json!("10.00")),
		ErrorSink::log(),
	);
	controller.sync().await;
	let first = factory.last_created().unwrap();

	let outcome = controller
		.update(WidgetProps::new().with_value("amount", json!("25.00")))
		.await;

	assert_eq!(outcome, MountOutcome::Mounted);
	assert_eq!(factory.created_count(), 2);
	assert_eq!(first.close_count(), 1);
	let second = factory.last_created().unwrap();
	assert!(!Arc::ptr_eq(&first, &second));
	assert_eq!(second.captured_props().value("amount"), Some(&json!("25.00")));
}

// ============================================================================
// Lifecycle Tests (3 tests)
// ============================================================================

/// Tests that losing the resolved script parks the controller and closes
/// the stale instance
#[tokio::test]
async fn test_losing_the_script_parks_and_closes_the_stale_instance() {
	let namespace = Namespace::new("paypal");
	let factory = MockWidgetFactory::install(&namespace, WidgetKind::Buttons);
	let session = resolved_session(namespace).await;
	let controller = WidgetController::new(
		session.clone(),
		WidgetKind::Buttons,
		Container::new(),
		WidgetProps::new(),
		ErrorSink::log(),
	);
	controller.sync().await;
	let first = factory.last_created().unwrap();

	session.dispatch(ScriptAction::pending());
	let outcome = controller.sync().await;

	assert_eq!(outcome, MountOutcome::AwaitingScript);
	assert!(!controller.is_mounted());
	assert_eq!(first.close_count(), 1);
}

/// Tests that a repeated sync supersedes the previous instance
#[tokio::test]
async fn test_resync_supersedes_the_previous_instance() {
	let namespace = Namespace::new("paypal");
	let factory = MockWidgetFactory::install(&namespace, WidgetKind::Buttons);
	let session = resolved_session(namespace).await;
	let controller = WidgetController::new(
		session,
		WidgetKind::Buttons,
		Container::new(),
		WidgetProps::new(),
		ErrorSink::log(),
	);

	controller.sync().await;
	let first = factory.last_created().unwrap();
	let outcome = controller.sync().await;

	assert_eq!(outcome, MountOutcome::Mounted);
	assert!(controller.is_mounted());
	assert_eq!(factory.created_count(), 2);
	assert_eq!(first.close_count(), 1);
	assert!(!Arc::ptr_eq(&first, &factory.last_created().unwrap()));
}

/// Tests that unmount closes the live instance and stays idempotent
#[tokio::test]
async fn test_unmount_closes_exactly_once() {
	let namespace = Namespace::new("paypal");
	let factory = MockWidgetFactory::install(&namespace, WidgetKind::Buttons);
	factory.set_close_error(Some(WidgetError::Close("already gone".into())));
	let session = resolved_session(namespace).await;
	let controller = WidgetController::new(
		session,
		WidgetKind::Buttons,
		Container::new(),
		WidgetProps::new(),
		ErrorSink::log(),
	);
	controller.sync().await;
	let widget = factory.last_created().unwrap();

	controller.unmount().await;
	controller.unmount().await;

	assert!(!controller.is_mounted());
	assert_eq!(widget.close_count(), 1);
}

// ============================================================================
// Error Path Tests (3 tests)
// ============================================================================

/// Tests that a missing constructor surfaces as a configuration failure
#[tokio::test]
async fn test_missing_constructor_is_a_configuration_failure() {
	let session = resolved_session(Namespace::new("paypal")).await;
	let (sink, errors) = capturing_sink();
	let controller = WidgetController::new(
		session,
		WidgetKind::Buttons,
		Container::new(),
		WidgetProps::new(),
		sink,
	);

	let outcome = controller.sync().await;

	match outcome {
		MountOutcome::Failed(BridgeError::Configuration(message)) => {
			assert!(message.contains("Buttons"));
			assert!(message.contains("'buttons'"));
		}
		other => panic!("expected a configuration failure, got {other:?}"),
	}
	assert!(!controller.is_mounted());
	assert_eq!(errors.lock().unwrap().len(), 1);
}

/// Tests that a rejected constructor surfaces as an initialization failure
#[tokio::test]
async fn test_rejected_construction_is_an_initialization_failure() {
	let namespace = Namespace::new("paypal");
	let factory = MockWidgetFactory::install(&namespace, WidgetKind::Buttons);
	factory.set_fail_construction(true);
	let session = resolved_session(namespace).await;
	let (sink, errors) = capturing_sink();
	let controller = WidgetController::new(
		session,
		WidgetKind::Buttons,
		Container::new(),
		WidgetProps::new(),
		sink,
	);

	let outcome = controller.sync().await;

	assert!(matches!(
		outcome,
		MountOutcome::Failed(BridgeError::Initialization(_))
	));
	assert!(!controller.is_mounted());
	assert_eq!(factory.created_count(), 0);
	assert_eq!(errors.lock().unwrap().len(), 1);
}

/// Tests that an ineligible widget is a fallback signal, not an error
#[tokio::test]
async fn test_ineligible_widget_is_not_an_error() {
	let namespace = Namespace::new("paypal");
	let factory = MockWidgetFactory::install(&namespace, WidgetKind::Marks);
	factory.set_eligible(false);
	let session = resolved_session(namespace).await;
	let (sink, errors) = capturing_sink();
	let container = Container::new();
	let controller = WidgetController::new(
		session,
		WidgetKind::Marks,
		container.clone(),
		WidgetProps::new(),
		sink,
	);

	let outcome = controller.sync().await;

	assert_eq!(outcome, MountOutcome::Ineligible);
	assert!(!controller.is_mounted());
	assert_eq!(container.child_count(), 0);
	assert!(factory.last_created().unwrap().is_closed());
	assert!(errors.lock().unwrap().is_empty());
}

// ============================================================================
// Render Rejection Tests (1 test, 4 cases)
// ============================================================================

/// Tests the split between benign and real render rejections
#[rstest]
#[case::no_markup_appeared(RenderMode::FailBeforeMarkup, false, true)]
#[case::detached_before_markup(RenderMode::FailBeforeMarkup, true, true)]
#[case::detached_with_markup(RenderMode::FailAfterMarkup, true, true)]
#[case::attached_with_markup(RenderMode::FailAfterMarkup, false, false)]
#[tokio::test]
async fn test_render_rejections_split_into_benign_and_real(
	#[case] mode: RenderMode,
	#[case] detached: bool,
	#[case] benign: bool,
) {
	let namespace = Namespace::new("paypal");
	let factory = MockWidgetFactory::install(&namespace, WidgetKind::Buttons);
	factory.set_render_mode(mode);
	let session = resolved_session(namespace).await;
	let (sink, errors) = capturing_sink();
	let container = Container::new();
	if detached {
		container.detach();
	}
	let controller = WidgetController::new(
		session,
		WidgetKind::Buttons,
		container,
		WidgetProps::new(),
		sink,
	);

	let outcome = controller.sync().await;

	assert!(!controller.is_mounted());
	if benign {
		assert_eq!(outcome, MountOutcome::Detached);
		assert!(errors.lock().unwrap().is_empty());
	} else {
		assert!(matches!(
			outcome,
			MountOutcome::Failed(BridgeError::Render(_))
		));
		assert_eq!(errors.lock().unwrap().len(), 1);
	}
}
