use std::sync::Arc;

use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use repo2pdf::progress::{ProgressHub, ProgressPublisher};

#[test]
fn publish_without_subscribers_returns_immediately() {
    let hub = ProgressHub::new();

    // No channel registered for this run: the message is silently dropped.
    hub.publish("nobody-listening", "Generating PDF...");
}

#[tokio::test]
async fn subscriber_receives_published_messages_in_order() {
    let hub = ProgressHub::new();
    let mut receiver = hub.subscribe("run-1");

    hub.publish("run-1", "Updating github.com/apache/airflow...");
    hub.publish("run-1", "Generating PDF...");

    assert_eq!(
        receiver.recv().await.expect("first message"),
        "Updating github.com/apache/airflow..."
    );
    assert_eq!(receiver.recv().await.expect("second message"), "Generating PDF...");
}

#[tokio::test]
async fn runs_are_isolated_from_each_other() {
    let hub = ProgressHub::new();
    let mut first = hub.subscribe("run-1");
    let mut second = hub.subscribe("run-2");

    hub.publish("run-1", "done!");

    assert_eq!(first.recv().await.expect("own message"), "done!");
    assert!(matches!(second.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn closing_a_run_ends_the_subscription() {
    let hub = ProgressHub::new();
    let mut receiver = hub.subscribe("run-1");

    hub.close("run-1");

    assert!(matches!(receiver.recv().await, Err(RecvError::Closed)));
}

#[tokio::test]
async fn publisher_handle_targets_its_own_run() {
    let hub = Arc::new(ProgressHub::new());
    let mut receiver = hub.subscribe("run-9");

    let publisher = ProgressPublisher::new(hub.clone(), "run-9");
    assert_eq!(publisher.run_id(), "run-9");
    publisher.publish("Setting up Python environment...");

    assert_eq!(
        receiver.recv().await.expect("message"),
        "Setting up Python environment..."
    );
}
