use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use coinlens_core::task::{Abortable, Stoppable, TaskHandle, drop_impl};

#[tokio::test(flavor = "multi_thread")]
async fn taskhandle_stop_graceful() {
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let (done_tx, done_rx) = tokio::sync::oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let _ = stop_rx.await;
        let _ = done_tx.send(());
    });

    let handle = TaskHandle::new(task, stop_tx);
    handle.stop().await;

    tokio::time::timeout(Duration::from_millis(100), done_rx)
        .await
        .expect("task did not complete after stop()")
        .expect("task dropped completion sender");
}

#[tokio::test(flavor = "multi_thread")]
async fn drop_lets_in_flight_work_finish() {
    let (stop_tx, mut stop_rx) = tokio::sync::oneshot::channel::<()>();
    let (started_tx, started_rx) = tokio::sync::oneshot::channel::<()>();
    let (done_tx, done_rx) = tokio::sync::oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let _ = started_tx.send(());
        // simulated fetch that does not observe the stop signal
        tokio::time::sleep(Duration::from_millis(30)).await;
        let _ = done_tx.send(());
        let _ = (&mut stop_rx).await;
    });

    let handle = TaskHandle::new(task, stop_tx);
    started_rx.await.unwrap();
    drop(handle);

    tokio::time::timeout(Duration::from_millis(500), done_rx)
        .await
        .expect("in-flight work was cancelled")
        .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn abort_cancels_immediately() {
    let (stop_tx, _stop_rx) = tokio::sync::oneshot::channel::<()>();
    let (done_tx, done_rx) = tokio::sync::oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(60)).await;
        let _ = done_tx.send(());
    });
    TaskHandle::new(task, stop_tx).abort();
    assert!(done_rx.await.is_err());
}

struct FakeHandle {
    finished: bool,
    aborted: Arc<AtomicBool>,
}

impl Abortable for FakeHandle {
    fn abort(&mut self) {
        self.aborted.store(true, Ordering::SeqCst);
    }
    fn is_finished(&self) -> bool {
        self.finished
    }
}

struct FakeStop(Arc<AtomicBool>);

impl Stoppable for FakeStop {
    fn send(self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[test]
fn drop_impl_prefers_signal_over_abort() {
    let aborted = Arc::new(AtomicBool::new(false));
    let sent = Arc::new(AtomicBool::new(false));
    let mut inner = Some(FakeHandle {
        finished: false,
        aborted: aborted.clone(),
    });
    let mut stop = Some(FakeStop(sent.clone()));
    drop_impl(&mut inner, &mut stop);
    assert!(sent.load(Ordering::SeqCst));
    assert!(!aborted.load(Ordering::SeqCst));
    assert!(inner.is_none());
}

#[test]
fn drop_impl_aborts_without_signal() {
    let aborted = Arc::new(AtomicBool::new(false));
    let mut inner = Some(FakeHandle {
        finished: false,
        aborted: aborted.clone(),
    });
    let mut stop: Option<FakeStop> = None;
    drop_impl(&mut inner, &mut stop);
    assert!(aborted.load(Ordering::SeqCst));
}
