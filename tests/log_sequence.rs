//! Observes the lifecycle log sequence end to end.
//!
//! Lives in its own test binary because it owns the process-global tracing
//! subscriber.

mod common;

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing_subscriber::fmt::MakeWriter;

/// Collects everything the subscriber writes.
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Capture {
    type Writer = Capture;

    fn make_writer(&'a self) -> Capture {
        self.clone()
    }
}

#[tokio::test]
async fn clean_shutdown_logs_in_order() {
    let capture = Capture::default();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(capture.clone())
        .with_ansi(false)
        .init();

    let config = common::test_config(29201);
    let addr = config.addr.clone();
    let (shutdown, _cleanups, task) = common::spawn_server(config);
    common::wait_until_serving(&addr).await;

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(8), task)
        .await
        .expect("start hung past the shutdown budget")
        .expect("server task panicked")
        .expect("clean shutdown should not error");

    let log = capture.contents();
    let starting = log
        .find("Starting a new server")
        .expect("missing startup line");
    let stopping = log
        .find("Shutting down the http server")
        .expect("missing shutdown line");
    let down = log.find("Server is down").expect("missing final line");

    assert!(starting < stopping, "startup must be logged before shutdown");
    assert!(stopping < down, "shutdown must be logged before the final line");
    assert!(!log.contains("ERROR"), "unexpected error logs:\n{log}");
}
