//! Call pacer — a single-worker gate in front of the scoring client.
//!
//! Each paced call holds the gate for the call itself plus the minimum
//! interval that follows it, whether the call succeeded or failed. At most one
//! call is in flight at any time.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;

pub struct Pacer {
    interval: Duration,
    gate: Mutex<()>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            gate: Mutex::new(()),
        }
    }

    /// Runs `call` exclusively, then waits out the interval before releasing the gate.
    pub async fn run<F: Future>(&self, call: F) -> F::Output {
        let _slot = self.gate.lock().await;
        let output = call.await;
        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
        output
    }
}
