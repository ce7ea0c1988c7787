use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;

use super::controller::{Core, Sample, lock};

/// Background sampler for one playback session.
///
/// The thread wakes every `tick`, takes the controller lock and asks the core
/// to sample the session it was started for. It exits as soon as it is
/// cancelled, the session generation moves on, or the controller is gone.
/// Cancellation is only ever requested while holding the same lock, so once
/// `cancel` returns to a control operation no further sample is published.
pub(super) struct ProgressMonitor {
    running: Arc<AtomicBool>,
    generation: u64,
    join: Option<JoinHandle<()>>,
}

impl ProgressMonitor {
    pub(super) fn spawn(core: Weak<Mutex<Core>>, generation: u64, tick: Duration) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let join = thread::spawn(move || run(core, flag, generation, tick));
        debug!(generation, "progress monitor started");

        Self {
            running,
            generation,
            join: Some(join),
        }
    }

    pub(super) fn cancel(&self) {
        if self.running.swap(false, Ordering::AcqRel) {
            debug!(generation = self.generation, "progress monitor cancelled");
        }
    }

    /// Wait for the thread to exit. Must not be called with the controller
    /// lock held, or from the monitor thread itself.
    pub(super) fn join(mut self) {
        self.cancel();
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}

impl Drop for ProgressMonitor {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn run(core: Weak<Mutex<Core>>, running: Arc<AtomicBool>, generation: u64, tick: Duration) {
    loop {
        thread::sleep(tick);
        if !running.load(Ordering::Acquire) {
            break;
        }
        let Some(shared) = core.upgrade() else {
            break;
        };
        let mut guard = lock(&shared);
        // A cancel that raced the sleep wins.
        if !running.load(Ordering::Acquire) {
            break;
        }

        match guard.sample(generation) {
            Sample::Continue => {}
            Sample::Stale => break,
            Sample::Finished => {
                guard.finish_track(generation);
                break;
            }
        }
    }
    debug!(generation, "progress monitor stopped");
}
