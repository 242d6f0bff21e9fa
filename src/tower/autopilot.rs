use crate::tower::tower::Tower;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

struct StopSignal {
    halted: Mutex<bool>,
    wake: Condvar,
}

/// Background clock: one worker thread that ticks the shared tower every
/// `pace` of real time. The tower mutex guards exactly one tick and is
/// never held across the sleep.
pub struct Autopilot {
    signal: Arc<StopSignal>,
    handle: Option<JoinHandle<()>>,
}

impl Autopilot {
    pub fn engage(tower: Arc<Mutex<Tower>>, pace: Duration) -> Autopilot {
        let signal = Arc::new(StopSignal {
            halted: Mutex::new(false),
            wake: Condvar::new(),
        });

        let worker_signal = signal.clone();
        let handle = thread::spawn(move || {
            loop {
                let mut halted = worker_signal.halted.lock();
                if *halted {
                    break;
                }
                // cancellable sleep: disengage wakes us mid-interval
                let _ = worker_signal.wake.wait_for(&mut halted, pace);
                if *halted {
                    break;
                }
                drop(halted);

                // the tower was finalized underneath us: park for good
                if tower.lock().tick().is_err() {
                    break;
                }
            }
        });

        Autopilot {
            signal,
            handle: Some(handle),
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops the worker after its current wait and joins it. A tick in
    /// flight finishes; no new tick starts once the stop flag is up.
    pub fn disengage(self) {}
}

impl Drop for Autopilot {
    fn drop(&mut self) {
        *self.signal.halted.lock() = true;
        self.signal.wake.notify_all();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
