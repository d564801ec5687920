// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 n64rx contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Background execution runner
//!
//! The CPU is meant to run on a dedicated context that calls `step` in a
//! loop, while display collaborators read snapshots on their own schedule.
//! [`Runner`] provides that split: it moves the [`System`] behind a mutex,
//! spawns a step thread gated by an atomic "should run" flag checked once
//! per iteration, and hands back a handle for snapshot reads and shutdown.
//!
//! Stopping is idempotent and never races an in-flight instruction: the
//! flag only prevents the *next* step, and `stop` joins the thread after an
//! in-progress `step` has completed. Snapshot reads take the lock briefly
//! between steps, so they observe whole-instruction boundaries.

use super::system::{Snapshot, System};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Handle to an emulation session running on its own thread
///
/// # Example
/// ```no_run
/// use n64rx::core::runner::Runner;
/// use n64rx::core::system::System;
/// use std::time::Duration;
///
/// let mut system = System::new();
/// system.load_rom("game.z64").unwrap();
///
/// let mut runner = Runner::spawn(system, Some(Duration::from_micros(10)));
/// let snapshot = runner.snapshot();
/// println!("PC: 0x{:08X}", snapshot.pc);
/// runner.stop();
/// ```
pub struct Runner {
    system: Arc<Mutex<System>>,
    should_run: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Runner {
    /// Start executing `system` on a dedicated thread
    ///
    /// The system is started before the thread begins stepping. An optional
    /// `step_interval` throttles the loop to approximate a target
    /// instruction rate; `None` runs unthrottled.
    pub fn spawn(mut system: System, step_interval: Option<Duration>) -> Self {
        system.start();

        let system = Arc::new(Mutex::new(system));
        let should_run = Arc::new(AtomicBool::new(true));

        let thread = {
            let system = Arc::clone(&system);
            let should_run = Arc::clone(&should_run);
            thread::spawn(move || {
                log::info!("emulation thread started");
                while should_run.load(Ordering::Acquire) {
                    {
                        let mut guard = system.lock().unwrap_or_else(PoisonError::into_inner);
                        guard.step();
                    }
                    if let Some(interval) = step_interval {
                        thread::sleep(interval);
                    }
                }
                log::info!("emulation thread stopped");
            })
        };

        Self {
            system,
            should_run,
            thread: Some(thread),
        }
    }

    /// Take a point-in-time snapshot of the running session
    ///
    /// Holds the session lock only long enough to copy the state out, so
    /// the step loop is stalled for at most one snapshot copy.
    pub fn snapshot(&self) -> Snapshot {
        self.system
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
    }

    /// Run a closure against the session under the lock
    ///
    /// For occasional interventions (save states, resets) from outside the
    /// step thread. Keep the closure short: the step loop waits on it.
    pub fn with_system<R>(&self, f: impl FnOnce(&mut System) -> R) -> R {
        let mut guard = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Stop the step thread and the session
    ///
    /// Idempotent: repeat calls are no-ops. The current instruction, if one
    /// is mid-step, always runs to completion before the thread exits.
    pub fn stop(&mut self) {
        if self.should_run.swap(false, Ordering::AcqRel) {
            if let Some(handle) = self.thread.take() {
                let _ = handle.join();
            }
            self.system
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .stop();
        }
    }

    /// Whether the step thread is still running
    pub fn is_running(&self) -> bool {
        self.should_run.load(Ordering::Acquire)
    }
}

impl Drop for Runner {
    fn drop(&mut self) {
        self.stop();
    }
}
