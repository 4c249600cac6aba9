use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::entry::QueuedLine;
use crate::writer::DirectWriter;

/// Process-wide lifecycle of the background delivery path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No consumer has been started; queued logging falls back to direct writes.
    Uninitialized,
    /// The consumer is draining the queue.
    Running,
    /// Shutdown was signaled; pending entries are being flushed.
    Draining,
    /// Terminal. Every entry ever enqueued has been written.
    Stopped,
}

#[derive(Debug)]
struct QueueState {
    entries: VecDeque<QueuedLine>,
    lifecycle: LifecycleState,
}

/// Unbounded FIFO guarded by a monitor (mutex + condition variable).
///
/// While running, producers only hold the queue lock for an O(1) push.
/// Writers pop under the queue lock and take the I/O lock before releasing
/// it, so the order lines are popped is the order they reach their files.
#[derive(Debug)]
pub struct LogQueue {
    state: Mutex<QueueState>,
    ready: Condvar,
}

impl LogQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                entries: VecDeque::new(),
                lifecycle: LifecycleState::Uninitialized,
            }),
            ready: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.lock().lifecycle
    }

    /// Number of entries waiting to be written.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a line and wake the consumer.
    ///
    /// Only accepted while [`LifecycleState::Running`]; otherwise the line is
    /// handed back so the caller can write it directly.
    pub fn push(&self, queued: QueuedLine) -> Result<(), QueuedLine> {
        let mut state = self.lock();
        if state.lifecycle != LifecycleState::Running {
            return Err(queued);
        }
        state.entries.push_back(queued);
        self.ready.notify_one();
        Ok(())
    }

    /// Append a line, or write it synchronously when no consumer is running.
    ///
    /// The synchronous path holds the queue lock, writes whatever is still
    /// queued, then writes `queued`. A line logged during shutdown can't
    /// overtake lines of the same producer that are still waiting.
    pub(crate) fn push_or_write(&self, queued: QueuedLine, writer: &DirectWriter) {
        let mut state = self.lock();
        if state.lifecycle == LifecycleState::Running {
            state.entries.push_back(queued);
            self.ready.notify_one();
            return;
        }

        let _io = writer.lock();
        while let Some(pending) = state.entries.pop_front() {
            writer.write_locked(&pending);
        }
        writer.write_locked(&queued);
    }

    /// `Uninitialized -> Running`. Returns the state seen before the call.
    pub(crate) fn mark_running(&self) -> LifecycleState {
        let mut state = self.lock();
        let previous = state.lifecycle;
        if previous == LifecycleState::Uninitialized {
            state.lifecycle = LifecycleState::Running;
        }
        previous
    }

    /// `Uninitialized | Running -> Draining`, waking the consumer. Returns the
    /// state seen before the call.
    pub(crate) fn begin_shutdown(&self) -> LifecycleState {
        let mut state = self.lock();
        let previous = state.lifecycle;
        if matches!(
            previous,
            LifecycleState::Uninitialized | LifecycleState::Running
        ) {
            state.lifecycle = LifecycleState::Draining;
        }
        self.ready.notify_all();
        previous
    }

    pub(crate) fn mark_stopped(&self) {
        self.lock().lifecycle = LifecycleState::Stopped;
    }

    /// Consumer loop. Blocks until shutdown is signaled and the queue is
    /// empty. Returns the number of lines written.
    pub(crate) fn run_consumer(&self, writer: &DirectWriter) -> usize {
        let mut written = 0;
        let mut state = self.lock();
        loop {
            let Some(queued) = state.entries.pop_front() else {
                if state.lifecycle != LifecycleState::Running {
                    break;
                }
                state = self
                    .ready
                    .wait_while(state, |s| {
                        s.entries.is_empty() && s.lifecycle == LifecycleState::Running
                    })
                    .unwrap_or_else(PoisonError::into_inner);
                continue;
            };

            let io = writer.lock();
            drop(state);
            writer.write_locked(&queued);
            drop(io);
            written += 1;

            state = self.lock();
        }
        written
    }

    /// Synchronously write everything currently queued. Returns the number
    /// of lines written.
    pub(crate) fn drain(&self, writer: &DirectWriter) -> usize {
        let mut written = 0;
        loop {
            let mut state = self.lock();
            let Some(queued) = state.entries.pop_front() else {
                break;
            };
            let _io = writer.lock();
            drop(state);
            writer.write_locked(&queued);
            written += 1;
        }
        written
    }
}

impl Default for LogQueue {
    fn default() -> Self {
        Self::new()
    }
}
