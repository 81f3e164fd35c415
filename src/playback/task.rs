/// What a task wants after one invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskFate {
    /// Keep the task scheduled.
    Continue,
    /// Retire the task.
    Stop,
}

/// Opaque handle to a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

type TaskFn = Box<dyn FnMut(f64) -> TaskFate>;

struct Task {
    handle: TaskHandle,
    interval_ms: f64,
    last_run_ms: Option<f64>,
    callback: TaskFn,
}

/// Cancellable interval tasks, driven explicitly from the host tick.
///
/// There is no hidden timer thread: the host calls [`drive`] with its
/// monotonic time and each due task runs to completion before the next is
/// considered, so tasks never observe each other mid-update. Intervals are
/// throttles (a minimum spacing between runs), which keeps a slow host tick
/// from queueing up a burst of stale runs.
///
/// [`drive`]: CooperativeScheduler::drive
#[derive(Default)]
pub struct CooperativeScheduler {
    tasks: Vec<Task>,
    next_id: u64,
}

impl CooperativeScheduler {
    /// Empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a repeating task. It first runs on the next [`drive`] call
    /// and at most once per `interval_ms` thereafter.
    ///
    /// [`drive`]: CooperativeScheduler::drive
    pub fn schedule(&mut self, interval_ms: f64, callback: TaskFn) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            handle,
            interval_ms,
            last_run_ms: None,
            callback,
        });
        handle
    }

    /// Cancel a task. Cancelling an already retired handle is a no-op.
    pub fn cancel(&mut self, handle: TaskHandle) {
        self.tasks.retain(|t| t.handle != handle);
    }

    /// Whether a handle still refers to a live task.
    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.handle == handle)
    }

    /// Number of live tasks.
    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }

    /// Run every due task once, in scheduling order.
    pub fn drive(&mut self, now_ms: f64) {
        let mut retired = Vec::new();
        for task in &mut self.tasks {
            let due = match task.last_run_ms {
                None => true,
                Some(last) => now_ms - last >= task.interval_ms,
            };
            if !due {
                continue;
            }
            task.last_run_ms = Some(now_ms);
            if (task.callback)(now_ms) == TaskFate::Stop {
                retired.push(task.handle);
            }
        }
        self.tasks.retain(|t| !retired.contains(&t.handle));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/task.rs"]
mod tests;
