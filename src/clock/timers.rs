use crate::foundation::arena::{Arena, SlotKey};

/// Handle to a scheduled interval task. Stale handles are inert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub(crate) SlotKey);

#[derive(Debug, Clone)]
struct Interval {
    period: f64,
    elapsed: f64,
}

/// Fixed-interval tasks advanced by frame deltas.
///
/// A long frame fires a task several times (catch-up) rather than dropping ticks.
#[derive(Debug, Default)]
pub struct Timers {
    tasks: Arena<Interval>,
}

impl Timers {
    /// No tasks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a task that fires every `period` seconds. Non-positive periods fire once per frame.
    pub fn schedule_interval(&mut self, period: f64) -> TaskId {
        TaskId(self.tasks.insert(Interval {
            period: if period.is_finite() { period } else { 0.0 },
            elapsed: 0.0,
        }))
    }

    /// Stop a task. Cancelling twice is fine.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.tasks.remove(id.0).is_some()
    }

    /// Whether the task is still scheduled.
    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.contains(id.0)
    }

    /// Number of scheduled tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Advance all tasks by `dt` and return how many times each one fired.
    pub fn advance(&mut self, dt: f64) -> Vec<(TaskId, u32)> {
        let dt = dt.max(0.0);
        let mut fired = Vec::new();
        for key in self.tasks.keys() {
            let Some(task) = self.tasks.get_mut(key) else {
                continue;
            };
            if task.period <= 0.0 {
                fired.push((TaskId(key), 1));
                continue;
            }
            task.elapsed += dt;
            // Tolerance keeps 0.03 + 0.03 + ... from landing just under a multiple.
            let n = ((task.elapsed + 1e-9) / task.period).floor();
            if n >= 1.0 {
                task.elapsed = (task.elapsed - n * task.period).max(0.0);
                fired.push((TaskId(key), n as u32));
            }
        }
        fired
    }
}

#[cfg(test)]
#[path = "../../tests/unit/clock/timers.rs"]
mod tests;
