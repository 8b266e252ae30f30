/// An absolute wake-up point for a pending timed wait. The sequencer keeps
/// at most one of these at a time; cancelling a wait is dropping it, which
/// makes aborts deterministic without touching any ambient scheduler.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Deadline {
    due_ms: u64,
}

impl Deadline {
    pub fn after(now_ms: u64, delay_ms: u64) -> Self {
        Self {
            due_ms: now_ms.saturating_add(delay_ms),
        }
    }

    pub fn due_ms(&self) -> u64 {
        self.due_ms
    }

    pub fn is_elapsed(&self, now_ms: u64) -> bool {
        now_ms >= self.due_ms
    }

    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.due_ms.saturating_sub(now_ms)
    }
}
