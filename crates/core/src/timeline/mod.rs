use std::{
    cell::Cell,
    collections::VecDeque,
    rc::Rc,
    time::Instant,
};

/// Wall-clock source in milliseconds. Only differences are meaningful.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Monotonic clock backed by [`Instant`].
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock. Clones share the same reading, so a test can keep one
/// handle while the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, delta_ms: f64) {
        self.now.set((self.now.get() + delta_ms).max(0.0));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Handle to one requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

impl TickToken {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// "Call me again before the next frame" capability.
pub trait FrameScheduler {
    /// Requests one future tick and returns its token.
    fn schedule(&mut self) -> TickToken;
    /// Withdraws a requested tick. Cancelling an unknown token is a no-op.
    fn cancel(&mut self, token: TickToken);
}

/// FIFO of requested ticks that the host drains at its own pace.
#[derive(Debug, Default)]
pub struct QueueScheduler {
    next_id: u64,
    pending: VecDeque<TickToken>,
}

impl QueueScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pops the oldest requested tick, if any.
    pub fn next_due(&mut self) -> Option<TickToken> {
        self.pending.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

impl FrameScheduler for QueueScheduler {
    fn schedule(&mut self) -> TickToken {
        let token = TickToken(self.next_id);
        self.next_id += 1;
        self.pending.push_back(token);
        token
    }

    fn cancel(&mut self, token: TickToken) {
        self.pending.retain(|pending| *pending != token);
    }
}
