//! Cooperative cancellation signal
//!
//! The regulator is the only piece of train state touched from outside
//! the scheduler loop. It is lock-free and can live in a `static`:
//!
//! ```ignore
//! static REGULATOR: Regulator = Regulator::new();
//!
//! let mut train = Train::new(TrainConfig::default(), &REGULATOR)?;
//! // ... on another thread or task:
//! REGULATOR.extinguish(&mut delay);
//! ```

use embedded_hal::delay::DelayNs;
use portable_atomic::{AtomicU8, AtomicUsize, Ordering};

/// Interval at which `extinguish` re-checks the loop, in milliseconds
pub const EXTINGUISH_POLL_MS: u32 = 10;

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const EXTINGUISHING: u8 = 2;

/// Cross-thread view of a running train
///
/// Ignition and the extinguish request share one atomic word, so a
/// request can only be recorded while the loop is running.
#[derive(Debug, Default)]
pub struct Regulator {
    /// IDLE, RUNNING or EXTINGUISHING
    state: AtomicU8,
    /// Active stage index (valid while ignited)
    stage: AtomicUsize,
}

impl Regulator {
    /// Create an idle regulator
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(IDLE),
            stage: AtomicUsize::new(0),
        }
    }

    /// Check if the scheduler loop is active
    pub fn is_ignited(&self) -> bool {
        self.state.load(Ordering::Acquire) != IDLE
    }

    /// Check if an extinguish request is pending
    pub fn is_extinguish_requested(&self) -> bool {
        self.state.load(Ordering::Acquire) == EXTINGUISHING
    }

    /// Active stage, if the loop is running
    pub fn current_stage(&self) -> Option<usize> {
        if self.is_ignited() {
            Some(self.stage.load(Ordering::Acquire))
        } else {
            None
        }
    }

    /// Ask the loop to stop at its next tick boundary without waiting
    ///
    /// Returns false (and does nothing) if the loop is not running.
    pub fn request_extinguish(&self) -> bool {
        match self
            .state
            .compare_exchange(RUNNING, EXTINGUISHING, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => true,
            Err(current) => current == EXTINGUISHING,
        }
    }

    /// Stop the running train and wait until the loop has acknowledged
    ///
    /// Polls every [`EXTINGUISH_POLL_MS`]. No-op when not running.
    pub fn extinguish<D: DelayNs>(&self, delay: &mut D) {
        if !self.request_extinguish() {
            return;
        }
        while self.is_ignited() {
            delay.delay_ms(EXTINGUISH_POLL_MS);
        }
    }

    /// Loop started at `stage`
    ///
    /// Requests made before ignition are not carried into the run.
    pub(crate) fn ignite(&self, stage: usize) {
        self.stage.store(stage, Ordering::Release);
        self.state.store(RUNNING, Ordering::Release);
    }

    /// Loop moved on to `stage`
    pub(crate) fn advance(&self, stage: usize) {
        self.stage.store(stage, Ordering::Release);
    }

    /// Loop finished; drops any pending request
    pub(crate) fn park(&self) {
        self.state.store(IDLE, Ordering::Release);
    }
}
