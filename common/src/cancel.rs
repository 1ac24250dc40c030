use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Anything that can be asked whether the current operation should stop.
///
/// Long-running loops poll this between units of work; it is never pushed.
pub trait CancelSource {
    fn is_canceled(&self) -> bool;
}

impl<F> CancelSource for F
where
    F: Fn() -> bool,
{
    fn is_canceled(&self) -> bool {
        self()
    }
}

/// Shared cancellation flag.
///
/// Clones observe the same flag, so the controller keeps one clone and hands
/// another to the worker.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Clears the flag so the token can be reused for a resubmitted operation.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl CancelSource for CancelToken {
    fn is_canceled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelSource for NeverCancel {
    fn is_canceled(&self) -> bool {
        false
    }
}
