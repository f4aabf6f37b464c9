use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

/// How many pixel evaluations run between two polls of a [`CancelToken`].
pub const CANCEL_CHECK_INTERVAL_PIXELS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("tile render cancelled")]
pub struct Cancelled;

pub trait CancelToken: Send + Sync {
    fn is_cancelled(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelToken for NeverCancel {
    #[inline]
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl<F> CancelToken for F
where
    F: Fn() -> bool + Send + Sync,
{
    #[inline]
    fn is_cancelled(&self) -> bool {
        self()
    }
}

/// Shared stop flag raised once when the owning worker shuts down.
///
/// Jobs are never abandoned for newer input, so this is the only reason a
/// render stops early.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    raised: Arc<AtomicBool>,
}

impl ShutdownToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }
}

impl CancelToken for ShutdownToken {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_cancel_always_returns_false() {
        assert!(!NeverCancel.is_cancelled());
    }

    #[test]
    fn closure_token_reflects_atomic_state() {
        let flag = AtomicBool::new(false);
        let token = || flag.load(Ordering::Relaxed);

        assert!(!token.is_cancelled());

        flag.store(true, Ordering::Relaxed);
        assert!(token.is_cancelled());
    }

    #[test]
    fn shutdown_token_is_shared_between_clones() {
        let token = ShutdownToken::new();
        let seen_by_worker = token.clone();

        assert!(!seen_by_worker.is_cancelled());

        token.raise();
        assert!(seen_by_worker.is_cancelled());
    }
}
