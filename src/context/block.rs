use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Supplies the "now" that expiry bounds are compared against: a block number
/// or a UNIX timestamp, depending on what requests are signed with.
///
/// Values must never decrease across calls on the same instance.
pub trait BlockContext: Send + Sync {
    fn current(&self) -> u64;
}

impl<T: BlockContext + ?Sized> BlockContext for std::sync::Arc<T> {
    fn current(&self) -> u64 {
        (**self).current()
    }
}

impl<T: BlockContext + ?Sized> BlockContext for Box<T> {
    fn current(&self) -> u64 {
        (**self).current()
    }
}

/// A context pinned to one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBlock(pub u64);

impl BlockContext for FixedBlock {
    fn current(&self) -> u64 {
        self.0
    }
}

/// A block counter advanced by the caller, e.g. as new blocks are observed.
#[derive(Debug, Default)]
pub struct ManualBlockClock {
    height: AtomicU64,
}

impl ManualBlockClock {
    pub fn new(height: u64) -> Self {
        Self {
            height: AtomicU64::new(height),
        }
    }

    /// Moves forward by `blocks` and returns the new height. Saturates at `u64::MAX`.
    pub fn advance(&self, blocks: u64) -> u64 {
        let previous = self
            .height
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |h| {
                Some(h.saturating_add(blocks))
            })
            .unwrap_or_else(|h| h);
        previous.saturating_add(blocks)
    }

    /// Moves to `height` if it is ahead of the current value. Returns the
    /// height in effect afterwards.
    pub fn set(&self, height: u64) -> u64 {
        let previous = self.height.fetch_max(height, Ordering::AcqRel);
        previous.max(height)
    }
}

impl BlockContext for ManualBlockClock {
    fn current(&self) -> u64 {
        self.height.load(Ordering::Acquire)
    }
}

/// Wall-clock seconds since the UNIX epoch, for requests bounded by a timestamp.
///
/// Never reports a value lower than one it already returned, so a backwards
/// step of the system clock does not reopen an expired window.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: AtomicU64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockContext for SystemClock {
    fn current(&self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp()).unwrap_or(0);
        let previous = self.last.fetch_max(now, Ordering::AcqRel);
        previous.max(now)
    }
}
