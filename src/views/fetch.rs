//! Per-invocation fetch cancellation
//!
//! Every fetch a view issues carries a `FetchToken`. Issuing a new token
//! from the same `FetchSlot` cancels the previous one, and deactivating the
//! view cancels the current one. A continuation must check its token before
//! committing anything to view state. The request itself is never aborted;
//! only its result is ignored.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Cancellation handle for one fetch invocation
#[derive(Debug, Clone)]
pub struct FetchToken {
    seq: u64,
    cancelled: Arc<AtomicBool>,
}

impl FetchToken {
    /// Issue order within the owning slot, starting at 1
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

/// Issues tokens for one view instance; at most one token is live
#[derive(Debug, Default)]
pub struct FetchSlot {
    issued: AtomicU64,
    current: Mutex<Option<FetchToken>>,
}

impl FetchSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token, cancelling the one it supersedes
    pub fn issue(&self) -> FetchToken {
        let token = FetchToken {
            seq: self.issued.fetch_add(1, Ordering::AcqRel) + 1,
            cancelled: Arc::new(AtomicBool::new(false)),
        };

        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = current.replace(token.clone()) {
            previous.cancel();
        }
        token
    }

    /// Cancel the live token, if any
    pub fn cancel(&self) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = current.take() {
            token.cancel();
        }
    }

    /// Number of tokens issued so far
    #[cfg(test)]
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::Acquire)
    }
}
