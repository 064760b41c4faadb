//! Cancellation and deadline signal for long-running queries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::types::{GraphError, GraphResult};

/// Cooperative cancel signal, checked by the engine between frontier pops.
///
/// Clones share the same flag, so one clone can be handed to the query and
/// another kept by the caller to trigger cancellation.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Option<Arc<AtomicBool>>,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// A token that can be cancelled through [`CancelToken::cancel`].
    pub fn new() -> Self {
        Self {
            flag: Some(Arc::new(AtomicBool::new(false))),
            deadline: None,
        }
    }

    /// A token that never fires.
    pub fn never() -> Self {
        Self::default()
    }

    /// Add an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Add a deadline relative to now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Raise the cancel flag. No-op on a `never` token.
    pub fn cancel(&self) {
        if let Some(flag) = &self.flag {
            flag.store(true, Ordering::Release);
        }
    }

    /// Whether the flag has been raised.
    pub fn is_cancelled(&self) -> bool {
        self.flag
            .as_ref()
            .map(|f| f.load(Ordering::Acquire))
            .unwrap_or(false)
    }

    /// Ok while the query may continue.
    pub fn check(&self) -> GraphResult<()> {
        if self.is_cancelled() {
            return Err(GraphError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(GraphError::DeadlineExceeded);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_flag() {
        let token = CancelToken::new();
        let remote = token.clone();
        assert!(token.check().is_ok());
        remote.cancel();
        assert!(matches!(token.check(), Err(GraphError::Cancelled)));
    }

    #[test]
    fn test_never_ignores_cancel() {
        let token = CancelToken::never();
        token.cancel();
        assert!(token.check().is_ok());
    }

    #[test]
    fn test_elapsed_deadline() {
        let token = CancelToken::never().with_deadline(Instant::now());
        assert!(matches!(token.check(), Err(GraphError::DeadlineExceeded)));
    }
}
