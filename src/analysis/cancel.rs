//! Cooperative cancellation for long-running solves

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{FEAError, FEAResult};

/// Shared cancellation flag with an optional deadline.
///
/// Clones share the flag, so a token handed to a solver can be cancelled from
/// another thread. Solvers poll it between phases only.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token that expires at `deadline`
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Token that expires `timeout` from now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Fail with `Cancelled(phase)` if cancellation was requested
    pub(crate) fn check(&self, phase: &str) -> FEAResult<()> {
        if self.is_cancelled() {
            log::debug!("Analysis cancelled before {}", phase);
            return Err(FEAError::Cancelled(phase.to_string()));
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
        let handle = token.clone();
        assert!(token.check("assembly").is_ok());
        handle.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(token.check("assembly"), Err(FEAError::Cancelled(p)) if p == "assembly"));
    }

    #[test]
    fn test_expired_deadline() {
        let token = CancelToken::new().with_deadline(Instant::now());
        assert!(token.is_cancelled());
        let token = CancelToken::new().with_timeout(Duration::from_secs(3600));
        assert!(!token.is_cancelled());
    }
}
