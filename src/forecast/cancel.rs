//! Cooperative cancellation for long-running requests

use crate::error::{ForecastError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared cancellation flag with an optional deadline.
///
/// Clones observe the same flag. Training checks it before every epoch and
/// the forecaster before every step.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// Token that only fires when [`CancelToken::cancel`] is called
    pub fn new() -> Self {
        Self::default()
    }

    /// Token that also fires once `timeout` has elapsed
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
            || self.deadline.map_or(false, |d| Instant::now() >= d)
    }

    /// `Err(Cancelled(stage))` once the token has fired
    pub fn check(&self, stage: &str) -> Result<()> {
        if self.is_cancelled() {
            Err(ForecastError::Cancelled(stage.to_string()))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_shared_by_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(token.check("training").is_ok());

        clone.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(
            token.check("training"),
            Err(ForecastError::Cancelled(stage)) if stage == "training"
        ));
    }

    #[test]
    fn test_deadline() {
        let expired = CancelToken::with_timeout(Duration::ZERO);
        assert!(expired.is_cancelled());

        let distant = CancelToken::with_timeout(Duration::from_secs(3600));
        assert!(!distant.is_cancelled());
    }

    #[test]
    fn test_tokens_are_independent() {
        let a = CancelToken::new();
        let b = CancelToken::new();
        a.cancel();
        assert!(!b.is_cancelled());
    }
}
