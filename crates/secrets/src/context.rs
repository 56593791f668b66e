//! Caller-supplied cancellation and deadline for a fetch

use crate::SecretError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation signal plus optional deadline that bounds every blocking step
/// of a fetch (credential resolution and the network round-trip).
///
/// Cloning shares the same cancellation token.
#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl FetchContext {
    /// A context that is never cancelled and has no deadline
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// A context bound to an existing cancellation token
    #[must_use]
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// A fresh context whose deadline is `timeout` from now
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().timeout(timeout)
    }

    /// Set the deadline to `timeout` from now, keeping the token.
    ///
    /// A timeout too large to represent leaves the deadline unchanged.
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(at) => self.with_deadline(at),
            None => self,
        }
    }

    /// Set an absolute deadline, keeping the earlier one if already set
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// The deadline, if any
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// A child context: cancelled with this one, but cancelling it does not
    /// cancel the parent. Inherits the deadline.
    #[must_use]
    pub fn child_token(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Signal cancellation to every operation running under this context
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether cancellation has been signalled
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drive `operation` to completion unless the context is cancelled or its
    /// deadline passes first.
    ///
    /// # Errors
    /// [`SecretError::Cancelled`] or [`SecretError::DeadlineExceeded`] if the
    /// operation was abandoned, otherwise whatever `operation` returns.
    pub async fn run<T, F>(&self, identifier: &str, operation: F) -> Result<T, SecretError>
    where
        F: Future<Output = Result<T, SecretError>>,
    {
        if self.token.is_cancelled() {
            return Err(SecretError::Cancelled {
                identifier: identifier.to_string(),
            });
        }

        let started = Instant::now();
        let deadline = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;

            () = self.token.cancelled() => {
                tracing::debug!(secret = %identifier, "Secret retrieval cancelled");
                Err(SecretError::Cancelled {
                    identifier: identifier.to_string(),
                })
            }
            () = deadline => {
                let elapsed = started.elapsed();
                tracing::debug!(secret = %identifier, ?elapsed, "Secret retrieval deadline exceeded");
                Err(SecretError::DeadlineExceeded {
                    identifier: identifier.to_string(),
                    elapsed,
                })
            }
            result = operation => result,
        }
    }
}
