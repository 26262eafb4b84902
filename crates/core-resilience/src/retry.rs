//! Retry-until-success executor
//!
//! There is no backoff, no jitter and, unless a cap is configured, no retry
//! limit. The executor is meant for a locally reachable simulator where
//! transient failures are rare and short-lived; against a permanently broken
//! connection an uncapped policy loops forever.

use std::fmt::Display;
use std::num::NonZeroU32;

/// Classification of an error as transient for retry purposes
pub trait Recoverable {
    /// Returns true when the failed call should be re-issued
    fn is_recoverable(&self) -> bool;
}

/// Retry policy for remote calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    /// Maximum number of attempts (None = retry forever)
    pub max_attempts: Option<NonZeroU32>,
}

impl RetryPolicy {
    /// Policy that re-issues recoverable failures without limit
    pub const fn unbounded() -> Self {
        Self { max_attempts: None }
    }

    /// Policy that gives up after `attempts` calls, returning the last error
    pub const fn capped(attempts: NonZeroU32) -> Self {
        Self {
            max_attempts: Some(attempts),
        }
    }

    /// Run `operation` until it succeeds or fails with a non-recoverable error
    ///
    /// Each recoverable failure emits one WARN event of the form
    /// `Error in <operation>: <detail>`. Non-recoverable failures are returned
    /// without logging.
    pub fn execute<T, E, F>(&self, operation: &str, mut op: F) -> Result<T, E>
    where
        E: Recoverable + Display,
        F: FnMut() -> Result<T, E>,
    {
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.saturating_add(1);

            let err = match op() {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_recoverable() => return Err(err),
                Err(err) => err,
            };

            tracing::warn!(operation, attempt, "Error in {}: {}", operation, err);

            if let Some(max) = self.max_attempts {
                if attempt >= max.get() {
                    return Err(err);
                }
            }
        }
    }
}

/// Run `operation` with the default (unbounded) policy
pub fn execute<T, E, F>(operation: &str, op: F) -> Result<T, E>
where
    E: Recoverable + Display,
    F: FnMut() -> Result<T, E>,
{
    RetryPolicy::unbounded().execute(operation, op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, PartialEq)]
    enum TestError {
        Link(&'static str),
        Fatal(&'static str),
    }

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                TestError::Link(msg) => write!(f, "link: {}", msg),
                TestError::Fatal(msg) => write!(f, "fatal: {}", msg),
            }
        }
    }

    impl Recoverable for TestError {
        fn is_recoverable(&self) -> bool {
            matches!(self, TestError::Link(_))
        }
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().unwrap().clone())
                .unwrap()
                .lines()
                .map(str::to_owned)
                .collect()
        }
    }

    fn with_capture<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        (result, capture.lines())
    }

    #[test]
    fn test_succeeds_after_recoverable_failures() {
        let mut calls = 0;
        let (result, lines) = with_capture(|| {
            execute("get_position", || {
                calls += 1;
                if calls <= 3 {
                    Err(TestError::Link("timeout"))
                } else {
                    Ok(7)
                }
            })
        });

        assert_eq!(result, Ok(7));
        assert_eq!(calls, 4);
        assert_eq!(lines.len(), 3);
        assert!(lines
            .iter()
            .all(|l| l.contains("Error in get_position: link: timeout")));
    }

    #[test]
    fn test_fatal_error_is_not_retried() {
        let mut calls = 0;
        let (result, lines) = with_capture(|| {
            execute("set_position", || -> Result<(), TestError> {
                calls += 1;
                Err(TestError::Fatal("bad argument"))
            })
        });

        assert_eq!(result, Err(TestError::Fatal("bad argument")));
        assert_eq!(calls, 1);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_immediate_success_logs_nothing() {
        let (result, lines) = with_capture(|| execute("noop", || Ok::<_, TestError>("done")));
        assert_eq!(result, Ok("done"));
        assert!(lines.is_empty());
    }

    #[test]
    fn test_fatal_after_recoverable_stops_loop() {
        let mut calls = 0;
        let (result, lines) = with_capture(|| {
            execute("duplicate", || -> Result<(), TestError> {
                calls += 1;
                if calls == 1 {
                    Err(TestError::Link("server"))
                } else {
                    Err(TestError::Fatal("gone"))
                }
            })
        });

        assert_eq!(result, Err(TestError::Fatal("gone")));
        assert_eq!(calls, 2);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_capped_policy_returns_last_error() {
        let policy = RetryPolicy::capped(NonZeroU32::new(3).unwrap());
        let mut calls = 0;
        let (result, lines) = with_capture(|| {
            policy.execute("get_velocity", || -> Result<(), TestError> {
                calls += 1;
                Err(TestError::Link("no value"))
            })
        });

        assert_eq!(result, Err(TestError::Link("no value")));
        assert_eq!(calls, 3);
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_default_policy_is_unbounded() {
        assert_eq!(RetryPolicy::default(), RetryPolicy::unbounded());
        assert!(RetryPolicy::default().max_attempts.is_none());
    }
}
