//! The draw loop.
//!
//! A draw cycle keeps asking the engine to render until it reports a
//! non-negative status. Between not-ready attempts the thread yields and sleeps
//! for the retry interval, so it never blocks on anything it cannot wake from.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;

use lensfx_core::{DrawSettings, LensError, LensResult};

use crate::engine::RenderEngine;

/// Default sleep between not-ready render attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Cooperative cancellation flag for a bounded draw.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// How a draw cycle retries.
#[derive(Debug, Clone)]
pub struct DrawPolicy {
    pub retry_interval: Duration,
    /// Stop retrying once this much time has passed.
    pub timeout: Option<Duration>,
    pub cancel: Option<CancelToken>,
}

impl Default for DrawPolicy {
    fn default() -> Self {
        Self {
            retry_interval: DEFAULT_RETRY_INTERVAL,
            timeout: None,
            cancel: None,
        }
    }
}

impl DrawPolicy {
    pub fn from_settings(settings: &DrawSettings) -> Self {
        Self {
            retry_interval: settings.retry_interval(),
            timeout: settings.timeout(),
            cancel: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn is_bounded(&self) -> bool {
        self.timeout.is_some() || self.cancel.is_some()
    }
}

/// Result of a successful draw cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DrawReport {
    /// Non-negative status returned by the engine.
    pub status: i64,
    /// Render attempts it took, including the successful one.
    pub attempts: u64,
}

/// Render until the engine produces a frame. Never gives up.
pub fn draw(engine: &mut dyn RenderEngine, retry_interval: Duration) -> DrawReport {
    let mut attempts = 0u64;
    loop {
        attempts += 1;
        let status = engine.draw();
        if status >= 0 {
            return finish(status, attempts);
        }
        tracing::trace!("Engine not ready (attempt {}, status {})", attempts, status);
        backoff(retry_interval);
    }
}

/// Render until the engine produces a frame, the policy's deadline passes or
/// its token is cancelled. Always makes at least one attempt.
///
/// The wait between attempts never runs past the deadline, and no attempt is
/// made once it has passed.
pub fn draw_with(engine: &mut dyn RenderEngine, policy: &DrawPolicy) -> LensResult<DrawReport> {
    let deadline = policy.timeout.map(|timeout| Instant::now() + timeout);
    let mut attempts = 0u64;
    loop {
        attempts += 1;
        let status = engine.draw();
        if status >= 0 {
            return Ok(finish(status, attempts));
        }
        tracing::trace!("Engine not ready (attempt {}, status {})", attempts, status);

        if policy.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
            tracing::debug!("Draw cancelled after {} attempt(s)", attempts);
            return Err(LensError::DrawCancelled { attempts });
        }
        let wait = match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return Err(timed_out(attempts));
                }
                policy.retry_interval.min(remaining)
            }
            None => policy.retry_interval,
        };
        backoff(wait);
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(timed_out(attempts));
        }
    }
}

fn timed_out(attempts: u64) -> LensError {
    tracing::warn!("Draw timed out after {} attempt(s)", attempts);
    LensError::DrawTimedOut { attempts }
}

fn backoff(interval: Duration) {
    thread::yield_now();
    thread::sleep(interval);
}

fn finish(status: i64, attempts: u64) -> DrawReport {
    if attempts > 1 {
        tracing::debug!("Engine rendered after {} attempts", attempts);
    }
    DrawReport { status, attempts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{EngineLog, RecordingEngine};

    const FAST: Duration = Duration::from_millis(1);

    #[test]
    fn test_ready_engine_draws_once() {
        let log = EngineLog::default();
        let mut engine = RecordingEngine::new(log.clone());
        let report = draw(&mut engine, FAST);
        assert_eq!(
            report,
            DrawReport {
                status: 0,
                attempts: 1,
            }
        );
        assert_eq!(log.draw_attempts(), 1);
    }

    #[test]
    fn test_retries_until_ready() {
        let log = EngineLog::default();
        let mut engine = RecordingEngine::new(log.clone()).not_ready_for(4);
        let report = draw(&mut engine, FAST);
        assert_eq!(report.attempts, 5);
        assert_eq!(report.status, 0);
        assert_eq!(log.draw_attempts(), 5);
    }

    #[test]
    fn test_bounded_draw_times_out() {
        let mut engine = RecordingEngine::new(EngineLog::default()).not_ready_for(u32::MAX);
        let policy = DrawPolicy {
            retry_interval: FAST,
            ..DrawPolicy::default()
        }
        .with_timeout(Duration::from_millis(20));
        match draw_with(&mut engine, &policy) {
            Err(LensError::DrawTimedOut { attempts }) => assert!(attempts >= 1),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn test_timeout_cuts_long_retry_interval_short() {
        let log = EngineLog::default();
        let mut engine = RecordingEngine::new(log.clone()).not_ready_for(u32::MAX);
        let policy = DrawPolicy {
            retry_interval: Duration::from_secs(1),
            ..DrawPolicy::default()
        }
        .with_timeout(Duration::from_millis(10));
        let started = Instant::now();
        assert!(matches!(
            draw_with(&mut engine, &policy),
            Err(LensError::DrawTimedOut { attempts: 1 })
        ));
        assert!(started.elapsed() < Duration::from_millis(500));
        assert_eq!(log.draw_attempts(), 1);
    }

    #[test]
    fn test_cancelled_draw_stops_after_one_attempt() {
        let log = EngineLog::default();
        let mut engine = RecordingEngine::new(log.clone()).not_ready_for(u32::MAX);
        let token = CancelToken::new();
        token.cancel();
        let policy = DrawPolicy::default().with_cancel(token);
        assert!(matches!(
            draw_with(&mut engine, &policy),
            Err(LensError::DrawCancelled { attempts: 1 })
        ));
        assert_eq!(log.draw_attempts(), 1);
    }

    #[test]
    fn test_bounded_draw_succeeds_when_ready() {
        let mut engine = RecordingEngine::new(EngineLog::default()).not_ready_for(2);
        let policy = DrawPolicy {
            retry_interval: FAST,
            ..DrawPolicy::default()
        }
        .with_timeout(Duration::from_secs(5))
        .with_cancel(CancelToken::new());
        let report = draw_with(&mut engine, &policy).unwrap();
        assert_eq!(report.attempts, 3);
    }

    #[test]
    fn test_policy_from_settings() {
        let settings = DrawSettings {
            retry_interval_ms: 25,
            timeout_ms: Some(100),
        };
        let policy = DrawPolicy::from_settings(&settings);
        assert_eq!(policy.retry_interval, Duration::from_millis(25));
        assert_eq!(policy.timeout, Some(Duration::from_millis(100)));
        assert!(policy.is_bounded());
        assert!(!DrawPolicy::default().is_bounded());
    }
}
