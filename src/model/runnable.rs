//! Tests and hooks rebuilt from a snapshot
//!
//! Nothing here ever executes code: a runnable's outcome is decided once,
//! from the recorded `state`/`pending` fields, when it is constructed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::hook_replay::HookReplay;
use super::millis::{MillisValue, MAX_TIMEOUT_MS};
use super::suite::{HookType, SuiteId, TitlePath};

/// Terminal state recorded for a runnable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestState {
    Passed,
    Failed,
}

impl std::fmt::Display for TestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Speed classification relative to the `slow` threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Fast,
    Medium,
    Slow,
}

/// Recorded error of a failed runnable
///
/// Kept as the original object so every field (message, stack, actual,
/// expected, ...) survives a replay.
///
/// An `err` recorded as anything other than an object becomes the message.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ErrorDescriptor(pub Map<String, Value>);

impl<'de> Deserialize<'de> for ErrorDescriptor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Object(map) => Self(map),
            other => {
                let mut map = Map::new();
                map.insert("message".to_string(), other);
                Self(map)
            }
        })
    }
}

impl ErrorDescriptor {
    /// Build a descriptor carrying only a message
    pub fn with_message(message: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert("message".to_string(), Value::String(message.into()));
        Self(map)
    }

    pub fn message(&self) -> &str {
        self.0.get("message").and_then(Value::as_str).unwrap_or("")
    }

    pub fn stack(&self) -> Option<&str> {
        self.0.get("stack").and_then(Value::as_str)
    }
}

/// How a test will be replayed, fixed at construction
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Passed,
    Failed(ErrorDescriptor),
    Pending,
    /// Neither a state nor pending; replaying it is an error
    Unresolved,
}

impl Outcome {
    /// Whether the original run reached a terminal result for this test
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

/// Per-runnable run configuration, written only through the setters
#[derive(Debug, Clone, PartialEq)]
pub struct RunnableConfig {
    timeout: Option<u64>,
    slow: Option<u64>,
    retries: Option<i64>,
    current_retry: Option<u64>,
    timeouts_enabled: bool,
}

impl Default for RunnableConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            slow: None,
            retries: None,
            current_retry: None,
            timeouts_enabled: true,
        }
    }
}

impl RunnableConfig {
    pub fn timeout(&self) -> Option<u64> {
        self.timeout
    }

    pub fn slow(&self) -> Option<u64> {
        self.slow
    }

    pub fn retries(&self) -> Option<i64> {
        self.retries
    }

    pub fn current_retry(&self) -> Option<u64> {
        self.current_retry
    }

    pub fn timeouts_enabled(&self) -> bool {
        self.timeouts_enabled
    }

    /// Set the timeout, clamped into `[0, 2^31 - 1]`.
    ///
    /// Landing on either bound disables timeouts for this runnable.
    pub fn set_timeout(&mut self, value: &MillisValue) -> Result<(), String> {
        let ms = value.to_millis()?.min(MAX_TIMEOUT_MS);
        if ms == 0 || ms == MAX_TIMEOUT_MS {
            self.timeouts_enabled = false;
        }
        self.timeout = Some(ms);
        Ok(())
    }

    pub fn set_slow(&mut self, value: &MillisValue) -> Result<(), String> {
        self.slow = Some(value.to_millis()?);
        Ok(())
    }

    /// `-1` means "inherit from the suite"
    pub fn set_retries(&mut self, n: i64) -> Result<(), String> {
        if n < -1 {
            return Err(format!("retries must be -1 or greater, got {n}"));
        }
        self.retries = Some(n);
        Ok(())
    }

    pub fn set_current_retry(&mut self, n: u64) {
        self.current_retry = Some(n);
    }
}

/// Fields shared by tests and hooks
#[derive(Debug, Clone, PartialEq)]
pub struct Runnable {
    pub title: String,
    /// Owning suite; a back-reference only
    pub parent: Option<SuiteId>,
    /// Title path of the owning suite
    pub parent_path: TitlePath,
    /// Source text of the original body, never evaluated
    pub body: Option<String>,
    pub timed_out: bool,
    pub pending: bool,
    /// Runnable kind tag (`"test"` or `"hook"`)
    pub kind: String,
    pub file: Option<String>,
    /// Duration in milliseconds exactly as recorded
    pub duration: Option<Number>,
    pub state: Option<TestState>,
    pub speed: Option<Speed>,
    pub config: RunnableConfig,
}

impl Runnable {
    pub fn new(title: impl Into<String>, kind: &str) -> Self {
        Self {
            title: title.into(),
            parent: None,
            parent_path: TitlePath::default(),
            body: None,
            timed_out: false,
            pending: false,
            kind: kind.to_string(),
            file: None,
            duration: None,
            state: None,
            speed: None,
            config: RunnableConfig::default(),
        }
    }

    /// Ancestor titles plus this runnable's title, joined by spaces
    pub fn full_title(&self) -> String {
        self.parent_path.child(&self.title).join()
    }

    pub fn duration_ms(&self) -> Option<f64> {
        self.duration.as_ref().and_then(Number::as_f64)
    }
}

/// A user test
#[derive(Debug, Clone, PartialEq)]
pub struct Test {
    pub runnable: Runnable,
    outcome: Outcome,
}

impl Test {
    pub const KIND: &'static str = "test";

    /// Create a test whose outcome is derived from the runnable's `state` and `pending`
    ///
    /// A failed test must carry its error.
    pub fn new(runnable: Runnable, err: Option<ErrorDescriptor>) -> crate::common::Result<Self> {
        let outcome = match runnable.state {
            Some(TestState::Passed) => Outcome::Passed,
            Some(TestState::Failed) => match err {
                Some(err) => Outcome::Failed(err),
                None => {
                    return Err(crate::common::Error::FailedWithoutError {
                        title: runnable.title,
                    })
                }
            },
            None if runnable.pending => Outcome::Pending,
            None => Outcome::Unresolved,
        };
        Ok(Self { runnable, outcome })
    }

    pub fn title(&self) -> &str {
        &self.runnable.title
    }

    pub fn full_title(&self) -> String {
        self.runnable.full_title()
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Recorded error, present only for failed tests
    pub fn err(&self) -> Option<&ErrorDescriptor> {
        match &self.outcome {
            Outcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// A setup or teardown hook
#[derive(Debug, Clone, PartialEq)]
pub struct Hook {
    pub runnable: Runnable,
    pub hook_type: HookType,
    pub original_title: Option<String>,
    replay: HookReplay,
}

impl Hook {
    pub const KIND: &'static str = "hook";

    pub fn new(
        runnable: Runnable,
        hook_type: HookType,
        original_title: Option<String>,
        replay: HookReplay,
    ) -> Self {
        Self {
            runnable,
            hook_type,
            original_title,
            replay,
        }
    }

    pub fn title(&self) -> &str {
        &self.runnable.title
    }

    /// Replay one invocation of this hook
    pub fn run(&mut self) -> Result<(), ErrorDescriptor> {
        self.replay.invoke()
    }

    pub fn recorded_error(&self) -> Option<&ErrorDescriptor> {
        self.replay.recorded_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runnable(state: Option<TestState>, pending: bool) -> Runnable {
        let mut r = Runnable::new("t", Test::KIND);
        r.state = state;
        r.pending = pending;
        r
    }

    #[test]
    fn test_outcome_follows_state_then_pending() {
        let t = Test::new(runnable(Some(TestState::Passed), true), None).unwrap();
        assert_eq!(t.outcome(), &Outcome::Passed);

        let err = ErrorDescriptor::with_message("FAIL");
        let t = Test::new(runnable(Some(TestState::Failed), false), Some(err)).unwrap();
        assert_eq!(t.err().map(ErrorDescriptor::message), Some("FAIL"));

        let t = Test::new(runnable(None, true), None).unwrap();
        assert_eq!(t.outcome(), &Outcome::Pending);

        let t = Test::new(runnable(None, false), None).unwrap();
        assert!(!t.outcome().is_settled());
        assert!(t.err().is_none());
    }

    #[test]
    fn test_failed_test_cannot_be_built_without_err() {
        let err = Test::new(runnable(Some(TestState::Failed), false), None).unwrap_err();
        assert!(matches!(
            err,
            crate::common::Error::FailedWithoutError { ref title } if title == "t"
        ));
    }

    #[test]
    fn test_non_object_err_becomes_message() {
        let err: ErrorDescriptor = serde_json::from_value(serde_json::json!("boom")).unwrap();
        assert_eq!(err.message(), "boom");

        let err: ErrorDescriptor =
            serde_json::from_value(serde_json::json!({ "message": "m", "code": 3 })).unwrap();
        assert_eq!(err.message(), "m");
        assert_eq!(err.0["code"], 3);
    }

    #[test]
    fn test_timeout_clamps_and_disables() {
        let mut config = RunnableConfig::default();
        config.set_timeout(&MillisValue::from(2000)).unwrap();
        assert_eq!(config.timeout(), Some(2000));
        assert!(config.timeouts_enabled());

        let mut config = RunnableConfig::default();
        config.set_timeout(&MillisValue::Number(1e12)).unwrap();
        assert_eq!(config.timeout(), Some(MAX_TIMEOUT_MS));
        assert!(!config.timeouts_enabled());

        let mut config = RunnableConfig::default();
        config.set_timeout(&MillisValue::Number(-3.0)).unwrap();
        assert_eq!(config.timeout(), Some(0));
        assert!(!config.timeouts_enabled());

        let mut config = RunnableConfig::default();
        assert!(config.set_timeout(&MillisValue::from("later")).is_err());
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_retries_validation() {
        let mut config = RunnableConfig::default();
        config.set_retries(-1).unwrap();
        assert_eq!(config.retries(), Some(-1));
        assert!(config.set_retries(-2).is_err());
        config.set_current_retry(2);
        assert_eq!(config.current_retry(), Some(2));
    }

    #[test]
    fn test_full_title_uses_parent_path() {
        let mut r = Runnable::new("adds numbers", Test::KIND);
        r.parent_path = TitlePath::from(vec!["math".to_string(), "add".to_string()]);
        assert_eq!(r.full_title(), "math add adds numbers");
    }
}
