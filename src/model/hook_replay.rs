//! Replaying recorded hook outcomes
//!
//! A hook recorded as failed did not necessarily fail on its first call.
//! A `beforeEach` that failed after two tests had run succeeded twice
//! first, so its replay has to succeed twice too before failing. The
//! allowance is derived from how many sibling tests reached an outcome:
//!
//! | hook type    | successes before failing        |
//! |--------------|---------------------------------|
//! | `beforeEach` | settled siblings                |
//! | `afterEach`  | settled siblings - 1            |
//! | `beforeAll`  | 0                               |
//! | `afterAll`   | 0                               |

use super::runnable::ErrorDescriptor;
use super::suite::HookType;

/// Call counter plus failure threshold for one hook
#[derive(Debug, Clone, PartialEq)]
pub enum HookReplay {
    /// Recorded as passing (or never reached); every call succeeds
    Pass,
    /// Succeeds `allowed` times, then fails on every later call
    FailAfter {
        allowed: usize,
        calls: usize,
        err: ErrorDescriptor,
    },
}

impl HookReplay {
    /// Choose the replay for a hook.
    ///
    /// `failure` is the recorded error when the hook's state was failed;
    /// `settled_siblings` counts tests in the owning suite that passed,
    /// failed or were pending.
    pub fn for_hook(
        hook_type: HookType,
        failure: Option<ErrorDescriptor>,
        settled_siblings: usize,
    ) -> Self {
        let Some(err) = failure else {
            return Self::Pass;
        };

        let allowed = match hook_type {
            HookType::BeforeEach => settled_siblings,
            // the afterEach of the failing test itself never completed
            HookType::AfterEach => settled_siblings.saturating_sub(1),
            HookType::BeforeAll | HookType::AfterAll => 0,
        };

        Self::FailAfter {
            allowed,
            calls: 0,
            err,
        }
    }

    /// Advance the state machine by one invocation
    pub fn invoke(&mut self) -> Result<(), ErrorDescriptor> {
        match self {
            Self::Pass => Ok(()),
            Self::FailAfter {
                allowed,
                calls,
                err,
            } => {
                if *calls < *allowed {
                    *calls += 1;
                    Ok(())
                } else {
                    Err(err.clone())
                }
            }
        }
    }

    /// Successful calls left before the recorded failure is reproduced
    pub fn remaining_successes(&self) -> Option<usize> {
        match self {
            Self::Pass => None,
            Self::FailAfter { allowed, calls, .. } => Some(allowed - calls),
        }
    }

    pub fn recorded_error(&self) -> Option<&ErrorDescriptor> {
        match self {
            Self::Pass => None,
            Self::FailAfter { err, .. } => Some(err),
        }
    }
}
