//! Wire shape of a serialized run
//!
//! These types describe the JSON exactly as a serializing reporter writes
//! it. Every field is optional so that omitted and `null` values are told
//! apart from real ones; the builder decides the defaults.

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::model::{
    ErrorDescriptor, Hook, HookType, MillisValue, Runnable, Speed, Suite, Test, TestState,
};

/// A serialized suite
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<MillisValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slow: Option<MillisValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retries: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_timeouts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tests: Option<Vec<RunnableNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suites: Option<Vec<SuiteNode>>,
    #[serde(rename = "_beforeEach", skip_serializing_if = "Option::is_none")]
    pub before_each: Option<Vec<HookNode>>,
    #[serde(rename = "_beforeAll", skip_serializing_if = "Option::is_none")]
    pub before_all: Option<Vec<HookNode>>,
    #[serde(rename = "_afterEach", skip_serializing_if = "Option::is_none")]
    pub after_each: Option<Vec<HookNode>>,
    #[serde(rename = "_afterAll", skip_serializing_if = "Option::is_none")]
    pub after_all: Option<Vec<HookNode>>,
}

impl SuiteNode {
    /// Move one hook list out of the node
    pub fn take_hooks(&mut self, hook_type: HookType) -> Option<Vec<HookNode>> {
        self.hooks_mut(hook_type).take()
    }

    fn hooks_mut(&mut self, hook_type: HookType) -> &mut Option<Vec<HookNode>> {
        match hook_type {
            HookType::BeforeEach => &mut self.before_each,
            HookType::BeforeAll => &mut self.before_all,
            HookType::AfterEach => &mut self.after_each,
            HookType::AfterAll => &mut self.after_all,
        }
    }

    /// Serialize a rebuilt suite back into its wire shape
    pub fn from_suite(suite: &Suite) -> Self {
        let mut node = Self {
            title: Some(suite.title.clone()),
            root: Some(suite.root),
            pending: Some(suite.pending),
            file: suite.file.clone(),
            timeout: suite.config.timeout().map(MillisValue::from),
            slow: suite.config.slow().map(MillisValue::from),
            retries: suite.config.retries(),
            enable_timeouts: suite.config.enable_timeouts(),
            tests: Some(suite.tests.iter().map(RunnableNode::from_test).collect()),
            suites: Some(suite.suites.iter().map(SuiteNode::from_suite).collect()),
            ..Self::default()
        };

        for hook_type in HookType::ALL {
            let hooks = suite.hooks.get(hook_type);
            if !hooks.is_empty() {
                *node.hooks_mut(hook_type) = Some(hooks.iter().map(HookNode::from_hook).collect());
            }
        }

        node
    }
}

/// A serialized test, or the runnable part of a hook
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnableNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timed_out: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<TestState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<ErrorDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<Speed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<MillisValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slow: Option<MillisValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retries: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_retry: Option<u64>,
}

impl RunnableNode {
    pub fn from_test(test: &Test) -> Self {
        Self::from_runnable(&test.runnable, test.err())
    }

    fn from_runnable(r: &Runnable, err: Option<&ErrorDescriptor>) -> Self {
        Self {
            title: Some(r.title.clone()),
            body: r.body.clone(),
            timed_out: Some(r.timed_out),
            pending: Some(r.pending),
            kind: Some(r.kind.clone()),
            file: r.file.clone(),
            duration: r.duration.clone(),
            state: r.state,
            err: err.cloned(),
            speed: r.speed,
            timeout: r.config.timeout().map(MillisValue::from),
            slow: r.config.slow().map(MillisValue::from),
            retries: r.config.retries(),
            current_retry: r.config.current_retry(),
        }
    }
}

/// A serialized hook
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookNode {
    #[serde(flatten)]
    pub runnable: RunnableNode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
}

impl HookNode {
    pub fn from_hook(hook: &Hook) -> Self {
        Self {
            runnable: RunnableNode::from_runnable(&hook.runnable, hook.recorded_error()),
            original_title: hook.original_title.clone(),
        }
    }
}

/// Whole snapshot document as written by the serializing reporter
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotDocument<'a> {
    pub suite: SuiteNode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<&'a crate::model::Stats>,
}
