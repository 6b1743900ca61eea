//! Rebuilding a suite tree from a snapshot
//!
//! Building is all-or-nothing: the first malformed element aborts the whole
//! tree. Optional fields are copied only when present, and run
//! configuration goes through the model's validating setters.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::common::{Error, Result};
use crate::model::{
    ErrorDescriptor, Hook, HookReplay, HookType, Runnable, Stats, Suite, SuiteId, Test,
    TestState, TitlePath,
};

use super::source::{HookNode, RunnableNode, SuiteNode};

/// Snapshot input: raw JSON text or an already parsed document
#[derive(Debug, Clone)]
pub enum Snapshot {
    Text(String),
    Value(Value),
}

impl Snapshot {
    fn into_value(self) -> Result<Value> {
        match self {
            Self::Text(text) => serde_json::from_str(&text).map_err(Error::Parse),
            Self::Value(value) => Ok(value),
        }
    }
}

impl From<&str> for Snapshot {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Snapshot {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for Snapshot {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Rebuild the root suite of a snapshot.
///
/// The root is the `suite` property when present, otherwise the document
/// itself when it has a `title` or `suites` property. A `stats` block is
/// attached to the returned root.
#[tracing::instrument(skip_all)]
pub fn build(input: impl Into<Snapshot>) -> Result<Suite> {
    let Value::Object(mut doc) = input.into().into_value()? else {
        return Err(Error::MissingRootSuite);
    };

    let stats = doc.remove("stats").filter(|v| !v.is_null());

    let root = if is_set(doc.get("suite")) {
        doc.remove("suite").unwrap_or_default()
    } else if is_set(doc.get("title")) || is_set(doc.get("suites")) {
        Value::Object(doc)
    } else {
        return Err(Error::MissingRootSuite);
    };

    let mut suite = parse_suite(root, true)?;

    if let Some(stats) = stats {
        let stats: Stats = from_node(stats, "stats")?;
        tracing::debug!(tests = stats.tests, suites = stats.suites, "Attached recorded stats");
        suite.stats = Some(stats);
    }

    Ok(suite)
}

/// Rebuild one suite object (and everything below it).
///
/// `is_root` applies only when the object has no `root` field of its own.
pub fn parse_suite(value: Value, is_root: bool) -> Result<Suite> {
    let node: SuiteNode = from_node(value, "suite")?;
    TreeBuilder::default().suite(node, None, is_root)
}

/// Rebuild a single test object outside of any tree
pub fn parse_test(value: Value) -> Result<Test> {
    let node: RunnableNode = from_node(value, "test")?;
    create_test(node, SuiteId(0), &TitlePath::default())
}

fn is_set(value: Option<&Value>) -> bool {
    value.is_some_and(|v| !v.is_null())
}

fn from_node<T: DeserializeOwned>(value: Value, what: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::structural(format!("invalid {what}: {e}")))
}

/// Hands out pre-order suite ids
#[derive(Default)]
struct TreeBuilder {
    next_id: usize,
}

impl TreeBuilder {
    fn suite(
        &mut self,
        mut node: SuiteNode,
        parent: Option<(SuiteId, &TitlePath)>,
        is_root: bool,
    ) -> Result<Suite> {
        let id = SuiteId(self.next_id);
        self.next_id += 1;

        let root = node.root.unwrap_or(is_root);
        let mut suite = Suite::new(id, node.title.take().unwrap_or_default(), root);

        // only root suites stay out of full titles, top-level or not
        let parent_path = match parent {
            Some((parent_id, path)) => {
                suite.parent = Some(parent_id);
                path.clone()
            }
            None => TitlePath::default(),
        };
        suite.path = if root {
            parent_path
        } else {
            parent_path.child(&suite.title)
        };

        if let Some(pending) = node.pending {
            suite.pending = pending;
        }
        if let Some(file) = node.file.take() {
            suite.file = Some(file);
        }

        let invalid = |field: &str, e: String| {
            Error::structural(format!("suite '{}': invalid {field}: {e}", suite.title))
        };
        if let Some(timeout) = &node.timeout {
            suite
                .config
                .set_timeout(timeout)
                .map_err(|e| invalid("timeout", e))?;
        }
        if let Some(slow) = &node.slow {
            suite.config.set_slow(slow).map_err(|e| invalid("slow", e))?;
        }
        if let Some(retries) = node.retries {
            suite
                .config
                .set_retries(retries)
                .map_err(|e| invalid("retries", e))?;
        }
        if let Some(enabled) = node.enable_timeouts {
            suite.config.set_enable_timeouts(enabled);
        }

        if let Some(tests) = node.tests.take() {
            suite.tests = tests
                .into_iter()
                .map(|t| create_test(t, id, &suite.path))
                .collect::<Result<_>>()?;
        }

        if let Some(children) = node.suites.take() {
            let mut built = Vec::with_capacity(children.len());
            for child in children {
                built.push(self.suite(child, Some((id, &suite.path)), false)?);
            }
            suite.suites = built;
        }

        // hooks replay against the tests built above
        let settled = suite.settled_tests();
        for hook_type in HookType::ALL {
            let Some(hooks) = node.take_hooks(hook_type).filter(|h| !h.is_empty()) else {
                continue;
            };
            let hooks = hooks
                .into_iter()
                .map(|h| create_hook(hook_type, h, id, &suite.path, settled))
                .collect::<Result<Vec<_>>>()?;
            *suite.hooks.get_mut(hook_type) = hooks;
        }

        tracing::debug!(
            id = id.0,
            title = %suite.title,
            root = suite.root,
            tests = suite.tests.len(),
            suites = suite.suites.len(),
            "Rebuilt suite"
        );

        Ok(suite)
    }
}

/// Copy the fields shared by tests and hooks.
///
/// Returns the recorded error separately; where it ends up depends on
/// whether a test or a hook is being built.
fn copy_runnable(
    node: RunnableNode,
    kind: &str,
    parent: SuiteId,
    parent_path: &TitlePath,
) -> Result<(Runnable, Option<ErrorDescriptor>)> {
    let title = node.title.unwrap_or_default();

    if node.state == Some(TestState::Failed) && node.err.is_none() {
        return Err(Error::FailedWithoutError { title });
    }

    let mut r = Runnable::new(title, kind);
    r.parent = Some(parent);
    r.parent_path = parent_path.clone();

    if let Some(body) = node.body {
        r.body = Some(body);
    }
    if let Some(timed_out) = node.timed_out {
        r.timed_out = timed_out;
    }
    if let Some(pending) = node.pending {
        r.pending = pending;
    }
    if let Some(kind) = node.kind {
        r.kind = kind;
    }
    if let Some(file) = node.file {
        r.file = Some(file);
    }
    if let Some(duration) = node.duration {
        r.duration = Some(duration);
    }
    if let Some(state) = node.state {
        r.state = Some(state);
    }
    if let Some(speed) = node.speed {
        r.speed = Some(speed);
    }

    let title = r.title.clone();
    let invalid =
        |field: &str, e: String| Error::structural(format!("{kind} '{title}': invalid {field}: {e}"));
    if let Some(timeout) = &node.timeout {
        r.config
            .set_timeout(timeout)
            .map_err(|e| invalid("timeout", e))?;
    }
    if let Some(slow) = &node.slow {
        r.config.set_slow(slow).map_err(|e| invalid("slow", e))?;
    }
    if let Some(retries) = node.retries {
        r.config
            .set_retries(retries)
            .map_err(|e| invalid("retries", e))?;
    }
    if let Some(current_retry) = node.current_retry {
        r.config.set_current_retry(current_retry);
    }

    Ok((r, node.err))
}

fn create_test(node: RunnableNode, parent: SuiteId, parent_path: &TitlePath) -> Result<Test> {
    // A test rebuilt without a body function is pending, unless it recorded a state
    let pending = node.pending.unwrap_or(node.state.is_none());
    let (mut runnable, err) = copy_runnable(node, Test::KIND, parent, parent_path)?;
    runnable.pending = pending;

    let err = match runnable.state {
        Some(TestState::Failed) => err,
        _ => {
            if err.is_some() {
                tracing::debug!(test = %runnable.title, "Ignoring error of a test that did not fail");
            }
            None
        }
    };

    Test::new(runnable, err)
}

fn create_hook(
    hook_type: HookType,
    node: HookNode,
    parent: SuiteId,
    parent_path: &TitlePath,
    settled_siblings: usize,
) -> Result<Hook> {
    let (runnable, err) = copy_runnable(node.runnable, Hook::KIND, parent, parent_path)?;

    let failure = match runnable.state {
        Some(TestState::Failed) => err,
        _ => None,
    };
    let replay = HookReplay::for_hook(hook_type, failure, settled_siblings);

    Ok(Hook::new(runnable, hook_type, node.original_title, replay))
}
