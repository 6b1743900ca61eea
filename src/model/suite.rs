//! Suite hierarchy

use super::millis::MillisValue;
use super::runnable::{Hook, Outcome, Test};
use super::stats::Stats;

/// Pre-order position of a suite within its tree (the root is 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuiteId(pub usize);

/// Titles from the outermost non-root suite down to a node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitlePath(Vec<String>);

impl TitlePath {
    /// Path extended by one more title
    pub fn child(&self, title: &str) -> Self {
        let mut titles = self.0.clone();
        titles.push(title.to_string());
        Self(titles)
    }

    pub fn join(&self) -> String {
        self.0.join(" ")
    }
}

impl From<Vec<String>> for TitlePath {
    fn from(titles: Vec<String>) -> Self {
        Self(titles)
    }
}

/// The four hook slots of a suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookType {
    BeforeAll,
    BeforeEach,
    AfterEach,
    AfterAll,
}

impl HookType {
    /// Order in which hook slots are rebuilt
    pub const ALL: [HookType; 4] = [
        HookType::BeforeEach,
        HookType::AfterEach,
        HookType::AfterAll,
        HookType::BeforeAll,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BeforeAll => "beforeAll",
            Self::BeforeEach => "beforeEach",
            Self::AfterEach => "afterEach",
            Self::AfterAll => "afterAll",
        }
    }
}

impl std::fmt::Display for HookType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suite-level run configuration, written only through the setters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuiteConfig {
    timeout: Option<u64>,
    slow: Option<u64>,
    retries: Option<i64>,
    enable_timeouts: Option<bool>,
}

impl SuiteConfig {
    pub fn timeout(&self) -> Option<u64> {
        self.timeout
    }

    pub fn slow(&self) -> Option<u64> {
        self.slow
    }

    pub fn retries(&self) -> Option<i64> {
        self.retries
    }

    pub fn enable_timeouts(&self) -> Option<bool> {
        self.enable_timeouts
    }

    /// A timeout of 0 turns timeouts off for the suite
    pub fn set_timeout(&mut self, value: &MillisValue) -> Result<(), String> {
        let ms = value.to_millis()?;
        if ms == 0 {
            self.enable_timeouts = Some(false);
        }
        self.timeout = Some(ms);
        Ok(())
    }

    pub fn set_slow(&mut self, value: &MillisValue) -> Result<(), String> {
        self.slow = Some(value.to_millis()?);
        Ok(())
    }

    /// `-1` means "inherit from the parent suite"
    pub fn set_retries(&mut self, n: i64) -> Result<(), String> {
        if n < -1 {
            return Err(format!("retries must be -1 or greater, got {n}"));
        }
        self.retries = Some(n);
        Ok(())
    }

    pub fn set_enable_timeouts(&mut self, enabled: bool) {
        self.enable_timeouts = Some(enabled);
    }
}

/// Hooks of a suite, one ordered list per hook type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hooks {
    pub before_all: Vec<Hook>,
    pub before_each: Vec<Hook>,
    pub after_each: Vec<Hook>,
    pub after_all: Vec<Hook>,
}

impl Hooks {
    pub fn get(&self, hook_type: HookType) -> &[Hook] {
        match hook_type {
            HookType::BeforeAll => &self.before_all,
            HookType::BeforeEach => &self.before_each,
            HookType::AfterEach => &self.after_each,
            HookType::AfterAll => &self.after_all,
        }
    }

    pub fn get_mut(&mut self, hook_type: HookType) -> &mut Vec<Hook> {
        match hook_type {
            HookType::BeforeAll => &mut self.before_all,
            HookType::BeforeEach => &mut self.before_each,
            HookType::AfterEach => &mut self.after_each,
            HookType::AfterAll => &mut self.after_all,
        }
    }

    pub fn is_empty(&self) -> bool {
        HookType::ALL.iter().all(|t| self.get(*t).is_empty())
    }
}

/// A node of the rebuilt suite tree
///
/// Each suite owns its tests, hooks and child suites. `parent` is only an
/// identifier for looking the parent up from the root.
#[derive(Debug, Clone, PartialEq)]
pub struct Suite {
    pub id: SuiteId,
    pub parent: Option<SuiteId>,
    pub title: String,
    /// Title path used for full titles; empty for the root
    pub path: TitlePath,
    pub root: bool,
    pub pending: bool,
    pub file: Option<String>,
    pub config: SuiteConfig,
    pub tests: Vec<Test>,
    pub suites: Vec<Suite>,
    pub hooks: Hooks,
    /// Statistics recorded with the snapshot, attached to the root only
    pub stats: Option<Stats>,
}

impl Suite {
    pub fn new(id: SuiteId, title: impl Into<String>, root: bool) -> Self {
        Self {
            id,
            parent: None,
            title: title.into(),
            path: TitlePath::default(),
            root,
            pending: false,
            file: None,
            config: SuiteConfig::default(),
            tests: Vec::new(),
            suites: Vec::new(),
            hooks: Hooks::default(),
            stats: None,
        }
    }

    pub fn full_title(&self) -> String {
        self.path.join()
    }

    /// Tests of this suite whose original run reached an outcome
    pub fn settled_tests(&self) -> usize {
        self.tests
            .iter()
            .filter(|t| t.outcome().is_settled())
            .count()
    }

    /// Find a suite in this subtree by id
    pub fn find(&self, id: SuiteId) -> Option<&Suite> {
        if self.id == id {
            return Some(self);
        }
        self.suites.iter().find_map(|s| s.find(id))
    }

    /// Number of suites in this subtree, including this one
    pub fn total_suites(&self) -> usize {
        1 + self.suites.iter().map(Suite::total_suites).sum::<usize>()
    }

    /// Number of tests in this subtree
    pub fn total_tests(&self) -> usize {
        self.tests.len() + self.suites.iter().map(Suite::total_tests).sum::<usize>()
    }

    /// Count tests in this subtree by outcome: (passed, failed, pending)
    pub fn outcome_counts(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for test in &self.tests {
            match test.outcome() {
                Outcome::Passed => counts.0 += 1,
                Outcome::Failed(_) => counts.1 += 1,
                Outcome::Pending => counts.2 += 1,
                Outcome::Unresolved => {}
            }
        }
        for child in &self.suites {
            let (p, f, n) = child.outcome_counts();
            counts.0 += p;
            counts.1 += f;
            counts.2 += n;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suite_timeout_zero_disables_timeouts() {
        let mut config = SuiteConfig::default();
        config.set_timeout(&MillisValue::from("2s")).unwrap();
        assert_eq!(config.timeout(), Some(2000));
        assert_eq!(config.enable_timeouts(), None);

        config.set_timeout(&MillisValue::from(0)).unwrap();
        assert_eq!(config.timeout(), Some(0));
        assert_eq!(config.enable_timeouts(), Some(false));
    }

    #[test]
    fn test_suite_retries_validation() {
        let mut config = SuiteConfig::default();
        assert!(config.set_retries(3).is_ok());
        assert!(config.set_retries(-7).is_err());
        assert_eq!(config.retries(), Some(3));
    }

    #[test]
    fn test_find_walks_subtree() {
        let mut root = Suite::new(SuiteId(0), "", true);
        let mut child = Suite::new(SuiteId(1), "child", false);
        child.parent = Some(SuiteId(0));
        child.suites.push(Suite::new(SuiteId(2), "grandchild", false));
        root.suites.push(child);

        assert_eq!(root.find(SuiteId(2)).map(|s| s.title.as_str()), Some("grandchild"));
        assert!(root.find(SuiteId(9)).is_none());
        assert_eq!(root.total_suites(), 3);
    }

    #[test]
    fn test_hook_type_names() {
        assert_eq!(HookType::BeforeEach.to_string(), "beforeEach");
        assert_eq!(HookType::AfterAll.as_str(), "afterAll");
        assert!(Hooks::default().is_empty());
    }
}
