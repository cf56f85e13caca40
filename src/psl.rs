use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::Result;
use crate::loader::{FilePslLoader, PslLoader};
use crate::types::{Rule, RuleKind};

/// Comment marker in PSL text
const COMMENT_MARKER: &str = "//";

/// UTF-8 byte order mark
const BOM: char = '\u{feff}';

/// Parsed Public Suffix List, partitioned by rule kind.
///
/// Normal and exception rules are keyed by their dotted form so a host can
/// be checked one suffix at a time. Wildcards are grouped by label count.
/// The set is immutable once built; refreshing the list builds a new one.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    normals: HashSet<String>,
    exceptions: HashSet<String>,
    wildcards: HashMap<usize, Vec<Rule>>,
    wildcard_count: usize,
    max_normal_labels: usize,
    max_exception_labels: usize,
    max_wildcard_labels: usize,
}

impl RuleSet {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a rule set from raw PSL bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        parse_psl(bytes)
    }

    /// Build a rule set from a PSL file on disk.
    ///
    /// A missing or unreadable file is a `Load` error of kind `FileError`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = FilePslLoader::new(path).load()?;
        parse_psl(&bytes)
    }

    /// Add a rule. Duplicates are ignored.
    pub fn insert(&mut self, rule: Rule) {
        let count = rule.label_count();
        match rule.kind() {
            RuleKind::Normal => {
                self.normals.insert(rule.dotted());
                self.max_normal_labels = self.max_normal_labels.max(count);
            }
            RuleKind::Exception => {
                self.exceptions.insert(rule.dotted());
                self.max_exception_labels = self.max_exception_labels.max(count);
            }
            RuleKind::Wildcard => {
                let bucket = self.wildcards.entry(count).or_default();
                if !bucket.contains(&rule) {
                    bucket.push(rule);
                    self.wildcard_count += 1;
                    self.max_wildcard_labels = self.max_wildcard_labels.max(count);
                }
            }
        }
    }

    /// Check whether the exact rule is present
    pub fn contains(&self, rule: &Rule) -> bool {
        match rule.kind() {
            RuleKind::Normal => self.normals.contains(&rule.dotted()),
            RuleKind::Exception => self.exceptions.contains(&rule.dotted()),
            RuleKind::Wildcard => self
                .wildcards
                .get(&rule.label_count())
                .is_some_and(|bucket| bucket.contains(rule)),
        }
    }

    /// Iterate over every rule in the set, in no particular order
    pub fn rules(&self) -> impl Iterator<Item = Rule> + '_ {
        let normals = self.normals.iter().filter_map(|dotted| Rule::parse(dotted));
        let exceptions = self
            .exceptions
            .iter()
            .filter_map(|dotted| Rule::parse(&format!("!{}", dotted)));
        let wildcards = self.wildcards.values().flatten().cloned();
        normals.chain(exceptions).chain(wildcards)
    }

    pub fn normal_count(&self) -> usize {
        self.normals.len()
    }

    pub fn wildcard_count(&self) -> usize {
        self.wildcard_count
    }

    pub fn exception_count(&self) -> usize {
        self.exceptions.len()
    }

    /// Total number of rules
    pub fn len(&self) -> usize {
        self.normal_count() + self.wildcard_count() + self.exception_count()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn has_normal(&self, dotted: &str) -> bool {
        self.normals.contains(dotted)
    }

    pub(crate) fn has_exception(&self, dotted: &str) -> bool {
        self.exceptions.contains(dotted)
    }

    pub(crate) fn wildcards_with_labels(&self, count: usize) -> &[Rule] {
        self.wildcards.get(&count).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn max_normal_labels(&self) -> usize {
        self.max_normal_labels
    }

    pub(crate) fn max_exception_labels(&self) -> usize {
        self.max_exception_labels
    }

    pub(crate) fn max_wildcard_labels(&self) -> usize {
        self.max_wildcard_labels
    }
}

/// Parse raw PSL bytes into a rule set.
///
/// Fails only if the buffer is not valid UTF-8. Blank lines, `//` comments and
/// lines that do not decompose into dot-separated labels are skipped.
pub fn parse_psl(bytes: &[u8]) -> Result<RuleSet> {
    let text = std::str::from_utf8(bytes)?;
    Ok(parse_psl_str(text))
}

/// Parse PSL text into a rule set.
pub fn parse_psl_str(text: &str) -> RuleSet {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut rules = RuleSet::new();
    let mut skipped = 0usize;

    for (line_num, line) in text.lines().enumerate() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }

        // A rule ends at the first whitespace; the rest is annotation
        let token = line.split_whitespace().next().unwrap_or(line);

        match Rule::parse(token) {
            Some(rule) => rules.insert(rule),
            None => {
                skipped += 1;
                tracing::trace!(line = line_num + 1, token, "skipping malformed PSL line");
            }
        }
    }

    tracing::debug!(
        normals = rules.normal_count(),
        wildcards = rules.wildcard_count(),
        exceptions = rules.exception_count(),
        skipped,
        "parsed public suffix list"
    );

    rules
}
