use serde::{Deserialize, Serialize};

use crate::host::canonicalize;

/// Wildcard label in a PSL rule
pub const WILDCARD_LABEL: &str = "*";

/// Exception marker prefixing a PSL rule
pub const EXCEPTION_MARKER: char = '!';

/// PSL rule kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Plain rule, e.g. `co.uk`
    Normal,
    /// Rule with a `*` label, e.g. `*.ck`
    Wildcard,
    /// Rule prefixed with `!`, e.g. `!www.ck`
    Exception,
}

/// A single Public Suffix List rule.
///
/// Labels are stored root-first: `co.uk` is kept as `["uk", "co"]`, so
/// comparisons proceed from the TLD inward.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    kind: RuleKind,
    labels: Vec<String>,
}

impl Rule {
    /// Parse one rule token (no comments or surrounding whitespace).
    ///
    /// Returns `None` if the token does not decompose into non-empty
    /// dot-separated labels.
    pub fn parse(token: &str) -> Option<Self> {
        let token = canonicalize(token);
        let (is_exception, body) = match token.strip_prefix(EXCEPTION_MARKER) {
            Some(rest) => (true, rest),
            None => (false, token.as_str()),
        };

        if body.is_empty() {
            return None;
        }

        let labels: Vec<String> = body.rsplit('.').map(str::to_string).collect();
        if labels.iter().any(|label| label.is_empty()) {
            return None;
        }

        let kind = if is_exception {
            RuleKind::Exception
        } else if labels.iter().any(|label| label == WILDCARD_LABEL) {
            RuleKind::Wildcard
        } else {
            RuleKind::Normal
        };

        Some(Self { kind, labels })
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Labels in root-first order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// The rule in reading order without the exception marker, e.g. `www.ck`.
    pub fn dotted(&self) -> String {
        let mut labels: Vec<&str> = self.labels.iter().map(String::as_str).collect();
        labels.reverse();
        labels.join(".")
    }

    /// Check the rule against the trailing labels of a host.
    ///
    /// `host_labels` must be root-first. Each rule position matches the host
    /// label at the same position exactly, or any label if it is `*`.
    pub fn matches(&self, host_labels: &[&str]) -> bool {
        if self.labels.len() > host_labels.len() {
            return false;
        }
        self.labels
            .iter()
            .zip(host_labels)
            .all(|(rule, host)| rule == WILDCARD_LABEL || rule == host)
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.kind == RuleKind::Exception {
            write!(f, "{}", EXCEPTION_MARKER)?;
        }
        write!(f, "{}", self.dotted())
    }
}

/// Which rule subsets a parse consults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// Exceptions and wildcards first, then normal rules
    #[default]
    Full,
    /// Exception and wildcard rules only
    ExceptionsAndWildcards,
    /// Normal rules only (quick mode)
    NormalsOnly,
}

/// Result of extracting a hostname.
///
/// ```rust
/// use tld_extract::{RuleSet, TldExtract};
///
/// let rules = RuleSet::from_bytes(b"com\n").unwrap();
/// let extractor = TldExtract::new(rules);
/// let result = extractor.parse("https://www.github.com/gumob/TLDExtract", false).unwrap();
///
/// assert_eq!(result.root_domain.as_deref(), Some("github.com"));
/// assert_eq!(result.top_level_domain.as_deref(), Some("com"));
/// assert_eq!(result.second_level_domain.as_deref(), Some("github"));
/// assert_eq!(result.sub_domain.as_deref(), Some("www"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TldResult {
    pub root_domain: Option<String>,
    pub top_level_domain: Option<String>,
    pub second_level_domain: Option<String>,
    pub sub_domain: Option<String>,
}

impl TldResult {
    /// Assemble a result from host labels (reading order) and the number of
    /// trailing labels that form the public suffix.
    ///
    /// Returns `None` when the suffix is empty or longer than the host.
    pub fn from_labels(labels: &[&str], suffix_len: usize) -> Option<Self> {
        let n = labels.len();
        if suffix_len == 0 || suffix_len > n {
            return None;
        }

        let split = n - suffix_len;
        let top_level_domain = labels[split..].join(".");

        if split == 0 {
            return Some(Self {
                top_level_domain: Some(top_level_domain),
                ..Self::default()
            });
        }

        let second_level_domain = labels[split - 1].to_string();
        let root_domain = format!("{}.{}", second_level_domain, top_level_domain);
        let sub_domain = (split > 1).then(|| labels[..split - 1].join("."));

        Some(Self {
            root_domain: Some(root_domain),
            top_level_domain: Some(top_level_domain),
            second_level_domain: Some(second_level_domain),
            sub_domain,
        })
    }
}
