//! Public suffix matching.
//!
//! Finds the longest rule covering a host and splits the host into root
//! domain, top level domain, second level domain and subdomain.
//!
//! ## Example
//!
//! ```
//! use tld_extract::matcher::TldParser;
//! use tld_extract::psl::parse_psl_str;
//!
//! let rules = parse_psl_str("*.ck\n!www.ck\nuk\nco.uk\n");
//! let parser = TldParser::new(&rules);
//!
//! let result = parser.parse_exceptions_and_wildcards("www.ck").unwrap();
//! assert_eq!(result.top_level_domain.as_deref(), Some("ck"));
//!
//! let result = parser.parse_normals("example.co.uk").unwrap();
//! assert_eq!(result.root_domain.as_deref(), Some("example.co.uk"));
//! ```

mod labels;

use std::borrow::Cow;

use crate::host::{canonicalize, decode_ace, has_ace_label};
use crate::psl::RuleSet;
use crate::types::{ParseMode, TldResult};

use labels::HostLabels;

/// Suffix matcher over a borrowed rule set
#[derive(Debug, Clone, Copy)]
pub struct TldParser<'a> {
    rules: &'a RuleSet,
}

impl<'a> TldParser<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Parse with the given mode. `Full` tries exceptions and wildcards
    /// first and falls back to normal rules.
    pub fn parse(&self, host: &str, mode: ParseMode) -> Option<TldResult> {
        match mode {
            ParseMode::Full => self
                .parse_exceptions_and_wildcards(host)
                .or_else(|| self.parse_normals(host)),
            ParseMode::ExceptionsAndWildcards => self.parse_exceptions_and_wildcards(host),
            ParseMode::NormalsOnly => self.parse_normals(host),
        }
    }

    /// Match against normal rules only.
    pub fn parse_normals(&self, host: &str) -> Option<TldResult> {
        let host = canonical_host(host);
        let labels = HostLabels::new(&host)?;

        let suffix_len = self.longest_normal(&labels)?;
        TldResult::from_labels(labels.as_slice(), suffix_len)
    }

    /// Match against exception and wildcard rules only.
    ///
    /// The longest match wins. An exception beats a wildcard of the same
    /// length, and its public suffix is the rule minus its leftmost label.
    pub fn parse_exceptions_and_wildcards(&self, host: &str) -> Option<TldResult> {
        let host = canonical_host(host);
        let labels = HostLabels::new(&host)?;

        let exception = self.longest_exception(&labels);
        let wildcard = self.longest_wildcard(&labels);

        let suffix_len = match (exception, wildcard) {
            (Some(e), Some(w)) if w > e => w,
            (Some(e), _) => e - 1,
            (None, Some(w)) => w,
            (None, None) => return None,
        };

        TldResult::from_labels(labels.as_slice(), suffix_len)
    }

    fn longest_normal(&self, labels: &HostLabels<'_>) -> Option<usize> {
        let max = labels.len().min(self.rules.max_normal_labels());
        (1..=max)
            .rev()
            .find(|&count| self.rules.has_normal(labels.suffix(count)))
    }

    fn longest_exception(&self, labels: &HostLabels<'_>) -> Option<usize> {
        let max = labels.len().min(self.rules.max_exception_labels());
        (1..=max)
            .rev()
            .find(|&count| self.rules.has_exception(labels.suffix(count)))
    }

    fn longest_wildcard(&self, labels: &HostLabels<'_>) -> Option<usize> {
        let max = labels.len().min(self.rules.max_wildcard_labels());
        if max == 0 {
            return None;
        }

        let root_first = labels.root_first();
        (1..=max).rev().find(|&count| {
            self.rules
                .wildcards_with_labels(count)
                .iter()
                .any(|rule| rule.matches(&root_first))
        })
    }
}

/// Match `host` against `rules` in the given mode.
pub fn match_host(rules: &RuleSet, host: &str, mode: ParseMode) -> Option<TldResult> {
    TldParser::new(rules).parse(host, mode)
}

/// Hosts from `normalize_host` are already canonical; only allocate when
/// uppercase, non-ASCII or punycode input shows up.
fn canonical_host(host: &str) -> Cow<'_, str> {
    if host.is_ascii() && !host.bytes().any(|b| b.is_ascii_uppercase()) && !has_ace_label(host) {
        Cow::Borrowed(host)
    } else {
        Cow::Owned(decode_ace(&canonicalize(host)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::psl::parse_psl_str;

    fn rules() -> RuleSet {
        parse_psl_str(
            "com\nuk\nco.uk\njp\nco.jp\n*.ck\n!www.ck\n*.kawasaki.jp\n!city.kawasaki.jp\n",
        )
    }

    #[test]
    fn test_normal_rule_com() {
        let rules = rules();
        for host in ["example.com", "www.example.com", "a.b.c.example.com"] {
            let result = match_host(&rules, host, ParseMode::Full).unwrap();
            assert_eq!(result.top_level_domain.as_deref(), Some("com"), "host: {}", host);
            assert_eq!(result.root_domain.as_deref(), Some("example.com"), "host: {}", host);
        }
    }

    #[test]
    fn test_exception_overrides_wildcard() {
        let rules = rules();
        let result = match_host(&rules, "www.ck", ParseMode::Full).unwrap();
        assert_eq!(result.top_level_domain.as_deref(), Some("ck"));
        assert_eq!(result.second_level_domain.as_deref(), Some("www"));
        assert_eq!(result.root_domain.as_deref(), Some("www.ck"));
        assert!(result.sub_domain.is_none());
    }

    #[test]
    fn test_wildcard_claims_label() {
        let rules = rules();
        let result = match_host(&rules, "foo.ck", ParseMode::Full).unwrap();
        assert_eq!(result.top_level_domain.as_deref(), Some("foo.ck"));
        assert!(result.root_domain.is_none());
        assert!(result.second_level_domain.is_none());
        assert!(result.sub_domain.is_none());

        let result = match_host(&rules, "shop.foo.ck", ParseMode::Full).unwrap();
        assert_eq!(result.top_level_domain.as_deref(), Some("foo.ck"));
        assert_eq!(result.root_domain.as_deref(), Some("shop.foo.ck"));
    }

    #[test]
    fn test_exception_below_wildcard_with_subdomain() {
        let rules = rules();
        let result = match_host(&rules, "www.city.kawasaki.jp", ParseMode::Full).unwrap();
        assert_eq!(result.top_level_domain.as_deref(), Some("kawasaki.jp"));
        assert_eq!(result.root_domain.as_deref(), Some("city.kawasaki.jp"));
        assert_eq!(result.sub_domain.as_deref(), Some("www"));

        let result = match_host(&rules, "www.other.kawasaki.jp", ParseMode::Full).unwrap();
        assert_eq!(result.top_level_domain.as_deref(), Some("other.kawasaki.jp"));
        assert_eq!(result.root_domain.as_deref(), Some("www.other.kawasaki.jp"));
    }

    #[test]
    fn test_longer_wildcard_beats_exception() {
        let rules = parse_psl_str("*.ck\n!www.ck\n*.*.ck\n");

        let result = match_host(&rules, "a.www.ck", ParseMode::Full).unwrap();
        assert_eq!(result.top_level_domain.as_deref(), Some("a.www.ck"));
        assert!(result.root_domain.is_none());
        assert!(result.second_level_domain.is_none());
        assert!(result.sub_domain.is_none());

        let result = match_host(&rules, "b.a.www.ck", ParseMode::Full).unwrap();
        assert_eq!(result.root_domain.as_deref(), Some("b.a.www.ck"));

        // Same length as the exception: the exception still wins
        let result = match_host(&rules, "www.ck", ParseMode::Full).unwrap();
        assert_eq!(result.top_level_domain.as_deref(), Some("ck"));
        assert_eq!(result.root_domain.as_deref(), Some("www.ck"));
    }

    #[test]
    fn test_punycode_host_matches_unicode_rule() {
        let rules = parse_psl_str("jp\n日本.jp\n");
        let result = match_host(&rules, "a.xn--wgv71a.jp", ParseMode::Full).unwrap();
        assert_eq!(result.top_level_domain.as_deref(), Some("日本.jp"));
        assert_eq!(result.root_domain.as_deref(), Some("a.日本.jp"));

        let extractor = crate::TldExtract::new(rules.clone());
        assert_eq!(
            extractor.parse("a.xn--wgv71a.jp", false),
            match_host(&rules, "a.xn--wgv71a.jp", ParseMode::Full)
        );
    }

    #[test]
    fn test_longest_match_wins() {
        let rules = rules();
        let result = match_host(&rules, "example.co.uk", ParseMode::Full).unwrap();
        assert_eq!(result.top_level_domain.as_deref(), Some("co.uk"));
        assert_eq!(result.root_domain.as_deref(), Some("example.co.uk"));
        assert_eq!(result.second_level_domain.as_deref(), Some("example"));
    }

    #[test]
    fn test_host_is_public_suffix() {
        let rules = rules();
        for (host, tld) in [("com", "com"), ("co.jp", "co.jp")] {
            let result = match_host(&rules, host, ParseMode::Full).unwrap();
            assert_eq!(result.top_level_domain.as_deref(), Some(tld));
            assert!(result.root_domain.is_none());
            assert!(result.second_level_domain.is_none());
            assert!(result.sub_domain.is_none());
        }
    }

    #[test]
    fn test_unicode_subdomain_depth() {
        let rules = rules();
        let result = match_host(&rules, "www.ラーメン.寿司.co.jp", ParseMode::Full).unwrap();
        assert_eq!(result.top_level_domain.as_deref(), Some("co.jp"));
        assert_eq!(result.second_level_domain.as_deref(), Some("寿司"));
        assert_eq!(result.root_domain.as_deref(), Some("寿司.co.jp"));
        assert_eq!(result.sub_domain.as_deref(), Some("www.ラーメン"));
    }

    #[test]
    fn test_no_match() {
        let rules = rules();
        assert!(match_host(&rules, "localhost", ParseMode::Full).is_none());
        assert!(match_host(&rules, "example.invalid", ParseMode::Full).is_none());
        assert!(match_host(&rules, "", ParseMode::Full).is_none());
    }

    #[test]
    fn test_modes_use_their_own_subsets() {
        let rules = rules();
        let parser = TldParser::new(&rules);
        assert!(parser.parse_exceptions_and_wildcards("example.com").is_none());
        assert!(parser.parse_normals("foo.ck").is_none());
        assert!(parser
            .parse(&"foo.ck".to_string(), ParseMode::NormalsOnly)
            .is_none());
        assert_eq!(
            parser
                .parse("foo.ck", ParseMode::ExceptionsAndWildcards)
                .unwrap()
                .top_level_domain
                .as_deref(),
            Some("foo.ck")
        );
    }

    #[test]
    fn test_case_insensitive() {
        let rules = rules();
        let result = match_host(&rules, "WWW.Example.CO.UK", ParseMode::Full).unwrap();
        assert_eq!(result.root_domain.as_deref(), Some("example.co.uk"));
        assert_eq!(result.sub_domain.as_deref(), Some("www"));
    }

    #[test]
    fn test_empty_labels_yield_nothing() {
        let rules = rules();
        assert!(match_host(&rules, "a..com", ParseMode::Full).is_none());
        assert!(match_host(&rules, ".com", ParseMode::Full).is_none());
    }

    #[test]
    fn test_single_label_exception_is_ignored() {
        // "!foo" has no label left once the exception drops one
        let rules = parse_psl_str("!foo\n");
        assert!(match_host(&rules, "foo", ParseMode::Full).is_none());
    }

    #[test]
    fn test_idempotent_build() {
        let text = "com\nuk\nco.uk\n*.ck\n!www.ck\n";
        let first = parse_psl_str(text);
        let second = parse_psl_str(text);
        for host in ["www.ck", "foo.ck", "a.b.co.uk", "example.com", "nothing"] {
            assert_eq!(
                match_host(&first, host, ParseMode::Full),
                match_host(&second, host, ParseMode::Full),
                "host: {}",
                host
            );
        }
    }
}
