//! Hostname extraction and canonicalization.
//!
//! Turns URL-like or plain string input into the bare, canonical host the
//! suffix matcher expects. Extraction is best-effort: malformed input yields
//! `None` rather than an error.

use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use url::Url;

/// Scheme marker: optional letters followed by `:`, then `//` (scheme-relative allowed)
static SCHEME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\p{L}+:)?//").expect("SCHEME_PATTERN: hardcoded regex is invalid")
});

/// Leading host token: optional 2-62 char label and dot, then a final label
/// with at least one alphanumeric character
static HOST_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9\p{L}][0-9\p{L}-]{1,61}\.?)?([\p{L}-]*[0-9\p{L}]+)")
        .expect("HOST_PATTERN: hardcoded regex is invalid")
});

/// ACE prefix of punycode labels
const ACE_PREFIX: &str = "xn--";

/// Input that a hostname can be extracted from.
pub trait Extractable {
    /// The canonical hostname, or `None` if no host token can be extracted.
    fn hostname(&self) -> Option<String>;
}

impl Extractable for str {
    fn hostname(&self) -> Option<String> {
        normalize_host(self)
    }
}

impl Extractable for String {
    fn hostname(&self) -> Option<String> {
        normalize_host(self)
    }
}

impl<T: Extractable + ?Sized> Extractable for &T {
    fn hostname(&self) -> Option<String> {
        (**self).hostname()
    }
}

impl Extractable for Url {
    /// Percent-decodes the serialized URL before extracting, so hosts that
    /// were escaped on the way in compare against the raw rules.
    fn hostname(&self) -> Option<String> {
        let decoded = percent_decode_str(self.as_str()).decode_utf8().ok()?;
        normalize_host(&decoded)
    }
}

/// Extract and canonicalize the host of `input`.
///
/// Only schemes made of letters are recognized. A scheme containing `+`,
/// `-`, `.` or digits (`git+ssh://`) is not stripped, so the text before its
/// `:` is taken as the host.
///
/// ```rust
/// use tld_extract::normalize_host;
///
/// assert_eq!(normalize_host("https://www.example.com/path?x=1").as_deref(), Some("www.example.com"));
/// assert_eq!(normalize_host("not a url at all"), None);
/// ```
pub fn normalize_host(input: &str) -> Option<String> {
    let candidate = extract_host(input)?;
    let host = strip_credentials_and_port(&candidate)?;
    let host = host.strip_suffix('.').unwrap_or(host);

    if host.is_empty() || host.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return None;
    }
    if host.split('.').any(str::is_empty) {
        return None;
    }

    Some(decode_ace(&canonicalize(host)))
}

/// Lowercase and NFC-normalize a host or rule for comparison.
pub fn canonicalize(s: &str) -> String {
    s.to_lowercase().nfc().collect()
}

/// Pull the raw host candidate out of `input` without validating it.
fn extract_host(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(scheme) = SCHEME_PATTERN.find(input) {
        return first_segment(&input[scheme.end()..]);
    }

    // `(?!.*:$)` in the classic pattern; the regex crate has no lookaround
    if HOST_PATTERN.is_match(input) && !input.ends_with(':') {
        if let Some(segment) = first_segment(input) {
            if !segment.chars().any(char::is_whitespace) {
                return Some(segment);
            }
        }
    }

    Url::parse(input)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
}

/// The part of `rest` before the first path, query or fragment delimiter.
fn first_segment(rest: &str) -> Option<String> {
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let segment = &rest[..end];
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}

/// Drop `user:pass@` and `:port` from an authority.
fn strip_credentials_and_port(authority: &str) -> Option<&str> {
    let host = match authority.rfind('@') {
        Some(at) => &authority[at + 1..],
        None => authority,
    };

    // IPv6 literal: keep the brackets, drop anything after them
    if host.starts_with('[') {
        let close = host.find(']')?;
        return Some(&host[..=close]);
    }

    match host.find(':') {
        Some(colon) => Some(&host[..colon]),
        None => Some(host),
    }
}

/// Check for any `xn--` label
pub(crate) fn has_ace_label(host: &str) -> bool {
    host.split('.').any(|label| label.starts_with(ACE_PREFIX))
}

/// Decode punycode labels so they compare equal to Unicode rules.
pub(crate) fn decode_ace(host: &str) -> String {
    if !has_ace_label(host) {
        return host.to_string();
    }

    host.split('.')
        .map(|label| {
            if !label.starts_with(ACE_PREFIX) {
                return label.to_string();
            }
            match idna::domain_to_unicode(label) {
                (decoded, Ok(())) => canonicalize(&decoded),
                (_, Err(_)) => label.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}
