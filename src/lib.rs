//! TLD Extract - root domain, TLD, second level domain and subdomain extraction
//!
//! This library splits hostnames using the [Public Suffix List](https://publicsuffix.org/):
//! - Hostname extraction from URLs and plain strings
//! - PSL parsing into normal, wildcard and exception rules
//! - Longest-match suffix lookup with exception/wildcard precedence
//! - Atomic rule set refresh from bytes, files or the canonical URL
//! - LRU caching for repeated lookups
//!
//! # Example
//!
//! ```rust
//! use tld_extract::{RuleSet, TldExtract};
//!
//! let psl = "
//! // ===BEGIN ICANN DOMAINS===
//! com
//! uk
//! co.uk
//! *.ck
//! !www.ck
//! // ===END ICANN DOMAINS===
//! ";
//!
//! let rules = RuleSet::from_bytes(psl.as_bytes()).unwrap();
//! let extractor = TldExtract::new(rules);
//!
//! let result = extractor.parse("https://shop.example.co.uk/cart", false).unwrap();
//! assert_eq!(result.root_domain.as_deref(), Some("example.co.uk"));
//! assert_eq!(result.top_level_domain.as_deref(), Some("co.uk"));
//! assert_eq!(result.second_level_domain.as_deref(), Some("example"));
//! assert_eq!(result.sub_domain.as_deref(), Some("shop"));
//!
//! // Exception rules carve a label out of a wildcard
//! let result = extractor.parse("www.ck", false).unwrap();
//! assert_eq!(result.top_level_domain.as_deref(), Some("ck"));
//! ```
//!
//! # Rule Syntax
//!
//! | Rule | Kind | Public suffix of `a.b.example.ck` style hosts |
//! |------|------|------------------------------------------------|
//! | `co.uk` | Normal | the rule itself |
//! | `*.ck` | Wildcard | the rule with `*` replaced by the host label |
//! | `!www.ck` | Exception | the rule minus its leftmost label |
//!
//! Lines starting with `//` and blank lines are ignored.

pub mod error;
pub mod extract;
pub mod host;
pub mod loader;
pub mod matcher;
pub mod psl;
pub mod types;

// Re-export commonly used items
pub use error::{LoadErrorKind, Result, TldError};
pub use extract::{ExtractOptions, TldExtract, DEFAULT_CACHE_SIZE};
pub use host::{normalize_host, Extractable};
pub use loader::{
    fetch_psl, FilePslLoader, HttpPslLoader, MemoryPslLoader, PslLoader, DEFAULT_PSL_URL,
};
pub use matcher::{match_host, TldParser};
pub use psl::{parse_psl, parse_psl_str, RuleSet};
pub use types::{ParseMode, Rule, RuleKind, TldResult};
