//! Best-effort lenient extractor for the backend's result list.
//!
//! The backend answers with Python's `repr` of a list of dicts:
//! `[{'title': 'A', 'href': 'http://a', 'keywords': 'k', 'weight': 1.2}, ...]`.
//! That is not JSON, so records are scraped with per-field patterns:
//!
//! 1. drop the first and last character (the wrapping `[` and `]`), as-is,
//!    with no whitespace trimming;
//! 2. split on `}` and put the braces back on each fragment;
//! 3. skip fragments without both a `'title'` and an `'href'` marker;
//! 4. pull each field with a `'key': 'value'` pattern;
//! 5. dedup, keep first-seen order, cap.
//!
//! Values may be single or double quoted. Backslash escapes inside a value
//! (`\'`, `\"`, `\\`, `\n`, `\t`, `\r`) are decoded; any other escape
//! is kept verbatim. A `}` inside a value splits its record; such fragments
//! usually lose a required field and are dropped.

use crate::record::{MAX_RESULTS, ResultSet, SearchResultRecord};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static TITLE: LazyLock<Option<Regex>> = LazyLock::new(|| field_regex("title"));
static HREF: LazyLock<Option<Regex>> = LazyLock::new(|| field_regex("href"));
static KEYWORDS: LazyLock<Option<Regex>> = LazyLock::new(|| field_regex("keywords"));
static DESCRIPTION: LazyLock<Option<Regex>> = LazyLock::new(|| field_regex("description"));
static WORD: LazyLock<Option<Regex>> = LazyLock::new(|| field_regex("word"));

/// Python quotes a string with `"` when it contains `'`, and falls back to
/// `\'` when it contains both; accept all three.
fn field_regex(key: &str) -> Option<Regex> {
    let key = regex::escape(key);
    Regex::new(&format!(
        r#"'{key}'\s*:\s*(?:'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)")"#
    ))
    .ok()
}

fn capture<'a>(re: &Option<Regex>, fragment: &'a str) -> Option<Cow<'a, str>> {
    let caps = re.as_ref()?.captures(fragment)?;
    let value = caps.get(1).or_else(|| caps.get(2))?.as_str();
    Some(unescape(value))
}

fn unescape(value: &str) -> Cow<'_, str> {
    if !value.contains('\\') {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}

/// Which keys a backend uses for result fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldConvention {
    /// `title` + `href` required, `keywords` optional.
    #[default]
    Keywords,
    /// Legacy shape: `title`, `href`, `description` and `word` all required;
    /// `word` becomes the record's keywords.
    DescriptionWord,
}

#[derive(Debug, Clone)]
pub struct LenientExtractor {
    convention: FieldConvention,
    max_results: usize,
}

impl Default for LenientExtractor {
    fn default() -> Self {
        Self::new(FieldConvention::Keywords, MAX_RESULTS)
    }
}

impl LenientExtractor {
    pub fn new(convention: FieldConvention, max_results: usize) -> Self {
        Self {
            convention,
            max_results,
        }
    }

    pub fn convention(&self) -> FieldConvention {
        self.convention
    }

    /// Scrape records out of a raw result list.
    ///
    /// ```
    /// use tianyan_portal::LenientExtractor;
    ///
    /// let raw = "[{'title': 'A', 'href': 'http://a', 'keywords': 'k1'},\
    ///             {'title': 'A', 'href': 'http://a', 'keywords': 'k1'},\
    ///             {'title': 'B', 'href': 'http://b', 'keywords': 'k2'}]";
    /// let set = LenientExtractor::default().extract(raw);
    /// assert_eq!(set.len(), 2);
    /// assert_eq!(set.as_slice()[1].href(), "http://b");
    /// ```
    pub fn extract(&self, raw: &str) -> ResultSet {
        let inner = strip_wrapper(raw);
        let mut scanned = 0usize;
        let records: Vec<SearchResultRecord> = inner
            .split('}')
            .inspect(|_| scanned += 1)
            .filter_map(|fragment| self.extract_fragment(fragment))
            .collect();
        let accepted = records.len();
        let set = ResultSet::from_records(records, self.max_results);

        tracing::debug!(
            target: "portal.extract",
            convention = ?self.convention,
            fragments = scanned,
            accepted,
            kept = set.len(),
            "extract.done"
        );
        set
    }

    fn extract_fragment(&self, fragment: &str) -> Option<SearchResultRecord> {
        let candidate = format!("{{{fragment}}}");
        if !(candidate.contains("'title'") && candidate.contains("'href'")) {
            return None;
        }

        let title = capture(&TITLE, &candidate);
        let href = capture(&HREF, &candidate);
        let keywords = match self.convention {
            FieldConvention::Keywords => Some(capture(&KEYWORDS, &candidate).unwrap_or_default()),
            FieldConvention::DescriptionWord => capture(&DESCRIPTION, &candidate)
                .and_then(|_| capture(&WORD, &candidate)),
        };

        let record = match (title, href, keywords) {
            (Some(title), Some(href), Some(keywords)) => {
                SearchResultRecord::new(title, href, keywords)
            }
            _ => None,
        };
        if record.is_none() {
            tracing::trace!(target: "portal.extract", fragment = %candidate, "extract.fragment_dropped");
        }
        record
    }
}

/// Drop the first and last character; anything shorter than two yields "".
fn strip_wrapper(raw: &str) -> &str {
    let mut chars = raw.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}
