use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;

/// Upper bound on how many records one search keeps.
pub const MAX_RESULTS: usize = 200;

/// One validated search hit.
///
/// Field names on the wire are the ones the results page has always read
/// from session storage (`TTitle`, `THref`, `TKeywords`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "StoredRecord")]
pub struct SearchResultRecord {
    #[serde(rename = "TTitle")]
    title: String,
    #[serde(rename = "THref")]
    href: String,
    #[serde(rename = "TKeywords", default)]
    keywords: String,
}

/// Unchecked shape of a record as another writer may have left it.
#[derive(Deserialize)]
struct StoredRecord {
    #[serde(rename = "TTitle")]
    title: String,
    #[serde(rename = "THref")]
    href: String,
    #[serde(rename = "TKeywords", default)]
    keywords: String,
}

impl TryFrom<StoredRecord> for SearchResultRecord {
    type Error = &'static str;

    fn try_from(raw: StoredRecord) -> Result<Self, Self::Error> {
        Self::new(raw.title, raw.href, raw.keywords).ok_or("record needs a non-empty TTitle and THref")
    }
}

impl SearchResultRecord {
    /// Returns `None` unless both `title` and `href` are non-empty.
    ///
    /// ```
    /// use tianyan_portal::SearchResultRecord;
    ///
    /// assert!(SearchResultRecord::new("Rust", "https://rust-lang.org", "").is_some());
    /// assert!(SearchResultRecord::new("", "https://rust-lang.org", "lang").is_none());
    /// ```
    pub fn new(
        title: impl Into<String>,
        href: impl Into<String>,
        keywords: impl Into<String>,
    ) -> Option<Self> {
        let title = title.into();
        let href = href.into();
        if title.is_empty() || href.is_empty() {
            return None;
        }
        Some(Self {
            title,
            href,
            keywords: keywords.into(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn keywords(&self) -> &str {
        &self.keywords
    }
}

/// Ordered, duplicate-free, capped list of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet(Vec<SearchResultRecord>);

impl ResultSet {
    /// Keep the first occurrence of each record, then the first `cap` of those.
    pub fn from_records<I>(records: I, cap: usize) -> Self
    where
        I: IntoIterator<Item = SearchResultRecord>,
    {
        let mut seen = HashSet::new();
        let kept = records
            .into_iter()
            .filter(|r| seen.insert(r.clone()))
            .take(cap)
            .collect();
        Self(kept)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchResultRecord> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[SearchResultRecord] {
        &self.0
    }

    /// `range` clamped to the records that exist; never panics.
    pub fn slice(&self, range: Range<usize>) -> &[SearchResultRecord] {
        let end = range.end.min(self.0.len());
        let start = range.start.min(end);
        &self.0[start..end]
    }
}

impl IntoIterator for ResultSet {
    type Item = SearchResultRecord;
    type IntoIter = std::vec::IntoIter<SearchResultRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a SearchResultRecord;
    type IntoIter = std::slice::Iter<'a, SearchResultRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(t: &str, h: &str, k: &str) -> SearchResultRecord {
        SearchResultRecord::new(t, h, k).unwrap()
    }

    #[test]
    fn dedup_keeps_first_seen_order() {
        let set = ResultSet::from_records(
            vec![
                rec("B", "http://b", ""),
                rec("A", "http://a", "k"),
                rec("B", "http://b", ""),
                rec("A", "http://a", "other"),
            ],
            MAX_RESULTS,
        );
        let titles: Vec<_> = set.iter().map(|r| r.title()).collect();
        assert_eq!(titles, ["B", "A", "A"]);
    }

    #[test]
    fn cap_applies_after_dedup() {
        let mut input = vec![rec("dup", "http://d", ""); 5];
        input.extend((0..10).map(|i| rec(&format!("t{i}"), "http://x", "")));
        let set = ResultSet::from_records(input, 4);
        assert_eq!(set.len(), 4);
        assert_eq!(set.as_slice()[1].title(), "t0");
    }

    #[test]
    fn slice_clamps_past_the_end() {
        let set = ResultSet::from_records(
            (0..5).map(|i| rec(&format!("t{i}"), "http://x", "")),
            MAX_RESULTS,
        );
        assert_eq!(set.slice(3..10).len(), 2);
        assert!(set.slice(10..20).is_empty());
        let (start, end) = (4, 2);
        assert!(set.slice(start..end).is_empty());
    }

    #[test]
    fn stored_record_without_title_is_refused() {
        let err = serde_json::from_str::<SearchResultRecord>(
            r#"{"TTitle": "", "THref": "http://h"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("non-empty"));

        let ok: SearchResultRecord =
            serde_json::from_str(r#"{"TTitle": "T", "THref": "http://h"}"#).unwrap();
        assert_eq!(ok.keywords(), "");
    }

    #[test]
    fn wire_names_match_results_page() {
        let json = serde_json::to_value(rec("T", "http://h", "k")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"TTitle": "T", "THref": "http://h", "TKeywords": "k"})
        );
    }
}
