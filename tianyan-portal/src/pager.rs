use std::ops::Range;

/// One footer control; `label` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControl {
    pub index: usize,
    pub label: String,
    pub range: Range<usize>,
}

/// Fixed-size client-side paging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    max_controls: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(10, 10)
    }
}

impl Pager {
    /// `page_size` is clamped to at least one.
    pub fn new(page_size: usize, max_controls: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            max_controls,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn max_controls(&self) -> usize {
        self.max_controls
    }

    /// `min(ceil(len / page_size), max_controls)`.
    ///
    /// ```
    /// use tianyan_portal::Pager;
    ///
    /// let pager = Pager::default();
    /// assert_eq!(pager.control_count(0), 0);
    /// assert_eq!(pager.control_count(95), 10);
    /// assert_eq!(pager.control_count(11), 2);
    /// assert_eq!(pager.control_count(200), 10);
    /// ```
    pub fn control_count(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).min(self.max_controls)
    }

    /// Record range for control `index`; not clamped to any length.
    pub fn page_range(&self, index: usize) -> Range<usize> {
        let start = index.saturating_mul(self.page_size);
        start..start.saturating_add(self.page_size)
    }

    pub fn controls(&self, len: usize) -> Vec<PageControl> {
        (0..self.control_count(len))
            .map(|index| PageControl {
                index,
                label: (index + 1).to_string(),
                range: self.page_range(index),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_last_page_gets_a_control() {
        let pager = Pager::default();
        assert_eq!(pager.control_count(1), 1);
        assert_eq!(pager.control_count(10), 1);
        assert_eq!(pager.control_count(91), 10);
    }

    #[test]
    fn controls_are_labelled_from_one() {
        let controls = Pager::default().controls(25);
        let labels: Vec<_> = controls.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["1", "2", "3"]);
        assert_eq!(controls[2].range, 20..30);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let pager = Pager::new(0, 3);
        assert_eq!(pager.page_size(), 1);
        assert_eq!(pager.control_count(7), 3);
    }

    #[test]
    fn huge_index_does_not_overflow() {
        let range = Pager::default().page_range(usize::MAX);
        assert_eq!(range.start, usize::MAX);
        assert!(range.is_empty());
    }
}
