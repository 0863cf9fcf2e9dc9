//! Results page rendering onto an injected surface.
//!
//! The renderer owns the loaded [`SessionState`] and never looks anything up
//! globally: every call gets the surface it should draw on.

use crate::error::PortalError;
use crate::pager::{PageControl, Pager};
use crate::record::SearchResultRecord;
use crate::session::{SessionState, SessionStorage};

/// A link card: three label regions plus the target it opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub title: String,
    pub href: String,
    pub keywords: String,
}

impl From<&SearchResultRecord> for ResultCard {
    fn from(r: &SearchResultRecord) -> Self {
        Self {
            title: r.title().to_string(),
            href: r.href().to_string(),
            keywords: r.keywords().to_string(),
        }
    }
}

/// Where the results page is drawn.
pub trait ResultSurface {
    fn set_title(&mut self, title: &str);
    fn clear_cards(&mut self);
    fn push_card(&mut self, card: ResultCard);
    fn set_controls(&mut self, controls: &[PageControl]);

    /// Highlight the control for the page on screen.
    fn set_active_control(&mut self, _index: usize) {}
}

#[derive(Debug, Clone)]
pub struct ResultRenderer {
    state: SessionState,
    pager: Pager,
    title_suffix: String,
}

impl ResultRenderer {
    pub fn new(state: SessionState, pager: Pager, title_suffix: impl Into<String>) -> Self {
        Self {
            state,
            pager,
            title_suffix: title_suffix.into(),
        }
    }

    /// Load what the last search stored.
    pub fn from_storage(
        storage: &dyn SessionStorage,
        pager: Pager,
        title_suffix: impl Into<String>,
    ) -> Result<Self, PortalError> {
        Ok(Self::new(SessionState::load(storage)?, pager, title_suffix))
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn pager(&self) -> Pager {
        self.pager
    }

    pub fn title(&self) -> String {
        format!("{}{}", self.state.query, self.title_suffix)
    }

    pub fn control_count(&self) -> usize {
        self.pager.control_count(self.state.results.len())
    }

    /// Title, first page, then the controls.
    pub fn init(&self, surface: &mut dyn ResultSurface) -> usize {
        surface.set_title(&self.title());
        let first = self.pager.page_range(0);
        let shown = self.render(surface, first.start, first.end);
        surface.set_controls(&self.pager.controls(self.state.results.len()));
        surface.set_active_control(0);
        shown
    }

    /// Replace the cards with records `[start, end)`; returns how many were drawn.
    pub fn render(&self, surface: &mut dyn ResultSurface, start: usize, end: usize) -> usize {
        surface.clear_cards();
        let slice = self.state.results.slice(start..end);
        for record in slice {
            surface.push_card(ResultCard::from(record));
        }
        tracing::debug!(target: "portal.render", start, end, shown = slice.len(), "render.page");
        slice.len()
    }

    /// Render the page behind control `index`; `None` if no such control.
    pub fn goto_page(&self, surface: &mut dyn ResultSurface, index: usize) -> Option<usize> {
        if index >= self.control_count() {
            return None;
        }
        let range = self.pager.page_range(index);
        let shown = self.render(surface, range.start, range.end);
        surface.set_active_control(index);
        Some(shown)
    }
}
