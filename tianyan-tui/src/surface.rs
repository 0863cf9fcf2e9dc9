use tianyan_portal::{PageControl, ResultCard, ResultSurface};

/// What the results view draws; filled by the renderer.
#[derive(Debug, Clone, Default)]
pub struct TuiSurface {
    pub title: String,
    pub cards: Vec<ResultCard>,
    pub controls: Vec<PageControl>,
    pub active: usize,
}

impl TuiSurface {
    pub fn card(&self, index: usize) -> Option<&ResultCard> {
        self.cards.get(index)
    }
}

impl ResultSurface for TuiSurface {
    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn clear_cards(&mut self) {
        self.cards.clear();
    }

    fn push_card(&mut self, card: ResultCard) {
        self.cards.push(card);
    }

    fn set_controls(&mut self, controls: &[PageControl]) {
        self.controls = controls.to_vec();
    }

    fn set_active_control(&mut self, index: usize) {
        self.active = index;
    }
}
