//! Terminal-free UI state: key handling, commands and view switching.
//!
//! The actor owns one of these next to the terminal and acts on the
//! returned [`Effect`]s; everything else happens here.

use crate::command::{Command, parse_command};
use crate::input::InputLine;
use crate::surface::TuiSurface;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tianyan_portal::{
    Pager, PortalError, ResultCard, ResultRenderer, SessionStorage, Submitted,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Results,
}

/// Work the UI cannot do itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Submit(String),
    Open(String),
    Shutdown,
}

pub struct UiState {
    pub screen: Screen,
    pub input: InputLine,
    pub clock: String,
    pub quote: Option<String>,
    pub surface: TuiSurface,
    pub selected: usize,
    pub show_help: bool,
    pub busy: bool,
    renderer: Option<ResultRenderer>,
    storage: Arc<dyn SessionStorage>,
    pager: Pager,
    title_suffix: String,
}

impl UiState {
    pub fn new(storage: Arc<dyn SessionStorage>, pager: Pager, title_suffix: String) -> Self {
        Self {
            screen: Screen::Home,
            input: InputLine::default(),
            clock: String::new(),
            quote: None,
            surface: TuiSurface::default(),
            selected: 0,
            show_help: false,
            busy: false,
            renderer: None,
            storage,
            pager,
            title_suffix,
        }
    }

    pub fn control_count(&self) -> usize {
        self.renderer.as_ref().map_or(0, ResultRenderer::control_count)
    }

    pub fn selected_card(&self) -> Option<&ResultCard> {
        self.surface.card(self.selected)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Effect> {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            return Some(Effect::Shutdown);
        }
        if self.show_help {
            self.show_help = false;
            return None;
        }
        if self.screen == Screen::Results && self.input.is_empty() {
            return self.navigate(key.code);
        }
        self.edit(key.code)
    }

    /// Results-view keys while no command is being typed.
    fn navigate(&mut self, code: KeyCode) -> Option<Effect> {
        match code {
            KeyCode::Left => {
                if let Some(prev) = self.surface.active.checked_sub(1) {
                    self.select_page(prev);
                }
            }
            KeyCode::Right => {
                self.select_page(self.surface.active + 1);
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.surface.cards.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char(d) if d.is_ascii_digit() => {
                let index = match d {
                    '0' => 9,
                    d => (d as usize) - ('1' as usize),
                };
                self.select_page(index);
            }
            KeyCode::Enter => {
                return self.selected_card().map(|c| Effect::Open(c.href.clone()));
            }
            KeyCode::Esc => self.go_home(),
            KeyCode::Char(ch) => self.input.insert(ch),
            _ => {}
        }
        None
    }

    fn edit(&mut self, code: KeyCode) -> Option<Effect> {
        match code {
            KeyCode::Enter => {
                let line = self.input.take();
                return self.submit_line(line);
            }
            KeyCode::Left => self.input.left(),
            KeyCode::Right => self.input.right(),
            KeyCode::Home => self.input.home(),
            KeyCode::End => self.input.end(),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Esc => self.input.clear(),
            KeyCode::Char(ch) => self.input.insert(ch),
            _ => {}
        }
        None
    }

    /// A `/command` runs locally; any other line is a search, sent unchanged.
    pub fn submit_line(&mut self, line: String) -> Option<Effect> {
        if line.trim_start().starts_with('/') {
            return self.run_command(parse_command(&line));
        }
        Some(Effect::Submit(line))
    }

    pub fn run_command(&mut self, cmd: Command) -> Option<Effect> {
        match cmd {
            Command::Page(n) if self.screen == Screen::Results => {
                self.select_page(n - 1);
            }
            Command::Open(n) if self.screen == Screen::Results => {
                return self
                    .surface
                    .card(n - 1)
                    .map(|c| Effect::Open(c.href.clone()));
            }
            Command::Home => self.go_home(),
            Command::Help => self.show_help = true,
            Command::Quit => return Some(Effect::Shutdown),
            other => {
                tracing::debug!(target: "tianyan.tui", command = ?other, "command.ignored");
            }
        }
        None
    }

    /// Render the page behind control `index`; unknown indices are ignored.
    pub fn select_page(&mut self, index: usize) -> bool {
        let Some(renderer) = self.renderer.as_ref() else {
            return false;
        };
        if renderer.goto_page(&mut self.surface, index).is_none() {
            return false;
        }
        self.selected = 0;
        true
    }

    pub fn go_home(&mut self) {
        self.screen = Screen::Home;
        self.input.clear();
    }

    /// Navigate to the results view, reading what the search stored.
    pub fn show_results(&mut self) -> Result<(), PortalError> {
        let renderer =
            ResultRenderer::from_storage(self.storage.as_ref(), self.pager, self.title_suffix.clone())?;
        self.surface = TuiSurface::default();
        renderer.init(&mut self.surface);
        self.renderer = Some(renderer);
        self.selected = 0;
        self.input.clear();
        self.screen = Screen::Results;
        Ok(())
    }

    /// Failures are logged only; the view stays where it was.
    pub fn search_finished(&mut self, outcome: Result<Submitted, PortalError>) {
        self.busy = false;
        match outcome {
            Ok(submitted) => {
                tracing::info!(
                    target: "tianyan.tui",
                    target_url = %submitted.navigation.target,
                    records = submitted.state.results.len(),
                    "navigate.results"
                );
                if let Err(e) = self.show_results() {
                    tracing::error!(target: "tianyan.tui", error = %e, "results.load_failed");
                }
            }
            Err(e) => {
                tracing::warn!(target: "tianyan.tui", error = %e, "search.failed");
            }
        }
    }
}
