use crate::state::{Screen, UiState};
use crate::styles;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use textwrap::wrap;

const BRAND: &str = " 天眼搜索 ";

const HELP: &[(&str, &str)] = &[
    ("Enter", "search (home) / open selected link (results)"),
    ("← →  1-9 0", "choose a page"),
    ("↑ ↓", "move between results"),
    ("Esc", "back to the search page"),
    ("/page N", "show page N"),
    ("/open N", "open the N-th result on this page"),
    ("/home", "back to the search page"),
    ("/quit", "exit (also Ctrl-C, Ctrl-Q)"),
];

pub fn render(frame: &mut Frame, ui: &UiState) {
    match ui.screen {
        Screen::Home => render_home(frame, ui),
        Screen::Results => render_results(frame, ui),
    }
    if ui.show_help {
        render_help(frame);
    }
}

fn render_home(frame: &mut Frame, ui: &UiState) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(Span::styled(BRAND, styles::header())),
        layout[0],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(ui.clock.clone(), styles::clock())).alignment(Alignment::Center),
        layout[2],
    );

    if let Some(quote) = ui.quote.as_deref() {
        let width = layout[4].width.saturating_sub(4).max(1) as usize;
        let lines: Vec<Line> = wrap(quote, width)
            .into_iter()
            .map(|seg| Line::from(Span::styled(seg.into_owned(), styles::quote())))
            .collect();
        frame.render_widget(
            Paragraph::new(Text::from(lines)).alignment(Alignment::Center),
            layout[4],
        );
    }

    let input_area = centered(layout[5], 60);
    let title = if ui.busy { " Searching… " } else { " Search " };
    render_input(frame, ui, input_area, title);

    frame.render_widget(
        Paragraph::new(Span::styled(
            " Enter: search • /help • Ctrl-C: quit",
            styles::dim(),
        )),
        layout[7],
    );
}

fn render_results(frame: &mut Frame, ui: &UiState) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(Span::styled(format!(" {}", ui.surface.title), styles::header()))
            .wrap(Wrap { trim: true }),
        layout[0],
    );

    let items: Vec<ListItem> = ui
        .surface
        .cards
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let selected = i == ui.selected;
            ListItem::new(Text::from(vec![
                Line::from(Span::styled(card.title.clone(), styles::card_title(selected))),
                Line::from(Span::styled(format!("  {}", card.href), styles::card_href())),
                Line::from(Span::styled(format!("  {}", card.keywords), styles::card_keywords())),
            ]))
        })
        .collect();
    let block = Block::default().borders(Borders::ALL);
    if items.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("(no results)", styles::dim())).block(block),
            layout[1],
        );
    } else {
        let mut list_state = ListState::default().with_selected(Some(ui.selected));
        frame.render_stateful_widget(List::new(items).block(block), layout[1], &mut list_state);
    }

    let mut controls = vec![Span::raw(" ")];
    for control in &ui.surface.controls {
        let active = control.index == ui.surface.active;
        controls.push(Span::styled(
            format!(" {} ", control.label),
            styles::control(active),
        ));
        controls.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(controls)), layout[2]);

    render_input(frame, ui, layout[3], " Command (Esc: home) ");
}

fn render_input(frame: &mut Frame, ui: &UiState, area: Rect, title: &str) {
    let input = Paragraph::new(ui.input.as_str().to_string())
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(Clear, area);
    frame.render_widget(input, area);

    if !ui.show_help {
        frame.set_cursor_position(Position {
            x: area.x + 1 + ui.input.caret_col(),
            y: area.y + 1,
        });
    }
}

fn render_help(frame: &mut Frame) {
    let area = centered(frame.area(), 64);
    let height = (HELP.len() as u16 + 2).min(frame.area().height);
    let area = Rect {
        y: frame.area().height.saturating_sub(height) / 2,
        height,
        ..area
    };
    let lines: Vec<Line> = HELP
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!(" {keys:<12}"), styles::label()),
                Span::styled(*what, styles::value()),
            ])
        })
        .collect();
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .block(Block::default().borders(Borders::ALL).title(" Help ")),
        area,
    );
}

/// Horizontally centred slice of `area`, at most `width` columns.
fn centered(area: Rect, width: u16) -> Rect {
    let w = width.min(area.width);
    Rect {
        x: area.x + (area.width - w) / 2,
        width: w,
        ..area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::UiState;
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
    use std::sync::Arc;
    use tianyan_portal::{MemorySessionStorage, Pager, ResultSet, SearchResultRecord, SessionState};

    fn text_of(buf: &Buffer) -> String {
        let area = buf.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn draw(ui: &UiState) -> String {
        let mut term = Terminal::new(TestBackend::new(80, 24)).unwrap();
        term.draw(|f| render(f, ui)).unwrap();
        text_of(term.backend().buffer())
    }

    fn ui_with_results(n: usize) -> UiState {
        let storage = MemorySessionStorage::new();
        let records = (0..n).filter_map(|i| {
            SearchResultRecord::new(format!("Title {i}"), format!("http://h/{i}"), format!("kw{i}"))
        });
        SessionState::new("tokio", ResultSet::from_records(records, 200))
            .save(&storage)
            .unwrap();
        let mut ui = UiState::new(Arc::new(storage), Pager::default(), " - search".into());
        ui.show_results().unwrap();
        ui
    }

    #[test]
    fn home_shows_clock_quote_and_input() {
        let storage = MemorySessionStorage::new();
        let mut ui = UiState::new(Arc::new(storage), Pager::default(), String::new());
        ui.clock = "09:05".into();
        ui.quote = Some("Stay hungry".into());
        ui.input.insert('r');

        let text = draw(&ui);
        assert!(text.contains("09:05"));
        assert!(text.contains("Stay hungry"));
        assert!(text.contains("Search"));
    }

    #[test]
    fn results_show_title_cards_and_controls() {
        let ui = ui_with_results(23);
        let text = draw(&ui);
        assert!(text.contains("tokio - search"));
        assert!(text.contains("Title 0"));
        assert!(text.contains("http://h/0"));
        assert!(text.contains("kw0"));
        let footer = text.lines().nth(20).unwrap_or_default();
        assert_eq!(footer.trim_end(), "  1   2   3");
    }

    #[test]
    fn help_overlay_lists_commands() {
        let mut ui = ui_with_results(1);
        ui.show_help = true;
        let text = draw(&ui);
        assert!(text.contains("/page N"));
        assert!(text.contains("/open N"));
    }

    #[test]
    fn empty_results_say_so() {
        let text = draw(&ui_with_results(0));
        assert!(text.contains("(no results)"));
    }
}
