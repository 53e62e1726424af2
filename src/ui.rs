use std::ops::Range;

use ratatui::layout::{Constraint, Direction, Flex, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap};

use football_dashboard::api::InsightKind;
use football_dashboard::selection::{SelectionPhase, StatsTab};
use football_dashboard::state::{AppState, Screen};
use football_dashboard::view::{self, Body, ListPanel, TeamCard};

const CARD_HEIGHT: u16 = 5;

/// Draws one frame and returns the number of team card columns in use.
pub fn draw(frame: &mut Frame, state: &AppState) -> usize {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let mut columns = 1;
    match state.screen {
        Screen::Dashboard => render_dashboard(frame, chunks[1], state),
        Screen::Competitions => render_competitions(frame, chunks[1], state),
        Screen::Teams => columns = render_teams(frame, chunks[1], state),
        Screen::Insights => render_insights(frame, chunks[1], state),
    }

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if state.screen == Screen::Teams && state.teams.selection.is_open() {
        render_statistics_overlay(frame, frame.size(), state);
    }
    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
    columns
}

fn header_text(state: &AppState) -> String {
    let line1 = format!("  .-.  FOOTBALL ANALYTICS | {}", state.screen.title());
    let line2 = " ( o )".to_string();
    let line3 = "  '-'".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Teams if state.teams.searching => {
            "Type to filter | Backspace Delete | Enter/Esc Done".to_string()
        }
        Screen::Teams if state.teams.selection.is_open() => {
            "Tab/←/→ Switch tab | b/Esc Close | r Reload | ? Help | q Quit".to_string()
        }
        Screen::Teams => {
            "1-4 Screens | / Search | h/j/k/l Move | Enter Statistics | r Reload | ? Help | q Quit"
                .to_string()
        }
        Screen::Insights => {
            "1-4 Screens | Tab/←/→ Dataset | j/k Scroll | r Reload | ? Help | q Quit".to_string()
        }
        Screen::Dashboard | Screen::Competitions => {
            "1-4 Screens | j/k Scroll | r Reload | ? Help | q Quit".to_string()
        }
    }
}

fn render_dashboard(frame: &mut Frame, area: Rect, state: &AppState) {
    let panels = match view::dashboard_view(state.dashboard.state()) {
        Body::Ready(panels) => panels,
        other => return render_status(frame, area, &other, "Loading dashboard..."),
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    for (row_idx, row_area) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(*row_area);
        for (col_idx, cell_area) in cols.iter().enumerate() {
            if let Some(panel) = panels.get(row_idx * 2 + col_idx) {
                render_list_panel(frame, *cell_area, panel, state.scroll);
            }
        }
    }
}

fn render_list_panel(frame: &mut Frame, area: Rect, panel: &ListPanel, scroll: usize) {
    let title = format!("{} ({})", panel.title, panel.items.len());
    let text = if panel.items.is_empty() {
        Text::styled("Nothing here yet", Style::default().fg(Color::DarkGray))
    } else {
        let max_start = panel.items.len().saturating_sub(1);
        Text::from(
            panel
                .items
                .iter()
                .skip(scroll.min(max_start))
                .map(|item| Line::from(item.cells.join(" ")))
                .collect::<Vec<_>>(),
        )
    };
    let paragraph = Paragraph::new(text).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_competitions(frame: &mut Frame, area: Rect, state: &AppState) {
    match view::competitions_view(state.competitions.state()) {
        Body::Ready(table) => render_table(frame, area, &table, state.scroll),
        other => render_status(frame, area, &other, "Loading competitions..."),
    }
}

fn render_teams(frame: &mut Frame, area: Rect, state: &AppState) -> usize {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let teams = &state.teams;
    let search_style = if teams.searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let query = if teams.query.is_empty() && !teams.searching {
        Span::styled("Search teams...", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(format!("{}{}", teams.query, if teams.searching { "_" } else { "" }))
    };
    let title = format!("Teams ({})", teams.teams().len());
    let search = Paragraph::new(Line::from(vec![Span::raw("/ "), query]))
        .style(search_style)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(search, sections[0]);

    let grid_area = sections[1];
    let columns = team_columns(grid_area.width);
    match view::teams_view(teams.binder.state(), &teams.query) {
        Body::Ready(grid) => render_team_grid(frame, grid_area, &grid.cards, teams.cursor, columns),
        other => render_status(frame, grid_area, &other, "Loading teams..."),
    }
    columns
}

/// Card columns for a grid of the given width (1 on narrow terminals, up to 4).
pub fn team_columns(width: u16) -> usize {
    match width {
        0..=59 => 1,
        60..=99 => 2,
        100..=139 => 3,
        _ => 4,
    }
}

fn render_team_grid(
    frame: &mut Frame,
    area: Rect,
    cards: &[TeamCard],
    cursor: usize,
    columns: usize,
) {
    if area.height < CARD_HEIGHT {
        let empty = Paragraph::new("Team grid needs more height")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let total_rows = cards.len().div_ceil(columns);
    let visible_rows = (area.height / CARD_HEIGHT) as usize;
    let window = card_row_window(cursor / columns, total_rows, visible_rows);
    let constraints = vec![Constraint::Ratio(1, columns as u32); columns];

    for (i, row) in window.enumerate() {
        let row_area = Rect {
            x: area.x,
            y: area.y + (i as u16) * CARD_HEIGHT,
            width: area.width,
            height: CARD_HEIGHT,
        };
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints.clone())
            .split(row_area);

        for (col, card_area) in cols.iter().enumerate() {
            let idx = row * columns + col;
            let Some(card) = cards.get(idx) else {
                break;
            };
            render_team_card(frame, *card_area, card, idx == cursor);
        }
    }
}

fn render_team_card(frame: &mut Frame, area: Rect, card: &TeamCard, selected: bool) {
    let border_style = if selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let lines = vec![
        Line::styled(card.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Line::styled(card.venue.clone(), Style::default().fg(Color::Gray)),
        Line::styled(card.crest.clone(), Style::default().fg(Color::DarkGray)),
    ];
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(paragraph, area);
}

fn render_insights(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let selected = InsightKind::ALL
        .iter()
        .position(|kind| *kind == state.insight)
        .unwrap_or(0);
    let tabs = Tabs::new(InsightKind::ALL.iter().map(|kind| kind.title()))
        .select(selected)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .block(Block::default().title("Datasets").borders(Borders::ALL));
    frame.render_widget(tabs, sections[0]);

    match view::insight_view(state.insights.state(), state.insight) {
        Body::Ready(table) => render_table(frame, sections[1], &table, state.scroll),
        other => render_status(frame, sections[1], &other, "Loading records..."),
    }
}

fn render_statistics_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let overlay = popup_area(area, 80, 70);
    frame.render_widget(Clear, overlay);

    let selection = &state.teams.selection;
    let title = selection
        .selected()
        .map(|team| format!("{} Statistics", team.name))
        .unwrap_or_else(|| "Statistics".to_string());
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    match selection.phase() {
        SelectionPhase::Closed => {}
        SelectionPhase::Loading(_) => {
            frame.render_widget(Paragraph::new("Loading statistics..."), inner);
        }
        SelectionPhase::Failed(_, message) => {
            let error = Paragraph::new(message.to_string())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true });
            frame.render_widget(error, inner);
        }
        SelectionPhase::Ready(_, stats) => {
            let sections = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(2), Constraint::Min(1)])
                .split(inner);
            let tabs = Tabs::new(StatsTab::ALL.iter().map(|tab| tab.title()))
                .select(selection.tab().index())
                .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                .block(Block::default().borders(Borders::BOTTOM));
            frame.render_widget(tabs, sections[0]);

            let table = view::statistics_view(stats, selection.tab());
            render_table(frame, sections[1], &table, 0);
        }
    }
}

fn render_table(frame: &mut Frame, area: Rect, table: &view::Table, scroll: usize) {
    let width = table
        .header
        .len()
        .max(table.rows.first().map(|row| row.cells.len()).unwrap_or(0));
    let block = Block::default().title(table.title.clone()).borders(Borders::ALL);
    if width == 0 || table.rows.is_empty() {
        let empty = Paragraph::new("No records")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(table.header.iter().map(|h| Cell::from(h.as_str())))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let skip = scroll.min(table.rows.len().saturating_sub(1));
    let rows = table
        .rows
        .iter()
        .skip(skip)
        .map(|row| Row::new(row.cells.iter().map(|c| Cell::from(c.as_str()))));
    let widths = vec![Constraint::Ratio(1, width as u32); width];
    let widget = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(widget, area);
}

fn render_status<T>(frame: &mut Frame, area: Rect, body: &Body<T>, loading: &str) {
    let paragraph = match body {
        Body::Loading => Paragraph::new(loading.to_string()).style(Style::default().fg(Color::Cyan)),
        Body::Failed(message) => Paragraph::new(format!("! {message}"))
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true }),
        Body::Empty(message) => {
            Paragraph::new(message.to_string()).style(Style::default().fg(Color::DarkGray))
        }
        Body::Ready(_) => return,
    };
    frame.render_widget(paragraph.block(Block::default().borders(Borders::ALL)), area);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

/// Window of card rows that fits `fit` rows and keeps `cursor_row` in view,
/// centred where the grid allows.
fn card_row_window(cursor_row: usize, total_rows: usize, fit: usize) -> Range<usize> {
    let len = fit.min(total_rows);
    let first = cursor_row.saturating_sub(len / 2).min(total_rows - len);
    first..first + len
}

const HELP_SECTIONS: [(&str, &[(&str, &str)]); 3] = [
    (
        "Global",
        &[
            ("1-4", "Dashboard / Competitions / Teams / Insights"),
            ("j/k", "Scroll tables and lists"),
            ("r", "Reload current view"),
            ("?", "Toggle help"),
            ("q", "Quit"),
        ],
    ),
    (
        "Teams",
        &[
            ("/", "Search by name"),
            ("h/j/k/l", "Move between cards"),
            ("Enter / d", "Team statistics"),
            ("Tab", "Next statistics tab"),
            ("b / Esc", "Close statistics"),
        ],
    ),
    ("Insights", &[("Tab / ←/→", "Switch dataset")]),
];

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup = popup_area(area, 60, 60);
    frame.render_widget(Clear, popup);

    let mut lines = vec![Line::from(Span::styled(
        "Football Analytics",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (section, bindings) in HELP_SECTIONS {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            section,
            Style::default().fg(Color::Yellow),
        )));
        lines.extend(bindings.iter().map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("  {keys:<12}"), Style::default().fg(Color::Cyan)),
                Span::raw(*action),
            ])
        }));
    }

    let help = Paragraph::new(lines).block(Block::default().title("Help").borders(Borders::ALL));
    frame.render_widget(help, popup);
}

/// `width_pct` x `height_pct` of `area`, centred in it.
fn popup_area(area: Rect, width_pct: u16, height_pct: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(height_pct)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(width_pct)])
        .flex(Flex::Center)
        .areas(row);
    popup
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_window_follows_cursor() {
        assert_eq!(card_row_window(0, 0, 3), 0..0);
        assert_eq!(card_row_window(1, 2, 5), 0..2);
        assert_eq!(card_row_window(0, 10, 3), 0..3);
        assert_eq!(card_row_window(5, 10, 3), 4..7);
        assert_eq!(card_row_window(9, 10, 3), 7..10);
    }

    #[test]
    fn popup_is_centred() {
        let area = Rect::new(0, 0, 100, 50);
        assert_eq!(popup_area(area, 60, 60), Rect::new(20, 10, 60, 30));
    }
}
