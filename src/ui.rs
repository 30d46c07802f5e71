use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::party::terminal_color;
use crate::state::{AppState, Panel};

fn panel_block(title: &'static str, active: bool) -> Block<'static> {
    let style = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default().borders(Borders::ALL).border_style(style).title(title)
}

pub fn draw(f: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(f.area());

    // Left: district list
    let index = state.session.candidates();
    let items: Vec<ListItem> = state.list_items
        .iter()
        .map(|name| match index.get(name).len() {
            0 => ListItem::new(name.as_str()).style(Style::default().fg(Color::DarkGray)),
            n => ListItem::new(format!("{name} ({n})")),
        })
        .collect();
    let mut list_state = ListState::default();
    list_state.select(Some(state.selected));
    let list = List::new(items)
        .block(panel_block("選挙区", state.active_panel == Panel::Left))
        .highlight_symbol(">> ")
        .highlight_style(Style::default().fg(Color::Red));
    f.render_stateful_widget(list, chunks[0], &mut list_state);

    // Center: map
    let selected = state.selected_name();
    let marker = if state.active_panel == Panel::Center { "▶" } else { " " };
    let title = format!("{marker}{} ", state.status());
    state.map().render(f, chunks[1], &title, selected);

    // Right: candidates + help
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);

    let mut lines = vec![Line::from(Span::styled(
        selected.unwrap_or("-").to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    let candidates = state.selected_candidates();
    if candidates.is_empty() {
        lines.push(Line::from("候補者なし"));
    }
    let colors = state.session.colors();
    for c in candidates {
        lines.push(Line::from(vec![
            Span::styled("■ ", Style::default().fg(terminal_color(colors.resolve(&c.party)))),
            Span::raw(format!("{} ({})", c.name, c.party)),
        ]));
    }
    let info = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("候補者"))
        .wrap(Wrap { trim: true });
    f.render_widget(info, right_chunks[0]);

    let help = Paragraph::new(AppState::HELP_TEXT)
        .block(Block::default().borders(Borders::ALL).title("操作"))
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: true });
    f.render_widget(help, right_chunks[1]);
}
