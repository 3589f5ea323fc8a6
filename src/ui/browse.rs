use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
};

use crate::browse::{BrowseState, Phase};
use crate::catalog::AnimeSummary;

use super::widgets::{titled_block, trim_synopsis, truncate_title};

const SYNOPSIS_WORD_LIMIT: usize = 75;

pub fn render_browse_view(
    frame: &mut Frame,
    area: Rect,
    input: &str,
    browse: &BrowseState,
    list_state: &mut ListState,
    accent: Color,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    render_search_input(frame, chunks[0], input, browse.is_loading(), accent);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[1]);

    render_results(frame, body[0], browse, list_state, accent);
    render_summary_panel(frame, body[1], browse, list_state, accent);
}

fn render_search_input(frame: &mut Frame, area: Rect, input: &str, is_loading: bool, accent: Color) {
    let title = if is_loading {
        "Search anime (loading...)"
    } else {
        "Search anime"
    };

    let paragraph = Paragraph::new(input)
        .block(titled_block(title, accent))
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);

    frame.set_cursor_position((area.x + input.chars().count() as u16 + 1, area.y + 1));
}

fn render_results(
    frame: &mut Frame,
    area: Rect,
    browse: &BrowseState,
    list_state: &mut ListState,
    accent: Color,
) {
    if browse.items.is_empty() {
        let (text, style) = empty_state(browse);
        let empty = Paragraph::new(text)
            .block(titled_block("Results", accent))
            .style(style)
            .wrap(Wrap { trim: true });
        frame.render_widget(empty, area);
        return;
    }

    let title_width = area.width.saturating_sub(26) as usize;

    let items: Vec<ListItem> = browse
        .items
        .iter()
        .map(|anime| {
            let score = anime
                .score
                .map(|s| format!("{:.1}", s))
                .unwrap_or_else(|| "-.-".to_string());
            let media_type = anime.media_type.as_deref().unwrap_or("?");

            let line = Line::from(vec![
                Span::styled(format!("{:>4}", score), Style::default().fg(Color::Yellow)),
                Span::raw(" │ "),
                Span::styled(format!("{:<5}", media_type), Style::default().fg(Color::Cyan)),
                Span::raw(" │ "),
                Span::styled(
                    truncate_title(&anime.title, title_width),
                    Style::default().fg(Color::White),
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(titled_block("Results", accent))
        .highlight_style(
            Style::default()
                .bg(accent)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, list_state);
}

// Three distinct empty presentations: a failed lineage, a non-empty query
// that genuinely returned nothing, and nothing searched yet.
fn empty_state(browse: &BrowseState) -> (String, Style) {
    match browse.phase() {
        Phase::Failed => (
            format!(
                "Search failed: {}\n\nEdit the query to try again.",
                browse.error.as_deref().unwrap_or("unknown error")
            ),
            Style::default().fg(Color::Red),
        ),
        Phase::Exhausted if !browse.query.is_empty() => (
            "No results found. Try searching for something else!".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
        Phase::Loading => (
            "Loading...".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
        _ => (
            "Type to search the catalog.".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    }
}

fn render_summary_panel(
    frame: &mut Frame,
    area: Rect,
    browse: &BrowseState,
    list_state: &ListState,
    accent: Color,
) {
    let selected: Option<&AnimeSummary> =
        list_state.selected().and_then(|i| browse.items.get(i));

    let Some(anime) = selected else {
        let placeholder = Paragraph::new("")
            .block(titled_block("Summary", accent));
        frame.render_widget(placeholder, area);
        return;
    };

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            anime.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "⭐ {} | {} Episodes",
                anime
                    .score
                    .map(|s| format!("{:.1}", s))
                    .unwrap_or_else(|| "N/A".to_string()),
                anime
                    .episodes
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let mut meta: Vec<String> = Vec::new();
    if let Some(t) = &anime.media_type {
        meta.push(t.clone());
    }
    if let Some(d) = &anime.duration {
        meta.push(d.clone());
    }
    if let Some(s) = &anime.season {
        meta.push(s.clone());
    }
    if !meta.is_empty() {
        lines.push(Line::from(Span::styled(
            meta.join(" • "),
            Style::default().fg(Color::Cyan),
        )));
    }

    if let Some(synopsis) = &anime.synopsis {
        lines.push(Line::from(""));
        lines.push(Line::from(trim_synopsis(synopsis, SYNOPSIS_WORD_LIMIT)));
    }

    if let Some(error) = &browse.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Search halted: {}", error),
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(titled_block("Summary", accent))
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}
