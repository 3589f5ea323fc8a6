use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::catalog::AnimeDetail;

use super::widgets::titled_block;

pub fn render_detail_view(
    frame: &mut Frame,
    area: Rect,
    detail: Option<&AnimeDetail>,
    is_loading: bool,
    error: Option<&str>,
    scroll: u16,
    accent: Color,
) {
    // Errors are local to this view; a previously loaded record stays up
    // behind the message until the next successful fetch overwrites it.
    let mut lines: Vec<Line> = Vec::new();

    if let Some(error) = error {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::from(""));
    } else if is_loading {
        lines.push(Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));
    }

    match detail {
        Some(anime) => lines.extend(detail_lines(anime)),
        None if !is_loading && error.is_none() => {
            lines.push(Line::from(Span::styled(
                "Anime not found.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        None => {}
    }

    let title = detail.map(|a| a.title.as_str()).unwrap_or("Detail");
    let paragraph = Paragraph::new(lines)
        .block(titled_block(title, accent))
        .wrap(Wrap { trim: true })
        .scroll((scroll, 0));

    frame.render_widget(paragraph, area);
}

fn detail_lines(anime: &AnimeDetail) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        anime.title.clone(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ))];

    if let Some(english) = &anime.title_english {
        lines.push(dim_line(format!("English: {}", english)));
    }
    if let Some(japanese) = &anime.title_japanese {
        lines.push(dim_line(format!("Japanese: {}", japanese)));
    }
    if !anime.title_synonyms.is_empty() {
        lines.push(dim_line(format!(
            "Synonyms: {}",
            anime.title_synonyms.join(", ")
        )));
    }

    let mut info: Vec<String> = Vec::new();
    if let Some(t) = &anime.media_type {
        info.push(t.clone());
    }
    if let Some(d) = &anime.duration {
        info.push(d.clone());
    }
    if let Some(season) = &anime.season {
        match anime.year {
            Some(year) => info.push(format!("{} {}", season, year)),
            None => info.push(season.clone()),
        }
    }
    if let Some(rating) = &anime.rating {
        info.push(rating.clone());
    }
    if !info.is_empty() {
        lines.push(Line::from(""));
        lines.push(tag_line(info.join(" • "), Color::Cyan));
    }

    let mut stats: Vec<String> = Vec::new();
    if let Some(episodes) = anime.episodes {
        stats.push(format!("{} Episodes", episodes));
    }
    if let Some(score) = anime.score {
        stats.push(format!("⭐ {:.2}", score));
    }
    if let Some(rank) = anime.rank {
        stats.push(format!("Rank: {}", rank));
    }
    if let Some(popularity) = anime.popularity {
        stats.push(format!("Popularity: {}", popularity));
    }
    if let Some(favorites) = anime.favorites {
        stats.push(format!("Favorites: {}", favorites));
    }
    if !stats.is_empty() {
        lines.push(tag_line(stats.join(" • "), Color::Yellow));
    }

    for (label, names) in [
        ("Genres", &anime.genres),
        ("Themes", &anime.themes),
        ("Studios", &anime.studios),
        ("Producers", &anime.producers),
        ("Licensors", &anime.licensors),
    ] {
        if !names.is_empty() {
            lines.push(tag_line(
                format!("{}: {}", label, names.join(", ")),
                Color::Green,
            ));
        }
    }

    if let Some(synopsis) = &anime.synopsis {
        lines.push(Line::from(""));
        for paragraph in synopsis.lines() {
            lines.push(Line::from(paragraph.to_string()));
        }
    }

    if let Some(background) = &anime.background {
        lines.push(Line::from(""));
        lines.push(dim_line(background.clone()));
    }

    if let Some(trailer) = &anime.trailer_url {
        lines.push(Line::from(""));
        lines.push(tag_line(format!("Trailer: {}", trailer), Color::Blue));
    }

    lines
}

fn dim_line(text: String) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

fn tag_line(text: String, color: Color) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(color)))
}
