use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Create a styled block with a title
pub fn titled_block(title: &str, accent: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(format!(" {} ", title))
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
}

/// Create a help bar at the bottom
pub fn help_bar<'a>(hints: &'a [(&'a str, &'a str)]) -> Paragraph<'a> {
    let spans: Vec<Span> = hints
        .iter()
        .enumerate()
        .flat_map(|(i, (key, action))| {
            let mut v = vec![
                Span::styled(*key, Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" "),
                Span::styled(*action, Style::default().fg(Color::DarkGray)),
            ];
            if i < hints.len() - 1 {
                v.push(Span::raw("  "));
            }
            v
        })
        .collect();

    Paragraph::new(Line::from(spans))
}

/// Parse accent color from config string
pub fn parse_accent_color(color: &str) -> Color {
    match color.to_lowercase().as_str() {
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" => Color::Gray,
        _ => Color::Magenta, // default
    }
}

/// Cut a synopsis down to at most `max_words` words for the summary panel
pub fn trim_synopsis(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return text.to_string();
    }
    format!("{}...", words[..max_words].join(" "))
}

/// Truncate a title to fit a column, char-boundary safe
pub fn truncate_title(title: &str, max_width: usize) -> String {
    if title.is_empty() {
        return "Unknown".to_string();
    }

    if max_width <= 3 {
        return "...".to_string();
    }

    if title.chars().count() <= max_width {
        return title.to_string();
    }

    let prefix: String = title.chars().take(max_width - 3).collect();
    format!("{}...", prefix.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_synopsis_untouched() {
        assert_eq!(trim_synopsis("a short one", 75), "a short one");
    }

    #[test]
    fn long_synopsis_cut_at_word_count() {
        let text = "one two three four five";
        assert_eq!(trim_synopsis(text, 3), "one two three...");
    }

    #[test]
    fn truncate_handles_multibyte_titles() {
        assert_eq!(truncate_title("ナルト疾風伝", 5), "ナル...");
        assert_eq!(truncate_title("Naruto", 10), "Naruto");
        assert_eq!(truncate_title("", 10), "Unknown");
    }
}
