use ratatui::prelude::*;

use crate::select_box::SelectBox;
use crate::sshconfig::{SshHost, DEFAULT_PORT};

const TITLE: &str = "QSSH - SSH Host Selector";
const INFO_TEXT: &str = "↑/↓: Navigate • Enter: Connect • q: Quit";
const NO_HOSTS_TEXT: &str = "No SSH hosts found in your config.";
const QUIT_HINT: &str = "Press q to quit.";
const CURSOR_SYMBOL: &str = ">";

fn title_style() -> Style {
    Style::default()
        .fg(Color::Indexed(205))
        .add_modifier(Modifier::BOLD)
}

fn selected_style() -> Style {
    Style::default()
        .fg(Color::Indexed(39))
        .add_modifier(Modifier::BOLD)
}

fn item_style() -> Style {
    Style::default().fg(Color::Indexed(246))
}

fn info_style() -> Style {
    Style::default()
        .fg(Color::Indexed(240))
        .add_modifier(Modifier::ITALIC)
}

/// Renders the picker. Same state, same text.
pub fn render(state: &SelectBox) -> Text<'static> {
    if state.data.is_empty() {
        return Text::from(vec![
            Line::from(NO_HOSTS_TEXT),
            Line::default(),
            Line::from(QUIT_HINT),
        ]);
    }

    let mut lines = Vec::with_capacity(state.data.len() + 4);
    lines.push(Line::from(Span::styled(TITLE, title_style())));
    lines.push(Line::default());

    for (i, host) in state.data.iter().enumerate() {
        let (cursor, style) = if i == state.cursor() {
            (CURSOR_SYMBOL, selected_style())
        } else {
            (" ", item_style())
        };

        let mut spans = vec![Span::styled(format!("{cursor} {}", host.alias), style)];
        if let Some(details) = host_details(host) {
            spans.push(Span::styled(format!(" ({details})"), info_style()));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(INFO_TEXT, info_style())));
    Text::from(lines)
}

/// `user@hostname, port N`, leaving out whatever is unset or default.
pub fn host_details(host: &SshHost) -> Option<String> {
    let mut details = Vec::new();

    let target = match (host.user.is_empty(), host.hostname.is_empty()) {
        (false, _) => format!("{}@{}", host.user, host.hostname),
        (true, false) => host.hostname.clone(),
        (true, true) => String::new(),
    };
    if !target.is_empty() {
        details.push(target);
    }
    if host.port != DEFAULT_PORT {
        details.push(format!("port {}", host.port));
    }

    if details.is_empty() {
        None
    } else {
        Some(details.join(", "))
    }
}
