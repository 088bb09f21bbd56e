//! Conversation transcript rendering

use crate::transcript::{Message, Role, Transcript};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Read-only projection of the transcript into terminal lines. Holds no
/// state of its own; the transcript is the single source of truth.
pub struct TranscriptView<'a> {
    transcript: &'a Transcript,
}

impl<'a> TranscriptView<'a> {
    pub fn new(transcript: &'a Transcript) -> Self {
        Self { transcript }
    }
}

impl Widget for TranscriptView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("💬 Conversation");

        let inner_area = block.inner(area);
        block.render(area, buf);

        if self.transcript.is_empty() {
            let welcome_lines = vec![
                Line::from(vec![Span::styled(
                    "Welcome to askr!",
                    Style::default().fg(Color::Green),
                )]),
                Line::from(vec![Span::raw("")]),
                Line::from(vec![Span::styled(
                    "Ask a question below to get started.",
                    Style::default().fg(Color::Gray),
                )]),
                Line::from(vec![Span::raw("")]),
                Line::from(vec![Span::styled(
                    "Enter to send. Type / for commands.",
                    Style::default().fg(Color::DarkGray),
                )]),
            ];

            for (i, line) in welcome_lines.iter().enumerate() {
                if i < inner_area.height as usize {
                    buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
                }
            }
        } else {
            let mut all_lines: Vec<Line> = Vec::new();
            for message in self.transcript.messages() {
                let mut lines = render_message(message, inner_area.width);
                all_lines.append(&mut lines);
                // spacing between messages
                all_lines.push(Line::from(vec![Span::raw("")]))
            }

            // Anchor the view to the latest message.
            let height = inner_area.height as usize;
            let total = all_lines.len();
            let start = total.saturating_sub(height);
            let visible = &all_lines[start..];

            for (i, line) in visible.iter().enumerate() {
                buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
            }
        }
    }
}

/// Render a single message into lines
fn render_message(message: &Message, width: u16) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let avatar = match message.role {
        Role::User => "👩",
        Role::Bot => "🤖",
    };

    let timestamp = message.timestamp.format("%H:%M:%S").to_string();
    let header = format!("{} {} {}", avatar, timestamp, "─".repeat(20));

    lines.push(Line::from(vec![Span::styled(
        header,
        Style::default().fg(Color::DarkGray),
    )]));

    let style = if message.is_pending() {
        Style::default().fg(Color::DarkGray)
    } else {
        match message.role {
            Role::User => Style::default().fg(Color::Blue),
            Role::Bot => Style::default().fg(Color::Green),
        }
    };

    let content = sanitize(&message.text);
    for content_line in wrap_text(&content, width.saturating_sub(2) as usize) {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(content_line, style),
        ]));
    }

    lines
}

/// Strip control characters at the render boundary. Newlines survive as
/// line breaks; everything else that could drive the terminal (escape
/// sequences, carriage returns, bells) is dropped. The model keeps the
/// literal text.
pub(crate) fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| *c == '\n' || !c.is_control())
        .collect()
}

/// Wrap text to fit within the given width
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.len() + word.len() + 1 <= width {
            if !current_line.is_empty() {
                current_line.push(' ');
            }
            current_line.push_str(word);
        } else {
            if !current_line.is_empty() {
                lines.push(current_line);
                current_line = String::new();
            }
            current_line.push_str(word);
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_terminal_escapes() {
        assert_eq!(sanitize("a\x1b[2Jb"), "a[2Jb");
        assert_eq!(sanitize("ding\x07"), "ding");
        assert_eq!(sanitize("one\r\ntwo"), "one\ntwo");
    }

    #[test]
    fn sanitize_keeps_plain_text_untouched() {
        assert_eq!(sanitize("Hello, world! 🤖"), "Hello, world! 🤖");
    }

    #[test]
    fn wrap_text_breaks_long_lines_on_words() {
        let wrapped = wrap_text("the quick brown fox jumps", 10);
        assert_eq!(wrapped, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn wrap_text_handles_empty_input() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }
}
