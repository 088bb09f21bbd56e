use crate::ui::conversation::commands::{command_entries, CommandEntry, SlashCommand};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use std::cell::{Cell, RefCell};

/// Result returned when the user interacts with the composer
#[derive(Debug, PartialEq)]
pub enum ConversationResult {
    Submitted(String),
    Command(SlashCommand),
    None,
}

/// State for the text area within the composer.
///
/// `cursor_position` is a byte offset and always sits on a character
/// boundary.
#[derive(Debug, Clone, Default)]
pub struct TextAreaState {
    pub content: String,
    pub cursor_position: usize,
}

/// Composer for user input
#[derive(Clone)]
pub struct ConversationComposer {
    state: RefCell<TextAreaState>,
    placeholder: String,
    has_focus: bool,
    command_entries: Vec<CommandEntry>,
    filtered_commands: RefCell<Vec<CommandEntry>>,
    show_command_palette: Cell<bool>,
    selected_command: Cell<Option<usize>>,
}

impl ConversationComposer {
    pub fn new(placeholder: String) -> Self {
        Self {
            state: RefCell::new(TextAreaState::default()),
            placeholder,
            has_focus: false,
            command_entries: command_entries(),
            filtered_commands: RefCell::new(Vec::new()),
            show_command_palette: Cell::new(false),
            selected_command: Cell::new(None),
        }
    }

    /// Handle key input
    pub fn handle_key(&self, key: KeyEvent) -> ConversationResult {
        if key.kind != KeyEventKind::Press {
            return ConversationResult::None;
        }

        let mut state = self.state.borrow_mut();

        match key.code {
            KeyCode::Enter => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.insert_char(&mut state, '\n');
                } else if self.show_command_palette.get() {
                    if self.apply_selected_command(&mut state) {
                        return ConversationResult::None;
                    }
                } else if !state.content.trim().is_empty() {
                    let content = state.content.clone();
                    state.content.clear();
                    state.cursor_position = 0;
                    self.close_command_palette();
                    drop(state);
                    if let Some(command) =
                        crate::ui::conversation::commands::parse_slash_command(&content)
                    {
                        return ConversationResult::Command(command);
                    } else {
                        return ConversationResult::Submitted(content);
                    }
                }
            }
            KeyCode::Up => {
                if self.show_command_palette.get() {
                    self.move_command_selection(-1);
                    return ConversationResult::None;
                }
            }
            KeyCode::Down => {
                if self.show_command_palette.get() {
                    self.move_command_selection(1);
                    return ConversationResult::None;
                }
            }
            KeyCode::Esc => {
                if self.show_command_palette.get() {
                    self.close_command_palette();
                    return ConversationResult::None;
                }
            }
            KeyCode::Tab => {
                if self.show_command_palette.get() {
                    if self.apply_selected_command(&mut state) {
                        return ConversationResult::None;
                    }
                }
            }
            KeyCode::Char(c) => {
                if c == '/' && state.content.is_empty() {
                    self.insert_char(&mut state, c);
                    self.open_command_palette(&state);
                    return ConversationResult::None;
                }

                self.insert_char(&mut state, c);

                if self.show_command_palette.get() {
                    if state.content.starts_with('/') {
                        if c.is_whitespace() {
                            self.close_command_palette();
                        } else {
                            self.refresh_command_palette(&state);
                        }
                    } else {
                        self.close_command_palette();
                    }
                }
            }
            KeyCode::Backspace => {
                if self.backspace(&mut state) {
                    if self.show_command_palette.get() {
                        if state.content.starts_with('/') {
                            self.refresh_command_palette(&state);
                        } else {
                            self.close_command_palette();
                        }
                    }
                }
            }
            KeyCode::Delete => {
                self.delete(&mut state);
            }
            KeyCode::Left => {
                let prev = state.content[..state.cursor_position].chars().next_back();
                if let Some(prev) = prev {
                    state.cursor_position -= prev.len_utf8();
                }
            }
            KeyCode::Right => {
                let next = state.content[state.cursor_position..].chars().next();
                if let Some(next) = next {
                    state.cursor_position += next.len_utf8();
                }
            }
            KeyCode::Home => {
                state.cursor_position = 0;
            }
            KeyCode::End => {
                state.cursor_position = state.content.len();
            }
            _ => {}
        }

        ConversationResult::None
    }

    /// Insert a character at the cursor position
    fn insert_char(&self, state: &mut TextAreaState, c: char) {
        state.content.insert(state.cursor_position, c);
        state.cursor_position += c.len_utf8();
    }

    /// Delete character before cursor
    fn backspace(&self, state: &mut TextAreaState) -> bool {
        let prev = state.content[..state.cursor_position].chars().next_back();
        match prev {
            Some(c) => {
                state.cursor_position -= c.len_utf8();
                state.content.remove(state.cursor_position);
                true
            }
            None => false,
        }
    }

    /// Delete character at cursor
    fn delete(&self, state: &mut TextAreaState) -> bool {
        if state.cursor_position < state.content.len() {
            state.content.remove(state.cursor_position);
            true
        } else {
            false
        }
    }

    fn open_command_palette(&self, state: &TextAreaState) {
        self.show_command_palette.set(true);
        self.refresh_command_palette(state);
        self.selected_command.set(Some(0));
    }

    fn close_command_palette(&self) {
        self.show_command_palette.set(false);
        self.filtered_commands.borrow_mut().clear();
        self.selected_command.set(None);
    }

    fn refresh_command_palette(&self, state: &TextAreaState) {
        let query = state.content.trim_start_matches('/').to_lowercase();
        let mut filtered = self.filtered_commands.borrow_mut();
        filtered.clear();

        for entry in &self.command_entries {
            if query.is_empty() || entry.keyword.starts_with(&query) {
                filtered.push(*entry);
            }
        }

        if filtered.is_empty() {
            self.selected_command.set(None);
        } else {
            let index = self.selected_command.get().unwrap_or(0);
            let clamped = index.min(filtered.len() - 1);
            self.selected_command.set(Some(clamped));
        }
    }

    fn move_command_selection(&self, delta: isize) {
        let filtered = self.filtered_commands.borrow();
        if filtered.is_empty() {
            self.selected_command.set(None);
            return;
        }

        let current = self.selected_command.get().unwrap_or(0) as isize;
        let len = filtered.len() as isize;
        let mut next = current + delta;

        if next < 0 {
            next = len - 1;
        } else if next >= len {
            next = 0;
        }

        self.selected_command.set(Some(next as usize));
    }

    fn apply_selected_command(&self, state: &mut TextAreaState) -> bool {
        let filtered = self.filtered_commands.borrow();
        let Some(index) = self.selected_command.get() else {
            return false;
        };

        if index >= filtered.len() {
            return false;
        }

        let entry = filtered[index];
        state.content = format!("/{}", entry.keyword);
        state.cursor_position = state.content.len();
        drop(filtered);
        self.close_command_palette();
        true
    }

    /// Set focus state
    pub fn set_focus(&mut self, has_focus: bool) {
        self.has_focus = has_focus;
    }

    /// Get current content
    #[allow(dead_code)]
    pub fn get_content(&self) -> String {
        self.state.borrow().content.clone()
    }

    /// Clear content
    #[allow(dead_code)]
    pub fn clear(&self) {
        let mut state = self.state.borrow_mut();
        state.content.clear();
        state.cursor_position = 0;
    }
}

impl Widget for ConversationComposer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let state = self.state.borrow();

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Ask a question")
            .style(if self.has_focus {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Gray)
            });

        let inner_area = block.inner(area);
        block.render(area, buf);

        if state.content.is_empty() {
            let placeholder_line = Line::from(vec![Span::styled(
                &self.placeholder,
                Style::default().fg(Color::DarkGray),
            )]);
            buf.set_line(inner_area.x, inner_area.y, &placeholder_line, inner_area.width);
        } else {
            // Render content with cursor indicator
            let mut content = state.content.clone();
            if self.has_focus {
                content.insert(state.cursor_position.min(content.len()), '▌');
            }

            for (i, line_text) in content.split('\n').enumerate() {
                if i < inner_area.height as usize {
                    let line = Line::from(vec![Span::raw(line_text)]);
                    buf.set_line(inner_area.x, inner_area.y + i as u16, &line, inner_area.width);
                }
            }
        }

        // Render command palette if active
        if self.show_command_palette.get() {
            let filtered = self.filtered_commands.borrow();
            let palette_height = (filtered.len().min(5) + 2) as u16;
            let palette_area = Rect {
                x: inner_area.x,
                y: inner_area.y.saturating_sub(palette_height),
                width: inner_area.width,
                height: palette_height,
            };

            let block = Block::default()
                .borders(Borders::ALL)
                .title("Commands")
                .style(Style::default().fg(Color::Blue));
            let inner = block.inner(palette_area);
            block.render(palette_area, buf);

            let selected = self.selected_command.get();
            for (index, entry) in filtered.iter().enumerate() {
                if index >= inner.height as usize {
                    break;
                }

                let is_selected = selected == Some(index);
                let style = if is_selected {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };

                let line = Line::from(vec![
                    Span::styled(format!("/{}", entry.keyword), style),
                    Span::styled(" — ", Style::default().fg(Color::DarkGray)),
                    Span::styled(entry.description, Style::default().fg(Color::Gray)),
                ]);

                buf.set_line(inner.x, inner.y + index as u16, &line, inner.width);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(composer: &ConversationComposer, text: &str) {
        for c in text.chars() {
            composer.handle_key(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn enter_submits_and_clears_the_input() {
        let composer = ConversationComposer::new("Ask...".into());
        type_str(&composer, "Hello");

        let result = composer.handle_key(press(KeyCode::Enter));
        assert_eq!(result, ConversationResult::Submitted("Hello".into()));
        assert_eq!(composer.get_content(), "");
    }

    #[test]
    fn enter_on_blank_input_does_nothing() {
        let composer = ConversationComposer::new("Ask...".into());
        type_str(&composer, "   ");

        let result = composer.handle_key(press(KeyCode::Enter));
        assert_eq!(result, ConversationResult::None);
    }

    #[test]
    fn slash_input_turns_into_a_command() {
        let composer = ConversationComposer::new("Ask...".into());
        type_str(&composer, "/bye");

        // First Enter applies the palette selection, second one submits it.
        assert_eq!(composer.handle_key(press(KeyCode::Enter)), ConversationResult::None);
        assert_eq!(
            composer.handle_key(press(KeyCode::Enter)),
            ConversationResult::Command(SlashCommand::Bye)
        );
    }

    #[test]
    fn escape_closes_the_palette_without_submitting() {
        let composer = ConversationComposer::new("Ask...".into());
        type_str(&composer, "/");
        assert_eq!(composer.handle_key(press(KeyCode::Esc)), ConversationResult::None);
        assert_eq!(composer.get_content(), "/");
    }

    #[test]
    fn backspace_handles_multibyte_input() {
        let composer = ConversationComposer::new("Ask...".into());
        type_str(&composer, "é€");
        composer.handle_key(press(KeyCode::Backspace));
        assert_eq!(composer.get_content(), "é");
        composer.handle_key(press(KeyCode::Backspace));
        assert_eq!(composer.get_content(), "");
    }
}
