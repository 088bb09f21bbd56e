use crate::config::Config;
use crate::controller::ChatController;
use crate::ui::conversation::{
    ConversationComposer, ConversationResult, SlashCommand, TranscriptView,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Actions that can be requested by the conversation manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationAction {
    None,
    Exit,
}

/// Wires user input to the controller and lays out the conversation UI.
pub struct ConversationManager {
    controller: ChatController,
    composer: ConversationComposer,
    config: Config,
}

impl ConversationManager {
    pub fn new(controller: ChatController, config: Config) -> Self {
        let mut composer = ConversationComposer::new("Ask a question...".to_string());
        composer.set_focus(true);

        Self {
            controller,
            composer,
            config,
        }
    }

    /// Handle key input
    pub fn handle_key(&mut self, key: KeyEvent) -> ConversationAction {
        if key.kind == KeyEventKind::Press && key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => return ConversationAction::Exit,
                KeyCode::Char('n') => {
                    self.controller.new_chat();
                    return ConversationAction::None;
                }
                KeyCode::Char('l') => {
                    self.clear_chat();
                    return ConversationAction::None;
                }
                _ => {}
            }
        }

        match self.composer.handle_key(key) {
            ConversationResult::Submitted(input) => {
                self.controller.submit(&input);
                ConversationAction::None
            }
            ConversationResult::Command(command) => self.handle_slash_command(command),
            ConversationResult::None => ConversationAction::None,
        }
    }

    /// Apply finished requests to the transcript. Called once per UI tick.
    pub fn poll_replies(&mut self) {
        self.controller.poll_replies();
    }

    #[allow(dead_code)]
    pub fn controller(&self) -> &ChatController {
        &self.controller
    }

    /// Handle slash commands
    fn handle_slash_command(&mut self, command: SlashCommand) -> ConversationAction {
        match command {
            SlashCommand::New => {
                self.controller.new_chat();
                ConversationAction::None
            }
            SlashCommand::Clear => {
                self.clear_chat();
                ConversationAction::None
            }
            SlashCommand::Bye => ConversationAction::Exit,
        }
    }

    fn clear_chat(&mut self) {
        if let Err(err) = self.controller.clear_chat() {
            tracing::warn!(error = %err, "failed to clear stored state");
        }
    }

    /// Render the conversation UI components
    fn render_ui(&mut self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status line
                Constraint::Min(5),    // Transcript
                Constraint::Length(3), // Composer
            ])
            .split(area);

        self.render_status(chunks[0], buf);
        TranscriptView::new(self.controller.transcript()).render(chunks[1], buf);
        self.composer.clone().render(chunks[2], buf);
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled(
            format!(" askr · {}", self.config.base_url),
            Style::default().fg(Color::DarkGray),
        )];

        if self.config.ui.show_usage_counter {
            spans.push(Span::styled(
                format!("  ·  {} asked", self.controller.questions_asked()),
                Style::default().fg(Color::DarkGray),
            ));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

impl Widget for &mut ConversationManager {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_ui(area, buf);
    }
}
