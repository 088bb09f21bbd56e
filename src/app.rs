use crate::client::AnswerClient;
use crate::config::Config;
use crate::controller::ChatController;
use crate::store::KvStore;
use crate::ui::conversation::{ConversationAction, ConversationManager};
use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// How long one tick waits for input before draining finished requests.
const TICK: Duration = Duration::from_millis(50);

/// Run the chat TUI until the user exits.
pub async fn run(config: Config) -> Result<()> {
    let store = KvStore::open(config.store_path())?;
    let client = AnswerClient::new(&config);
    let controller = ChatController::new(Arc::new(client), store);
    let mut manager = ConversationManager::new(controller, config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut manager);

    // Restore the terminal even when the loop errored.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    manager: &mut ConversationManager,
) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            let area = frame.size();
            frame.render_widget(&mut *manager, area);
        })?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if manager.handle_key(key) == ConversationAction::Exit {
                    return Ok(());
                }
            }
        }

        manager.poll_replies();
    }
}
