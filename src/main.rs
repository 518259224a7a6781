#![deny(dead_code)] // DO NOT REMOVE THIS EVER
use anyhow::Result;
use clap::Parser;
use log::{error, info, warn, LevelFilter};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

mod ui;
mod utils;

use crate::ui::{UiCommand, WalletChatUI};
use walletchat::chat::ChatSession;
use walletchat::fixtures;
use walletchat::models::Conversation;
use walletchat::setup::{self, AppState, LocalStore};
use walletchat::share::{share_or_copy, Clipboard, NoShareSheet, Osc52Clipboard, ShareOutcome};
use walletchat::StatusUpdate;

const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(4);
const STATUS_CHANNEL_CAPACITY: usize = 256;

/// Command line arguments for WalletChat
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "WalletChat: a terminal demo of a chat app with a built-in crypto wallet.",
    long_about = "WalletChat is a terminal demo of a messaging app with an integrated wallet.\n\n\
    All balances, contacts and transactions are simulated. The only thing written to disk\n\
    is the password-setup flag and the log file."
)]
struct Args {
    /// Directory holding local storage and the log file
    #[arg(long, value_name = "PATH", env = "WALLETCHAT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Block explorer network used for transaction links
    #[arg(long, value_name = "NAME")]
    network: Option<String>,

    /// Log level written to walletchat.log
    #[arg(long, value_name = "LEVEL", default_value = "debug")]
    log_level: String,

    /// Forget that the password setup was completed
    #[arg(long)]
    reset_setup: bool,
}

/// State the event loop owns on behalf of the UI: one session per opened chat.
struct App {
    sessions: HashMap<String, ChatSession>,
    status_tx: mpsc::Sender<StatusUpdate>,
    storage: LocalStore,
    clipboard: Osc52Clipboard<io::Stdout>,
}

impl App {
    fn session(&mut self, conversation: &Conversation) -> Result<&ChatSession> {
        if !self.sessions.contains_key(&conversation.id) {
            let history = fixtures::chat_history(&conversation.id, &conversation.address);
            let session = ChatSession::new(conversation.clone(), history, Some(self.status_tx.clone()))?;
            info!("Opened chat session for {}", conversation.name);
            self.sessions.insert(conversation.id.clone(), session);
        }
        self.sessions
            .get(&conversation.id)
            .ok_or_else(|| anyhow::anyhow!("missing session for {}", conversation.id))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(dir) = &args.data_dir {
        setup::set_data_dir_override(dir.clone());
    }
    let data_dir = setup::data_dir()?;
    let log_file_path = data_dir.join("walletchat.log");
    let level = args.log_level.parse::<LevelFilter>().unwrap_or(LevelFilter::Debug);
    utils::setup_logging(Some(&log_file_path), level)?;

    info!("WalletChat starting up");
    info!("System information: {} {}", std::env::consts::OS, std::env::consts::ARCH);
    info!("Logging to file: {}", log_file_path.display());

    let mut storage = match LocalStore::in_data_dir() {
        Ok(storage) => storage,
        Err(e) => {
            warn!("Local storage unreadable, starting fresh: {:#}", e);
            LocalStore::empty(&data_dir.join(setup::STORAGE_FILE))
        }
    };
    if args.reset_setup {
        setup::reset_setup(&mut storage)?;
    }
    let state = AppState::load(&storage, args.network.as_deref());
    info!(
        "Setup completed: {}, explorer network: {}",
        state.setup_completed, state.network
    );

    let (status_tx, mut status_rx) = mpsc::channel::<StatusUpdate>(STATUS_CHANNEL_CAPACITY);
    let mut app = App {
        sessions: HashMap::new(),
        status_tx,
        storage,
        clipboard: Osc52Clipboard::stdout(),
    };
    let mut chat_ui = WalletChatUI::new(&state);

    let mut terminal = ui::setup_terminal()?;
    let result = run_main_loop(&mut chat_ui, &mut terminal, &mut app, &mut status_rx).await;
    ui::restore_terminal(terminal)?;

    if let Err(e) = &result {
        error!("Event loop failed: {:#}", e);
    }
    info!("WalletChat shut down");
    result
}

/// Run the main event loop
async fn run_main_loop(
    chat_ui: &mut WalletChatUI,
    terminal: &mut ui::Terminal<ui::CrosstermBackend<io::Stdout>>,
    app: &mut App,
    status_rx: &mut mpsc::Receiver<StatusUpdate>,
) -> Result<()> {
    loop {
        terminal.draw(|f| chat_ui.draw(f))?;
        chat_ui.clean_notifications(NOTIFICATION_TIMEOUT);

        if let Some(command) = chat_ui.handle_input()? {
            if let UiCommand::Quit = command {
                info!("Quit requested");
                return Ok(());
            }
            handle_command(chat_ui, app, command).await;
        }

        // Drain whatever the simulators produced since the last frame
        while let Ok(update) = status_rx.try_recv() {
            chat_ui.apply_status(&update);
        }
    }
}

async fn handle_command(chat_ui: &mut WalletChatUI, app: &mut App, command: UiCommand) {
    match command {
        UiCommand::Quit => {}
        UiCommand::OpenChat(conversation) => match app.session(&conversation) {
            Ok(session) => {
                let messages = session.messages().await;
                chat_ui.show_chat(conversation, messages);
            }
            Err(e) => {
                error!("Could not open chat {}: {:#}", conversation.id, e);
                chat_ui.notify_error("Could not open this chat");
            }
        },
        UiCommand::SendText { conversation_id, content } => {
            let Some(session) = app.sessions.get(&conversation_id) else {
                warn!("No session for conversation {}", conversation_id);
                return;
            };
            match session.send_text(&content).await {
                Ok(message) => chat_ui.push_message(&conversation_id, message),
                Err(e) => chat_ui.notify_error(&e.to_string()),
            }
        }
        UiCommand::SendTransfer { conversation_id, token, amount } => {
            let Some(session) = app.sessions.get(&conversation_id) else {
                warn!("No session for conversation {}", conversation_id);
                return;
            };
            match session.send_transfer(chat_ui.wallet(), &token, &amount).await {
                Ok(message) => chat_ui.transfer_sent(&conversation_id, message),
                Err(e) => chat_ui.notify_error(&e.to_string()),
            }
        }
        UiCommand::DeleteMessage { conversation_id, message_id } => {
            let Some(session) = app.sessions.get(&conversation_id) else {
                return;
            };
            if session.delete(&message_id).await.is_some() {
                chat_ui.remove_message(&conversation_id, &message_id);
            }
        }
        UiCommand::CompleteSetup => {
            if let Err(e) = setup::mark_setup_completed(&mut app.storage) {
                error!("Could not persist setup flag: {:#}", e);
                chat_ui.notify_error("Could not save your setup, you will be asked again next time");
            }
        }
        UiCommand::Share { title, text } => match share_or_copy(&NoShareSheet, &app.clipboard, &title, &text) {
            Ok(ShareOutcome::Shared) => chat_ui.notify("Shared", &title),
            Ok(ShareOutcome::Copied) => chat_ui.notify("Copied", "Receipt details copied to clipboard"),
            Err(e) => {
                warn!("Share failed: {}", e);
                chat_ui.notify_error("Could not share or copy");
            }
        },
        UiCommand::Copy { label, text } => match app.clipboard.copy(&text) {
            Ok(()) => chat_ui.notify("Copied", &format!("{} copied to clipboard", label)),
            Err(e) => {
                warn!("Copy failed: {}", e);
                chat_ui.notify_error("Could not copy to clipboard");
            }
        },
    }
}
