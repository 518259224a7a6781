use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info, warn};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};
use std::{
    io,
    time::{Duration, Instant},
};
use textwrap::wrap;
use tui_input::{backend::crossterm::EventHandler, Input};

use walletchat::chat::{group_by_date, status_glyph};
use walletchat::contacts::ContactBook;
use walletchat::conversations::ConversationList;
use walletchat::fixtures;
use walletchat::markdown::{self, SegmentStyle};
use walletchat::models::{Contact, Conversation, DeliveryStatus, Direction as MessageDirection, Message, MessageKind};
use walletchat::profile::{shorten_address, Profile, Settings, Theme};
use walletchat::setup::AppState;
use walletchat::validation::{normalize_recipient, passwords_match, score_password, validate_password_setup};
use walletchat::wallet::{GasLevel, GasTier, SendRequest, TransactionReceipt, Wallet};
use walletchat::StatusUpdate;

pub use ratatui::backend::CrosstermBackend;
pub use ratatui::Terminal;

const MAX_NOTIFICATIONS: usize = 3;
const SETTING_COUNT: usize = 6;

/// What the event loop has to do on behalf of the UI.
pub enum UiCommand {
    Quit,
    OpenChat(Conversation),
    SendText { conversation_id: String, content: String },
    SendTransfer { conversation_id: String, token: String, amount: String },
    DeleteMessage { conversation_id: String, message_id: String },
    CompleteSetup,
    Share { title: String, text: String },
    Copy { label: String, text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Chats,
    Wallet,
    Contacts,
    Profile,
    Settings,
}

impl Tab {
    const ALL: [Tab; 5] = [Tab::Chats, Tab::Wallet, Tab::Contacts, Tab::Profile, Tab::Settings];

    fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn next(self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn title(self) -> &'static str {
        match self {
            Tab::Chats => "Chats",
            Tab::Wallet => "Wallet",
            Tab::Contacts => "Contacts",
            Tab::Profile => "Profile",
            Tab::Settings => "Settings",
        }
    }
}

struct ActiveChat {
    conversation: Conversation,
    messages: Vec<Message>,
    input: Input,
}

struct Notification {
    title: String,
    body: String,
    is_error: bool,
    shown_at: Instant,
}

struct PasswordSetupDialog {
    password: Input,
    confirm: Input,
    focus_confirm: bool,
}

#[derive(Clone)]
enum ContactFormMode {
    Add,
    Edit(String),
}

struct ContactFormDialog {
    mode: ContactFormMode,
    name: Input,
    address: Input,
    focus_address: bool,
}

impl ContactFormDialog {
    fn add() -> Self {
        ContactFormDialog {
            mode: ContactFormMode::Add,
            name: Input::default(),
            address: Input::default(),
            focus_address: false,
        }
    }

    fn edit(contact: &Contact) -> Self {
        ContactFormDialog {
            mode: ContactFormMode::Edit(contact.id.clone()),
            name: Input::new(contact.display_name.clone()),
            address: Input::new(contact.address.clone()),
            focus_address: false,
        }
    }
}

struct ContactRemoveDialog {
    id: String,
    name: String,
}

/// In-chat transfer to the open conversation.
struct TransferDialog {
    tokens: Vec<String>,
    token_idx: usize,
    amount: Input,
}

/// Wallet tab send form. The amount is entered in USD.
struct WalletSendDialog {
    tokens: Vec<String>,
    token_idx: usize,
    recipient: Input,
    amount_usd: Input,
    focus_amount: bool,
    gas: GasLevel,
    save_contact: bool,
}

impl WalletSendDialog {
    fn new(wallet: &Wallet, recipient: &str) -> Self {
        WalletSendDialog {
            tokens: spendable_symbols(wallet),
            token_idx: 0,
            recipient: Input::new(recipient.to_string()),
            amount_usd: Input::default(),
            focus_amount: !recipient.is_empty(),
            gas: GasLevel::Standard,
            save_contact: false,
        }
    }

    fn token(&self) -> &str {
        self.tokens.get(self.token_idx).map_or("", String::as_str)
    }

    fn request(&self) -> SendRequest {
        SendRequest {
            token: self.token().to_string(),
            recipient: self.recipient.value().to_string(),
            amount_usd: self.amount_usd.value().to_string(),
            gas_level: self.gas,
            save_contact: self.save_contact,
        }
    }
}

struct ReceiptDialog {
    receipt: TransactionReceipt,
}

struct ProfileEditDialog {
    name: Input,
    description: Input,
    focus_description: bool,
}

struct RecoveryWalletDialog {
    input: Input,
}

pub struct WalletChatUI {
    tab: Tab,
    network: String,
    conversations: ConversationList,
    contacts: ContactBook,
    wallet: Wallet,
    profile: Profile,
    settings: Settings,
    chat_search: Input,
    contact_search: Input,
    selected_conversation: usize,
    selected_contact: usize,
    selected_setting: usize,
    hide_zero_balances: bool,
    chat: Option<ActiveChat>,
    password_dialog: Option<PasswordSetupDialog>,
    contact_dialog: Option<ContactFormDialog>,
    remove_dialog: Option<ContactRemoveDialog>,
    transfer_dialog: Option<TransferDialog>,
    send_dialog: Option<WalletSendDialog>,
    receipt_dialog: Option<ReceiptDialog>,
    profile_dialog: Option<ProfileEditDialog>,
    recovery_dialog: Option<RecoveryWalletDialog>,
    help_dialog: bool,
    notifications: Vec<Notification>,
}

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

fn spendable_symbols(wallet: &Wallet) -> Vec<String> {
    wallet.spendable_tokens().iter().map(|t| t.symbol.clone()).collect()
}

fn step(idx: usize, len: usize, forward: bool) -> usize {
    match (len, forward) {
        (0, _) => 0,
        (_, true) => (idx + 1) % len,
        (_, false) => (idx + len - 1) % len,
    }
}

impl WalletChatUI {
    pub fn new(state: &AppState) -> Self {
        let password_dialog = if state.setup_completed {
            None
        } else {
            info!("UI: first run, showing password setup");
            Some(PasswordSetupDialog {
                password: Input::default(),
                confirm: Input::default(),
                focus_confirm: false,
            })
        };

        WalletChatUI {
            tab: Tab::Chats,
            network: state.network.clone(),
            conversations: ConversationList::new(fixtures::conversations()),
            contacts: ContactBook::new(fixtures::contacts()),
            wallet: fixtures::wallet(),
            profile: Profile::new("John Doe", "Crypto enthusiast & DeFi trader", fixtures::OWN_ADDRESS),
            settings: Settings::new(fixtures::OWN_ADDRESS),
            chat_search: Input::default(),
            contact_search: Input::default(),
            selected_conversation: 0,
            selected_contact: 0,
            selected_setting: 0,
            hide_zero_balances: false,
            chat: None,
            password_dialog,
            contact_dialog: None,
            remove_dialog: None,
            transfer_dialog: None,
            send_dialog: None,
            receipt_dialog: None,
            profile_dialog: None,
            recovery_dialog: None,
            help_dialog: false,
            notifications: Vec::new(),
        }
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    fn accent(&self) -> Color {
        match self.settings.theme {
            Theme::Light => Color::Blue,
            Theme::Dark => Color::Yellow,
            Theme::Dim => Color::Gray,
            Theme::System => Color::Cyan,
        }
    }

    fn dialog_open(&self) -> bool {
        self.password_dialog.is_some()
            || self.contact_dialog.is_some()
            || self.remove_dialog.is_some()
            || self.transfer_dialog.is_some()
            || self.send_dialog.is_some()
            || self.receipt_dialog.is_some()
            || self.profile_dialog.is_some()
            || self.recovery_dialog.is_some()
            || self.help_dialog
    }

    /// Informational toast. Suppressed when notifications are switched off.
    pub fn notify(&mut self, title: &str, body: &str) {
        if !self.settings.notifications {
            debug!("UI: notification suppressed: {}", title);
            return;
        }
        self.push_notification(title, body, false);
    }

    /// Error toasts are always shown.
    pub fn notify_error(&mut self, body: &str) {
        self.push_notification("Error", body, true);
    }

    fn push_notification(&mut self, title: &str, body: &str, is_error: bool) {
        info!("UI: notification [{}] {}", title, body);
        self.notifications.push(Notification {
            title: title.to_string(),
            body: body.to_string(),
            is_error,
            shown_at: Instant::now(),
        });
        if self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
    }

    pub fn clean_notifications(&mut self, timeout: Duration) {
        self.notifications.retain(|n| n.shown_at.elapsed() < timeout);
    }

    pub fn show_chat(&mut self, conversation: Conversation, messages: Vec<Message>) {
        debug!("UI: showing {} messages for {}", messages.len(), conversation.name);
        self.tab = Tab::Chats;
        self.chat = Some(ActiveChat {
            conversation,
            messages,
            input: Input::default(),
        });
    }

    pub fn push_message(&mut self, conversation_id: &str, message: Message) {
        self.conversations.record_outgoing(conversation_id, &message);
        if let Some(chat) = self.chat.as_mut().filter(|c| c.conversation.id == conversation_id) {
            chat.messages.push(message);
        }
    }

    pub fn transfer_sent(&mut self, conversation_id: &str, message: Message) {
        self.transfer_dialog = None;
        let summary = match (message.transfer_details(), self.chat.as_ref()) {
            (Some(details), Some(chat)) => format!(
                "{} {} sent to {}",
                details.amount, details.token_symbol, chat.conversation.name
            ),
            _ => "Transfer submitted".to_string(),
        };
        self.push_message(conversation_id, message);
        self.notify("Transfer sent", &summary);
    }

    pub fn remove_message(&mut self, conversation_id: &str, message_id: &str) {
        if let Some(chat) = self.chat.as_mut().filter(|c| c.conversation.id == conversation_id) {
            chat.messages.retain(|m| m.id != message_id);
        }
        self.notify("Message deleted", "The message was removed from this chat");
    }

    /// Applies a simulator transition to the open chat. Never moves a status backwards.
    pub fn apply_status(&mut self, update: &StatusUpdate) {
        let Some(chat) = self.chat.as_mut() else { return };
        if let Some(message) = chat.messages.iter_mut().find(|m| m.id == update.id) {
            if update.status > message.status {
                message.status = update.status;
            }
        }
    }

    pub fn handle_input(&mut self) -> Result<Option<UiCommand>> {
        if !event::poll(Duration::from_millis(10))? {
            return Ok(None);
        }
        let key = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            _ => return Ok(None),
        };

        if is_ctrl(&key, 'c') {
            return Ok(Some(UiCommand::Quit));
        }
        if self.password_dialog.is_some() {
            return Ok(self.handle_password_key(key));
        }
        if self.help_dialog {
            // Any key closes help
            self.help_dialog = false;
            return Ok(None);
        }
        if self.remove_dialog.is_some() {
            self.handle_remove_key(key);
            return Ok(None);
        }
        if self.contact_dialog.is_some() {
            self.handle_contact_form_key(key);
            return Ok(None);
        }
        if self.profile_dialog.is_some() {
            self.handle_profile_edit_key(key);
            return Ok(None);
        }
        if self.recovery_dialog.is_some() {
            self.handle_recovery_key(key);
            return Ok(None);
        }
        if self.send_dialog.is_some() {
            self.handle_send_key(key);
            return Ok(None);
        }
        if self.receipt_dialog.is_some() {
            return Ok(self.handle_receipt_key(key));
        }
        if self.transfer_dialog.is_some() {
            return Ok(self.handle_transfer_key(key));
        }
        if !self.settings.logged_in {
            return Ok(self.handle_logged_out_key(key));
        }

        if is_ctrl(&key, 'h') || key.code == KeyCode::F(1) {
            self.help_dialog = true;
            return Ok(None);
        }
        match key.code {
            KeyCode::Tab => {
                self.tab = self.tab.next();
                return Ok(None);
            }
            KeyCode::BackTab => {
                self.tab = self.tab.prev();
                return Ok(None);
            }
            _ => {}
        }

        let command = match self.tab {
            Tab::Chats => self.handle_chats_key(key),
            Tab::Wallet => self.handle_wallet_key(key),
            Tab::Contacts => self.handle_contacts_key(key),
            Tab::Profile => self.handle_profile_key(key),
            Tab::Settings => self.handle_settings_key(key),
        };
        Ok(command)
    }

    fn handle_password_key(&mut self, key: KeyEvent) -> Option<UiCommand> {
        let dialog = self.password_dialog.as_mut()?;
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                dialog.focus_confirm = !dialog.focus_confirm;
            }
            KeyCode::Enter => match validate_password_setup(dialog.password.value(), dialog.confirm.value()) {
                Ok(()) => {
                    self.password_dialog = None;
                    self.notify("Password set", "Your wallet is now protected");
                    return Some(UiCommand::CompleteSetup);
                }
                Err(e) => self.notify_error(&e.to_string()),
            },
            _ => {
                let input = if dialog.focus_confirm {
                    &mut dialog.confirm
                } else {
                    &mut dialog.password
                };
                input.handle_event(&Event::Key(key));
            }
        }
        None
    }

    fn handle_remove_key(&mut self, key: KeyEvent) {
        let Some(dialog) = self.remove_dialog.take() else { return };
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => match self.contacts.remove(&dialog.id) {
                Ok(removed) => {
                    self.selected_contact = self.selected_contact.saturating_sub(1);
                    self.notify("Contact removed", &format!("{} was removed", removed.display_name));
                }
                Err(e) => self.notify_error(&e.to_string()),
            },
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                debug!("UI: removal of {} cancelled", dialog.name);
            }
            _ => self.remove_dialog = Some(dialog),
        }
    }

    fn handle_contact_form_key(&mut self, key: KeyEvent) {
        let Some(dialog) = self.contact_dialog.as_mut() else { return };
        match key.code {
            KeyCode::Esc => self.contact_dialog = None,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                dialog.focus_address = !dialog.focus_address;
            }
            KeyCode::Enter => {
                let mode = dialog.mode.clone();
                let name = dialog.name.value().to_string();
                let address = dialog.address.value().to_string();
                let result = match mode {
                    ContactFormMode::Add => self
                        .contacts
                        .add(&name, &address)
                        .map(|c| ("Contact added", format!("{} has been added", c.display_name)))
                        .map_err(|e| e.to_string()),
                    ContactFormMode::Edit(id) => self
                        .contacts
                        .edit(&id, &name, &address)
                        .map(|c| ("Contact updated", format!("{} was saved", c.display_name)))
                        .map_err(|e| e.to_string()),
                };
                match result {
                    Ok((title, body)) => {
                        self.contact_dialog = None;
                        self.notify(title, &body);
                    }
                    Err(e) => self.notify_error(&e),
                }
            }
            _ => {
                let input = if dialog.focus_address {
                    &mut dialog.address
                } else {
                    &mut dialog.name
                };
                input.handle_event(&Event::Key(key));
            }
        }
    }

    fn handle_profile_edit_key(&mut self, key: KeyEvent) {
        let Some(dialog) = self.profile_dialog.as_mut() else { return };
        match key.code {
            KeyCode::Esc => self.profile_dialog = None,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                dialog.focus_description = !dialog.focus_description;
            }
            KeyCode::Enter => {
                let name = dialog.name.value().to_string();
                let description = dialog.description.value().to_string();
                match self.profile.save(&name, &description) {
                    Ok(()) => {
                        self.profile_dialog = None;
                        self.notify("Profile saved", "Your changes have been saved");
                    }
                    Err(e) => self.notify_error(&e.to_string()),
                }
            }
            _ => {
                let input = if dialog.focus_description {
                    &mut dialog.description
                } else {
                    &mut dialog.name
                };
                input.handle_event(&Event::Key(key));
            }
        }
    }

    fn handle_recovery_key(&mut self, key: KeyEvent) {
        let Some(dialog) = self.recovery_dialog.as_mut() else { return };
        match key.code {
            KeyCode::Esc => self.recovery_dialog = None,
            KeyCode::Enter => {
                let raw = dialog.input.value().to_string();
                match self.settings.set_recovery_wallet(&raw).map(str::to_string) {
                    Ok(address) => {
                        self.recovery_dialog = None;
                        self.notify("Recovery wallet updated", &address);
                    }
                    Err(e) => self.notify_error(&e.to_string()),
                }
            }
            _ => {
                dialog.input.handle_event(&Event::Key(key));
            }
        }
    }

    fn handle_send_key(&mut self, key: KeyEvent) {
        let Some(dialog) = self.send_dialog.as_mut() else { return };
        match key.code {
            KeyCode::Esc => self.send_dialog = None,
            KeyCode::Tab | KeyCode::BackTab => dialog.focus_amount = !dialog.focus_amount,
            KeyCode::Up => dialog.token_idx = step(dialog.token_idx, dialog.tokens.len(), false),
            KeyCode::Down => dialog.token_idx = step(dialog.token_idx, dialog.tokens.len(), true),
            _ if is_ctrl(&key, 'g') => dialog.gas = dialog.gas.next(),
            _ if is_ctrl(&key, 's') => dialog.save_contact = !dialog.save_contact,
            KeyCode::Enter => {
                let request = dialog.request();
                self.submit_send(request);
            }
            _ => {
                let input = if dialog.focus_amount {
                    &mut dialog.amount_usd
                } else {
                    &mut dialog.recipient
                };
                input.handle_event(&Event::Key(key));
            }
        }
    }

    fn submit_send(&mut self, request: SendRequest) {
        let receipt = match self.wallet.send(&request) {
            Ok(receipt) => receipt,
            Err(e) => {
                self.notify_error(&e.to_string());
                return;
            }
        };
        self.send_dialog = None;

        if request.save_contact && self.contacts.find_by_address(&receipt.recipient).is_none() {
            match self.contacts.add(&receipt.recipient, &receipt.recipient).map(|c| c.address.clone()) {
                Ok(address) => self.notify("Contact saved", &format!("{} has been added to your contacts", address)),
                Err(e) => warn!("UI: could not save {} as contact: {}", receipt.recipient, e),
            }
        }
        self.notify("Transaction sent", "Your transaction was processed successfully");
        self.receipt_dialog = Some(ReceiptDialog { receipt });
    }

    fn handle_receipt_key(&mut self, key: KeyEvent) -> Option<UiCommand> {
        let receipt = &self.receipt_dialog.as_ref()?.receipt;
        match key.code {
            KeyCode::Char('c') => Some(UiCommand::Copy {
                label: "Transaction hash".to_string(),
                text: receipt.hash.clone(),
            }),
            KeyCode::Char('l') | KeyCode::Char('o') => Some(UiCommand::Copy {
                label: "Explorer link".to_string(),
                text: receipt.explorer_url(&self.network),
            }),
            KeyCode::Char('s') => Some(UiCommand::Share {
                title: "Transaction receipt".to_string(),
                text: receipt.share_text(),
            }),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                self.receipt_dialog = None;
                None
            }
            _ => None,
        }
    }

    fn handle_transfer_key(&mut self, key: KeyEvent) -> Option<UiCommand> {
        let dialog = self.transfer_dialog.as_mut()?;
        match key.code {
            KeyCode::Esc => self.transfer_dialog = None,
            KeyCode::Up => dialog.token_idx = step(dialog.token_idx, dialog.tokens.len(), false),
            KeyCode::Down => dialog.token_idx = step(dialog.token_idx, dialog.tokens.len(), true),
            KeyCode::Enter => {
                let conversation_id = self.chat.as_ref()?.conversation.id.clone();
                return Some(UiCommand::SendTransfer {
                    conversation_id,
                    token: dialog.tokens.get(dialog.token_idx).cloned().unwrap_or_default(),
                    amount: dialog.amount.value().to_string(),
                });
            }
            _ => {
                dialog.amount.handle_event(&Event::Key(key));
            }
        }
        None
    }

    fn handle_logged_out_key(&mut self, key: KeyEvent) -> Option<UiCommand> {
        match key.code {
            KeyCode::Esc => Some(UiCommand::Quit),
            KeyCode::Enter => {
                self.settings.logged_in = true;
                let name = self.profile.name.clone();
                self.notify("Welcome back", &name);
                None
            }
            _ => None,
        }
    }

    fn handle_chats_key(&mut self, key: KeyEvent) -> Option<UiCommand> {
        if let Some(chat) = self.chat.as_mut() {
            let conversation_id = chat.conversation.id.clone();
            match key.code {
                KeyCode::Esc => self.chat = None,
                KeyCode::Enter => {
                    let content = chat.input.value().to_string();
                    if content.trim().is_empty() {
                        return None;
                    }
                    chat.input.reset();
                    return Some(UiCommand::SendText { conversation_id, content });
                }
                _ if is_ctrl(&key, 't') => {
                    self.transfer_dialog = Some(TransferDialog {
                        tokens: spendable_symbols(&self.wallet),
                        token_idx: 0,
                        amount: Input::default(),
                    });
                }
                _ if is_ctrl(&key, 'd') => {
                    let last = chat
                        .messages
                        .iter()
                        .rev()
                        .find(|m| m.direction == MessageDirection::Outgoing)?;
                    return Some(UiCommand::DeleteMessage {
                        conversation_id,
                        message_id: last.id.clone(),
                    });
                }
                _ => {
                    chat.input.handle_event(&Event::Key(key));
                }
            }
            return None;
        }

        let matches: Vec<Conversation> = self
            .conversations
            .search(self.chat_search.value())
            .into_iter()
            .cloned()
            .collect();
        match key.code {
            KeyCode::Esc => return Some(UiCommand::Quit),
            KeyCode::Up => self.selected_conversation = self.selected_conversation.saturating_sub(1),
            KeyCode::Down => {
                if self.selected_conversation + 1 < matches.len() {
                    self.selected_conversation += 1;
                }
            }
            KeyCode::Enter => {
                let conversation = matches.get(self.selected_conversation)?.clone();
                self.conversations.mark_read(&conversation.id);
                return Some(UiCommand::OpenChat(conversation));
            }
            _ => {
                self.chat_search.handle_event(&Event::Key(key));
                self.selected_conversation = 0;
            }
        }
        None
    }

    fn handle_wallet_key(&mut self, key: KeyEvent) -> Option<UiCommand> {
        match key.code {
            KeyCode::Esc => return Some(UiCommand::Quit),
            KeyCode::Char('s') => self.send_dialog = Some(WalletSendDialog::new(&self.wallet, "")),
            KeyCode::Char('z') => self.hide_zero_balances = !self.hide_zero_balances,
            KeyCode::Char('r') => match self.wallet.history().last().cloned() {
                Some(receipt) => self.receipt_dialog = Some(ReceiptDialog { receipt }),
                None => self.notify("No transactions", "Nothing has been sent yet"),
            },
            KeyCode::Char('?') => self.help_dialog = true,
            _ => {}
        }
        None
    }

    fn handle_contacts_key(&mut self, key: KeyEvent) -> Option<UiCommand> {
        let matches: Vec<Contact> = self
            .contacts
            .search(self.contact_search.value())
            .into_iter()
            .cloned()
            .collect();
        let selected = matches.get(self.selected_contact);

        match key.code {
            KeyCode::Esc => return Some(UiCommand::Quit),
            KeyCode::Up => self.selected_contact = self.selected_contact.saturating_sub(1),
            KeyCode::Down => {
                if self.selected_contact + 1 < matches.len() {
                    self.selected_contact += 1;
                }
            }
            _ if is_ctrl(&key, 'a') => self.contact_dialog = Some(ContactFormDialog::add()),
            _ if is_ctrl(&key, 'e') => {
                if let Some(contact) = selected {
                    self.contact_dialog = Some(ContactFormDialog::edit(contact));
                }
            }
            _ if is_ctrl(&key, 'd') => {
                if let Some(contact) = selected {
                    self.remove_dialog = Some(ContactRemoveDialog {
                        id: contact.id.clone(),
                        name: contact.display_name.clone(),
                    });
                }
            }
            _ if is_ctrl(&key, 's') => {
                if let Some(contact) = selected {
                    self.send_dialog = Some(WalletSendDialog::new(&self.wallet, &contact.address));
                    self.tab = Tab::Wallet;
                }
            }
            _ if is_ctrl(&key, 'y') => {
                return selected.map(|contact| UiCommand::Copy {
                    label: "Address".to_string(),
                    text: contact.address.clone(),
                });
            }
            _ => {
                self.contact_search.handle_event(&Event::Key(key));
                self.selected_contact = 0;
            }
        }
        None
    }

    fn handle_profile_key(&mut self, key: KeyEvent) -> Option<UiCommand> {
        match key.code {
            KeyCode::Esc => Some(UiCommand::Quit),
            KeyCode::Char('e') => {
                self.profile_dialog = Some(ProfileEditDialog {
                    name: Input::new(self.profile.name.clone()),
                    description: Input::new(self.profile.description.clone()),
                    focus_description: false,
                });
                None
            }
            KeyCode::Char('c') => Some(UiCommand::Copy {
                label: "Address".to_string(),
                text: self.profile.address.clone(),
            }),
            _ => None,
        }
    }

    fn handle_settings_key(&mut self, key: KeyEvent) -> Option<UiCommand> {
        match key.code {
            KeyCode::Esc => return Some(UiCommand::Quit),
            KeyCode::Up => self.selected_setting = step(self.selected_setting, SETTING_COUNT, false),
            KeyCode::Down => self.selected_setting = step(self.selected_setting, SETTING_COUNT, true),
            KeyCode::Enter | KeyCode::Char(' ') => match self.selected_setting {
                0 => self.settings.cycle_theme(),
                1 => self.settings.cycle_language(),
                2 => {
                    self.settings.chat_sync = !self.settings.chat_sync;
                    let state = if self.settings.chat_sync { "enabled" } else { "disabled" };
                    self.notify("Chat sync", &format!("Chat sync {}", state));
                }
                3 => self.settings.notifications = !self.settings.notifications,
                4 => {
                    self.recovery_dialog = Some(RecoveryWalletDialog {
                        input: Input::new(self.settings.recovery_wallet.clone()),
                    });
                }
                _ => {
                    self.chat = None;
                    self.settings.logout();
                }
            },
            _ => {}
        }
        None
    }

    pub fn draw<B: Backend>(&self, frame: &mut Frame<B>) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tabs
                Constraint::Min(5),    // Page
                Constraint::Length(1), // Help line
            ])
            .split(size);

        self.draw_tabs(frame, chunks[0]);

        let show_cursor = !self.dialog_open();
        if !self.settings.logged_in {
            draw_logged_out(frame, &self.profile, chunks[1]);
        } else {
            match self.tab {
                Tab::Chats => match &self.chat {
                    Some(chat) => draw_chat(frame, chat, chunks[1], self.accent(), show_cursor),
                    None => self.draw_chat_list(frame, chunks[1], show_cursor),
                },
                Tab::Wallet => self.draw_wallet(frame, chunks[1]),
                Tab::Contacts => self.draw_contacts(frame, chunks[1], show_cursor),
                Tab::Profile => self.draw_profile(frame, chunks[1]),
                Tab::Settings => self.draw_settings(frame, chunks[1]),
            }
        }

        let help = Paragraph::new(Line::from(Span::styled(self.help_line(), Style::default().fg(Color::Gray))));
        frame.render_widget(help, chunks[2]);

        if let Some(dialog) = &self.password_dialog {
            draw_password_dialog(frame, dialog, size, self.accent());
        }
        if let Some(dialog) = &self.contact_dialog {
            draw_contact_form_dialog(frame, dialog, size, self.accent());
        }
        if let Some(dialog) = &self.remove_dialog {
            draw_contact_remove_dialog(frame, dialog, size);
        }
        if let Some(dialog) = &self.transfer_dialog {
            self.draw_transfer_dialog(frame, dialog, size);
        }
        if let Some(dialog) = &self.send_dialog {
            self.draw_send_dialog(frame, dialog, size);
        }
        if let Some(dialog) = &self.receipt_dialog {
            draw_receipt_dialog(frame, &dialog.receipt, &self.network, size);
        }
        if let Some(dialog) = &self.profile_dialog {
            draw_profile_dialog(frame, dialog, size, self.accent());
        }
        if let Some(dialog) = &self.recovery_dialog {
            draw_recovery_dialog(frame, dialog, size, self.accent());
        }
        if self.help_dialog {
            draw_help_dialog(frame, size);
        }
        draw_notifications(frame, &self.notifications, size);
    }

    fn help_line(&self) -> String {
        if !self.settings.logged_in {
            return "Enter log in | Esc quit".to_string();
        }
        let page = match (self.tab, self.chat.is_some()) {
            (Tab::Chats, true) => "Enter send | Ctrl+T send crypto | Ctrl+D delete last | Esc back",
            (Tab::Chats, false) => "type to search | Up/Down select | Enter open",
            (Tab::Wallet, _) => "s send | z hide zero | r last receipt",
            (Tab::Contacts, _) => "type to search | Ctrl+A add | Ctrl+E edit | Ctrl+D remove | Ctrl+S send | Ctrl+Y copy",
            (Tab::Profile, _) => "e edit | c copy address",
            (Tab::Settings, _) => "Up/Down select | Enter change",
        };
        format!("{} | Tab switch | Ctrl+H help | Ctrl+C quit", page)
    }

    fn draw_tabs<B: Backend>(&self, f: &mut Frame<B>, area: Rect) {
        let unread = self.conversations.total_unread();
        let titles: Vec<Line> = Tab::ALL
            .iter()
            .map(|tab| match tab {
                Tab::Chats if unread > 0 => Line::from(format!("Chats ({})", unread)),
                _ => Line::from(tab.title()),
            })
            .collect();

        let tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("WalletChat · explorer.{}", self.network)),
            )
            .select(self.tab.index())
            .highlight_style(Style::default().fg(self.accent()).add_modifier(Modifier::BOLD));
        f.render_widget(tabs, area);
    }

    fn draw_chat_list<B: Backend>(&self, f: &mut Frame<B>, area: Rect, show_cursor: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);
        draw_input(f, chunks[0], "Search chats", &self.chat_search, show_cursor, self.accent());

        let gray = Style::default().fg(Color::DarkGray);
        let items: Vec<ListItem> = self
            .conversations
            .search(self.chat_search.value())
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let marker = if i == self.selected_conversation { "> " } else { "  " };
                let mut header = vec![
                    Span::raw(marker),
                    presence_span(c.is_online),
                    Span::styled(c.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(format!("  {}", c.timestamp), gray),
                ];
                if c.unread > 0 {
                    header.push(Span::styled(format!("  ({})", c.unread), Style::default().fg(self.accent())));
                }
                ListItem::new(vec![
                    Line::from(header),
                    Line::from(Span::styled(format!("    {}", c.last_message), gray)),
                ])
            })
            .collect();

        let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Conversations"));
        f.render_widget(list, chunks[1]);
    }

    fn draw_wallet<B: Backend>(&self, f: &mut Frame<B>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Balance
                Constraint::Min(5),    // Tokens
                Constraint::Length(7), // History
            ])
            .split(area);

        let balance = Paragraph::new(Line::from(vec![
            Span::raw("Total balance  "),
            Span::styled(
                format!("${:.2}", self.wallet.total_balance_usd()),
                Style::default().fg(self.accent()).add_modifier(Modifier::BOLD),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Wallet"));
        f.render_widget(balance, chunks[0]);

        let tokens: Vec<ListItem> = self
            .wallet
            .visible_tokens(self.hide_zero_balances)
            .iter()
            .map(|t| {
                let change_style = if t.change_24h >= 0.0 {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::Red)
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{} {:<5} {:<10}", t.icon, t.symbol, t.name)),
                    Span::raw(format!("{:>12.4}  ${:>10.2}  ", t.balance, t.price)),
                    Span::styled(format!("{:+.2}%", t.change_24h), change_style),
                    Span::styled(format!("  ${:.2}", t.balance_usd), Style::default().add_modifier(Modifier::BOLD)),
                ]))
            })
            .collect();
        let title = if self.hide_zero_balances {
            "Tokens (hiding zero balances)"
        } else {
            "Tokens"
        };
        f.render_widget(
            List::new(tokens).block(Block::default().borders(Borders::ALL).title(title)),
            chunks[1],
        );

        let history: Vec<ListItem> = self
            .wallet
            .history()
            .iter()
            .rev()
            .map(|r| {
                ListItem::new(format!(
                    "{}  {} {} → {}  block {}",
                    shorten_address(&r.hash),
                    r.amount,
                    r.token,
                    r.recipient,
                    r.block_number
                ))
            })
            .collect();
        f.render_widget(
            List::new(history).block(Block::default().borders(Borders::ALL).title("Recent transactions")),
            chunks[2],
        );
    }

    fn draw_contacts<B: Backend>(&self, f: &mut Frame<B>, area: Rect, show_cursor: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);
        draw_input(f, chunks[0], "Search contacts", &self.contact_search, show_cursor, self.accent());

        let items: Vec<ListItem> = self
            .contacts
            .search(self.contact_search.value())
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let marker = if i == self.selected_contact { "> " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::raw(marker),
                    Span::styled(format!("[{}] ", c.avatar), Style::default().fg(self.accent())),
                    presence_span(c.is_online),
                    Span::styled(c.display_name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(format!("  {}", c.address), Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect();
        let title = format!("Contacts ({})", self.contacts.len());
        f.render_widget(List::new(items).block(Block::default().borders(Borders::ALL).title(title)), chunks[1]);
    }

    fn draw_profile<B: Backend>(&self, f: &mut Frame<B>, area: Rect) {
        let label = Style::default().fg(Color::DarkGray);
        let lines = vec![
            Line::from(Span::styled(
                self.profile.name.clone(),
                Style::default().fg(self.accent()).add_modifier(Modifier::BOLD),
            )),
            Line::from(self.profile.description.clone()),
            Line::from(""),
            Line::from(vec![Span::styled("Address   ", label), Span::raw(self.profile.address.clone())]),
            Line::from(vec![Span::styled("Short     ", label), Span::raw(self.profile.short_address())]),
            Line::from(vec![
                Span::styled("Balance   ", label),
                Span::raw(format!("${:.2}", self.wallet.total_balance_usd())),
            ]),
            Line::from(vec![
                Span::styled("Contacts  ", label),
                Span::raw(self.contacts.len().to_string()),
            ]),
            Line::from(vec![
                Span::styled("Chats     ", label),
                Span::raw(self.conversations.all().len().to_string()),
            ]),
        ];
        let profile = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Profile"))
            .wrap(Wrap { trim: true });
        f.render_widget(profile, area);
    }

    fn draw_settings<B: Backend>(&self, f: &mut Frame<B>, area: Rect) {
        let on_off = |on: bool| (if on { "On" } else { "Off" }).to_string();
        let rows: [(&str, String); SETTING_COUNT] = [
            ("Theme", self.settings.theme.label().to_string()),
            ("Language", self.settings.language_name().to_string()),
            ("Chat sync", on_off(self.settings.chat_sync)),
            ("Notifications", on_off(self.settings.notifications)),
            ("Recovery wallet", self.settings.recovery_wallet.clone()),
            ("Log out", String::new()),
        ];
        let items: Vec<ListItem> = rows
            .iter()
            .enumerate()
            .map(|(i, (name, value))| {
                let style = if i == self.selected_setting {
                    Style::default().fg(self.accent()).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let marker = if i == self.selected_setting { "> " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{}{:<18}", marker, name), style),
                    Span::raw(value.clone()),
                ]))
            })
            .collect();
        f.render_widget(List::new(items).block(Block::default().borders(Borders::ALL).title("Settings")), area);
    }

    fn draw_transfer_dialog<B: Backend>(&self, f: &mut Frame<B>, dialog: &TransferDialog, area: Rect) {
        let recipient = self
            .chat
            .as_ref()
            .map_or(String::new(), |c| format!("{} ({})", c.conversation.name, c.conversation.address));
        let inner = draw_popup(f, area, 56, 11, "Send Crypto", self.accent());
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(1), Constraint::Length(3), Constraint::Min(1)])
            .split(inner);

        f.render_widget(Paragraph::new(format!("To: {}", recipient)), chunks[0]);
        let token = dialog.tokens.get(dialog.token_idx).map_or("-", String::as_str);
        let available = self.wallet.token(token).map_or(0.0, |t| t.balance);
        f.render_widget(
            Paragraph::new(format!("Token: ◀ {} ▶  ({} available)", token, available)),
            chunks[1],
        );
        draw_input(f, chunks[2], "Amount", &dialog.amount, true, self.accent());
        f.render_widget(
            Paragraph::new(Span::styled("Up/Down token | Enter send | Esc cancel", Style::default().fg(Color::Gray))),
            chunks[3],
        );
    }

    fn draw_send_dialog<B: Backend>(&self, f: &mut Frame<B>, dialog: &WalletSendDialog, area: Rect) {
        let inner = draw_popup(f, area, 64, 17, "Send Transaction", self.accent());
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Token
                Constraint::Length(3), // Recipient
                Constraint::Length(3), // Amount
                Constraint::Length(1), // Conversion
                Constraint::Length(1), // Gas
                Constraint::Length(1), // Save contact
                Constraint::Min(1),    // Hint
            ])
            .split(inner);

        let token = dialog.token();
        f.render_widget(Paragraph::new(format!("Token: ◀ {} ▶", token)), chunks[0]);
        draw_input(f, chunks[1], "Recipient (address or ENS)", &dialog.recipient, !dialog.focus_amount, self.accent());
        draw_input(f, chunks[2], "Amount (USD)", &dialog.amount_usd, dialog.focus_amount, self.accent());

        let amount = self.wallet.token_amount_for_usd(token, dialog.amount_usd.value());
        f.render_widget(Paragraph::new(format!("≈ {} {}", amount, token)), chunks[3]);

        let gas = self.wallet.gas();
        let (tier, tier_color) = match gas.tier(dialog.gas) {
            GasTier::Low => ("Low", Color::Green),
            GasTier::Average => ("Average", Color::Yellow),
            GasTier::High => ("High", Color::Red),
        };
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw(format!("Gas: {} · {} gwei ", dialog.gas.label(), gas.price(dialog.gas))),
                Span::styled(format!("({})", tier), Style::default().fg(tier_color)),
            ])),
            chunks[4],
        );

        let check = if dialog.save_contact { "[x]" } else { "[ ]" };
        f.render_widget(Paragraph::new(format!("{} Save recipient to contacts", check)), chunks[5]);
        f.render_widget(
            Paragraph::new(Span::styled(
                "Tab field | Up/Down token | Ctrl+G gas | Ctrl+S save | Enter send | Esc cancel",
                Style::default().fg(Color::Gray),
            ))
            .wrap(Wrap { trim: true }),
            chunks[6],
        );
    }
}

fn presence_span(is_online: bool) -> Span<'static> {
    if is_online {
        Span::styled("● ", Style::default().fg(Color::Green))
    } else {
        Span::styled("○ ", Style::default().fg(Color::DarkGray))
    }
}

fn markdown_spans(line: &str) -> Vec<Span<'static>> {
    let mut spans = vec![Span::raw("  ")];
    for segment in markdown::parse_inline(line) {
        let style = match segment.style {
            SegmentStyle::Plain => Style::default(),
            SegmentStyle::Bold => Style::default().add_modifier(Modifier::BOLD),
            SegmentStyle::Italic => Style::default().add_modifier(Modifier::ITALIC),
            SegmentStyle::Code => Style::default().fg(Color::Magenta),
        };
        spans.push(Span::styled(segment.text, style));
    }
    spans
}

fn status_span(status: DeliveryStatus, accent: Color) -> Span<'static> {
    let style = if status == DeliveryStatus::Seen {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(format!(" {}", status_glyph(status)), style)
}

fn message_items(chat: &ActiveChat, width: usize, accent: Color) -> Vec<ListItem<'static>> {
    let gray = Style::default().fg(Color::DarkGray);
    let today = Local::now().date_naive();
    let mut items = Vec::new();

    for (label, messages) in group_by_date(&chat.messages, today) {
        items.push(ListItem::new(Line::from(Span::styled(format!("── {} ──", label), gray))));
        for message in messages {
            let outgoing = message.direction == MessageDirection::Outgoing;
            let (author, author_style) = if outgoing {
                ("You".to_string(), Style::default().fg(accent).add_modifier(Modifier::BOLD))
            } else {
                (chat.conversation.name.clone(), Style::default().add_modifier(Modifier::BOLD))
            };
            let time = message.created_at.with_timezone(&Local).format("%H:%M").to_string();

            let mut header = vec![Span::styled(author, author_style), Span::styled(format!(" {}", time), gray)];
            if outgoing {
                header.push(status_span(message.status, accent));
            }
            let mut lines = vec![Line::from(header)];

            match &message.kind {
                MessageKind::Text => {
                    for raw in message.content.lines() {
                        for wrapped in wrap(raw, width) {
                            lines.push(Line::from(markdown_spans(&wrapped)));
                        }
                    }
                }
                MessageKind::Transfer(details) => {
                    lines.push(Line::from(Span::styled(
                        format!("  ⟠ Sent {} {}", details.amount, details.token_symbol),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    )));
                    lines.push(Line::from(Span::styled(
                        format!("  tx {} → {}", shorten_address(&details.transaction_hash), details.recipient),
                        gray,
                    )));
                }
            }
            items.push(ListItem::new(lines));
        }
    }
    items
}

fn draw_chat<B: Backend>(f: &mut Frame<B>, chat: &ActiveChat, area: Rect, accent: Color, show_cursor: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Messages
            Constraint::Length(3), // Input box
        ])
        .split(area);

    let wrap_width = (chunks[0].width.saturating_sub(4) as usize).max(10);
    let items = message_items(chat, wrap_width, accent);

    let presence = if chat.conversation.is_online { "online" } else { "offline" };
    let title = format!(
        "{} · {} · {}",
        chat.conversation.name,
        presence,
        shorten_address(&chat.conversation.address)
    );

    // Keep the newest message in view
    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(items.len() - 1));
    }
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default());
    f.render_stateful_widget(list, chunks[0], &mut list_state);

    draw_input(f, chunks[1], "Message", &chat.input, show_cursor, accent);
}

fn draw_input<B: Backend>(f: &mut Frame<B>, area: Rect, title: &str, input: &Input, focused: bool, accent: Color) {
    let border = if focused {
        Style::default().fg(accent)
    } else {
        Style::default()
    };
    let widget = Paragraph::new(input.value().to_string())
        .block(Block::default().borders(Borders::ALL).title(title.to_string()).border_style(border));
    f.render_widget(widget, area);
    if focused {
        f.set_cursor(area.x + input.cursor() as u16 + 1, area.y + 1);
    }
}

fn draw_masked_input<B: Backend>(f: &mut Frame<B>, area: Rect, title: &str, input: &Input, focused: bool, accent: Color) {
    let border = if focused {
        Style::default().fg(accent)
    } else {
        Style::default()
    };
    let masked = "•".repeat(input.value().chars().count());
    let widget = Paragraph::new(masked)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()).border_style(border));
    f.render_widget(widget, area);
    if focused {
        f.set_cursor(area.x + input.cursor() as u16 + 1, area.y + 1);
    }
}

/// Clears a centered box, draws its border and returns the content area.
fn draw_popup<B: Backend>(f: &mut Frame<B>, area: Rect, width: u16, height: u16, title: &str, color: Color) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(4));
    let popup_area = Rect::new(
        area.x + (area.width - popup_width) / 2,
        area.y + (area.height - popup_height) / 2,
        popup_width,
        popup_height,
    );

    let popup_block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    f.render_widget(Clear, popup_area);
    f.render_widget(popup_block, popup_area);

    popup_area.inner(&Margin {
        vertical: 1,
        horizontal: 2,
    })
}

fn draw_password_dialog<B: Backend>(f: &mut Frame<B>, dialog: &PasswordSetupDialog, area: Rect, accent: Color) {
    let inner = draw_popup(f, area, 60, 20, "Set Up Your Password", accent);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Intro
            Constraint::Length(3), // Password
            Constraint::Length(3), // Confirm
            Constraint::Length(7), // Checklist
            Constraint::Min(1),    // Hint
        ])
        .split(inner);

    f.render_widget(Paragraph::new("Protect your wallet with a strong password."), chunks[0]);
    draw_masked_input(f, chunks[1], "Password", &dialog.password, !dialog.focus_confirm, accent);
    draw_masked_input(f, chunks[2], "Confirm password", &dialog.confirm, dialog.focus_confirm, accent);

    let check_line = |label: &str, ok: bool| {
        let (mark, color) = if ok { ("✓", Color::Green) } else { ("✗", Color::Red) };
        Line::from(Span::styled(format!("{} {}", mark, label), Style::default().fg(color)))
    };
    let mut lines: Vec<Line> = score_password(dialog.password.value())
        .checks()
        .iter()
        .map(|(label, ok)| check_line(*label, *ok))
        .collect();
    lines.push(check_line(
        "Passwords match",
        passwords_match(dialog.password.value(), dialog.confirm.value()),
    ));
    f.render_widget(Paragraph::new(lines), chunks[3]);

    f.render_widget(
        Paragraph::new(Span::styled("Tab switch field | Enter confirm", Style::default().fg(Color::Gray))),
        chunks[4],
    );
}

fn draw_contact_form_dialog<B: Backend>(f: &mut Frame<B>, dialog: &ContactFormDialog, area: Rect, accent: Color) {
    let title = match dialog.mode {
        ContactFormMode::Add => "Add Contact",
        ContactFormMode::Edit(_) => "Edit Contact",
    };
    let inner = draw_popup(f, area, 56, 12, title, accent);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    draw_input(f, chunks[0], "Name", &dialog.name, !dialog.focus_address, accent);
    draw_input(f, chunks[1], "ETH address or ENS name", &dialog.address, dialog.focus_address, accent);

    let preview = normalize_recipient(dialog.address.value().trim());
    f.render_widget(
        Paragraph::new(Span::styled(format!("Saved as: {}", preview), Style::default().fg(Color::DarkGray))),
        chunks[2],
    );
    f.render_widget(
        Paragraph::new(Span::styled("Tab switch field | Enter save | Esc cancel", Style::default().fg(Color::Gray))),
        chunks[3],
    );
}

fn draw_contact_remove_dialog<B: Backend>(f: &mut Frame<B>, dialog: &ContactRemoveDialog, area: Rect) {
    let inner = draw_popup(f, area, 50, 7, "Remove Contact", Color::Red);
    let content = vec![
        Line::from(format!("Remove {} from your contacts?", dialog.name)),
        Line::from(""),
        Line::from("Press [Y] to remove or [N] to cancel"),
    ];
    f.render_widget(Paragraph::new(content).wrap(Wrap { trim: true }), inner);
}

fn draw_receipt_dialog<B: Backend>(f: &mut Frame<B>, receipt: &TransactionReceipt, network: &str, area: Rect) {
    let inner = draw_popup(f, area, 80, 13, "Transaction Receipt", Color::Green);
    let label = Style::default().fg(Color::DarkGray);
    let row = |name: &str, value: String| Line::from(vec![Span::styled(format!("{:<11}", name), label), Span::raw(value)]);
    let content = vec![
        row("Hash", receipt.hash.clone()),
        row("Amount", format!("{} {}", receipt.amount, receipt.token)),
        row("Recipient", receipt.recipient.clone()),
        row("Block", receipt.block_number.to_string()),
        row("Gas used", format!("{} gwei", receipt.gas_used)),
        row("Explorer", receipt.explorer_url(network)),
        Line::from(""),
        Line::from(Span::styled(
            "c copy hash | l copy explorer link | s share | Esc close",
            Style::default().fg(Color::Gray),
        )),
    ];
    f.render_widget(Paragraph::new(content).wrap(Wrap { trim: false }), inner);
}

fn draw_profile_dialog<B: Backend>(f: &mut Frame<B>, dialog: &ProfileEditDialog, area: Rect, accent: Color) {
    let inner = draw_popup(f, area, 56, 11, "Edit Profile", accent);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(1)])
        .split(inner);
    draw_input(f, chunks[0], "Name", &dialog.name, !dialog.focus_description, accent);
    draw_input(f, chunks[1], "Description", &dialog.description, dialog.focus_description, accent);
    f.render_widget(
        Paragraph::new(Span::styled("Tab switch field | Enter save | Esc cancel", Style::default().fg(Color::Gray))),
        chunks[2],
    );
}

fn draw_recovery_dialog<B: Backend>(f: &mut Frame<B>, dialog: &RecoveryWalletDialog, area: Rect, accent: Color) {
    let inner = draw_popup(f, area, 60, 8, "Recovery Wallet", accent);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(inner);
    draw_input(f, chunks[0], "ETH address or ENS name", &dialog.input, true, accent);
    f.render_widget(
        Paragraph::new(Span::styled("Enter save | Esc cancel", Style::default().fg(Color::Gray))),
        chunks[1],
    );
}

fn draw_help_dialog<B: Backend>(f: &mut Frame<B>, area: Rect) {
    let inner = draw_popup(f, area, 64, 20, "Help", Color::Yellow);
    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let entries = [
        ("Tab / Shift+Tab", "switch page"),
        ("Ctrl+C", "quit"),
        ("Chats: Enter", "open chat / send message"),
        ("Chats: Ctrl+T", "send crypto in the open chat"),
        ("Chats: Ctrl+D", "delete your last message"),
        ("Wallet: s", "send a transaction"),
        ("Wallet: z", "hide or show zero balances"),
        ("Wallet: r", "show the last receipt"),
        ("Contacts: Ctrl+A / Ctrl+E", "add / edit contact"),
        ("Contacts: Ctrl+D", "remove contact"),
        ("Contacts: Ctrl+S", "send to contact"),
        ("Contacts: Ctrl+Y", "copy address"),
        ("Profile: e / c", "edit profile / copy address"),
        ("Settings: Enter", "change the selected setting"),
        ("", ""),
        ("", "Press any key to close"),
    ];
    let lines: Vec<Line> = entries
        .iter()
        .map(|(k, what)| Line::from(vec![Span::styled(format!("{:<27}", k), key), Span::raw(*what)]))
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logged_out<B: Backend>(f: &mut Frame<B>, profile: &Profile, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("You have been logged out", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(format!("Press Enter to log back in as {}", profile.name)),
    ];
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(widget, area);
}

/// Toasts stacked in the top-right corner, newest last.
fn draw_notifications<B: Backend>(f: &mut Frame<B>, notifications: &[Notification], area: Rect) {
    let width = 44.min(area.width.saturating_sub(4));
    let height = 4;
    for (i, notification) in notifications.iter().enumerate() {
        let y = 1 + i as u16 * height;
        if y + height > area.height {
            break;
        }
        let popup_area = Rect::new(area.width.saturating_sub(width + 2), y, width, height);
        let color = if notification.is_error { Color::Red } else { Color::Green };
        let block = Block::default()
            .title(notification.title.clone())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        f.render_widget(Clear, popup_area);
        f.render_widget(
            Paragraph::new(notification.body.clone())
                .block(block)
                .style(Style::default().fg(color))
                .wrap(Wrap { trim: true }),
            popup_area,
        );
    }
}

pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
