pub mod confirm;
pub mod error;
pub mod jobs;
pub mod overlay;
pub mod text_buffer;

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;

use crate::board::filter::toggle_priority;
use crate::board::snapshot::{visible_column_count, BoardSnapshot, ColumnCards, Cursor};
use crate::board::{
    normalize_labels, parse_wip_limit, validate_board_name, validate_card_title, validate_column_name,
    Board, Card,
};
use crate::input::action::Action;
use crate::input::keymap::map_key;
use crate::worker::Worker;

pub use confirm::ConfirmAction;
pub use error::EngineError;
pub use jobs::{Job, Msg};
pub use overlay::MoveOverlay;
pub use text_buffer::TextBuffer;

use confirm::Affirmed;

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Current interaction mode. Exactly one at a time, so e.g. filtering while
/// a move is pending cannot be represented.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,
    Filtering {
        buf: TextBuffer,
    },
    Moving(MoveOverlay),
    /// Awaiting y/n. A refusal returns to `return_to`.
    Confirming {
        action: ConfirmAction,
        return_to: Box<Mode>,
    },
    Input {
        prompt: &'static str,
        buf: TextBuffer,
        target: InputTarget,
    },
    CardDetail {
        card_id: String,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputTarget {
    NewBoard,
    NewCard { column_id: String },
    EditTitle { card_id: String },
    EditLabels { card_id: String },
    EditDescription { card_id: String },
    EditExternalRef { card_id: String },
    NewColumn,
    WipLimit { column_id: String },
}

/// Notification severity for status line coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// Board list shown before a board is opened.
#[derive(Debug, Clone, Default)]
pub struct PickerState {
    pub boards: Vec<Board>,
    pub selected: usize,
    pub filter: Option<String>,
    pub loading: bool,
}

impl PickerState {
    pub fn loading() -> Self {
        Self { loading: true, ..Self::default() }
    }

    /// Boards whose name or description contains the filter.
    pub fn visible(&self) -> Vec<&Board> {
        match self.filter.as_deref() {
            Some(f) if !f.is_empty() => {
                let needle = f.to_lowercase();
                self.boards
                    .iter()
                    .filter(|b| {
                        b.name.to_lowercase().contains(&needle)
                            || b.description.to_lowercase().contains(&needle)
                    })
                    .collect()
            }
            _ => self.boards.iter().collect(),
        }
    }

    pub fn selected_board(&self) -> Option<&Board> {
        self.visible().get(self.selected).copied()
    }

    fn clamp(&mut self) {
        let n = self.visible().len();
        if self.selected >= n {
            self.selected = n.saturating_sub(1);
        }
    }
}

/// An open board: its snapshot plus the transient view state over it.
#[derive(Debug, Clone)]
pub struct BoardSession {
    pub snapshot: BoardSnapshot,
    pub cursor: Cursor,
    pub filter: Option<String>,
    /// True until the first snapshot arrives.
    pub loading: bool,
}

impl BoardSession {
    pub fn new(snapshot: BoardSnapshot) -> Self {
        Self { snapshot, cursor: Cursor::default(), filter: None, loading: false }
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn focused_column(&self) -> Option<&ColumnCards> {
        self.snapshot.column(self.cursor.column)
    }

    pub fn selected_card(&self) -> Option<&Card> {
        self.snapshot
            .visible_cards(self.cursor.column, self.filter())
            .get(self.cursor.card)
            .copied()
    }

    fn clamp(&mut self, visible_columns: usize) {
        self.cursor.clamp(&self.snapshot, self.filter.as_deref());
        self.cursor.adjust_scroll(visible_columns, self.snapshot.columns.len());
    }

    /// Point the cursor at the overlay's hypothesis.
    fn follow(&mut self, overlay: &MoveOverlay, visible_columns: usize) {
        self.cursor.column = overlay.column;
        self.cursor.card = overlay.cursor;
        self.cursor.adjust_scroll(visible_columns, self.snapshot.columns.len());
    }

    /// Put the cursor back where it was before the move started.
    fn restore(&mut self, overlay: &MoveOverlay, visible_columns: usize) {
        self.cursor = overlay.origin_cursor(self.cursor.scroll);
        self.cursor.adjust_scroll(visible_columns, self.snapshot.columns.len());
    }
}

#[derive(Debug, Clone)]
pub enum Screen {
    Picker(PickerState),
    Board(BoardSession),
}

/// Global application state.
pub struct AppState {
    pub mode: Mode,
    pub screen: Screen,
    pub notification: Option<String>,
    pub notification_level: NotificationLevel,
    pub notification_expires: Option<Instant>,
    pub should_quit: bool,
    /// Board name detected at startup; pre-fills the new board prompt.
    pub detected_board: Option<String>,
    pub column_width: u16,
    pub viewport_width: u16,
    auto_open: bool,
    outbox: Vec<Job>,
}

impl AppState {
    pub fn new(column_width: u16, detected_board: Option<String>) -> Self {
        Self {
            mode: Mode::Normal,
            screen: Screen::Picker(PickerState::loading()),
            notification: None,
            notification_level: NotificationLevel::Info,
            notification_expires: None,
            should_quit: false,
            detected_board,
            column_width,
            viewport_width: 80,
            auto_open: true,
            outbox: Vec::new(),
        }
    }

    /// Issue the initial load: open the detected board if it exists,
    /// otherwise list boards.
    pub fn start(&mut self) {
        match self.detected_board.clone() {
            Some(name) => self.outbox.push(Job::ResolveBoard { name }),
            None => self.outbox.push(Job::ListBoards),
        }
    }

    /// Jobs issued since the last call, in issue order.
    pub fn take_jobs(&mut self) -> Vec<Job> {
        std::mem::take(&mut self.outbox)
    }

    pub fn session(&self) -> Option<&BoardSession> {
        match &self.screen {
            Screen::Board(session) => Some(session),
            Screen::Picker(_) => None,
        }
    }

    /// The move overlay, while moving or while a move awaits confirmation.
    pub fn overlay(&self) -> Option<&MoveOverlay> {
        match &self.mode {
            Mode::Moving(overlay) => Some(overlay),
            Mode::Confirming { action, .. } => action.overlay(),
            _ => None,
        }
    }

    pub fn active_filter(&self) -> Option<&str> {
        match &self.screen {
            Screen::Board(session) => session.filter(),
            Screen::Picker(picker) => picker.filter.as_deref(),
        }
    }

    /// Number of board columns that fit in the viewport.
    pub fn visible_columns(&self) -> usize {
        let total = self.session().map_or(0, |s| s.snapshot.columns.len());
        visible_column_count(self.viewport_width, self.column_width, total)
    }

    pub fn set_viewport_width(&mut self, width: u16) {
        self.viewport_width = width;
        let visible = self.visible_columns();
        if let Screen::Board(session) = &mut self.screen {
            session.cursor.adjust_scroll(visible, session.snapshot.columns.len());
        }
    }

    /// Open the gate for `action`, remembering the mode to return to on a
    /// refusal. A move always falls back to Normal once its overlay is undone.
    fn begin_confirm(&mut self, action: ConfirmAction) {
        tracing::debug!(action = action.tag(), "awaiting confirmation");
        let from = std::mem::replace(&mut self.mode, Mode::Normal);
        let return_to = match (&action, from) {
            (ConfirmAction::MoveCard(_), _) => Mode::Normal,
            (_, from) => from,
        };
        self.mode = Mode::Confirming {
            action,
            return_to: Box::new(return_to),
        };
    }

    /// Re-enter `mode` after the gate closes. A detail panel whose card is
    /// gone from the snapshot falls back to Normal.
    fn resume(&mut self, mode: Mode) {
        let card_gone = match &mode {
            Mode::CardDetail { card_id } => self
                .session()
                .is_some_and(|s| s.snapshot.find_card(card_id).is_none()),
            _ => false,
        };
        self.mode = if card_gone { Mode::Normal } else { mode };
    }

    /// Show a transient notification.
    pub fn notify(&mut self, msg: impl Into<String>) {
        self.notification = Some(msg.into());
        self.notification_level = NotificationLevel::Info;
        self.notification_expires = Some(Instant::now() + NOTIFICATION_TTL);
    }

    /// Show an error notification (rendered in red) until the next key.
    pub fn notify_error(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        tracing::warn!(error = %msg, "surfacing error");
        self.notification = Some(msg);
        self.notification_level = NotificationLevel::Error;
        self.notification_expires = None;
    }

    /// Clear expired notifications.
    pub fn tick_notification(&mut self) {
        if let Some(expires) = self.notification_expires {
            if Instant::now() >= expires {
                self.dismiss_notification();
            }
        }
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
        self.notification_level = NotificationLevel::Info;
        self.notification_expires = None;
    }

    /// Re-read whatever the current screen shows.
    pub fn reload(&mut self) {
        let job = match &self.screen {
            Screen::Board(session) => Job::LoadBoard(session.snapshot.board.clone()),
            Screen::Picker(_) => Job::ListBoards,
        };
        self.outbox.push(job);
    }

    fn open_board(&mut self, board: Board) {
        tracing::info!(board = %board.name, "opening board");
        self.mode = Mode::Normal;
        self.auto_open = false;
        let mut session = BoardSession::new(BoardSnapshot::empty(board.clone()));
        session.loading = true;
        self.screen = Screen::Board(session);
        self.outbox.push(Job::LoadBoard(board));
    }

    fn show_picker(&mut self) {
        self.mode = Mode::Normal;
        self.screen = Screen::Picker(PickerState::loading());
        self.outbox.push(Job::ListBoards);
    }
}

/// Main TUI loop: flush jobs, apply finished messages, render, read a key.
pub fn run(terminal: &mut DefaultTerminal, state: &mut AppState, worker: &Worker) -> color_eyre::Result<()> {
    state.set_viewport_width(terminal.size()?.width);
    state.start();

    loop {
        for job in state.take_jobs() {
            worker.submit(job)?;
        }
        while let Some(msg) = worker.try_recv()? {
            handle_msg(state, msg);
            for job in state.take_jobs() {
                worker.submit(job)?;
            }
        }

        state.tick_notification();
        terminal.draw(|f| crate::ui::render(f, state))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let action = map_key(key, &state.mode);
                    process_action(state, action);
                }
                Event::Resize(width, _) => state.set_viewport_width(width),
                _ => {}
            }
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

pub fn process_action(state: &mut AppState, action: Action) {
    if action == Action::ForceQuit {
        tracing::info!("quit requested");
        state.should_quit = true;
        return;
    }
    state.dismiss_notification();

    match action {
        Action::None | Action::ForceQuit => {}

        Action::FocusPrevColumn | Action::FocusNextColumn | Action::SelectPrev | Action::SelectNext => {
            handle_navigation(state, action);
        }

        Action::BeginMove(_) | Action::StepMove(_) | Action::CommitMove | Action::CancelMove => {
            handle_move(state, action);
        }

        Action::New
        | Action::Open
        | Action::Archive
        | Action::Delete
        | Action::EditTitle
        | Action::EditLabels
        | Action::EditDescription
        | Action::EditExternalRef
        | Action::CyclePriority
        | Action::ClosePanel => {
            handle_card_action(state, action);
        }

        Action::AddColumn
        | Action::DeleteColumn
        | Action::SetWipLimit
        | Action::MoveColumnLeft
        | Action::MoveColumnRight => {
            handle_column_action(state, action);
        }

        Action::StartFilter | Action::QuickFilter(_) | Action::ClearFilter => {
            handle_filter(state, action);
        }

        Action::InputChar(_)
        | Action::InputBackspace
        | Action::InputLeft
        | Action::InputRight
        | Action::InputHome
        | Action::InputEnd
        | Action::InputDeleteWord
        | Action::InputConfirm
        | Action::InputCancel => {
            handle_input(state, action);
        }

        Action::Confirm => handle_confirm(state, true),
        Action::Deny => handle_confirm(state, false),

        Action::SwitchBoard => {
            if matches!(state.mode, Mode::Normal) && state.session().is_some() {
                state.show_picker();
            }
        }
        Action::ShowHelp => {
            if matches!(state.mode, Mode::Normal) {
                state.mode = Mode::Help;
            }
        }
        Action::DismissHelp => state.mode = Mode::Normal,
        Action::Quit => {
            if matches!(state.mode, Mode::Normal) {
                state.should_quit = true;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Handler: Navigation (column focus, card selection, picker selection)
// ---------------------------------------------------------------------------

fn handle_navigation(state: &mut AppState, action: Action) {
    if !matches!(state.mode, Mode::Normal) {
        return;
    }
    let visible = state.visible_columns();
    match &mut state.screen {
        Screen::Picker(picker) => {
            let n = picker.visible().len();
            match action {
                Action::SelectNext if picker.selected + 1 < n => picker.selected += 1,
                Action::SelectPrev => picker.selected = picker.selected.saturating_sub(1),
                _ => {}
            }
        }
        Screen::Board(session) => match action {
            Action::FocusPrevColumn if session.cursor.column > 0 => {
                session.cursor.column -= 1;
                session.clamp(visible);
            }
            Action::FocusNextColumn if session.cursor.column + 1 < session.snapshot.columns.len() => {
                session.cursor.column += 1;
                session.clamp(visible);
            }
            Action::SelectNext => {
                let n = session.snapshot.visible_cards(session.cursor.column, session.filter()).len();
                if session.cursor.card + 1 < n {
                    session.cursor.card += 1;
                }
            }
            Action::SelectPrev => session.cursor.card = session.cursor.card.saturating_sub(1),
            _ => {}
        },
    }
}

// ---------------------------------------------------------------------------
// Handler: Move mode (enter, step, commit request, cancel)
// ---------------------------------------------------------------------------

fn handle_move(state: &mut AppState, action: Action) {
    let visible = state.visible_columns();
    let Screen::Board(session) = &mut state.screen else {
        return;
    };
    let filter = session.filter.clone();
    let filter = filter.as_deref();

    match action {
        Action::BeginMove(direction) => {
            if !matches!(state.mode, Mode::Normal) {
                return;
            }
            match MoveOverlay::begin(&session.snapshot, filter, &session.cursor, direction) {
                Some(overlay) => {
                    tracing::debug!(card = %overlay.card_id, ?direction, "entering move mode");
                    session.follow(&overlay, visible);
                    state.mode = Mode::Moving(overlay);
                }
                None => tracing::debug!(?direction, "move not started: no card or no target"),
            }
        }
        Action::StepMove(direction) => {
            if let Mode::Moving(overlay) = &mut state.mode {
                if !overlay.committing {
                    overlay.step(&session.snapshot, filter, direction);
                    session.follow(overlay, visible);
                }
            }
        }
        Action::CommitMove => {
            let Mode::Moving(overlay) = &state.mode else {
                return;
            };
            if overlay.committing {
                return;
            }
            if overlay.is_at_origin() {
                tracing::debug!("move ended at its origin, nothing to commit");
                session.restore(overlay, visible);
                state.mode = Mode::Normal;
            } else {
                let action = ConfirmAction::MoveCard(overlay.clone());
                state.begin_confirm(action);
            }
        }
        Action::CancelMove => {
            let Mode::Moving(overlay) = &state.mode else {
                return;
            };
            if overlay.committing {
                return;
            }
            tracing::debug!("move cancelled");
            session.restore(overlay, visible);
            state.mode = Mode::Normal;
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Handler: Card actions (new, detail, archive/delete, edits)
// ---------------------------------------------------------------------------

fn handle_card_action(state: &mut AppState, action: Action) {
    if matches!(state.screen, Screen::Picker(_)) {
        handle_picker_action(state, action);
        return;
    }
    let Screen::Board(session) = &state.screen else {
        return;
    };
    let in_detail = matches!(state.mode, Mode::CardDetail { .. });
    let card = match &state.mode {
        Mode::CardDetail { card_id } => session.snapshot.find_card(card_id).map(|(_, c)| c.clone()),
        Mode::Normal => session.selected_card().cloned(),
        _ => return,
    };
    let column_id = session.focused_column().map(|c| c.column.id.clone());

    match action {
        Action::New if !in_detail => match column_id {
            Some(column_id) => {
                state.mode = Mode::Input {
                    prompt: "New card",
                    buf: TextBuffer::empty(),
                    target: InputTarget::NewCard { column_id },
                };
            }
            None => state.notify_error("No column to add a card to"),
        },
        Action::Open if !in_detail => {
            if let Some(card) = card {
                state.mode = Mode::CardDetail { card_id: card.id };
            }
        }
        Action::ClosePanel => state.mode = Mode::Normal,
        Action::Archive | Action::Delete => {
            if let Some(card) = card {
                let pending = if action == Action::Archive {
                    ConfirmAction::ArchiveCard { card_id: card.id, title: card.title }
                } else {
                    ConfirmAction::DeleteCard { card_id: card.id, title: card.title }
                };
                state.begin_confirm(pending);
            }
        }
        Action::EditTitle => {
            if let Some(card) = card {
                state.mode = Mode::Input {
                    prompt: "Title",
                    buf: TextBuffer::new(card.title),
                    target: InputTarget::EditTitle { card_id: card.id },
                };
            }
        }
        Action::EditLabels => {
            if let Some(card) = card {
                state.mode = Mode::Input {
                    prompt: "Labels (comma separated)",
                    buf: TextBuffer::new(card.labels),
                    target: InputTarget::EditLabels { card_id: card.id },
                };
            }
        }
        Action::EditDescription if in_detail => {
            if let Some(card) = card {
                state.mode = Mode::Input {
                    prompt: "Description",
                    buf: TextBuffer::new(card.description),
                    target: InputTarget::EditDescription { card_id: card.id },
                };
            }
        }
        Action::EditExternalRef if in_detail => {
            if let Some(card) = card {
                state.mode = Mode::Input {
                    prompt: "External ref",
                    buf: TextBuffer::new(card.external_ref.unwrap_or_default()),
                    target: InputTarget::EditExternalRef { card_id: card.id },
                };
            }
        }
        Action::CyclePriority => {
            if let Some(mut card) = card {
                card.priority = card.priority.next();
                let notice = format!("Priority: {}", card.priority);
                state.outbox.push(Job::UpdateCard { card, notice });
            }
        }
        _ => {}
    }
}

fn handle_picker_action(state: &mut AppState, action: Action) {
    if !matches!(state.mode, Mode::Normal) {
        return;
    }
    let Screen::Picker(picker) = &state.screen else {
        return;
    };
    let selected = picker.selected_board().cloned();

    match action {
        Action::New => {
            let name = state.detected_board.clone().unwrap_or_default();
            state.mode = Mode::Input {
                prompt: "New board",
                buf: TextBuffer::new(name),
                target: InputTarget::NewBoard,
            };
        }
        Action::Open => {
            if let Some(board) = selected {
                state.open_board(board);
            }
        }
        Action::Archive | Action::Delete => {
            if let Some(board) = selected {
                state.begin_confirm(ConfirmAction::DeleteBoard {
                    board_id: board.id,
                    name: board.name,
                });
            }
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Handler: Columns (add, delete, WIP limit, reorder)
// ---------------------------------------------------------------------------

fn handle_column_action(state: &mut AppState, action: Action) {
    if !matches!(state.mode, Mode::Normal) {
        return;
    }
    let visible = state.visible_columns();
    let Screen::Board(session) = &mut state.screen else {
        return;
    };
    let focused = session.cursor.column;
    let column = session.focused_column().map(|c| c.column.clone());

    match action {
        Action::AddColumn => {
            state.mode = Mode::Input {
                prompt: "New column",
                buf: TextBuffer::empty(),
                target: InputTarget::NewColumn,
            };
        }
        Action::DeleteColumn => {
            if let Some(col) = column {
                state.begin_confirm(ConfirmAction::DeleteColumn {
                    column_id: col.id,
                    name: col.name,
                });
            }
        }
        Action::SetWipLimit => {
            if let Some(col) = column {
                let current = col.wip_limit.map(|n| n.to_string()).unwrap_or_default();
                state.mode = Mode::Input {
                    prompt: "WIP limit (empty or 0 clears)",
                    buf: TextBuffer::new(current),
                    target: InputTarget::WipLimit { column_id: col.id },
                };
            }
        }
        Action::MoveColumnLeft | Action::MoveColumnRight => {
            let len = session.snapshot.columns.len();
            let target = if action == Action::MoveColumnLeft {
                focused.checked_sub(1)
            } else {
                (focused + 1 < len).then_some(focused + 1)
            };
            let Some(target) = target else {
                return;
            };
            let mut column_ids: Vec<String> =
                session.snapshot.columns.iter().map(|c| c.column.id.clone()).collect();
            column_ids.swap(focused, target);
            session.cursor.column = target;
            session.cursor.adjust_scroll(visible, len);
            let board_id = session.snapshot.board.id.clone();
            state.outbox.push(Job::ReorderColumns { board_id, column_ids });
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Handler: Filter (prompt, priority toggles, clear)
// ---------------------------------------------------------------------------

fn handle_filter(state: &mut AppState, action: Action) {
    if !matches!(state.mode, Mode::Normal) {
        return;
    }
    if action == Action::StartFilter {
        let current = state.active_filter().unwrap_or_default().to_string();
        state.mode = Mode::Filtering { buf: TextBuffer::new(current) };
        return;
    }

    let visible = state.visible_columns();
    match (&mut state.screen, action) {
        (Screen::Board(session), Action::QuickFilter(priority)) => {
            session.filter = toggle_priority(session.filter.as_deref(), priority);
            tracing::debug!(filter = ?session.filter, "priority filter toggled");
            session.clamp(visible);
        }
        (Screen::Board(session), Action::ClearFilter) => {
            if session.filter.take().is_some() {
                session.cursor.card = 0;
                session.clamp(visible);
            }
        }
        (Screen::Picker(picker), Action::ClearFilter) => {
            if picker.filter.take().is_some() {
                picker.selected = 0;
            }
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Handler: Text input (filter prompt and input prompts)
// ---------------------------------------------------------------------------

fn handle_input(state: &mut AppState, action: Action) {
    match action {
        Action::InputConfirm => return handle_input_confirm(state),
        Action::InputCancel => return handle_input_cancel(state),
        _ => {}
    }
    let buf = match &mut state.mode {
        Mode::Filtering { buf } | Mode::Input { buf, .. } => buf,
        _ => return,
    };
    match action {
        Action::InputChar(c) => buf.insert(c),
        Action::InputBackspace => buf.backspace(),
        Action::InputLeft => buf.move_left(),
        Action::InputRight => buf.move_right(),
        Action::InputHome => buf.home(),
        Action::InputEnd => buf.end(),
        Action::InputDeleteWord => buf.delete_word(),
        _ => {}
    }
}

fn handle_input_confirm(state: &mut AppState) {
    let visible = state.visible_columns();
    match std::mem::replace(&mut state.mode, Mode::Normal) {
        Mode::Filtering { buf } => {
            let filter = buf.submitted();
            tracing::debug!(?filter, "filter applied");
            match &mut state.screen {
                Screen::Board(session) => {
                    session.filter = filter;
                    session.clamp(visible);
                }
                Screen::Picker(picker) => {
                    picker.filter = filter;
                    picker.selected = 0;
                }
            }
        }
        Mode::Input { buf, target, .. } => match input_job(state, target, &buf) {
            Ok(Some(job)) => state.outbox.push(job),
            Ok(None) => {}
            Err(err) => state.notify_error(err.to_string()),
        },
        other => state.mode = other,
    }
}

fn handle_input_cancel(state: &mut AppState) {
    let visible = state.visible_columns();
    match std::mem::replace(&mut state.mode, Mode::Normal) {
        Mode::Filtering { .. } => match &mut state.screen {
            Screen::Board(session) => {
                session.filter = None;
                session.clamp(visible);
            }
            Screen::Picker(picker) => {
                picker.filter = None;
                picker.clamp();
            }
        },
        Mode::Input { .. } => {}
        other => state.mode = other,
    }
}

/// Validate a submitted prompt and build its job. `Ok(None)` means the
/// prompt was left blank and is simply dropped.
fn input_job(state: &AppState, target: InputTarget, buf: &TextBuffer) -> Result<Option<Job>, EngineError> {
    let session = state.session();
    let job = match target {
        InputTarget::NewBoard => {
            let Some(name) = buf.submitted() else {
                return Ok(None);
            };
            validate_board_name(&name)?;
            Job::CreateBoard { name }
        }
        InputTarget::NewCard { column_id } => {
            let title = buf.input.trim().to_string();
            validate_card_title(&title)?;
            Job::CreateCard { column_id, title }
        }
        InputTarget::EditTitle { card_id } => {
            let title = buf.input.trim().to_string();
            validate_card_title(&title)?;
            let mut card = find_card(session, &card_id)?;
            card.title = title;
            Job::UpdateCard { card, notice: "Title updated".into() }
        }
        InputTarget::EditLabels { card_id } => {
            let mut card = find_card(session, &card_id)?;
            card.labels = normalize_labels(&buf.input);
            Job::UpdateCard { card, notice: "Labels updated".into() }
        }
        InputTarget::EditDescription { card_id } => {
            let mut card = find_card(session, &card_id)?;
            card.description = buf.input.trim().to_string();
            Job::UpdateCard { card, notice: "Description updated".into() }
        }
        InputTarget::EditExternalRef { card_id } => {
            let mut card = find_card(session, &card_id)?;
            card.external_ref = buf.submitted();
            Job::UpdateCard { card, notice: "External ref updated".into() }
        }
        InputTarget::NewColumn => {
            let Some(name) = buf.submitted() else {
                return Ok(None);
            };
            validate_column_name(&name)?;
            let board_id = session
                .map(|s| s.snapshot.board.id.clone())
                .ok_or_else(|| EngineError::NotFound("board".into()))?;
            Job::CreateColumn { board_id, name }
        }
        InputTarget::WipLimit { column_id } => Job::SetWipLimit {
            column_id,
            limit: parse_wip_limit(&buf.input)?,
        },
    };
    Ok(Some(job))
}

fn find_card(session: Option<&BoardSession>, card_id: &str) -> Result<Card, EngineError> {
    session
        .and_then(|s| s.snapshot.find_card(card_id))
        .map(|(_, card)| card.clone())
        .ok_or_else(|| EngineError::NotFound("card".into()))
}

// ---------------------------------------------------------------------------
// Handler: Confirmation gate
// ---------------------------------------------------------------------------

fn handle_confirm(state: &mut AppState, affirmative: bool) {
    let Mode::Confirming { action, return_to } = std::mem::replace(&mut state.mode, Mode::Normal) else {
        return;
    };
    let visible = state.visible_columns();
    let pending_move = action.overlay().cloned();

    if !affirmative {
        tracing::debug!(action = action.tag(), "confirmation declined");
        if let (Some(overlay), Screen::Board(session)) = (&pending_move, &mut state.screen) {
            session.restore(overlay, visible);
        }
        state.resume(*return_to);
        return;
    }

    tracing::info!(action = action.tag(), "confirmed");
    match action.affirm(&state.screen) {
        Ok(Affirmed::Job(job)) => state.outbox.push(job),
        Ok(Affirmed::Move { mut overlay, plan }) => {
            overlay.committing = true;
            state.mode = Mode::Moving(overlay);
            state.outbox.push(Job::CommitMove(plan));
        }
        Err(err) => {
            if let (Some(overlay), Screen::Board(session)) = (&pending_move, &mut state.screen) {
                session.restore(overlay, visible);
            }
            state.resume(*return_to);
            state.notify_error(err.to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Completion messages
// ---------------------------------------------------------------------------

pub fn handle_msg(state: &mut AppState, msg: Msg) {
    match msg {
        Msg::BoardResolved { name, board: Some(board) } => {
            tracing::debug!(board = %name, "detected board exists");
            state.open_board(board);
        }
        Msg::BoardResolved { name, board: None } => {
            tracing::debug!(board = %name, "detected board not found, listing boards");
            state.outbox.push(Job::ListBoards);
        }
        Msg::BoardsListed(boards) => {
            let auto_open = std::mem::replace(&mut state.auto_open, false);
            if let Screen::Picker(picker) = &mut state.screen {
                picker.boards = boards;
                picker.loading = false;
                picker.clamp();
                if auto_open && picker.boards.len() == 1 {
                    let only = picker.boards[0].clone();
                    state.open_board(only);
                }
            }
        }
        Msg::BoardLoaded(snapshot) => apply_snapshot(state, snapshot),
        Msg::BoardCreated(board) => {
            state.notify(format!("Board '{}' created", board.name));
            state.open_board(board);
        }
        Msg::BoardDeleted { name } => {
            state.notify(format!("Board '{name}' deleted"));
            state.reload();
        }
        Msg::Changed { notice } => {
            state.notify(notice);
            state.reload();
        }
        Msg::CardMoved { title } => {
            let visible = state.visible_columns();
            if let (Mode::Moving(overlay), Screen::Board(session)) = (&state.mode, &mut state.screen) {
                session.follow(overlay, visible);
            }
            tracing::debug!(card = %title, "move completed");
            state.mode = Mode::Normal;
            state.notify("Card moved");
            state.reload();
        }
        Msg::MoveFailed(err) => {
            let visible = state.visible_columns();
            if let (Mode::Moving(overlay), Screen::Board(session)) = (&state.mode, &mut state.screen) {
                session.restore(overlay, visible);
            }
            state.mode = Mode::Normal;
            state.notify_error(err.to_string());
            state.reload();
        }
        Msg::Failed(err) => {
            state.notify_error(err.to_string());
            state.reload();
        }
        Msg::LoadFailed(err) => {
            match &mut state.screen {
                Screen::Picker(picker) => picker.loading = false,
                Screen::Board(session) => session.loading = false,
            }
            state.notify_error(err.to_string());
        }
    }
}

/// Replace the open board's snapshot and pull transient state back inside it.
fn apply_snapshot(state: &mut AppState, snapshot: BoardSnapshot) {
    let visible = visible_column_count(state.viewport_width, state.column_width, snapshot.columns.len());
    let Screen::Board(session) = &mut state.screen else {
        return;
    };
    if session.snapshot.board.id != snapshot.board.id {
        tracing::debug!(board = %snapshot.board.name, "ignoring snapshot for a board that is not open");
        return;
    }
    session.snapshot = snapshot;
    session.loading = false;

    let mut move_dropped = false;
    let mut detail_closed = false;
    match &mut state.mode {
        Mode::Moving(overlay) if overlay.committing => {}
        Mode::Moving(overlay)
        | Mode::Confirming {
            action: ConfirmAction::MoveCard(overlay),
            ..
        } => {
            if overlay.is_valid(&session.snapshot) {
                let slots = overlay.slots(&session.snapshot, session.filter.as_deref(), overlay.column);
                overlay.cursor = overlay.cursor.min(slots);
                session.follow(overlay, visible);
                return;
            }
            session.restore(overlay, visible);
            move_dropped = true;
        }
        Mode::CardDetail { card_id } => {
            detail_closed = session.snapshot.find_card(card_id).is_none();
        }
        _ => {}
    }
    session.clamp(visible);

    if move_dropped {
        state.mode = Mode::Normal;
        state.notify_error("Move cancelled: the card is no longer in its column");
    }
    if detail_closed {
        state.mode = Mode::Normal;
    }
}
