use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::action::{Action, Direction};
use crate::app::Mode;
use crate::board::Priority;

/// Map a key event to a semantic action based on current mode.
///
/// Ctrl+C is checked before anything else. The mode match then encodes the
/// routing precedence: text capture wins over the gate, the gate over move
/// mode, move mode over normal bindings.
pub fn map_key(key: KeyEvent, mode: &Mode) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::ForceQuit;
    }
    match mode {
        Mode::Filtering { .. } | Mode::Input { .. } => map_input(key),
        Mode::Confirming { .. } => map_confirm(key),
        Mode::Moving(_) => map_moving(key),
        Mode::Normal => map_normal(key),
        Mode::CardDetail { .. } => map_detail(key),
        Mode::Help => Action::DismissHelp,
    }
}

fn map_normal(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => Action::FocusPrevColumn,
        KeyCode::Char('l') | KeyCode::Right => Action::FocusNextColumn,
        KeyCode::Char('j') | KeyCode::Down => Action::SelectNext,
        KeyCode::Char('k') | KeyCode::Up => Action::SelectPrev,
        KeyCode::Char('H') => Action::BeginMove(Direction::Left),
        KeyCode::Char('L') => Action::BeginMove(Direction::Right),
        KeyCode::Char('J') => Action::BeginMove(Direction::Down),
        KeyCode::Char('K') => Action::BeginMove(Direction::Up),
        KeyCode::Enter => Action::Open,
        KeyCode::Char('n') => Action::New,
        KeyCode::Char('e') => Action::EditTitle,
        KeyCode::Char('d') => Action::Archive,
        KeyCode::Char('D') => Action::Delete,
        KeyCode::Char('C') => Action::AddColumn,
        KeyCode::Char('X') => Action::DeleteColumn,
        KeyCode::Char('w') => Action::SetWipLimit,
        KeyCode::Char('<') => Action::MoveColumnLeft,
        KeyCode::Char('>') => Action::MoveColumnRight,
        KeyCode::Char('/') => Action::StartFilter,
        KeyCode::Char('1') => Action::QuickFilter(Priority::Urgent),
        KeyCode::Char('2') => Action::QuickFilter(Priority::High),
        KeyCode::Char('3') => Action::QuickFilter(Priority::Medium),
        KeyCode::Char('4') => Action::QuickFilter(Priority::Low),
        KeyCode::Esc => Action::ClearFilter,
        KeyCode::Char('b') => Action::SwitchBoard,
        KeyCode::Char('?') => Action::ShowHelp,
        KeyCode::Char('q') => Action::Quit,
        _ => Action::None,
    }
}

fn map_moving(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('h' | 'H') | KeyCode::Left => Action::StepMove(Direction::Left),
        KeyCode::Char('l' | 'L') | KeyCode::Right => Action::StepMove(Direction::Right),
        KeyCode::Char('j' | 'J') | KeyCode::Down => Action::StepMove(Direction::Down),
        KeyCode::Char('k' | 'K') | KeyCode::Up => Action::StepMove(Direction::Up),
        KeyCode::Enter => Action::CommitMove,
        KeyCode::Esc => Action::CancelMove,
        _ => Action::None,
    }
}

fn map_detail(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Action::ClosePanel,
        KeyCode::Char('e') => Action::EditTitle,
        KeyCode::Char('t') => Action::EditLabels,
        KeyCode::Char('p') => Action::CyclePriority,
        KeyCode::Char('i') => Action::EditDescription,
        KeyCode::Char('x') => Action::EditExternalRef,
        KeyCode::Char('d') => Action::Archive,
        KeyCode::Char('D') => Action::Delete,
        _ => Action::None,
    }
}

fn map_input(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::InputConfirm,
        KeyCode::Esc => Action::InputCancel,
        KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::InputHome,
        KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::InputEnd,
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Action::InputDeleteWord
        }
        KeyCode::Char(c) => Action::InputChar(c),
        KeyCode::Backspace => Action::InputBackspace,
        KeyCode::Left => Action::InputLeft,
        KeyCode::Right => Action::InputRight,
        KeyCode::Home => Action::InputHome,
        KeyCode::End => Action::InputEnd,
        _ => Action::None,
    }
}

/// Only `y`/`Y` affirm; every other key is a refusal.
fn map_confirm(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('y' | 'Y') => Action::Confirm,
        _ => Action::Deny,
    }
}

// ---------------------------------------------------------------------------
// Binding registry used by the help overlay.
// ---------------------------------------------------------------------------

/// A documented keybinding for display in help and hints.
pub struct Binding {
    pub key: &'static str,
    pub description: &'static str,
}

/// A group of related bindings (one section in help).
pub struct BindingGroup {
    pub name: &'static str,
    pub bindings: &'static [Binding],
}

pub const BOARD_BINDINGS: &[Binding] = &[
    Binding { key: "h / l", description: "Switch columns" },
    Binding { key: "j / k", description: "Move between cards" },
    Binding { key: "H/J/K/L", description: "Move card" },
    Binding { key: "Enter", description: "Open card detail" },
    Binding { key: "n", description: "New card" },
    Binding { key: "e", description: "Edit title" },
    Binding { key: "d", description: "Archive card" },
    Binding { key: "D", description: "Delete card" },
    Binding { key: "/", description: "Filter cards" },
    Binding { key: "1-4", description: "Priority filter" },
    Binding { key: "Esc", description: "Clear filter" },
    Binding { key: "b", description: "Switch board" },
    Binding { key: "?", description: "Help" },
    Binding { key: "q", description: "Quit" },
];

pub const COLUMN_BINDINGS: &[Binding] = &[
    Binding { key: "C", description: "Add column" },
    Binding { key: "X", description: "Delete focused column" },
    Binding { key: "w", description: "Set WIP limit" },
    Binding { key: "< / >", description: "Move column left/right" },
];

pub const MOVE_BINDINGS: &[Binding] = &[
    Binding { key: "h/j/k/l", description: "Choose position" },
    Binding { key: "Enter", description: "Confirm move" },
    Binding { key: "Esc", description: "Cancel" },
];

pub const DETAIL_BINDINGS: &[Binding] = &[
    Binding { key: "e", description: "Edit title" },
    Binding { key: "t", description: "Edit labels" },
    Binding { key: "p", description: "Cycle priority" },
    Binding { key: "i", description: "Edit description" },
    Binding { key: "x", description: "Edit external reference" },
    Binding { key: "d / D", description: "Archive / delete" },
    Binding { key: "Esc", description: "Close" },
];

pub const PICKER_BINDINGS: &[Binding] = &[
    Binding { key: "j / k", description: "Select board" },
    Binding { key: "Enter", description: "Open board" },
    Binding { key: "n", description: "New board" },
    Binding { key: "d", description: "Delete board" },
    Binding { key: "/", description: "Filter boards" },
    Binding { key: "q", description: "Quit" },
];

/// All binding groups for the help overlay.
pub const HELP_GROUPS: &[BindingGroup] = &[
    BindingGroup { name: "Board", bindings: BOARD_BINDINGS },
    BindingGroup { name: "Columns", bindings: COLUMN_BINDINGS },
    BindingGroup { name: "Move Mode", bindings: MOVE_BINDINGS },
    BindingGroup { name: "Card Detail", bindings: DETAIL_BINDINGS },
    BindingGroup { name: "Board Picker", bindings: PICKER_BINDINGS },
];
