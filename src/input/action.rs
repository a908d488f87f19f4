use crate::board::Priority;

/// Direction of a card move or a move-mode step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// All semantic actions, independent of the key that produced them.
/// The dispatcher interprets some of them per screen (e.g. `New` creates a
/// board in the picker and a card on the board).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation
    FocusPrevColumn,
    FocusNextColumn,
    SelectPrev,
    SelectNext,

    // Move mode
    BeginMove(Direction),
    StepMove(Direction),
    CommitMove,
    CancelMove,

    // Card / board actions
    New,
    Open,
    Archive,
    Delete,
    EditTitle,
    EditLabels,
    EditDescription,
    EditExternalRef,
    CyclePriority,
    ClosePanel,

    // Columns
    AddColumn,
    DeleteColumn,
    SetWipLimit,
    MoveColumnLeft,
    MoveColumnRight,

    // Filter
    StartFilter,
    QuickFilter(Priority),
    ClearFilter,

    // Text input (filter prompt and input prompts)
    InputChar(char),
    InputBackspace,
    InputLeft,
    InputRight,
    InputHome,
    InputEnd,
    InputDeleteWord,
    InputConfirm,
    InputCancel,

    // Confirmation gate
    Confirm,
    Deny,

    // Screens
    SwitchBoard,
    ShowHelp,
    DismissHelp,
    Quit,
    ForceQuit,

    None,
}
