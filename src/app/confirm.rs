//! The confirmation gate: one pending destructive or structural action,
//! answered yes or no.
//!
//! The target entity is captured when the prompt opens. On a yes it is
//! looked up again in the current view; if a reload removed it in the
//! meantime the action is dropped with a not-found error instead of
//! falling through to whatever is selected now.

use super::error::EngineError;
use super::jobs::Job;
use super::overlay::{MoveOverlay, MovePlan};
use super::Screen;
use crate::board::snapshot::BoardSnapshot;
use crate::ui::truncate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    ArchiveCard { card_id: String, title: String },
    DeleteCard { card_id: String, title: String },
    DeleteColumn { column_id: String, name: String },
    DeleteBoard { board_id: String, name: String },
    MoveCard(MoveOverlay),
}

/// What an affirmative answer turns into.
#[derive(Debug)]
pub enum Affirmed {
    Job(Job),
    Move { overlay: MoveOverlay, plan: MovePlan },
}

impl ConfirmAction {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::ArchiveCard { .. } => "archive-card",
            Self::DeleteCard { .. } => "delete-card",
            Self::DeleteColumn { .. } => "delete-column",
            Self::DeleteBoard { .. } => "delete-board",
            Self::MoveCard(_) => "move-card",
        }
    }

    pub fn overlay(&self) -> Option<&MoveOverlay> {
        match self {
            Self::MoveCard(overlay) => Some(overlay),
            _ => None,
        }
    }

    /// Question shown in the status line, without the `(y/n)` suffix.
    pub fn prompt(&self, snapshot: Option<&BoardSnapshot>) -> String {
        match self {
            Self::ArchiveCard { title, .. } => format!("Archive \"{}\"?", truncate(title, 30)),
            Self::DeleteCard { title, .. } => format!("Delete \"{}\"?", truncate(title, 30)),
            Self::DeleteColumn { name, .. } => format!("Delete column \"{name}\" and all its cards?"),
            Self::DeleteBoard { name, .. } => format!("Delete board \"{name}\"?"),
            Self::MoveCard(overlay) => {
                let name = |idx: usize| {
                    snapshot
                        .and_then(|s| s.column(idx))
                        .map(|c| c.column.name.clone())
                        .unwrap_or_default()
                };
                if overlay.column == overlay.origin_column {
                    format!(
                        "Reorder \"{}\" in {}?",
                        truncate(&overlay.card_title, 25),
                        name(overlay.column)
                    )
                } else {
                    format!(
                        "Move \"{}\" from {} to {}?",
                        truncate(&overlay.card_title, 20),
                        name(overlay.origin_column),
                        name(overlay.column)
                    )
                }
            }
        }
    }

    /// Re-check the captured target against the current view and build the
    /// work to issue.
    pub fn affirm(self, screen: &Screen) -> Result<Affirmed, EngineError> {
        match self {
            Self::ArchiveCard { card_id, .. } => {
                require_card(screen, &card_id)?;
                Ok(Affirmed::Job(Job::ArchiveCard { card_id }))
            }
            Self::DeleteCard { card_id, .. } => {
                require_card(screen, &card_id)?;
                Ok(Affirmed::Job(Job::DeleteCard { card_id }))
            }
            Self::DeleteColumn { column_id, .. } => {
                let present = match screen {
                    Screen::Board(session) => session.snapshot.column_index(&column_id).is_some(),
                    Screen::Picker(_) => false,
                };
                if !present {
                    return Err(EngineError::NotFound("column".into()));
                }
                Ok(Affirmed::Job(Job::DeleteColumn { column_id }))
            }
            Self::DeleteBoard { board_id, name } => {
                let present = match screen {
                    Screen::Picker(picker) => picker.boards.iter().any(|b| b.id == board_id),
                    Screen::Board(_) => false,
                };
                if !present {
                    return Err(EngineError::NotFound("board".into()));
                }
                Ok(Affirmed::Job(Job::DeleteBoard { board_id, name }))
            }
            Self::MoveCard(overlay) => {
                let Screen::Board(session) = screen else {
                    return Err(EngineError::NotFound("card".into()));
                };
                let plan = overlay
                    .plan(&session.snapshot, session.filter.as_deref())
                    .ok_or_else(|| EngineError::NotFound("card".into()))?;
                Ok(Affirmed::Move { overlay, plan })
            }
        }
    }
}

fn require_card(screen: &Screen, card_id: &str) -> Result<(), EngineError> {
    match screen {
        Screen::Board(session) if session.snapshot.find_card(card_id).is_some() => Ok(()),
        _ => Err(EngineError::NotFound("card".into())),
    }
}
