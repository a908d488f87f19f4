//! Units of storage work issued by the engine and the completion messages
//! they produce. The engine only ever builds `Job`s; a worker runs them.

use super::error::EngineError;
use super::overlay::MovePlan;
use crate::board::snapshot::BoardSnapshot;
use crate::board::{Board, Card, Priority};
use crate::store::{load_snapshot, Store};

#[derive(Debug, Clone, PartialEq)]
pub enum Job {
    ResolveBoard { name: String },
    ListBoards,
    LoadBoard(Board),
    CreateBoard { name: String },
    DeleteBoard { board_id: String, name: String },
    CreateCard { column_id: String, title: String },
    UpdateCard { card: Card, notice: String },
    ArchiveCard { card_id: String },
    DeleteCard { card_id: String },
    CommitMove(MovePlan),
    CreateColumn { board_id: String, name: String },
    DeleteColumn { column_id: String },
    ReorderColumns { board_id: String, column_ids: Vec<String> },
    SetWipLimit { column_id: String, limit: Option<u32> },
}

/// Completion message. Exactly one per job.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    BoardResolved { name: String, board: Option<Board> },
    BoardsListed(Vec<Board>),
    BoardLoaded(BoardSnapshot),
    BoardCreated(Board),
    BoardDeleted { name: String },
    /// A mutation of the open board committed; the board must reload.
    Changed { notice: String },
    CardMoved { title: String },
    MoveFailed(EngineError),
    /// A mutation failed. The board reloads in case storage moved on.
    Failed(EngineError),
    /// A read failed. Nothing to reload.
    LoadFailed(EngineError),
}

impl Job {
    fn is_read(&self) -> bool {
        matches!(self, Job::ResolveBoard { .. } | Job::ListBoards | Job::LoadBoard(_))
    }

    fn name(&self) -> &'static str {
        match self {
            Job::ResolveBoard { .. } => "resolve-board",
            Job::ListBoards => "list-boards",
            Job::LoadBoard(_) => "load-board",
            Job::CreateBoard { .. } => "create-board",
            Job::DeleteBoard { .. } => "delete-board",
            Job::CreateCard { .. } => "create-card",
            Job::UpdateCard { .. } => "update-card",
            Job::ArchiveCard { .. } => "archive-card",
            Job::DeleteCard { .. } => "delete-card",
            Job::CommitMove(_) => "commit-move",
            Job::CreateColumn { .. } => "create-column",
            Job::DeleteColumn { .. } => "delete-column",
            Job::ReorderColumns { .. } => "reorder-columns",
            Job::SetWipLimit { .. } => "set-wip-limit",
        }
    }

    /// Run against `store` and turn the outcome into a completion message.
    pub fn run(self, store: &mut dyn Store) -> Msg {
        let name = self.name();
        let is_read = self.is_read();
        let is_move = matches!(self, Job::CommitMove(_));
        tracing::debug!(job = name, "running job");

        match self.execute(store) {
            Ok(msg) => msg,
            Err(err) => {
                tracing::warn!(job = name, error = %err, "job failed");
                if is_move {
                    Msg::MoveFailed(err)
                } else if is_read {
                    Msg::LoadFailed(err)
                } else {
                    Msg::Failed(err)
                }
            }
        }
    }

    fn execute(self, store: &mut dyn Store) -> Result<Msg, EngineError> {
        let msg = match self {
            Job::ResolveBoard { name } => {
                let board = store.get_board_by_name(&name)?;
                Msg::BoardResolved { name, board }
            }
            Job::ListBoards => Msg::BoardsListed(store.list_boards()?),
            Job::LoadBoard(board) => Msg::BoardLoaded(load_snapshot(&*store, board)?),
            Job::CreateBoard { name } => Msg::BoardCreated(store.create_board(&name, "")?),
            Job::DeleteBoard { board_id, name } => {
                store.delete_board(&board_id)?;
                tracing::info!(board = %name, "deleted board");
                Msg::BoardDeleted { name }
            }
            Job::CreateCard { column_id, title } => {
                store.create_card(&column_id, &title, Priority::default())?;
                tracing::info!(column = %column_id, "created card");
                Msg::Changed { notice: "Card created".into() }
            }
            Job::UpdateCard { card, notice } => {
                store.update_card(&card)?;
                Msg::Changed { notice }
            }
            Job::ArchiveCard { card_id } => {
                store.archive_card(&card_id)?;
                tracing::info!(card = %card_id, "archived card");
                Msg::Changed { notice: "Card archived".into() }
            }
            Job::DeleteCard { card_id } => {
                store.delete_card(&card_id)?;
                tracing::info!(card = %card_id, "deleted card");
                Msg::Changed { notice: "Card deleted".into() }
            }
            Job::CommitMove(plan) => commit_move(store, plan)?,
            Job::CreateColumn { board_id, name } => {
                store.create_column(&board_id, &name)?;
                Msg::Changed { notice: format!("Column '{name}' added") }
            }
            Job::DeleteColumn { column_id } => {
                store.delete_column(&column_id)?;
                Msg::Changed { notice: "Column deleted".into() }
            }
            Job::ReorderColumns { board_id, column_ids } => {
                store.reorder_columns(&board_id, &column_ids)?;
                Msg::Changed { notice: "Column moved".into() }
            }
            Job::SetWipLimit { column_id, limit } => {
                store.update_column_wip_limit(&column_id, limit)?;
                let notice = match limit {
                    Some(n) => format!("WIP limit set to {n}"),
                    None => "WIP limit cleared".into(),
                };
                Msg::Changed { notice }
            }
        };
        Ok(msg)
    }
}

/// Capacity check first, then relocation and full reorders. A capacity
/// rejection happens before any write.
fn commit_move(store: &mut dyn Store, plan: MovePlan) -> Result<Msg, EngineError> {
    if plan.is_cross_column() {
        if let Some(limit) = plan.wip_limit {
            let count = store.count_cards_in_column(&plan.target_column_id)?;
            if count >= limit as usize {
                return Err(EngineError::Capacity { column: plan.target_column_name, limit });
            }
        }
        store.move_card(&plan.card_id, &plan.target_column_id)?;
    }
    store.reorder_cards_in_column(&plan.target_column_id, &plan.target_order)?;
    if let Some(origin_order) = &plan.origin_order {
        store.reorder_cards_in_column(&plan.origin_column_id, origin_order)?;
    }
    tracing::info!(
        card = %plan.card_id,
        from = %plan.origin_column_id,
        to = %plan.target_column_id,
        "committed move"
    );
    Ok(Msg::CardMoved { title: plan.card_title })
}
