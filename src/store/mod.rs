//! Persistence adapter: the single authority for durable ordering and
//! uniqueness. The engine never talks to it directly; jobs do.

pub mod sqlite;

use crate::board::snapshot::{BoardSnapshot, ColumnCards};
use crate::board::{Board, Card, Column, Priority, ValidationError};

pub use sqlite::SqliteStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("card is already archived")]
    AlreadyArchived,
    #[error("card is already deleted")]
    AlreadyDeleted,
    #[error("a board named '{0}' already exists")]
    Duplicate(String),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Board, column and card operations consumed by the engine.
///
/// Every reorder takes a complete ordering of ids; positions are set to
/// their index in the list in one atomic operation.
pub trait Store: Send {
    fn list_boards(&self) -> Result<Vec<Board>, StoreError>;
    fn get_board_by_name(&self, name: &str) -> Result<Option<Board>, StoreError>;
    /// Create a board together with the default column set.
    fn create_board(&mut self, name: &str, description: &str) -> Result<Board, StoreError>;
    fn delete_board(&mut self, board_id: &str) -> Result<(), StoreError>;

    /// Columns of a board ordered by position.
    fn list_columns(&self, board_id: &str) -> Result<Vec<Column>, StoreError>;
    fn create_column(&mut self, board_id: &str, name: &str) -> Result<Column, StoreError>;
    fn delete_column(&mut self, column_id: &str) -> Result<(), StoreError>;
    fn reorder_columns(&mut self, board_id: &str, column_ids: &[String]) -> Result<(), StoreError>;
    fn update_column_wip_limit(&mut self, column_id: &str, limit: Option<u32>) -> Result<(), StoreError>;
    /// Active (neither archived nor deleted) cards in a column.
    fn count_cards_in_column(&self, column_id: &str) -> Result<usize, StoreError>;

    /// Active cards of a column ordered by position.
    fn list_cards(&self, column_id: &str) -> Result<Vec<Card>, StoreError>;
    fn get_card(&self, card_id: &str) -> Result<Card, StoreError>;
    fn create_card(&mut self, column_id: &str, title: &str, priority: Priority) -> Result<Card, StoreError>;
    /// Full-record overwrite.
    fn update_card(&mut self, card: &Card) -> Result<(), StoreError>;
    /// Reassign the card's column and append it at the end. Does not reorder.
    fn move_card(&mut self, card_id: &str, target_column_id: &str) -> Result<(), StoreError>;
    fn reorder_cards_in_column(&mut self, column_id: &str, card_ids: &[String]) -> Result<(), StoreError>;
    fn archive_card(&mut self, card_id: &str) -> Result<(), StoreError>;
    fn delete_card(&mut self, card_id: &str) -> Result<(), StoreError>;
}

/// Read a whole board into a fresh snapshot.
pub fn load_snapshot(store: &dyn Store, board: Board) -> Result<BoardSnapshot, StoreError> {
    let columns = store
        .list_columns(&board.id)?
        .into_iter()
        .map(|column| {
            let cards = store.list_cards(&column.id)?;
            Ok(ColumnCards { column, cards })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;
    Ok(BoardSnapshot::new(board, columns))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_snapshot_reads_columns_and_cards_in_order() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let board = store.create_board("work", "").unwrap();
        let columns = store.list_columns(&board.id).unwrap();
        store.create_card(&columns[1].id, "first", Priority::Low).unwrap();
        store.create_card(&columns[1].id, "second", Priority::High).unwrap();

        let snap = load_snapshot(&store, board).unwrap();
        assert_eq!(snap.columns.len(), 5);
        assert_eq!(snap.columns[0].column.name, "Backlog");
        let titles: Vec<&str> = snap.columns[1].cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn test_store_error_messages() {
        assert_eq!(StoreError::NotFound("card").to_string(), "card not found");
        assert_eq!(
            StoreError::Duplicate("work".into()).to_string(),
            "a board named 'work' already exists"
        );
        let err: StoreError = ValidationError::Empty("card title").into();
        assert_eq!(err.to_string(), "card title cannot be empty");
    }
}
