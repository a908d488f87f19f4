use std::path::Path;

use chrono::Utc;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{Store, StoreError};
use crate::board::{
    validate_board_name, validate_card_title, validate_column_name, Board, Card, Column, Priority,
    DEFAULT_COLUMNS,
};

const CARD_COLUMNS: &str = "id, column_id, title, description, priority, position, labels, \
                            external_ref, archived_at, deleted_at, created_at, updated_at";

const MIGRATION_001: &str = "
    CREATE TABLE IF NOT EXISTS boards (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS columns (
        id TEXT PRIMARY KEY,
        board_id TEXT NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        position INTEGER NOT NULL DEFAULT 0,
        wip_limit INTEGER
    );

    CREATE INDEX IF NOT EXISTS idx_columns_board_id ON columns(board_id);

    CREATE TABLE IF NOT EXISTS cards (
        id TEXT PRIMARY KEY,
        column_id TEXT NOT NULL REFERENCES columns(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        priority TEXT NOT NULL DEFAULT 'medium',
        position INTEGER NOT NULL DEFAULT 0,
        labels TEXT NOT NULL DEFAULT '',
        external_ref TEXT,
        archived_at TEXT,
        deleted_at TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_cards_column_id ON cards(column_id);
    CREATE INDEX IF NOT EXISTS idx_cards_archived_at ON cards(archived_at);
    CREATE INDEX IF NOT EXISTS idx_cards_deleted_at ON cards(deleted_at);
";

impl ToSql for Priority {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Priority {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

/// SQLite-backed store. One connection, owned by whichever thread runs jobs.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and run migrations.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let mut store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
        )?;
        let version: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )?;
        if version < 1 {
            let tx = self.conn.transaction()?;
            tx.execute_batch(MIGRATION_001)?;
            tx.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
            tx.commit()?;
            tracing::info!("applied schema migration 1");
        }
        Ok(())
    }

    fn next_card_position(&self, column_id: &str) -> Result<i64, StoreError> {
        let max: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(position), -1) FROM cards WHERE column_id = ?1 AND deleted_at IS NULL",
            params![column_id],
            |row| row.get(0),
        )?;
        Ok(max + 1)
    }

    /// `(archived, deleted)` flags of a card, `None` when no such row exists.
    fn card_state(&self, card_id: &str) -> Result<Option<(bool, bool)>, StoreError> {
        let state = self
            .conn
            .query_row(
                "SELECT archived_at IS NOT NULL, deleted_at IS NOT NULL FROM cards WHERE id = ?1",
                params![card_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(state)
    }
}

fn board_from_row(row: &Row<'_>) -> rusqlite::Result<Board> {
    Ok(Board {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn column_from_row(row: &Row<'_>) -> rusqlite::Result<Column> {
    Ok(Column {
        id: row.get(0)?,
        board_id: row.get(1)?,
        name: row.get(2)?,
        position: row.get(3)?,
        wip_limit: row.get(4)?,
    })
}

fn card_from_row(row: &Row<'_>) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        column_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        priority: row.get(4)?,
        position: row.get(5)?,
        labels: row.get(6)?,
        external_ref: row.get(7)?,
        archived_at: row.get(8)?,
        deleted_at: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

impl Store for SqliteStore {
    fn list_boards(&self) -> Result<Vec<Board>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, description, created_at, updated_at FROM boards ORDER BY name")?;
        let boards = stmt
            .query_map([], board_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(boards)
    }

    fn get_board_by_name(&self, name: &str) -> Result<Option<Board>, StoreError> {
        let board = self
            .conn
            .query_row(
                "SELECT id, name, description, created_at, updated_at FROM boards WHERE name = ?1",
                params![name],
                board_from_row,
            )
            .optional()?;
        Ok(board)
    }

    fn create_board(&mut self, name: &str, description: &str) -> Result<Board, StoreError> {
        validate_board_name(name)?;
        if self.get_board_by_name(name)?.is_some() {
            return Err(StoreError::Duplicate(name.to_string()));
        }

        let now = Utc::now();
        let board = Board {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.to_string(),
            created_at: now,
            updated_at: now,
        };

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO boards (id, name, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![board.id, board.name, board.description, board.created_at, board.updated_at],
        )?;
        for (position, column_name) in DEFAULT_COLUMNS.iter().enumerate() {
            tx.execute(
                "INSERT INTO columns (id, board_id, name, position) VALUES (?1, ?2, ?3, ?4)",
                params![Uuid::new_v4().to_string(), board.id, column_name, position as i64],
            )?;
        }
        tx.commit()?;

        tracing::info!(board = %board.name, "created board");
        Ok(board)
    }

    fn delete_board(&mut self, board_id: &str) -> Result<(), StoreError> {
        let affected = self.conn.execute("DELETE FROM boards WHERE id = ?1", params![board_id])?;
        if affected == 0 {
            return Err(StoreError::NotFound("board"));
        }
        Ok(())
    }

    fn list_columns(&self, board_id: &str) -> Result<Vec<Column>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, board_id, name, position, wip_limit FROM columns WHERE board_id = ?1 ORDER BY position",
        )?;
        let columns = stmt
            .query_map(params![board_id], column_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(columns)
    }

    fn create_column(&mut self, board_id: &str, name: &str) -> Result<Column, StoreError> {
        validate_column_name(name)?;
        let max: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(position), -1) FROM columns WHERE board_id = ?1",
            params![board_id],
            |row| row.get(0),
        )?;
        let column = Column {
            id: Uuid::new_v4().to_string(),
            board_id: board_id.to_string(),
            name: name.to_string(),
            position: max + 1,
            wip_limit: None,
        };
        self.conn.execute(
            "INSERT INTO columns (id, board_id, name, position) VALUES (?1, ?2, ?3, ?4)",
            params![column.id, column.board_id, column.name, column.position],
        )?;
        Ok(column)
    }

    fn delete_column(&mut self, column_id: &str) -> Result<(), StoreError> {
        let affected = self.conn.execute("DELETE FROM columns WHERE id = ?1", params![column_id])?;
        if affected == 0 {
            return Err(StoreError::NotFound("column"));
        }
        Ok(())
    }

    fn reorder_columns(&mut self, board_id: &str, column_ids: &[String]) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        for (position, id) in column_ids.iter().enumerate() {
            tx.execute(
                "UPDATE columns SET position = ?1 WHERE id = ?2 AND board_id = ?3",
                params![position as i64, id, board_id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn update_column_wip_limit(&mut self, column_id: &str, limit: Option<u32>) -> Result<(), StoreError> {
        let affected = self.conn.execute(
            "UPDATE columns SET wip_limit = ?1 WHERE id = ?2",
            params![limit, column_id],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound("column"));
        }
        Ok(())
    }

    fn count_cards_in_column(&self, column_id: &str) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM cards WHERE column_id = ?1 AND deleted_at IS NULL AND archived_at IS NULL",
            params![column_id],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn list_cards(&self, column_id: &str) -> Result<Vec<Card>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CARD_COLUMNS} FROM cards \
             WHERE column_id = ?1 AND deleted_at IS NULL AND archived_at IS NULL \
             ORDER BY position"
        ))?;
        let cards = stmt
            .query_map(params![column_id], card_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cards)
    }

    fn get_card(&self, card_id: &str) -> Result<Card, StoreError> {
        self.conn
            .query_row(
                &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1 AND deleted_at IS NULL"),
                params![card_id],
                card_from_row,
            )
            .optional()?
            .ok_or(StoreError::NotFound("card"))
    }

    fn create_card(&mut self, column_id: &str, title: &str, priority: Priority) -> Result<Card, StoreError> {
        validate_card_title(title)?;
        let mut card = Card::new(Uuid::new_v4().to_string(), column_id.to_string(), title.to_string());
        card.priority = priority;
        card.position = self.next_card_position(column_id)?;
        self.conn.execute(
            &format!("INSERT INTO cards ({CARD_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"),
            params![
                card.id,
                card.column_id,
                card.title,
                card.description,
                card.priority,
                card.position,
                card.labels,
                card.external_ref,
                card.archived_at,
                card.deleted_at,
                card.created_at,
                card.updated_at,
            ],
        )?;
        Ok(card)
    }

    fn update_card(&mut self, card: &Card) -> Result<(), StoreError> {
        validate_card_title(&card.title)?;
        let affected = self.conn.execute(
            "UPDATE cards SET column_id = ?1, title = ?2, description = ?3, priority = ?4, \
             position = ?5, labels = ?6, external_ref = ?7, updated_at = ?8 \
             WHERE id = ?9 AND deleted_at IS NULL",
            params![
                card.column_id,
                card.title,
                card.description,
                card.priority,
                card.position,
                card.labels,
                card.external_ref,
                Utc::now(),
                card.id,
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound("card"));
        }
        Ok(())
    }

    fn move_card(&mut self, card_id: &str, target_column_id: &str) -> Result<(), StoreError> {
        let position = self.next_card_position(target_column_id)?;
        let affected = self.conn.execute(
            "UPDATE cards SET column_id = ?1, position = ?2, updated_at = ?3 WHERE id = ?4 AND deleted_at IS NULL",
            params![target_column_id, position, Utc::now(), card_id],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound("card"));
        }
        Ok(())
    }

    fn reorder_cards_in_column(&mut self, column_id: &str, card_ids: &[String]) -> Result<(), StoreError> {
        let now = Utc::now();
        let tx = self.conn.transaction()?;
        for (position, id) in card_ids.iter().enumerate() {
            tx.execute(
                "UPDATE cards SET position = ?1, updated_at = ?2 WHERE id = ?3 AND column_id = ?4",
                params![position as i64, now, id, column_id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn archive_card(&mut self, card_id: &str) -> Result<(), StoreError> {
        let now = Utc::now();
        let affected = self.conn.execute(
            "UPDATE cards SET archived_at = ?1, updated_at = ?1 \
             WHERE id = ?2 AND deleted_at IS NULL AND archived_at IS NULL",
            params![now, card_id],
        )?;
        if affected == 0 {
            return match self.card_state(card_id)? {
                Some((true, false)) => Err(StoreError::AlreadyArchived),
                _ => Err(StoreError::NotFound("card")),
            };
        }
        Ok(())
    }

    fn delete_card(&mut self, card_id: &str) -> Result<(), StoreError> {
        let now = Utc::now();
        let affected = self.conn.execute(
            "UPDATE cards SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
            params![now, card_id],
        )?;
        if affected == 0 {
            return match self.card_state(card_id)? {
                Some((_, true)) => Err(StoreError::AlreadyDeleted),
                _ => Err(StoreError::NotFound("card")),
            };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ValidationError;

    fn setup() -> (SqliteStore, Board, Vec<Column>) {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let board = store.create_board("test", "a test board").unwrap();
        let columns = store.list_columns(&board.id).unwrap();
        (store, board, columns)
    }

    fn titles(store: &SqliteStore, column_id: &str) -> Vec<String> {
        store
            .list_cards(column_id)
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect()
    }

    // ---- Boards ----

    #[test]
    fn test_create_board_provisions_default_columns() {
        let (_store, board, columns) = setup();
        assert_eq!(board.name, "test");
        assert_eq!(board.description, "a test board");
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, DEFAULT_COLUMNS.to_vec());
        let positions: Vec<i64> = columns.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_create_board_rejects_empty_and_duplicate_name() {
        let (mut store, _, _) = setup();
        assert!(matches!(
            store.create_board("", ""),
            Err(StoreError::Validation(ValidationError::Empty(_)))
        ));
        assert!(matches!(store.create_board("test", ""), Err(StoreError::Duplicate(_))));
    }

    #[test]
    fn test_get_board_by_name() {
        let (store, board, _) = setup();
        assert_eq!(store.get_board_by_name("test").unwrap().map(|b| b.id), Some(board.id));
        assert!(store.get_board_by_name("missing").unwrap().is_none());
    }

    #[test]
    fn test_list_boards_sorted_by_name() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.create_board("zeta", "").unwrap();
        store.create_board("alpha", "").unwrap();
        let names: Vec<String> = store.list_boards().unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_delete_board_cascades_columns() {
        let (mut store, board, _) = setup();
        store.delete_board(&board.id).unwrap();
        assert!(store.list_columns(&board.id).unwrap().is_empty());
        assert!(matches!(store.delete_board(&board.id), Err(StoreError::NotFound("board"))));
    }

    // ---- Columns ----

    #[test]
    fn test_create_column_appends_position() {
        let (mut store, board, _) = setup();
        let col = store.create_column(&board.id, "Blocked").unwrap();
        assert_eq!(col.position, 5);
        assert!(store.create_column(&board.id, "").is_err());
    }

    #[test]
    fn test_reorder_columns() {
        let (mut store, board, columns) = setup();
        let mut ids: Vec<String> = columns.iter().map(|c| c.id.clone()).collect();
        ids.swap(0, 4);
        store.reorder_columns(&board.id, &ids).unwrap();
        let names: Vec<String> = store
            .list_columns(&board.id)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Done", "Todo", "In Progress", "Review", "Backlog"]);
    }

    #[test]
    fn test_delete_column_cascades_cards() {
        let (mut store, _, columns) = setup();
        let card = store.create_card(&columns[0].id, "doomed", Priority::Low).unwrap();
        store.delete_column(&columns[0].id).unwrap();
        assert!(matches!(store.get_card(&card.id), Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete_column(&columns[0].id), Err(StoreError::NotFound("column"))));
    }

    #[test]
    fn test_update_column_wip_limit_set_and_clear() {
        let (mut store, board, columns) = setup();
        store.update_column_wip_limit(&columns[2].id, Some(3)).unwrap();
        assert_eq!(store.list_columns(&board.id).unwrap()[2].wip_limit, Some(3));
        store.update_column_wip_limit(&columns[2].id, None).unwrap();
        assert_eq!(store.list_columns(&board.id).unwrap()[2].wip_limit, None);
    }

    #[test]
    fn test_count_cards_excludes_archived_and_deleted() {
        let (mut store, _, columns) = setup();
        let col = &columns[0].id;
        let a = store.create_card(col, "a", Priority::Low).unwrap();
        let b = store.create_card(col, "b", Priority::Low).unwrap();
        store.create_card(col, "c", Priority::Low).unwrap();
        store.archive_card(&a.id).unwrap();
        store.delete_card(&b.id).unwrap();
        assert_eq!(store.count_cards_in_column(col).unwrap(), 1);
    }

    // ---- Cards ----

    #[test]
    fn test_create_card_auto_position() {
        let (mut store, _, columns) = setup();
        let a = store.create_card(&columns[0].id, "a", Priority::High).unwrap();
        let b = store.create_card(&columns[0].id, "b", Priority::Medium).unwrap();
        assert_eq!(a.position, 0);
        assert_eq!(b.position, 1);
        let fetched = store.get_card(&a.id).unwrap();
        assert_eq!(fetched.priority, Priority::High);
        assert_eq!(fetched.title, "a");
    }

    #[test]
    fn test_create_card_rejects_invalid_title() {
        let (mut store, _, columns) = setup();
        assert!(matches!(
            store.create_card(&columns[0].id, "", Priority::Low),
            Err(StoreError::Validation(_))
        ));
        assert!(store.create_card(&columns[0].id, &"x".repeat(201), Priority::Low).is_err());
        assert!(store.list_cards(&columns[0].id).unwrap().is_empty());
    }

    #[test]
    fn test_update_card_overwrites_record() {
        let (mut store, _, columns) = setup();
        let mut card = store.create_card(&columns[0].id, "old", Priority::Low).unwrap();
        card.title = "new".into();
        card.description = "details".into();
        card.labels = "bug, ui".into();
        card.external_ref = Some("GH-12".into());
        card.priority = Priority::Urgent;
        store.update_card(&card).unwrap();

        let fetched = store.get_card(&card.id).unwrap();
        assert_eq!(fetched.title, "new");
        assert_eq!(fetched.description, "details");
        assert_eq!(fetched.labels, "bug, ui");
        assert_eq!(fetched.external_ref.as_deref(), Some("GH-12"));
        assert_eq!(fetched.priority, Priority::Urgent);

        card.title = String::new();
        assert!(matches!(store.update_card(&card), Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_move_card_appends_at_end() {
        let (mut store, _, columns) = setup();
        store.create_card(&columns[1].id, "existing", Priority::Low).unwrap();
        let card = store.create_card(&columns[0].id, "mover", Priority::Low).unwrap();
        store.move_card(&card.id, &columns[1].id).unwrap();
        let moved = store.get_card(&card.id).unwrap();
        assert_eq!(moved.column_id, columns[1].id);
        assert_eq!(moved.position, 1);
        assert_eq!(titles(&store, &columns[1].id), vec!["existing", "mover"]);
        assert!(titles(&store, &columns[0].id).is_empty());
    }

    #[test]
    fn test_reorder_cards_sets_dense_positions() {
        let (mut store, _, columns) = setup();
        let col = &columns[0].id;
        let a = store.create_card(col, "a", Priority::Low).unwrap();
        let b = store.create_card(col, "b", Priority::Low).unwrap();
        let c = store.create_card(col, "c", Priority::Low).unwrap();
        store
            .reorder_cards_in_column(col, &[c.id.clone(), a.id.clone(), b.id.clone()])
            .unwrap();
        let cards = store.list_cards(col).unwrap();
        let order: Vec<(&str, i64)> = cards.iter().map(|c| (c.title.as_str(), c.position)).collect();
        assert_eq!(order, vec![("c", 0), ("a", 1), ("b", 2)]);
    }

    #[test]
    fn test_list_cards_excludes_archived_and_deleted() {
        let (mut store, _, columns) = setup();
        let col = &columns[0].id;
        let a = store.create_card(col, "archived", Priority::Low).unwrap();
        let b = store.create_card(col, "deleted", Priority::Low).unwrap();
        store.create_card(col, "live", Priority::Low).unwrap();
        store.archive_card(&a.id).unwrap();
        store.delete_card(&b.id).unwrap();
        assert_eq!(titles(&store, col), vec!["live"]);
    }

    #[test]
    fn test_archive_twice_is_already_archived() {
        let (mut store, _, columns) = setup();
        let card = store.create_card(&columns[0].id, "a", Priority::Low).unwrap();
        store.archive_card(&card.id).unwrap();
        assert!(matches!(store.archive_card(&card.id), Err(StoreError::AlreadyArchived)));
        assert!(matches!(store.archive_card("missing"), Err(StoreError::NotFound("card"))));
    }

    #[test]
    fn test_delete_twice_is_already_deleted() {
        let (mut store, _, columns) = setup();
        let card = store.create_card(&columns[0].id, "a", Priority::Low).unwrap();
        store.delete_card(&card.id).unwrap();
        assert!(matches!(store.delete_card(&card.id), Err(StoreError::AlreadyDeleted)));
        assert!(matches!(store.delete_card("missing"), Err(StoreError::NotFound("card"))));
        // Archiving a deleted card is not-found, not already-archived.
        assert!(matches!(store.archive_card(&card.id), Err(StoreError::NotFound("card"))));
        assert!(matches!(store.get_card(&card.id), Err(StoreError::NotFound("card"))));
    }

    #[test]
    fn test_open_on_disk_reruns_migrations_idempotently() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("kb.db");
        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.create_board("persisted", "").unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert!(store.get_board_by_name("persisted").unwrap().is_some());
    }
}
