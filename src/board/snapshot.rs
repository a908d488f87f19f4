use super::filter::filter_cards;
use super::{Board, Card, Column};

/// One column of a snapshot with its active cards in position order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnCards {
    pub column: Column,
    pub cards: Vec<Card>,
}

/// In-memory copy of an open board, replaced wholesale after every
/// committed mutation. Never patched incrementally.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    pub board: Board,
    pub columns: Vec<ColumnCards>,
}

impl BoardSnapshot {
    pub fn new(board: Board, columns: Vec<ColumnCards>) -> Self {
        Self { board, columns }
    }

    /// Empty snapshot shown while the first load is in flight.
    pub fn empty(board: Board) -> Self {
        Self { board, columns: Vec::new() }
    }

    pub fn column(&self, idx: usize) -> Option<&ColumnCards> {
        self.columns.get(idx)
    }

    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.column.id == column_id)
    }

    /// Visible cards of column `idx` under `filter`.
    pub fn visible_cards(&self, idx: usize, filter: Option<&str>) -> Vec<&Card> {
        self.columns
            .get(idx)
            .map(|c| filter_cards(&c.cards, filter))
            .unwrap_or_default()
    }

    /// Locate a card by id: `(column index, card)`.
    pub fn find_card(&self, card_id: &str) -> Option<(usize, &Card)> {
        self.columns.iter().enumerate().find_map(|(idx, col)| {
            col.cards.iter().find(|c| c.id == card_id).map(|c| (idx, c))
        })
    }

    pub fn total_cards(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }

    /// Cards in the last column, counted as done for the progress bar.
    pub fn done_cards(&self) -> usize {
        self.columns.last().map(|c| c.cards.len()).unwrap_or(0)
    }
}

/// Selection and horizontal scroll state over a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub column: usize,
    pub card: usize,
    /// Index of the leftmost rendered column.
    pub scroll: usize,
}

impl Cursor {
    /// Pull the cursor back inside the snapshot: the column into range and
    /// the card onto the last visible card when the column shrank.
    pub fn clamp(&mut self, snapshot: &BoardSnapshot, filter: Option<&str>) {
        if snapshot.columns.is_empty() {
            self.column = 0;
            self.card = 0;
            return;
        }
        if self.column >= snapshot.columns.len() {
            self.column = snapshot.columns.len() - 1;
        }
        let visible = snapshot.visible_cards(self.column, filter).len();
        if self.card >= visible {
            self.card = visible.saturating_sub(1);
        }
    }

    /// Keep the focused column inside the `visible`-wide scroll window.
    pub fn adjust_scroll(&mut self, visible: usize, total: usize) {
        if visible == 0 {
            return;
        }
        let max_scroll = total.saturating_sub(visible);
        self.scroll = self.scroll.min(max_scroll);
        if self.column < self.scroll {
            self.scroll = self.column;
        }
        if self.column >= self.scroll + visible {
            self.scroll = self.column + 1 - visible;
        }
    }
}

/// How many columns fit in `width` cells, at least one, at most `total`.
pub fn visible_column_count(width: u16, column_width: u16, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    let fit = (width / column_width.max(1)) as usize;
    fit.clamp(1, total)
}
