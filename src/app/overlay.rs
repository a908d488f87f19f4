//! Move mode: one card displaced from its stored position into a
//! hypothetical (column, cursor) slot, without touching the snapshot.
//!
//! The overlay stores indices only. Every render and the final commit
//! derive card order from `(snapshot, filter, overlay)` on demand.

use crate::board::filter::filter_cards;
use crate::board::snapshot::{BoardSnapshot, Cursor};
use crate::board::Card;
use crate::input::action::Direction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOverlay {
    pub card_id: String,
    pub card_title: String,
    /// Column and cursor captured at entry; restored verbatim on cancel.
    pub origin_column: usize,
    pub origin_card: usize,
    /// Current hypothesis. `cursor == slots(column)` means append.
    pub column: usize,
    pub cursor: usize,
    /// Set once the commit job is issued; the overlay is then frozen.
    pub committing: bool,
}

/// Storage work needed to realise a confirmed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    pub card_id: String,
    pub card_title: String,
    pub origin_column_id: String,
    pub target_column_id: String,
    pub target_column_name: String,
    pub wip_limit: Option<u32>,
    /// Full ordering of every active card in the target column.
    pub target_order: Vec<String>,
    /// Remaining ordering of the origin column, for cross-column moves.
    pub origin_order: Option<Vec<String>>,
}

impl MovePlan {
    pub fn is_cross_column(&self) -> bool {
        self.origin_column_id != self.target_column_id
    }
}

impl MoveOverlay {
    /// Try to enter move mode from `from` in `direction`.
    ///
    /// Horizontal moves need an adjacent column; the cursor keeps its index,
    /// clamped to the append slot. Vertical moves shift by one within the
    /// column and are rejected at the boundary.
    pub fn begin(
        snapshot: &BoardSnapshot,
        filter: Option<&str>,
        from: &Cursor,
        direction: Direction,
    ) -> Option<Self> {
        let visible = snapshot.visible_cards(from.column, filter);
        let card = visible.get(from.card)?;
        let mut overlay = Self {
            card_id: card.id.clone(),
            card_title: card.title.clone(),
            origin_column: from.column,
            origin_card: from.card,
            column: from.column,
            cursor: from.card,
            committing: false,
        };

        match direction {
            Direction::Left | Direction::Right => {
                overlay.column = adjacent_column(from.column, direction, snapshot.columns.len())?;
                overlay.cursor = from.card.min(overlay.slots(snapshot, filter, overlay.column));
            }
            Direction::Up => {
                overlay.cursor = from.card.checked_sub(1)?;
            }
            Direction::Down => {
                if from.card + 1 >= visible.len() {
                    return None;
                }
                overlay.cursor = from.card + 1;
            }
        }
        Some(overlay)
    }

    /// Shift the hypothesis one step. Boundaries clamp, never wrap.
    pub fn step(&mut self, snapshot: &BoardSnapshot, filter: Option<&str>, direction: Direction) {
        match direction {
            Direction::Left | Direction::Right => {
                if let Some(col) = adjacent_column(self.column, direction, snapshot.columns.len()) {
                    self.column = col;
                    self.cursor = self.cursor.min(self.slots(snapshot, filter, col));
                }
            }
            Direction::Up => self.cursor = self.cursor.saturating_sub(1),
            Direction::Down => {
                if self.cursor < self.slots(snapshot, filter, self.column) {
                    self.cursor += 1;
                }
            }
        }
    }

    /// Visible cards of `column` other than the moving one.
    pub fn slots(&self, snapshot: &BoardSnapshot, filter: Option<&str>, column: usize) -> usize {
        snapshot
            .visible_cards(column, filter)
            .iter()
            .filter(|c| c.id != self.card_id)
            .count()
    }

    pub fn is_at_origin(&self) -> bool {
        self.column == self.origin_column && self.cursor == self.origin_card
    }

    /// The cursor to restore on cancel.
    pub fn origin_cursor(&self, scroll: usize) -> Cursor {
        Cursor { column: self.origin_column, card: self.origin_card, scroll }
    }

    /// Whether a freshly loaded snapshot still contains the moving card at
    /// its origin column, with both columns present.
    pub fn is_valid(&self, snapshot: &BoardSnapshot) -> bool {
        self.column < snapshot.columns.len()
            && snapshot
                .column(self.origin_column)
                .is_some_and(|c| c.cards.iter().any(|card| card.id == self.card_id))
    }

    /// Compute the storage calls for committing this hypothesis.
    pub fn plan(&self, snapshot: &BoardSnapshot, filter: Option<&str>) -> Option<MovePlan> {
        let origin = snapshot.column(self.origin_column)?;
        let target = snapshot.column(self.column)?;
        if !origin.cards.iter().any(|c| c.id == self.card_id) {
            return None;
        }

        let mut target_order: Vec<String> = target
            .cards
            .iter()
            .filter(|c| c.id != self.card_id)
            .map(|c| c.id.clone())
            .collect();
        let visible_rest: Vec<&str> = filter_cards(&target.cards, filter)
            .into_iter()
            .filter(|c| c.id != self.card_id)
            .map(|c| c.id.as_str())
            .collect();
        let position_of = |id: &str| target_order.iter().position(|o| o == id);
        let insert_at = match visible_rest.get(self.cursor) {
            Some(anchor) => position_of(*anchor),
            None => visible_rest.last().and_then(|last| position_of(*last)).map(|p| p + 1),
        }
        .unwrap_or(target_order.len());
        target_order.insert(insert_at, self.card_id.clone());

        let origin_order = (self.origin_column != self.column).then(|| {
            origin
                .cards
                .iter()
                .filter(|c| c.id != self.card_id)
                .map(|c| c.id.clone())
                .collect()
        });

        Some(MovePlan {
            card_id: self.card_id.clone(),
            card_title: self.card_title.clone(),
            origin_column_id: origin.column.id.clone(),
            target_column_id: target.column.id.clone(),
            target_column_name: target.column.name.clone(),
            wip_limit: target.column.wip_limit,
            target_order,
            origin_order,
        })
    }
}

fn adjacent_column(from: usize, direction: Direction, len: usize) -> Option<usize> {
    match direction {
        Direction::Left => from.checked_sub(1),
        Direction::Right => (from + 1 < len).then_some(from + 1),
        Direction::Up | Direction::Down => Some(from),
    }
}

/// Cards of `column` as they should be rendered.
///
/// Without an overlay this is the filtered list. With one, the moving card
/// is removed from the origin column and reinserted into the hypothesis
/// column at the cursor, so it appears exactly once on the board.
pub fn display_cards<'a>(
    snapshot: &'a BoardSnapshot,
    filter: Option<&str>,
    overlay: Option<&MoveOverlay>,
    column: usize,
) -> Vec<&'a Card> {
    let visible = snapshot.visible_cards(column, filter);
    let Some(overlay) = overlay else {
        return visible;
    };
    if column != overlay.origin_column && column != overlay.column {
        return visible;
    }

    let mut without: Vec<&Card> = visible.into_iter().filter(|c| c.id != overlay.card_id).collect();
    if column != overlay.column {
        return without;
    }
    let moving = snapshot
        .column(overlay.origin_column)
        .and_then(|c| c.cards.iter().find(|card| card.id == overlay.card_id));
    if let Some(card) = moving {
        let at = overlay.cursor.min(without.len());
        without.insert(at, card);
    }
    without
}
