#![forbid(unsafe_code)]

use super::super::support::{
    clamp_move_position, live_row, now_ms, row_count, shift_window_tx, touch_form_tx,
};
use super::super::{SqliteStore, StoreError};
use jf_core::{FormId, Row, RowId};
use rusqlite::params;

impl SqliteStore {
    /// Relocates a live row to a clamped target position. Forward moves
    /// shift the rows in `(from, to]` back by one; backward moves shift
    /// `[to, from)` forward by one. Moving a row onto its own position is
    /// a pure no-op.
    pub fn move_row(&mut self, form: FormId, row: RowId, to: i64) -> Result<Row, StoreError> {
        let now = now_ms();
        let tx = self.conn.transaction()?;
        let mut moved = live_row(&tx, form, row)?;

        let count = row_count(&tx, form)?;
        let to = clamp_move_position(to, count);
        let from = moved.position;

        if to == from {
            tx.commit()?;
            return Ok(moved);
        }

        if to > from {
            shift_window_tx(&tx, form, from + 1, to, -1)?;
        } else {
            shift_window_tx(&tx, form, to, from - 1, 1)?;
        }

        tx.execute(
            "UPDATE form_rows SET position = ?3, updated_at_ms = ?4 \
             WHERE form_id = ?1 AND id = ?2",
            params![form.as_i64(), row.as_i64(), to, now],
        )?;
        touch_form_tx(&tx, form, now)?;
        tx.commit()?;

        moved.position = to;
        moved.updated_at_ms = now;
        Ok(moved)
    }
}
