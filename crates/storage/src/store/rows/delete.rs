#![forbid(unsafe_code)]

use super::super::support::{live_row, now_ms, shift_tail_tx, touch_form_tx};
use super::super::{SqliteStore, StoreError};
use jf_core::{FormId, Row, RowId, RowStatus};
use rusqlite::params;

impl SqliteStore {
    /// Tombstones a live row. No renumbering happens: the position slot is
    /// permanently reserved by the tombstone so historical positions stay
    /// replayable.
    pub fn soft_delete_row(&mut self, form: FormId, row: RowId) -> Result<Row, StoreError> {
        let now = now_ms();
        let tx = self.conn.transaction()?;
        let mut deleted = live_row(&tx, form, row)?;

        tx.execute(
            "UPDATE form_rows SET status = 'tombstoned', deleted_at_ms = ?3, updated_at_ms = ?3 \
             WHERE form_id = ?1 AND id = ?2",
            params![form.as_i64(), row.as_i64(), now],
        )?;
        touch_form_tx(&tx, form, now)?;
        tx.commit()?;

        deleted.status = RowStatus::Tombstoned;
        deleted.deleted_at_ms = Some(now);
        deleted.updated_at_ms = now;
        Ok(deleted)
    }

    /// Physically removes a live row and closes the gap: every row after
    /// it shifts down by one. Template editing only; entries always
    /// tombstone.
    pub fn hard_delete_row(&mut self, form: FormId, row: RowId) -> Result<Row, StoreError> {
        let now = now_ms();
        let tx = self.conn.transaction()?;
        let mut deleted = live_row(&tx, form, row)?;

        tx.execute(
            "DELETE FROM form_rows WHERE form_id = ?1 AND id = ?2",
            params![form.as_i64(), row.as_i64()],
        )?;
        shift_tail_tx(&tx, form, deleted.position + 1, -1)?;
        touch_form_tx(&tx, form, now)?;
        tx.commit()?;

        deleted.status = RowStatus::Purged;
        Ok(deleted)
    }
}
