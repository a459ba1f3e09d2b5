#![forbid(unsafe_code)]

use super::super::support::{ensure_form, insert_rows_tx, now_ms, touch_form_tx};
use super::super::{InsertRowsRequest, SqliteStore, StoreError};
use jf_core::{FormId, Row};

impl SqliteStore {
    /// Inserts the requested rows starting at a clamped position. Every
    /// existing row (live or tombstoned) at or after that position shifts
    /// by the number of inserted rows; the whole operation commits or
    /// rolls back as one unit.
    pub fn insert_rows(
        &mut self,
        form: FormId,
        request: InsertRowsRequest,
    ) -> Result<Vec<Row>, StoreError> {
        if request.rows.is_empty() {
            return Err(StoreError::InvalidInput("at least one row is required"));
        }

        let now = now_ms();
        let tx = self.conn.transaction()?;
        ensure_form(&tx, form)?;
        let rows = insert_rows_tx(&tx, form, request.rows, request.position, now)?;
        touch_form_tx(&tx, form, now)?;
        tx.commit()?;
        Ok(rows)
    }
}
