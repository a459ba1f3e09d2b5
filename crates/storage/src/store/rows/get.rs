#![forbid(unsafe_code)]

use super::super::support::{ROW_COLUMNS, finish_row, live_row, map_raw_row};
use super::super::{SqliteStore, StoreError};
use jf_core::{FormId, Row, RowId};
use rusqlite::{OptionalExtension, params};

impl SqliteStore {
    /// Looks a row up regardless of status; tombstones stay addressable
    /// for history views.
    pub fn row(&self, form: FormId, row: RowId) -> Result<Option<Row>, StoreError> {
        let raw = self
            .conn
            .query_row(
                &format!("SELECT {ROW_COLUMNS} FROM form_rows WHERE form_id = ?1 AND id = ?2"),
                params![form.as_i64(), row.as_i64()],
                map_raw_row,
            )
            .optional()?;
        raw.map(finish_row).transpose()
    }

    /// Resolves a live row or reports it unknown. This is the lookup all
    /// structural operations use.
    pub fn live_row(&self, form: FormId, row: RowId) -> Result<Row, StoreError> {
        live_row(&self.conn, form, row)
    }
}
