#![forbid(unsafe_code)]

use super::super::support::{insert_rows_tx, live_row, now_ms, touch_form_tx};
use super::super::{NewRowSpec, SqliteStore, StoreError};
use jf_core::{FormId, Row, RowId};

impl SqliteStore {
    /// Clones a live row and inserts the clone directly after the
    /// original. Identity, position, cross-references and the billing line
    /// do not survive the clone; everything else does.
    pub fn duplicate_row(&mut self, form: FormId, row: RowId) -> Result<Row, StoreError> {
        let now = now_ms();
        let tx = self.conn.transaction()?;
        let original = live_row(&tx, form, row)?;

        let mut payload = original.payload.clone();
        payload.strip_cross_references();
        let spec = NewRowSpec {
            payload,
            mandatory: original.mandatory,
            responsible: original.responsible,
            billing_line: None,
        };

        let mut inserted = insert_rows_tx(&tx, form, vec![spec], original.position + 1, now)?;
        touch_form_tx(&tx, form, now)?;
        tx.commit()?;

        Ok(inserted.remove(0))
    }
}
