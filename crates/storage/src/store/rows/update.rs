#![forbid(unsafe_code)]

use super::super::support::{live_row, now_ms, touch_form_tx};
use super::super::{SqliteStore, StoreError, UpdateRowRequest};
use jf_core::{FormId, Row, RowId};
use rusqlite::params;

impl SqliteStore {
    /// Updates a live row's content. The row's kind is fixed for life; a
    /// payload of a different kind is rejected. Positions are never
    /// touched here.
    pub fn update_row(
        &mut self,
        form: FormId,
        row: RowId,
        request: UpdateRowRequest,
    ) -> Result<Row, StoreError> {
        let now = now_ms();
        let tx = self.conn.transaction()?;
        let mut current = live_row(&tx, form, row)?;

        if let Some(payload) = request.payload {
            if payload.kind() != current.kind() {
                return Err(StoreError::InvalidInput("row kind cannot be changed"));
            }
            current.payload = payload;
        }
        if let Some(mandatory) = request.mandatory {
            current.mandatory = mandatory;
        }
        if let Some(responsible) = request.responsible {
            current.responsible = responsible;
        }
        if let Some(billing_line) = request.billing_line {
            current.billing_line = billing_line;
        }

        let payload_json = current.payload.to_json()?;
        let include_template_id = current.payload.include_target().map(|id| id.as_i64());
        tx.execute(
            "UPDATE form_rows SET payload_json = ?3, include_template_id = ?4, mandatory = ?5, \
             responsible_id = ?6, billing_line_id = ?7, updated_at_ms = ?8 \
             WHERE form_id = ?1 AND id = ?2",
            params![
                form.as_i64(),
                row.as_i64(),
                payload_json,
                include_template_id,
                current.mandatory,
                current.responsible.map(|id| id.as_i64()),
                current.billing_line.map(|id| id.as_i64()),
                now
            ],
        )?;
        touch_form_tx(&tx, form, now)?;
        tx.commit()?;

        current.updated_at_ms = now;
        Ok(current)
    }
}
