#![forbid(unsafe_code)]

use super::super::support::{
    ensure_form, insert_rows_tx, live_row, now_ms, read_rows, shift_tail_tx, touch_form_tx,
};
use super::super::{NewRowSpec, SqliteStore, StoreError};
use jf_core::{FormId, Row, RowId, RowKind, TemplateId};
use rusqlite::params;
use std::collections::BTreeSet;

fn copy_specs(rows: Vec<Row>) -> Vec<NewRowSpec> {
    rows.into_iter()
        .map(|row| {
            let mut payload = row.payload;
            payload.strip_cross_references();
            NewRowSpec {
                payload,
                mandatory: row.mandatory,
                responsible: row.responsible,
                billing_line: None,
            }
        })
        .collect()
}

impl SqliteStore {
    /// Read-time expansion of a template: include rows are replaced by the
    /// target template's flattened rows, recursively. The include rows
    /// themselves never appear in the output, and neither do tombstones.
    pub fn flatten_template(&self, template: TemplateId) -> Result<Vec<Row>, StoreError> {
        let record = self
            .get_template(template)?
            .ok_or(StoreError::UnknownTemplate)?;
        let mut visited = BTreeSet::from([template.as_i64()]);
        let mut out = Vec::new();
        self.flatten_form_into(record.form_id, &mut visited, &mut out)?;
        Ok(out)
    }

    /// Flattened live rows of any form. When the form backs a template,
    /// that template seeds the cycle guard.
    pub fn flatten_form_rows(&self, form: FormId) -> Result<Vec<Row>, StoreError> {
        ensure_form(&self.conn, form)?;
        let mut visited = BTreeSet::new();
        if let Some(template) = self.template_for_form(form)? {
            visited.insert(template.id.as_i64());
        }
        let mut out = Vec::new();
        self.flatten_form_into(form, &mut visited, &mut out)?;
        Ok(out)
    }

    /// `visited` tracks the inclusion path only: entries are removed on
    /// the way back out, so diamond-shaped graphs expand every branch
    /// while genuine cycles are reported.
    fn flatten_form_into(
        &self,
        form: FormId,
        visited: &mut BTreeSet<i64>,
        out: &mut Vec<Row>,
    ) -> Result<(), StoreError> {
        for row in read_rows(&self.conn, form, true)? {
            if row.kind() != RowKind::Include {
                out.push(row);
                continue;
            }
            // An include row without a chosen target renders nothing.
            let Some(target) = row.payload.include_target() else {
                continue;
            };
            let record = self
                .get_template(target)?
                .ok_or(StoreError::UnknownTemplate)?;
            if !visited.insert(target.as_i64()) {
                return Err(StoreError::IncludeCycle);
            }
            self.flatten_form_into(record.form_id, visited, out)?;
            visited.remove(&target.as_i64());
        }
        Ok(())
    }

    /// Edit-time unpack: permanently removes the include row and inserts
    /// real copies of the target's flattened rows at its former position,
    /// all in one transaction.
    pub fn materialize_include_row(
        &mut self,
        form: FormId,
        row: RowId,
    ) -> Result<Vec<Row>, StoreError> {
        let include = self.live_row(form, row)?;
        if include.kind() != RowKind::Include {
            return Err(StoreError::NotAnIncludeRow);
        }
        let target = include
            .payload
            .include_target()
            .ok_or(StoreError::IncludeTargetMissing)?;
        let specs = copy_specs(self.flatten_template(target)?);

        let now = now_ms();
        let tx = self.conn.transaction()?;
        let include = live_row(&tx, form, row)?;
        let position = include.position;

        tx.execute(
            "DELETE FROM form_rows WHERE form_id = ?1 AND id = ?2",
            params![form.as_i64(), row.as_i64()],
        )?;
        shift_tail_tx(&tx, form, position + 1, -1)?;
        let rows = insert_rows_tx(&tx, form, specs, position, now)?;
        touch_form_tx(&tx, form, now)?;
        tx.commit()?;
        Ok(rows)
    }

    /// Inserts copies of a template's flattened rows at a clamped
    /// position. Backs both "add template to document" and entry creation
    /// from an initial template.
    pub fn insert_rows_from_template(
        &mut self,
        form: FormId,
        template: TemplateId,
        position: i64,
    ) -> Result<Vec<Row>, StoreError> {
        let specs = copy_specs(self.flatten_template(template)?);

        let now = now_ms();
        let tx = self.conn.transaction()?;
        ensure_form(&tx, form)?;
        let rows = insert_rows_tx(&tx, form, specs, position, now)?;
        touch_form_tx(&tx, form, now)?;
        tx.commit()?;
        Ok(rows)
    }
}
