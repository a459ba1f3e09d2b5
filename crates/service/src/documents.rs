#![forbid(unsafe_code)]

use crate::FormService;
use crate::outcome::{Outcome, ServiceResult};
use crate::render::{RenderRow, render_row};
use jf_core::gate::{LOCKED_DOCUMENT_MESSAGE, certificate_errors};
use jf_core::{EntryState, FormId, Row, RowId, TemplateId, row_deletable};
use jf_storage::{FormOwner, StoreError};
use tracing::warn;

/// Rows copied out of a template, with the window they now occupy so the
/// caller can renumber its view of the unaffected siblings.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateInsertion {
    pub start_position: i64,
    pub end_position: i64,
    pub rows: Vec<Row>,
}

impl FormService<'_> {
    /// Inserts copies of a published, insertable template's flattened rows
    /// at the given (clamped) position.
    pub fn add_rows_from_template(
        &mut self,
        form: FormId,
        template: TemplateId,
        position: i64,
    ) -> ServiceResult<TemplateInsertion> {
        let record = self
            .store
            .get_template(template)?
            .ok_or(StoreError::UnknownTemplate)?;
        if !record.status.is_public() {
            return Ok(Outcome::invalid(
                "only published templates can be added to a document",
            ));
        }
        if !record.category.insertable() {
            return Ok(Outcome::invalid(
                "this template cannot be inserted into an existing document",
            ));
        }
        if self.store.flatten_template(template)?.is_empty() {
            return Ok(Outcome::invalid("the template has no rows to insert"));
        }

        let rows = self
            .store
            .insert_rows_from_template(form, template, position)?;
        let start_position = rows.first().map(|row| row.position).unwrap_or(0);
        let end_position = rows.last().map(|row| row.position).unwrap_or(0);
        Ok(Outcome::Ok(TemplateInsertion {
            start_position,
            end_position,
            rows,
        }))
    }

    /// Unpacks an include row into editable copies of its target's rows.
    /// Template editing only; the include row itself is permanently
    /// removed.
    pub fn materialize_include_row(
        &mut self,
        form: FormId,
        row: RowId,
    ) -> ServiceResult<Vec<Row>> {
        let owner = self.store.form_owner(form)?;
        if !owner.is_template() {
            return Ok(Outcome::invalid(
                "includes can only be unpacked while editing a template",
            ));
        }
        match self.store.materialize_include_row(form, row) {
            Ok(rows) => Ok(Outcome::Ok(rows)),
            Err(StoreError::NotAnIncludeRow) => {
                Ok(Outcome::invalid("the row is not an include row"))
            }
            Err(StoreError::IncludeTargetMissing) => {
                Ok(Outcome::invalid("the include row has no template selected"))
            }
            Err(StoreError::IncludeCycle) => {
                Ok(Outcome::invalid("template inclusion cycle detected"))
            }
            Err(err) => {
                warn!(form = form.as_i64(), row = row.as_i64(), error = %err, "materialize failed");
                Err(err)
            }
        }
    }

    /// Creates the form backing a new clinical entry, seeded from an
    /// initial template when one is given.
    pub fn create_entry_form(
        &mut self,
        entry_ref: i64,
        initial_template: Option<TemplateId>,
    ) -> ServiceResult<(FormId, Vec<Row>)> {
        if let Some(template) = initial_template {
            let record = self
                .store
                .get_template(template)?
                .ok_or(StoreError::UnknownTemplate)?;
            if !record.status.is_public() {
                return Ok(Outcome::invalid(
                    "only published templates can start a document",
                ));
            }
            if !record.category.top_level() {
                return Ok(Outcome::invalid("this template cannot start a document"));
            }
        }

        let form = self.store.create_form(FormOwner::Entry(entry_ref))?;
        let rows = match initial_template {
            Some(template) => self.store.insert_rows_from_template(form, template, 1)?,
            None => Vec::new(),
        };
        Ok(Outcome::Ok((form, rows)))
    }

    /// Destroys a document's form. Mandatory rows are tombstoned through
    /// the range path first so the audit trail records their removal.
    pub fn destroy_document(&mut self, form: FormId, entry: &dyn EntryState) -> ServiceResult<()> {
        let ctx = self.mutation_context(form, entry)?;
        if ctx.entry_locked {
            return Ok(Outcome::invalid(LOCKED_DOCUMENT_MESSAGE));
        }

        let rows = self.store.form_rows(form)?;
        if rows.iter().any(|row| row.is_live() && row.mandatory) {
            let count = rows.len() as i64;
            self.store.remove_rows_in_range(form, 1, count)?;
        }
        self.store.destroy_form(form)?;
        Ok(Outcome::Ok(()))
    }

    /// The flattened, ordered live view handed to rendering: tombstones
    /// excluded, includes expanded, blank freetext suppressed, per-row
    /// gate verdicts attached.
    pub fn render_document(
        &self,
        form: FormId,
        entry: &dyn EntryState,
    ) -> Result<Vec<RenderRow>, StoreError> {
        let ctx = self.mutation_context(form, entry)?;
        let deletable = row_deletable(ctx);
        let mut out = Vec::new();
        for row in self.store.flatten_form_rows(form)? {
            if row.payload.is_blank_freetext() {
                continue;
            }
            out.push(render_row(&row, deletable)?);
        }
        Ok(out)
    }

    /// Document-level validation, run over the flattened rows so include
    /// targets are covered. Collects every message; never stops early.
    pub fn validate_document(
        &self,
        form: FormId,
        certificate: bool,
    ) -> Result<Vec<String>, StoreError> {
        let rows = self.store.flatten_form_rows(form)?;
        Ok(if certificate {
            certificate_errors(&rows)
        } else {
            Vec::new()
        })
    }
}
