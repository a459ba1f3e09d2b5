#![forbid(unsafe_code)]

use crate::outcome::{Outcome, ServiceResult};
use crate::FormService;
use jf_core::gate::{
    BILLING_LINE_MESSAGE, HARD_DELETE_CONTEXT_MESSAGE, LOCKED_DOCUMENT_MESSAGE,
    MANDATORY_ROW_MESSAGE,
};
use jf_core::{
    BillingLineId, EntryState, FormId, Row, RowId, RowKind, RowPayload, UserId, row_deletable,
};
use jf_storage::{
    InsertRowsRequest, NewRowSpec, RangeRemoval, StoreError, UpdateRowRequest,
};
use tracing::warn;

#[derive(Clone, Debug, PartialEq)]
pub struct CreateRowRequest {
    pub payload: RowPayload,
    /// Clamped to the valid insert window by the store.
    pub position: i64,
    pub mandatory: bool,
    pub responsible: Option<UserId>,
    pub billing_line: Option<BillingLineId>,
}

impl FormService<'_> {
    pub fn create_row(&mut self, form: FormId, request: CreateRowRequest) -> ServiceResult<Row> {
        let errors = self.include_row_errors(form, &request.payload)?;
        if !errors.is_empty() {
            return Ok(Outcome::Invalid(errors));
        }
        let insert = InsertRowsRequest {
            rows: vec![NewRowSpec {
                payload: request.payload,
                mandatory: request.mandatory,
                responsible: request.responsible,
                billing_line: request.billing_line,
            }],
            position: request.position,
        };
        let mut rows = self.store.insert_rows(form, insert).inspect_err(|err| {
            warn!(form = form.as_i64(), error = %err, "row insert failed");
        })?;
        Ok(Outcome::Ok(rows.remove(0)))
    }

    pub fn update_row(
        &mut self,
        form: FormId,
        row: RowId,
        request: UpdateRowRequest,
    ) -> ServiceResult<Row> {
        if let Some(payload) = &request.payload {
            let errors = self.include_row_errors(form, payload)?;
            if !errors.is_empty() {
                return Ok(Outcome::Invalid(errors));
            }
        }
        let updated = self.store.update_row(form, row, request)?;
        Ok(Outcome::Ok(updated))
    }

    /// Include rows belong to template definitions only, and their target
    /// must be an existing template whose category allows inclusion. A
    /// target equal to the owning template would flatten forever.
    fn include_row_errors(
        &self,
        form: FormId,
        payload: &RowPayload,
    ) -> Result<Vec<String>, StoreError> {
        if payload.kind() != RowKind::Include {
            return Ok(Vec::new());
        }
        let mut errors = Vec::new();
        let owner_template = self.store.template_for_form(form)?;
        if owner_template.is_none() {
            errors.push("include rows can only be added to a template".to_string());
        }
        if let Some(target) = payload.include_target() {
            if owner_template.is_some_and(|owner| owner.id == target) {
                errors.push("a template cannot include itself".to_string());
            }
            match self.store.get_template(target)? {
                None => errors.push("the included template does not exist".to_string()),
                Some(record) if !record.category.insertable() => {
                    errors.push("only insertable templates can be included".to_string());
                }
                Some(_) => {}
            }
        }
        Ok(errors)
    }

    /// Deletes a row. Soft by default; hard deletion closes the position
    /// gap and is only available while editing a template.
    pub fn delete_row(
        &mut self,
        form: FormId,
        entry: &dyn EntryState,
        row: RowId,
        hard: bool,
    ) -> ServiceResult<Row> {
        let ctx = self.mutation_context(form, entry)?;
        if !row_deletable(ctx) {
            return Ok(Outcome::invalid(LOCKED_DOCUMENT_MESSAGE));
        }
        if hard && !ctx.template_context {
            return Ok(Outcome::invalid(HARD_DELETE_CONTEXT_MESSAGE));
        }

        let current = self.store.live_row(form, row)?;
        if current.mandatory {
            return Ok(Outcome::invalid(MANDATORY_ROW_MESSAGE));
        }

        let deleted = if hard {
            self.store.hard_delete_row(form, row)
        } else {
            self.store.soft_delete_row(form, row)
        }
        .inspect_err(|err| {
            warn!(form = form.as_i64(), row = row.as_i64(), error = %err, "row delete failed");
        })?;
        Ok(Outcome::Ok(deleted))
    }

    pub fn move_row(&mut self, form: FormId, row: RowId, to: i64) -> ServiceResult<Row> {
        let current = self.store.live_row(form, row)?;
        if !self.billing_allows(&current) {
            return Ok(Outcome::invalid(BILLING_LINE_MESSAGE));
        }
        let moved = self.store.move_row(form, row, to)?;
        Ok(Outcome::Ok(moved))
    }

    /// Clones a row and places the clone directly after the original.
    pub fn duplicate_row(&mut self, form: FormId, row: RowId) -> ServiceResult<Row> {
        let current = self.store.live_row(form, row)?;
        if !self.billing_allows(&current) {
            return Ok(Outcome::invalid(BILLING_LINE_MESSAGE));
        }
        let clone = self.store.duplicate_row(form, row)?;
        Ok(Outcome::Ok(clone))
    }

    /// Tombstones every live row in the inclusive position window. Bad
    /// bounds come back as named validation messages, not clamps.
    pub fn remove_rows_in_range(
        &mut self,
        form: FormId,
        from: i64,
        to: i64,
    ) -> ServiceResult<RangeRemoval> {
        match self.store.remove_rows_in_range(form, from, to) {
            Ok(removal) => Ok(Outcome::Ok(removal)),
            Err(StoreError::RangeBound(bound)) => Ok(Outcome::invalid(bound.message())),
            Err(err) => {
                warn!(form = form.as_i64(), error = %err, "range removal failed");
                Err(err)
            }
        }
    }
}
