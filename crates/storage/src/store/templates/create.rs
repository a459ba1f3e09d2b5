#![forbid(unsafe_code)]

use super::super::support::now_ms;
use super::super::{CreateTemplateRequest, SqliteStore, StoreError};
use super::{TEMPLATE_COLUMNS, Template, finish_template, map_raw_template};
use jf_core::{FormId, TemplateId, TemplateStatus};
use rusqlite::{OptionalExtension, params};

impl SqliteStore {
    /// Creates a template together with its backing form. Templates start
    /// in the edit state and become visible through publish.
    pub fn create_template(
        &mut self,
        request: CreateTemplateRequest,
    ) -> Result<Template, StoreError> {
        if request.name.trim().is_empty() {
            return Err(StoreError::InvalidInput("template name must not be empty"));
        }

        let now = now_ms();
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO forms(owner_kind, owner_ref, created_at_ms, updated_at_ms) \
             VALUES ('template', NULL, ?1, ?1)",
            params![now],
        )?;
        let form_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO templates(form_id, name, kind, status, category, description, \
             document_header, edited_by, edited_at_ms, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, NULL, ?9, ?9)",
            params![
                form_id,
                request.name,
                request.kind.as_str(),
                TemplateStatus::Edit.as_str(),
                request.category.as_str(),
                request.description,
                request.document_header,
                request.owner.map(|id| id.as_i64()),
                now
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Template {
            id: TemplateId::new(id),
            form_id: FormId::new(form_id),
            name: request.name,
            kind: request.kind,
            status: TemplateStatus::Edit,
            category: request.category,
            description: request.description,
            document_header: request.document_header,
            edited_by: request.owner,
            edited_at_ms: None,
            created_at_ms: now,
            updated_at_ms: now,
        })
    }

    pub fn get_template(&self, template: TemplateId) -> Result<Option<Template>, StoreError> {
        let raw = self
            .conn
            .query_row(
                &format!("SELECT {TEMPLATE_COLUMNS} FROM templates WHERE id = ?1"),
                params![template.as_i64()],
                map_raw_template,
            )
            .optional()?;
        raw.map(finish_template).transpose()
    }

    /// The template owning a form, when the form is template-owned.
    pub fn template_for_form(&self, form: FormId) -> Result<Option<Template>, StoreError> {
        let raw = self
            .conn
            .query_row(
                &format!("SELECT {TEMPLATE_COLUMNS} FROM templates WHERE form_id = ?1"),
                params![form.as_i64()],
                map_raw_template,
            )
            .optional()?;
        raw.map(finish_template).transpose()
    }
}
