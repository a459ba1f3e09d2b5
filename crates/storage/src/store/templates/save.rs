#![forbid(unsafe_code)]

use super::super::support::now_ms;
use super::super::{ListTemplatesRequest, SqliteStore, StoreError, UpdateTemplateRequest};
use super::{TEMPLATE_COLUMNS, Template, finish_template, map_raw_template};
use jf_core::{TemplateId, TemplateStatus, UserId};
use rusqlite::params;

impl SqliteStore {
    pub fn update_template(
        &mut self,
        template: TemplateId,
        request: UpdateTemplateRequest,
    ) -> Result<Template, StoreError> {
        let now = now_ms();
        let tx = self.conn.transaction()?;

        let current = {
            let raw = tx
                .query_row(
                    &format!("SELECT {TEMPLATE_COLUMNS} FROM templates WHERE id = ?1"),
                    params![template.as_i64()],
                    map_raw_template,
                )
                .map_err(|err| match err {
                    rusqlite::Error::QueryReturnedNoRows => StoreError::UnknownTemplate,
                    other => StoreError::Sql(other),
                })?;
            finish_template(raw)?
        };

        let name = request.name.unwrap_or_else(|| current.name.clone());
        if name.trim().is_empty() {
            return Err(StoreError::InvalidInput("template name must not be empty"));
        }
        let category = request.category.unwrap_or(current.category);
        let description = request
            .description
            .unwrap_or_else(|| current.description.clone());
        let document_header = request
            .document_header
            .unwrap_or_else(|| current.document_header.clone());

        tx.execute(
            "UPDATE templates SET name = ?2, category = ?3, description = ?4, \
             document_header = ?5, updated_at_ms = ?6 WHERE id = ?1",
            params![
                template.as_i64(),
                name,
                category.as_str(),
                description,
                document_header,
                now
            ],
        )?;
        tx.commit()?;

        Ok(Template {
            name,
            category,
            description,
            document_header,
            updated_at_ms: now,
            ..current
        })
    }

    /// Applies a lifecycle transition. Re-entering the current state is a
    /// legal no-op transition; `edited_by` bookkeeping is updated when a
    /// user is given.
    pub fn set_template_status(
        &mut self,
        template: TemplateId,
        status: TemplateStatus,
        edited_by: Option<UserId>,
    ) -> Result<Template, StoreError> {
        let now = now_ms();
        let tx = self.conn.transaction()?;
        let changed = if let Some(user) = edited_by {
            tx.execute(
                "UPDATE templates SET status = ?2, edited_by = ?3, edited_at_ms = ?4, \
                 updated_at_ms = ?4 WHERE id = ?1",
                params![template.as_i64(), status.as_str(), user.as_i64(), now],
            )?
        } else {
            tx.execute(
                "UPDATE templates SET status = ?2, updated_at_ms = ?3 WHERE id = ?1",
                params![template.as_i64(), status.as_str(), now],
            )?
        };
        if changed == 0 {
            return Err(StoreError::UnknownTemplate);
        }
        tx.commit()?;
        self.get_template(template)?.ok_or(StoreError::UnknownTemplate)
    }

    /// Refresh bookkeeping for publish propagation: re-saves the template
    /// without changing any field. Idempotent.
    pub fn touch_template(&mut self, template: TemplateId) -> Result<(), StoreError> {
        let now = now_ms();
        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE templates SET updated_at_ms = ?2 WHERE id = ?1",
            params![template.as_i64(), now],
        )?;
        if changed == 0 {
            return Err(StoreError::UnknownTemplate);
        }
        tx.commit()?;
        Ok(())
    }

    pub fn list_templates(
        &self,
        request: ListTemplatesRequest,
    ) -> Result<Vec<Template>, StoreError> {
        let mut sql = format!("SELECT {TEMPLATE_COLUMNS} FROM templates WHERE 1=1");
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(status) = request.status {
            sql.push_str(" AND status = ?");
            args.push(Box::new(status.as_str()));
        }
        if let Some(kind) = request.kind {
            sql.push_str(" AND kind = ?");
            args.push(Box::new(kind.as_str()));
        }
        if request.insertable_only {
            sql.push_str(" AND category IN ('partial', 'all')");
        }
        sql.push_str(" ORDER BY name ASC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let params = rusqlite::params_from_iter(args.iter().map(|arg| arg.as_ref()));
        let raws = stmt.query_map(params, map_raw_template)?;
        let mut out = Vec::new();
        for raw in raws {
            out.push(finish_template(raw?)?);
        }
        Ok(out)
    }

    /// Removes a template together with its backing form and rows.
    pub fn destroy_template(&mut self, template: TemplateId) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let form_id: i64 = tx
            .query_row(
                "SELECT form_id FROM templates WHERE id = ?1",
                params![template.as_i64()],
                |row| row.get(0),
            )
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => StoreError::UnknownTemplate,
                other => StoreError::Sql(other),
            })?;
        tx.execute(
            "DELETE FROM templates WHERE id = ?1",
            params![template.as_i64()],
        )?;
        tx.execute("DELETE FROM forms WHERE id = ?1", params![form_id])?;
        tx.commit()?;
        Ok(())
    }
}
