#![forbid(unsafe_code)]

mod create;
mod include;
mod publish;
mod save;

use super::StoreError;
use jf_core::{FormId, TemplateCategory, TemplateId, TemplateKind, TemplateStatus, UserId};

/// A named, versioned form definition with a publish lifecycle.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    pub id: TemplateId,
    pub form_id: FormId,
    pub name: String,
    pub kind: TemplateKind,
    pub status: TemplateStatus,
    pub category: TemplateCategory,
    pub description: Option<String>,
    pub document_header: Option<String>,
    pub edited_by: Option<UserId>,
    pub edited_at_ms: Option<i64>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

pub(in crate::store) const TEMPLATE_COLUMNS: &str = "id, form_id, name, kind, status, category, \
     description, document_header, edited_by, edited_at_ms, created_at_ms, updated_at_ms";

pub(in crate::store) struct RawTemplate {
    id: i64,
    form_id: i64,
    name: String,
    kind: String,
    status: String,
    category: String,
    description: Option<String>,
    document_header: Option<String>,
    edited_by: Option<i64>,
    edited_at_ms: Option<i64>,
    created_at_ms: i64,
    updated_at_ms: i64,
}

pub(in crate::store) fn map_raw_template(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawTemplate> {
    Ok(RawTemplate {
        id: row.get(0)?,
        form_id: row.get(1)?,
        name: row.get(2)?,
        kind: row.get(3)?,
        status: row.get(4)?,
        category: row.get(5)?,
        description: row.get(6)?,
        document_header: row.get(7)?,
        edited_by: row.get(8)?,
        edited_at_ms: row.get(9)?,
        created_at_ms: row.get(10)?,
        updated_at_ms: row.get(11)?,
    })
}

pub(in crate::store) fn finish_template(raw: RawTemplate) -> Result<Template, StoreError> {
    let kind = TemplateKind::parse(&raw.kind)
        .ok_or(StoreError::InvalidInput("unknown template kind in storage"))?;
    let status = TemplateStatus::parse(&raw.status)
        .ok_or(StoreError::InvalidInput("unknown template status in storage"))?;
    let category = TemplateCategory::parse(&raw.category).ok_or(StoreError::InvalidInput(
        "unknown template category in storage",
    ))?;
    Ok(Template {
        id: TemplateId::new(raw.id),
        form_id: FormId::new(raw.form_id),
        name: raw.name,
        kind,
        status,
        category,
        description: raw.description,
        document_header: raw.document_header,
        edited_by: raw.edited_by.map(UserId::new),
        edited_at_ms: raw.edited_at_ms,
        created_at_ms: raw.created_at_ms,
        updated_at_ms: raw.updated_at_ms,
    })
}
