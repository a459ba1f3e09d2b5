#![forbid(unsafe_code)]

use super::support::{ensure_form, now_ms, read_rows, row_count};
use super::{SqliteStore, StoreError};
use jf_core::{FormId, Row};
use rusqlite::{OptionalExtension, params};

/// Owner context of a form. Every form belongs to exactly one owner; the
/// entry and excerpt owners live outside this crate and are referenced by
/// their external id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormOwner {
    Entry(i64),
    Template,
    Excerpt(i64),
}

impl FormOwner {
    pub fn kind_str(self) -> &'static str {
        match self {
            FormOwner::Entry(_) => "entry",
            FormOwner::Template => "template",
            FormOwner::Excerpt(_) => "excerpt",
        }
    }

    pub fn owner_ref(self) -> Option<i64> {
        match self {
            FormOwner::Entry(reference) | FormOwner::Excerpt(reference) => Some(reference),
            FormOwner::Template => None,
        }
    }

    pub fn is_template(self) -> bool {
        matches!(self, FormOwner::Template)
    }

    fn from_parts(kind: &str, reference: Option<i64>) -> Result<Self, StoreError> {
        match (kind, reference) {
            ("entry", Some(reference)) => Ok(FormOwner::Entry(reference)),
            ("template", _) => Ok(FormOwner::Template),
            ("excerpt", Some(reference)) => Ok(FormOwner::Excerpt(reference)),
            _ => Err(StoreError::InvalidInput("invalid form owner in storage")),
        }
    }
}

impl SqliteStore {
    pub fn create_form(&mut self, owner: FormOwner) -> Result<FormId, StoreError> {
        let now = now_ms();
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO forms(owner_kind, owner_ref, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?3)",
            params![owner.kind_str(), owner.owner_ref(), now],
        )?;
        let id = FormId::new(tx.last_insert_rowid());
        tx.commit()?;
        Ok(id)
    }

    pub fn form_owner(&self, form: FormId) -> Result<FormOwner, StoreError> {
        let parts = self
            .conn
            .query_row(
                "SELECT owner_kind, owner_ref FROM forms WHERE id = ?1",
                params![form.as_i64()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, Option<i64>>(1)?)),
            )
            .optional()?;
        let Some((kind, reference)) = parts else {
            return Err(StoreError::UnknownForm);
        };
        FormOwner::from_parts(&kind, reference)
    }

    /// All rows of a form, live and tombstoned, ordered by position.
    pub fn form_rows(&self, form: FormId) -> Result<Vec<Row>, StoreError> {
        ensure_form(&self.conn, form)?;
        read_rows(&self.conn, form, false)
    }

    /// Live rows only, ordered by position. Positions are not renumbered
    /// for this view; gaps where tombstones sit are expected.
    pub fn live_rows(&self, form: FormId) -> Result<Vec<Row>, StoreError> {
        ensure_form(&self.conn, form)?;
        read_rows(&self.conn, form, true)
    }

    /// Number of position slots in the form: live + tombstoned rows.
    pub fn row_count(&self, form: FormId) -> Result<i64, StoreError> {
        ensure_form(&self.conn, form)?;
        row_count(&self.conn, form)
    }

    /// Physically removes the form and, via cascade, all of its rows.
    pub fn destroy_form(&mut self, form: FormId) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute("DELETE FROM forms WHERE id = ?1", params![form.as_i64()])?;
        if deleted == 0 {
            return Err(StoreError::UnknownForm);
        }
        tx.commit()?;
        Ok(())
    }
}
