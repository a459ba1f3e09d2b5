#![forbid(unsafe_code)]

use super::super::StoreError;
use rusqlite::{Connection, params};

pub(in crate::store) fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=NORMAL;

        CREATE TABLE IF NOT EXISTS meta (
          key TEXT PRIMARY KEY,
          value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS forms (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          owner_kind TEXT NOT NULL,
          owner_ref INTEGER,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        -- Positions are dense 1..N over live + tombstoned rows of a form.
        -- Hard-deleted rows leave the table entirely; tombstoned rows keep
        -- their slot. No UNIQUE(form_id, position) constraint: bulk shifts
        -- would collide transiently mid-update.
        CREATE TABLE IF NOT EXISTS form_rows (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          form_id INTEGER NOT NULL REFERENCES forms(id) ON DELETE CASCADE,
          kind TEXT NOT NULL,
          position INTEGER NOT NULL,
          status TEXT NOT NULL DEFAULT 'live',
          mandatory INTEGER NOT NULL DEFAULT 0,
          responsible_id INTEGER,
          billing_line_id INTEGER,
          include_template_id INTEGER,
          payload_json TEXT NOT NULL,
          deleted_at_ms INTEGER,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS templates (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          form_id INTEGER NOT NULL REFERENCES forms(id),
          name TEXT NOT NULL,
          kind TEXT NOT NULL,
          status TEXT NOT NULL DEFAULT 'edit',
          category TEXT NOT NULL DEFAULT 'template',
          description TEXT,
          document_header TEXT,
          edited_by INTEGER,
          edited_at_ms INTEGER,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_form_rows_form_position ON form_rows(form_id, position);
        CREATE INDEX IF NOT EXISTS idx_form_rows_include ON form_rows(include_template_id);
        CREATE INDEX IF NOT EXISTS idx_templates_form ON templates(form_id);
        CREATE INDEX IF NOT EXISTS idx_templates_status ON templates(status);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO meta(key, value) VALUES (?1, ?2)",
        params!["schema_version", "v1"],
    )?;

    Ok(())
}
