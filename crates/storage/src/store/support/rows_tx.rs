#![forbid(unsafe_code)]

use super::super::{NewRowSpec, StoreError};
use jf_core::{BillingLineId, FormId, Row, RowId, RowKind, RowPayload, RowStatus, UserId};
use rusqlite::{Connection, OptionalExtension, Transaction, params};

pub(in crate::store) const ROW_COLUMNS: &str = "id, kind, position, status, mandatory, \
     responsible_id, billing_line_id, payload_json, deleted_at_ms, created_at_ms, updated_at_ms";

pub(in crate::store) struct RawRow {
    id: i64,
    kind: String,
    position: i64,
    status: String,
    mandatory: bool,
    responsible_id: Option<i64>,
    billing_line_id: Option<i64>,
    payload_json: String,
    deleted_at_ms: Option<i64>,
    created_at_ms: i64,
    updated_at_ms: i64,
}

pub(in crate::store) fn map_raw_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        id: row.get(0)?,
        kind: row.get(1)?,
        position: row.get(2)?,
        status: row.get(3)?,
        mandatory: row.get(4)?,
        responsible_id: row.get(5)?,
        billing_line_id: row.get(6)?,
        payload_json: row.get(7)?,
        deleted_at_ms: row.get(8)?,
        created_at_ms: row.get(9)?,
        updated_at_ms: row.get(10)?,
    })
}

pub(in crate::store) fn finish_row(raw: RawRow) -> Result<Row, StoreError> {
    let kind = RowKind::parse(&raw.kind)
        .ok_or(StoreError::InvalidInput("unknown row kind in storage"))?;
    let status = RowStatus::parse(&raw.status)
        .ok_or(StoreError::InvalidInput("unknown row status in storage"))?;
    let payload = RowPayload::from_json(kind, &raw.payload_json)?;
    Ok(Row {
        id: RowId::new(raw.id),
        position: raw.position,
        status,
        mandatory: raw.mandatory,
        responsible: raw.responsible_id.map(UserId::new),
        billing_line: raw.billing_line_id.map(BillingLineId::new),
        payload,
        deleted_at_ms: raw.deleted_at_ms,
        created_at_ms: raw.created_at_ms,
        updated_at_ms: raw.updated_at_ms,
    })
}

pub(in crate::store) fn form_exists(conn: &Connection, form: FormId) -> Result<bool, StoreError> {
    let found = conn
        .query_row(
            "SELECT 1 FROM forms WHERE id = ?1",
            params![form.as_i64()],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

pub(in crate::store) fn ensure_form(conn: &Connection, form: FormId) -> Result<(), StoreError> {
    if form_exists(conn, form)? {
        Ok(())
    } else {
        Err(StoreError::UnknownForm)
    }
}

/// Total number of rows occupying position slots: live + tombstoned.
/// Purged rows are gone from the table and therefore excluded by nature.
pub(in crate::store) fn row_count(conn: &Connection, form: FormId) -> Result<i64, StoreError> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM form_rows WHERE form_id = ?1",
        params![form.as_i64()],
        |row| row.get(0),
    )?)
}

/// Returns 1 <= position <= count + 1.
pub(in crate::store) fn clamp_insert_position(position: i64, count: i64) -> i64 {
    if position <= 0 {
        1
    } else if position > count {
        count + 1
    } else {
        position
    }
}

/// Returns 1 <= position <= count.
pub(in crate::store) fn clamp_move_position(position: i64, count: i64) -> i64 {
    if position <= 0 {
        1
    } else if position > count {
        count
    } else {
        position
    }
}

/// Shifts every row (live and tombstoned) with position >= from_position.
pub(in crate::store) fn shift_tail_tx(
    tx: &Transaction<'_>,
    form: FormId,
    from_position: i64,
    delta: i64,
) -> Result<(), StoreError> {
    tx.execute(
        "UPDATE form_rows SET position = position + ?3 WHERE form_id = ?1 AND position >= ?2",
        params![form.as_i64(), from_position, delta],
    )?;
    Ok(())
}

/// Shifts every row (live and tombstoned) with start <= position <= stop.
pub(in crate::store) fn shift_window_tx(
    tx: &Transaction<'_>,
    form: FormId,
    start: i64,
    stop: i64,
    delta: i64,
) -> Result<(), StoreError> {
    tx.execute(
        "UPDATE form_rows SET position = position + ?4 \
         WHERE form_id = ?1 AND position >= ?2 AND position <= ?3",
        params![form.as_i64(), start, stop, delta],
    )?;
    Ok(())
}

/// Resolves a live row. Tombstoned and unknown rows are both reported as
/// unknown: structural operations only ever address live rows.
pub(in crate::store) fn live_row(
    conn: &Connection,
    form: FormId,
    row: RowId,
) -> Result<Row, StoreError> {
    let raw = conn
        .query_row(
            &format!(
                "SELECT {ROW_COLUMNS} FROM form_rows \
                 WHERE form_id = ?1 AND id = ?2 AND status = 'live'"
            ),
            params![form.as_i64(), row.as_i64()],
            map_raw_row,
        )
        .optional()?;
    match raw {
        Some(raw) => finish_row(raw),
        None => Err(StoreError::UnknownRow),
    }
}

pub(in crate::store) fn read_rows(
    conn: &Connection,
    form: FormId,
    live_only: bool,
) -> Result<Vec<Row>, StoreError> {
    let sql = if live_only {
        format!(
            "SELECT {ROW_COLUMNS} FROM form_rows \
             WHERE form_id = ?1 AND status = 'live' ORDER BY position ASC"
        )
    } else {
        format!("SELECT {ROW_COLUMNS} FROM form_rows WHERE form_id = ?1 ORDER BY position ASC")
    };
    let mut stmt = conn.prepare(&sql)?;
    let raws = stmt.query_map(params![form.as_i64()], map_raw_row)?;
    let mut out = Vec::new();
    for raw in raws {
        out.push(finish_row(raw?)?);
    }
    Ok(out)
}

/// Inserts the given specs starting at a clamped position, shifting the
/// tail (live + tombstoned) out of the way first. Caller owns the
/// transaction; nothing is committed here.
pub(in crate::store) fn insert_rows_tx(
    tx: &Transaction<'_>,
    form: FormId,
    specs: Vec<NewRowSpec>,
    position: i64,
    now_ms: i64,
) -> Result<Vec<Row>, StoreError> {
    let count = row_count(tx, form)?;
    let position = clamp_insert_position(position, count);
    shift_tail_tx(tx, form, position, specs.len() as i64)?;

    let mut out = Vec::with_capacity(specs.len());
    for (index, spec) in specs.into_iter().enumerate() {
        let kind = spec.payload.kind();
        let payload_json = spec.payload.to_json()?;
        let include_template_id = spec.payload.include_target().map(|id| id.as_i64());
        let row_position = position + index as i64;
        tx.execute(
            "INSERT INTO form_rows(form_id, kind, position, status, mandatory, responsible_id, \
             billing_line_id, include_template_id, payload_json, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, 'live', ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
            params![
                form.as_i64(),
                kind.as_str(),
                row_position,
                spec.mandatory,
                spec.responsible.map(|id| id.as_i64()),
                spec.billing_line.map(|id| id.as_i64()),
                include_template_id,
                payload_json,
                now_ms
            ],
        )?;
        out.push(Row {
            id: RowId::new(tx.last_insert_rowid()),
            position: row_position,
            status: RowStatus::Live,
            mandatory: spec.mandatory,
            responsible: spec.responsible,
            billing_line: spec.billing_line,
            payload: spec.payload,
            deleted_at_ms: None,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        });
    }
    Ok(out)
}

pub(in crate::store) fn touch_form_tx(
    tx: &Transaction<'_>,
    form: FormId,
    now_ms: i64,
) -> Result<(), StoreError> {
    tx.execute(
        "UPDATE forms SET updated_at_ms = ?2 WHERE id = ?1",
        params![form.as_i64(), now_ms],
    )?;
    Ok(())
}
