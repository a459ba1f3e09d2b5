#![forbid(unsafe_code)]

use super::super::support::{
    ROW_COLUMNS, ensure_form, finish_row, map_raw_row, now_ms, row_count, touch_form_tx,
};
use super::super::{RangeBoundError, RangeRemoval, SqliteStore, StoreError};
use jf_core::FormId;
use rusqlite::params;

fn validate_bounds(from: i64, to: i64, count: i64) -> Result<(), RangeBoundError> {
    if from <= 0 {
        return Err(RangeBoundError::FromNotPositive);
    }
    if to <= 0 {
        return Err(RangeBoundError::ToNotPositive);
    }
    if from > count {
        return Err(RangeBoundError::FromBeyondEnd);
    }
    if to > count {
        return Err(RangeBoundError::ToBeyondEnd);
    }
    if to < from {
        return Err(RangeBoundError::ToBeforeFrom);
    }
    Ok(())
}

impl SqliteStore {
    /// Tombstones every live row with a position inside the inclusive
    /// window. Rows already tombstoned inside the window are left alone,
    /// and no renumbering happens. Bounds are validated, not clamped: a
    /// range is an explicit user-chosen span.
    pub fn remove_rows_in_range(
        &mut self,
        form: FormId,
        from: i64,
        to: i64,
    ) -> Result<RangeRemoval, StoreError> {
        let now = now_ms();
        let tx = self.conn.transaction()?;
        ensure_form(&tx, form)?;

        let count = row_count(&tx, form)?;
        validate_bounds(from, to, count).map_err(StoreError::RangeBound)?;

        let mut removed = Vec::new();
        {
            let mut stmt = tx.prepare(&format!(
                "SELECT {ROW_COLUMNS} FROM form_rows \
                 WHERE form_id = ?1 AND status = 'live' AND position >= ?2 AND position <= ?3 \
                 ORDER BY position ASC"
            ))?;
            let raws = stmt.query_map(params![form.as_i64(), from, to], map_raw_row)?;
            for raw in raws {
                removed.push(finish_row(raw?)?);
            }
        }

        tx.execute(
            "UPDATE form_rows SET status = 'tombstoned', deleted_at_ms = ?4, updated_at_ms = ?4 \
             WHERE form_id = ?1 AND status = 'live' AND position >= ?2 AND position <= ?3",
            params![form.as_i64(), from, to, now],
        )?;
        touch_form_tx(&tx, form, now)?;
        tx.commit()?;

        for row in &mut removed {
            row.status = jf_core::RowStatus::Tombstoned;
            row.deleted_at_ms = Some(now);
            row.updated_at_ms = now;
        }

        Ok(RangeRemoval {
            rows: removed,
            start_position: from,
            end_position: to,
        })
    }
}
