#![forbid(unsafe_code)]

use jf_core::Row;
use jf_storage::StoreError;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// One row as handed to the rendering collaborator: flattened, live, with
/// its gate verdict attached.
#[derive(Clone, Debug, Serialize)]
pub struct RenderRow {
    pub id: i64,
    pub kind: &'static str,
    pub position: i64,
    pub payload: serde_json::Value,
    pub deletable: bool,
    pub mandatory: bool,
    pub responsible: Option<i64>,
    pub recorded_at: Option<String>,
}

pub(crate) fn render_row(row: &Row, deletable: bool) -> Result<RenderRow, StoreError> {
    let payload = serde_json::from_str(&row.payload.to_json()?)?;
    Ok(RenderRow {
        id: row.id.as_i64(),
        kind: row.kind().as_str(),
        position: row.position,
        payload,
        deletable,
        mandatory: row.mandatory,
        responsible: row.responsible.map(|user| user.as_i64()),
        recorded_at: format_ts(row.updated_at_ms),
    })
}

fn format_ts(ms: i64) -> Option<String> {
    let ts = OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000).ok()?;
    ts.format(&Rfc3339).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_format_as_rfc3339() {
        let formatted = format_ts(1_700_000_000_000).expect("format");
        assert!(formatted.starts_with("2023-11-14T"), "{formatted}");
    }
}
