#![forbid(unsafe_code)]

use jf_core::payload::{FreeTextPayload, HeadingPayload};
use jf_core::{FormId, Row, RowPayload, RowStatus};
use jf_storage::{
    FormOwner, InsertRowsRequest, NewRowSpec, RangeBoundError, SqliteStore, StoreError,
};
use std::path::PathBuf;

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("jf_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn text_row(text: &str) -> NewRowSpec {
    NewRowSpec::from_payload(RowPayload::FreeText(FreeTextPayload {
        text: text.to_string(),
    }))
}

fn five_row_form(store: &mut SqliteStore) -> (FormId, Vec<Row>) {
    let form = store
        .create_form(FormOwner::Entry(1))
        .expect("create form");
    let rows = store
        .insert_rows(
            form,
            InsertRowsRequest {
                rows: vec![
                    NewRowSpec::from_payload(RowPayload::Heading(HeadingPayload {
                        text: "top".to_string(),
                    })),
                    text_row("one"),
                    text_row("two"),
                    text_row("three"),
                    text_row("four"),
                ],
                position: 1,
            },
        )
        .expect("insert rows");
    (form, rows)
}

#[test]
fn soft_delete_keeps_every_position() {
    let dir = temp_dir("soft_delete_positions");
    let mut store = SqliteStore::open(&dir).expect("open store");
    let (form, rows) = five_row_form(&mut store);

    let before = store.form_rows(form).expect("form rows");
    let deleted = store.soft_delete_row(form, rows[2].id).expect("soft delete");
    assert_eq!(deleted.status, RowStatus::Tombstoned);
    assert!(deleted.deleted_at_ms.is_some());

    let after = store.form_rows(form).expect("form rows");
    for (b, a) in before.iter().zip(after.iter()) {
        assert_eq!(b.id, a.id);
        assert_eq!(b.position, a.position, "no renumbering on soft delete");
    }

    let live = store.live_rows(form).expect("live rows");
    assert_eq!(live.len(), 4);
    assert!(live.iter().all(|row| row.id != rows[2].id));

    // Still addressable through the history lookup.
    let tombstone = store.row(form, rows[2].id).expect("row lookup");
    assert_eq!(
        tombstone.expect("tombstone present").status,
        RowStatus::Tombstoned
    );
}

#[test]
fn tombstoned_rows_are_invisible_to_structural_lookups() {
    let dir = temp_dir("tombstone_lookups");
    let mut store = SqliteStore::open(&dir).expect("open store");
    let (form, rows) = five_row_form(&mut store);

    store.soft_delete_row(form, rows[1].id).expect("soft delete");

    for result in [
        store.move_row(form, rows[1].id, 1).err(),
        store.soft_delete_row(form, rows[1].id).err(),
        store.duplicate_row(form, rows[1].id).err(),
    ] {
        match result {
            Some(StoreError::UnknownRow) => {}
            other => panic!("expected UnknownRow, got {other:?}"),
        }
    }
}

#[test]
fn range_removal_bounds_are_validated_not_clamped() {
    let dir = temp_dir("range_bounds");
    let mut store = SqliteStore::open(&dir).expect("open store");
    let (form, _) = five_row_form(&mut store);

    match store.remove_rows_in_range(form, 0, 3) {
        Err(StoreError::RangeBound(RangeBoundError::FromNotPositive)) => {}
        other => panic!("expected from-bound error, got {other:?}"),
    }
    match store.remove_rows_in_range(form, 2, 1) {
        Err(StoreError::RangeBound(RangeBoundError::ToBeforeFrom)) => {}
        other => panic!("expected to-before-from error, got {other:?}"),
    }
    match store.remove_rows_in_range(form, 1, 6) {
        Err(StoreError::RangeBound(RangeBoundError::ToBeyondEnd)) => {}
        other => panic!("expected to-bound error, got {other:?}"),
    }

    let live = store.live_rows(form).expect("live rows");
    assert_eq!(live.len(), 5, "failed validations removed nothing");
}

#[test]
fn range_removal_tombstones_the_window_without_renumbering() {
    let dir = temp_dir("range_window");
    let mut store = SqliteStore::open(&dir).expect("open store");
    let (form, rows) = five_row_form(&mut store);

    // One row in the window is already tombstoned; it is left alone.
    store.soft_delete_row(form, rows[2].id).expect("soft delete");
    let earlier_deleted_at = store
        .row(form, rows[2].id)
        .expect("row lookup")
        .expect("tombstone")
        .deleted_at_ms;

    let removal = store.remove_rows_in_range(form, 2, 4).expect("remove range");
    assert_eq!(removal.start_position, 2);
    assert_eq!(removal.end_position, 4);
    assert_eq!(removal.rows.len(), 2, "only live rows in the window removed");

    let all = store.form_rows(form).expect("form rows");
    assert_eq!(all.len(), 5);
    for (index, row) in all.iter().enumerate() {
        assert_eq!(row.position, index as i64 + 1, "no renumbering");
    }
    let live = store.live_rows(form).expect("live rows");
    assert_eq!(live.len(), 2);

    let untouched = store
        .row(form, rows[2].id)
        .expect("row lookup")
        .expect("tombstone");
    assert_eq!(untouched.deleted_at_ms, earlier_deleted_at);
}

#[test]
fn tombstones_shift_with_inserts() {
    let dir = temp_dir("tombstone_shift");
    let mut store = SqliteStore::open(&dir).expect("open store");
    let (form, rows) = five_row_form(&mut store);

    store.soft_delete_row(form, rows[0].id).expect("soft delete");
    store
        .insert_rows(
            form,
            InsertRowsRequest {
                rows: vec![text_row("wedge")],
                position: 1,
            },
        )
        .expect("insert at front");

    let tombstone = store
        .row(form, rows[0].id)
        .expect("row lookup")
        .expect("tombstone");
    assert_eq!(tombstone.position, 2, "tombstone shifted by the insert");
}
