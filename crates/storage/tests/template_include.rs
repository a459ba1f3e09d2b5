#![forbid(unsafe_code)]

use jf_core::payload::{FreeTextPayload, HeadingPayload, IncludePayload};
use jf_core::{RowKind, RowPayload, TemplateCategory, TemplateKind};
use jf_storage::{
    CreateTemplateRequest, FormOwner, InsertRowsRequest, NewRowSpec, SqliteStore, StoreError,
    Template,
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

fn partial_template(store: &mut SqliteStore, name: &str) -> Template {
    store
        .create_template(CreateTemplateRequest {
            name: name.to_string(),
            kind: TemplateKind::Journal,
            category: TemplateCategory::Partial,
            description: None,
            document_header: None,
            owner: None,
        })
        .expect("create template")
}

fn text_row(text: &str) -> NewRowSpec {
    NewRowSpec::from_payload(RowPayload::FreeText(FreeTextPayload {
        text: text.to_string(),
    }))
}

fn heading_row(text: &str) -> NewRowSpec {
    NewRowSpec::from_payload(RowPayload::Heading(HeadingPayload {
        text: text.to_string(),
    }))
}

fn include_row(target: &Template) -> NewRowSpec {
    NewRowSpec::from_payload(RowPayload::Include(IncludePayload {
        template_id: Some(target.id.as_i64()),
    }))
}

#[test]
fn flatten_replaces_include_rows_with_target_rows() {
    let dir = temp_dir("flatten_basic");
    let mut store = SqliteStore::open(&dir).expect("open store");

    let b = partial_template(&mut store, "B");
    store
        .insert_rows(
            b.form_id,
            InsertRowsRequest {
                rows: vec![text_row("b1"), text_row("b2"), text_row("b3")],
                position: 1,
            },
        )
        .expect("fill B");

    let a = partial_template(&mut store, "A");
    store
        .insert_rows(
            a.form_id,
            InsertRowsRequest {
                rows: vec![heading_row("before"), include_row(&b), text_row("after")],
                position: 1,
            },
        )
        .expect("fill A");

    let flattened = store.flatten_template(a.id).expect("flatten");
    let kinds: Vec<RowKind> = flattened.iter().map(|row| row.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            RowKind::Heading,
            RowKind::FreeText,
            RowKind::FreeText,
            RowKind::FreeText,
            RowKind::FreeText,
        ]
    );
    assert!(
        flattened.iter().all(|row| row.kind() != RowKind::Include),
        "include rows never appear in flattened output"
    );

    let texts: Vec<String> = flattened
        .iter()
        .filter_map(|row| match &row.payload {
            RowPayload::FreeText(p) => Some(p.text.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["b1", "b2", "b3", "after"]);
}

#[test]
fn flatten_resolves_nested_includes() {
    let dir = temp_dir("flatten_nested");
    let mut store = SqliteStore::open(&dir).expect("open store");

    let c = partial_template(&mut store, "C");
    store
        .insert_rows(
            c.form_id,
            InsertRowsRequest {
                rows: vec![text_row("deep")],
                position: 1,
            },
        )
        .expect("fill C");

    let b = partial_template(&mut store, "B");
    store
        .insert_rows(
            b.form_id,
            InsertRowsRequest {
                rows: vec![include_row(&c), text_row("middle")],
                position: 1,
            },
        )
        .expect("fill B");

    let a = partial_template(&mut store, "A");
    store
        .insert_rows(
            a.form_id,
            InsertRowsRequest {
                rows: vec![include_row(&b)],
                position: 1,
            },
        )
        .expect("fill A");

    let flattened = store.flatten_template(a.id).expect("flatten");
    let texts: Vec<String> = flattened
        .iter()
        .filter_map(|row| match &row.payload {
            RowPayload::FreeText(p) => Some(p.text.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["deep", "middle"]);
}

#[test]
fn cyclic_includes_are_reported_not_recursed() {
    let dir = temp_dir("flatten_cycle");
    let mut store = SqliteStore::open(&dir).expect("open store");

    let a = partial_template(&mut store, "A");
    let b = partial_template(&mut store, "B");
    store
        .insert_rows(
            a.form_id,
            InsertRowsRequest {
                rows: vec![include_row(&b)],
                position: 1,
            },
        )
        .expect("A includes B");
    store
        .insert_rows(
            b.form_id,
            InsertRowsRequest {
                rows: vec![include_row(&a)],
                position: 1,
            },
        )
        .expect("B includes A");

    match store.flatten_template(a.id) {
        Err(StoreError::IncludeCycle) => {}
        other => panic!("expected include cycle, got {other:?}"),
    }
}

#[test]
fn diamond_inclusion_is_not_a_cycle() {
    let dir = temp_dir("flatten_diamond");
    let mut store = SqliteStore::open(&dir).expect("open store");

    let d = partial_template(&mut store, "D");
    store
        .insert_rows(
            d.form_id,
            InsertRowsRequest {
                rows: vec![text_row("shared")],
                position: 1,
            },
        )
        .expect("fill D");

    let b = partial_template(&mut store, "B");
    let c = partial_template(&mut store, "C");
    for template in [&b, &c] {
        store
            .insert_rows(
                template.form_id,
                InsertRowsRequest {
                    rows: vec![include_row(&d)],
                    position: 1,
                },
            )
            .expect("include D");
    }

    let a = partial_template(&mut store, "A");
    store
        .insert_rows(
            a.form_id,
            InsertRowsRequest {
                rows: vec![include_row(&b), include_row(&c)],
                position: 1,
            },
        )
        .expect("fill A");

    let flattened = store.flatten_template(a.id).expect("flatten diamond");
    assert_eq!(flattened.len(), 2, "both branches expand the shared leaf");
}

#[test]
fn materialize_replaces_the_include_row_in_place() {
    let dir = temp_dir("materialize");
    let mut store = SqliteStore::open(&dir).expect("open store");

    let b = partial_template(&mut store, "B");
    store
        .insert_rows(
            b.form_id,
            InsertRowsRequest {
                rows: vec![text_row("b1"), text_row("b2")],
                position: 1,
            },
        )
        .expect("fill B");

    let a = partial_template(&mut store, "A");
    let a_rows = store
        .insert_rows(
            a.form_id,
            InsertRowsRequest {
                rows: vec![heading_row("head"), include_row(&b), text_row("tail")],
                position: 1,
            },
        )
        .expect("fill A");
    let include_id = a_rows[1].id;

    let copies = store
        .materialize_include_row(a.form_id, include_id)
        .expect("materialize");
    assert_eq!(copies.len(), 2);
    assert_eq!(copies[0].position, 2);
    assert_eq!(copies[1].position, 3);

    let all = store.form_rows(a.form_id).expect("form rows");
    assert_eq!(all.len(), 4, "include row is gone for good");
    assert!(all.iter().all(|row| row.id != include_id));
    assert!(all.iter().all(|row| row.kind() != RowKind::Include));
    let positions: Vec<i64> = all.iter().map(|row| row.position).collect();
    assert_eq!(positions, vec![1, 2, 3, 4]);

    // Copies are fresh rows owned by A, not B's rows.
    let b_rows = store.form_rows(b.form_id).expect("B rows");
    assert_eq!(b_rows.len(), 2);
    for copy in &copies {
        assert!(b_rows.iter().all(|row| row.id != copy.id));
    }
}

#[test]
fn reverse_dependencies_follow_live_include_rows() {
    let dir = temp_dir("reverse_deps");
    let mut store = SqliteStore::open(&dir).expect("open store");

    let base = partial_template(&mut store, "base");
    let user_one = partial_template(&mut store, "one");
    let user_two = partial_template(&mut store, "two");

    let rows = store
        .insert_rows(
            user_one.form_id,
            InsertRowsRequest {
                rows: vec![include_row(&base)],
                position: 1,
            },
        )
        .expect("one includes base");
    store
        .insert_rows(
            user_two.form_id,
            InsertRowsRequest {
                rows: vec![include_row(&base)],
                position: 1,
            },
        )
        .expect("two includes base");

    let including = store.templates_including(base.id).expect("including");
    assert_eq!(including, vec![user_one.id, user_two.id]);

    // A tombstoned include row no longer creates a dependency edge.
    store
        .soft_delete_row(user_one.form_id, rows[0].id)
        .expect("soft delete include");
    let including = store.templates_including(base.id).expect("including");
    assert_eq!(including, vec![user_two.id]);
}

#[test]
fn insert_rows_from_template_copies_flattened_rows() {
    let dir = temp_dir("insert_from_template");
    let mut store = SqliteStore::open(&dir).expect("open store");

    let inner = partial_template(&mut store, "inner");
    store
        .insert_rows(
            inner.form_id,
            InsertRowsRequest {
                rows: vec![text_row("nested")],
                position: 1,
            },
        )
        .expect("fill inner");

    let outer = partial_template(&mut store, "outer");
    store
        .insert_rows(
            outer.form_id,
            InsertRowsRequest {
                rows: vec![heading_row("h"), include_row(&inner)],
                position: 1,
            },
        )
        .expect("fill outer");

    let form = store
        .create_form(FormOwner::Entry(7))
        .expect("entry form");
    store
        .insert_rows(
            form,
            InsertRowsRequest {
                rows: vec![text_row("existing")],
                position: 1,
            },
        )
        .expect("existing row");

    let copied = store
        .insert_rows_from_template(form, outer.id, 1)
        .expect("insert from template");
    assert_eq!(copied.len(), 2, "include row flattened into the copy");
    assert_eq!(copied[0].position, 1);
    assert_eq!(copied[1].position, 2);

    let all = store.form_rows(form).expect("form rows");
    assert_eq!(all.len(), 3);
    assert_eq!(all[2].position, 3, "existing row pushed behind the copies");
}
