//! Request lifecycle through the engine.

use ntest::timeout;
use std::sync::Arc;

use zenform_core::config::{Schema, TableDefinition, TableOptions};
use zenform_core::storage::{Record, Storage};
use zenform_core::table::Table;
use zenform_core::types::TypeRegistry;
use zenform_core::view::{html, View};
use zenform_core::{Engine, Phase, RequestContext};

use super::helpers::{inventory_table, people_table, shared, Call, RecordingStorage, RecordingUploads};

fn engine_for(
    table: Table,
    options: TableOptions,
    storage: Arc<RecordingStorage>,
    uploads: Arc<RecordingUploads>,
) -> Engine {
    let schema = Schema {
        registry: TypeRegistry::builtin().unwrap(),
        tables: vec![TableDefinition {
            table,
            options,
            option_sets: Default::default(),
        }],
    };
    Engine::new(schema, storage, uploads)
}

fn request(table: &Table, pairs: &[(&str, &str)]) -> RequestContext {
    RequestContext::from_pairs(table, pairs.iter().copied())
}

#[timeout(1000)]
#[test]
fn test_bob_is_trimmed_and_inserted_once() {
    let table = people_table();
    let storage = shared(RecordingStorage::new(&table));
    let engine = engine_for(
        table.clone(),
        TableOptions::default(),
        storage.clone(),
        shared(RecordingUploads::default()),
    );

    let ctx = request(&table, &[("ZX_ACTION", "VIEW"), ("name", "  Bob ")]);
    assert_eq!(Phase::initial(ctx.action, ctx.has_values()), Phase::FormSave);

    let response = engine.handle("people", ctx).unwrap();
    assert_eq!(response.phase, Phase::FormSave);
    assert!(response.report.is_savable());

    let expected: Record = [("name".to_string(), "Bob".to_string())].into_iter().collect();
    assert_eq!(storage.inserts(), vec![expected]);
    assert_eq!(storage.persistence_calls(), 1);

    let View::Form(form) = response.view else {
        panic!("expected the form");
    };
    assert_eq!(form.id, Some(1));
}

#[timeout(1000)]
#[test]
fn test_view_without_values_shows_form() {
    let table = people_table();
    let storage = shared(RecordingStorage::new(&table));
    let engine = engine_for(
        table.clone(),
        TableOptions::default(),
        storage.clone(),
        shared(RecordingUploads::default()),
    );

    let response = engine
        .handle("people", request(&table, &[("ZX_ACTION", "VIEW")]))
        .unwrap();
    assert_eq!(response.phase, Phase::FormView);
    assert!(matches!(response.view, View::Form(ref form) if form.id.is_none()));
    assert!(storage.calls().is_empty());
}

#[timeout(1000)]
#[test]
fn test_duplicate_value_never_saves() {
    let table = people_table();
    let storage = shared(RecordingStorage::with_duplicates(&table));
    let options = TableOptions {
        unique_fields: vec!["name".to_string()],
        ..TableOptions::default()
    };
    let engine = engine_for(
        table.clone(),
        options,
        storage.clone(),
        shared(RecordingUploads::default()),
    );

    let ctx = request(&table, &[("ZX_ACTION", "VIEW"), ("name", "Bob")]);
    let response = engine.handle("people", ctx).unwrap();
    assert_eq!(response.phase, Phase::FormError);
    assert_eq!(storage.persistence_calls(), 0);

    let rendered = html::render(&response.view, &response.report);
    assert!(rendered.contains("zx_err"));
    assert!(rendered.contains("value='Bob'"));
}

#[timeout(1000)]
#[test]
fn test_empty_submission_is_not_persisted() {
    let table = people_table();
    let storage = shared(RecordingStorage::new(&table));
    let engine = engine_for(
        table.clone(),
        TableOptions::default(),
        storage.clone(),
        shared(RecordingUploads::default()),
    );

    let ctx = request(&table, &[("ZX_ACTION", "VIEW"), ("id", ""), ("name", "   ")]);
    let response = engine.handle("people", ctx).unwrap();
    assert_eq!(response.phase, Phase::FormError);
    assert_eq!(response.report.error_count(), 1);
    assert_eq!(storage.persistence_calls(), 0);
}

#[timeout(1000)]
#[test]
fn test_submission_with_key_updates() {
    let table = people_table();
    let storage = shared(RecordingStorage::new(&table));
    let engine = engine_for(
        table.clone(),
        TableOptions::default(),
        storage.clone(),
        shared(RecordingUploads::default()),
    );

    engine
        .handle("people", request(&table, &[("ZX_ACTION", "VIEW"), ("name", "Ann")]))
        .unwrap();
    let response = engine
        .handle(
            "people",
            request(&table, &[("ZX_ACTION", "VIEW"), ("id", "1"), ("name", "Anna")]),
        )
        .unwrap();

    assert_eq!(response.phase, Phase::FormSave);
    assert_eq!(storage.inserts().len(), 1);
    assert_eq!(storage.persistence_calls(), 2);
    let stored = storage.fetch_by_id(&table, 1).unwrap().unwrap();
    assert_eq!(stored["name"], "Anna");
}

#[timeout(1000)]
#[test]
fn test_delete_returns_to_list() {
    let table = inventory_table();
    let storage = shared(RecordingStorage::new(&table));
    let uploads = shared(RecordingUploads::default());
    let engine = engine_for(
        table.clone(),
        TableOptions::default(),
        storage.clone(),
        uploads.clone(),
    );

    for title in ["Lamp", "Desk"] {
        engine
            .handle("items", request(&table, &[("ZX_ACTION", "VIEW"), ("title", title)]))
            .unwrap();
    }

    let ctx = request(&table, &[("ZX_ACTION", "DELETE"), ("ZX_items_DEL_1", "on")]);
    let response = engine.handle("items", ctx).unwrap();
    assert_eq!(response.phase, Phase::List);
    assert!(storage.calls().contains(&Call::Delete(vec![1])));
    assert!(uploads.calls().contains(&Call::DeleteFile {
        field: "photo".to_string(),
        id: 1
    }));

    let View::List(list) = response.view else {
        panic!("expected the list");
    };
    assert_eq!(list.deleted, vec![1]);
    assert_eq!(list.total, 1);
    assert_eq!(list.rows[0].id, 2);
}

#[timeout(1000)]
#[test]
fn test_find_filters_by_prefix() {
    let table = people_table();
    let storage = shared(RecordingStorage::new(&table));
    let engine = engine_for(
        table.clone(),
        TableOptions::default(),
        storage.clone(),
        shared(RecordingUploads::default()),
    );
    for name in ["Anna", "Bob", "annika"] {
        engine
            .handle("people", request(&table, &[("ZX_ACTION", "VIEW"), ("name", name)]))
            .unwrap();
    }

    let ctx = request(
        &table,
        &[("ZX_ACTION", "FIND"), ("name", "an"), ("ZX_SORT", "name"), ("ZX_SORD", "1")],
    );
    let response = engine.handle("people", ctx).unwrap();
    assert_eq!(response.phase, Phase::List);
    let View::List(list) = response.view else {
        panic!("expected the list");
    };
    assert_eq!(list.total, 2);
    let ids: Vec<u64> = list.rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 1]);

    let plain = engine
        .handle("people", request(&table, &[("name", "an")]))
        .unwrap();
    let View::List(list) = plain.view else {
        panic!("expected the list");
    };
    assert_eq!(list.total, 3);
}

#[timeout(1000)]
#[test]
fn test_accepted_upload_is_stored_under_new_id() {
    let table = inventory_table();
    let storage = shared(RecordingStorage::new(&table));
    let uploads = shared(RecordingUploads::default());
    let engine = engine_for(
        table.clone(),
        TableOptions::default(),
        storage.clone(),
        uploads.clone(),
    );

    let photo = zenform_core::UploadedFile::received(
        "lamp.png",
        std::path::PathBuf::from("/tmp/spool-lamp"),
        100,
    );
    let ctx = request(&table, &[("ZX_ACTION", "VIEW"), ("title", "Lamp")]).with_upload("photo", photo);
    let response = engine.handle("items", ctx).unwrap();

    assert_eq!(response.phase, Phase::FormSave);
    assert_eq!(
        uploads.calls(),
        vec![Call::StoreFile {
            field: "photo".to_string(),
            id: 1
        }]
    );
}

#[timeout(1000)]
#[test]
fn test_new_option_label_is_added() {
    let table = inventory_table();
    let storage = shared(RecordingStorage::new(&table));
    let engine = engine_for(
        table.clone(),
        TableOptions::default(),
        storage.clone(),
        shared(RecordingUploads::default()),
    );

    let ctx = request(
        &table,
        &[("ZX_ACTION", "VIEW"), ("maker", ""), ("maker_nv", " Acme ")],
    );
    engine.handle("items", ctx).unwrap();

    assert!(storage.calls().contains(&Call::AddOption {
        field: "maker".to_string(),
        label: "Acme".to_string()
    }));
    let stored = storage.fetch_by_id(&table, 1).unwrap().unwrap();
    assert_eq!(stored["maker"], "1");
    assert!(!stored.contains_key("maker_nv"));
}
