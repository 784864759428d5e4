//! Schema loading and startup failures.

use ntest::timeout;
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

use zenform_core::config::EngineConfig;
use zenform_core::error::ConfigError;
use zenform_core::storage::{DiskUploadStore, MemoryStorage, Storage};
use zenform_core::types::{TypeDescriptor, TypeRegistry, TypeTag};
use zenform_core::view::View;
use zenform_core::{Action, Engine, RequestContext};

const SHOP: &str = r#"{
    "version": 1,
    "tables": [
        {
            "name": "products",
            "fields": [
                {"name": "id", "type": "_KEYS", "label": "No."},
                {"name": "title", "type": "_WORD", "label": "Title"},
                {"name": "kind", "type": "_LLST", "label": "Kind", "options": ["Tool", "Toy"]},
                {"name": "sold", "type": "_BOOL", "label": "Sold"}
            ],
            "options": {"not_null_fields": ["title"], "order_by": "title"}
        },
        {
            "name": "kinds_log",
            "fields": [
                {"name": "id", "type": "key"},
                {"name": "note", "type": "long_text"}
            ]
        }
    ]
}"#;

#[timeout(2000)]
#[test]
fn test_schema_file_drives_engine() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("schema.json");
    fs::write(&path, SHOP)?;

    let schema = EngineConfig::load(&path)?.build()?;
    let storage = Arc::new(MemoryStorage::from_schema(&schema)?);
    let uploads = Arc::new(DiskUploadStore::new(dir.path().join("img"), dir.path().join("dat")));
    let engine = Engine::new(schema, storage.clone(), uploads);

    assert_eq!(engine.table_names().collect::<Vec<_>>(), vec!["products", "kinds_log"]);
    let products = engine.table("products").unwrap().clone();
    let kinds = storage.list_option_values(&products, "kind")?;
    assert_eq!(kinds.values().cloned().collect::<Vec<_>>(), vec!["Tool", "Toy"]);

    let ctx = RequestContext::new(Action::View)
        .with_value("title", "Hammer")
        .with_value("kind", "1")
        .with_value("sold", "yes");
    engine.handle("products", ctx)?;

    let response = engine.handle("products", RequestContext::new(Action::Show))?;
    let View::List(list) = response.view else {
        panic!("expected the list");
    };
    assert_eq!(list.rows.len(), 1);
    let cells: Vec<String> = list.rows[0]
        .cells
        .iter()
        .map(|c| match c {
            zenform_core::view::Cell::Text(t) => t.clone(),
            other => panic!("unexpected cell {other:?}"),
        })
        .collect();
    assert_eq!(cells, vec!["1", "Hammer", "Tool", "+"]);
    Ok(())
}

#[timeout(1000)]
#[test]
fn test_unknown_type_is_fatal() {
    let json = r#"{"tables": [{"name": "t", "fields": [
        {"name": "id", "type": "key"},
        {"name": "x", "type": "_MONEY"}
    ]}]}"#;
    let err = EngineConfig::from_json(json).unwrap().build().unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnknownType {
            type_tag: "_MONEY".to_string()
        }
    );
}

#[timeout(1000)]
#[test]
fn test_table_without_key_is_fatal() {
    let json = r#"{"tables": [{"name": "t", "fields": [{"name": "x", "type": "short_text"}]}]}"#;
    let err = EngineConfig::from_json(json).unwrap().build().unwrap_err();
    assert!(matches!(err, ConfigError::NoKeyField { table } if table == "t"));
}

#[timeout(1000)]
#[test]
fn test_option_naming_unknown_field_is_fatal() {
    let json = r#"{"tables": [{"name": "t",
        "fields": [{"name": "id", "type": "key"}],
        "options": {"unique_fields": ["ghost"]}}]}"#;
    let err = EngineConfig::from_json(json).unwrap().build().unwrap_err();
    assert!(matches!(err, ConfigError::UnknownOptionField { field, .. } if field == "ghost"));
}

#[timeout(1000)]
#[test]
fn test_image_type_needs_metadata() {
    let mut registry = TypeRegistry::builtin().unwrap();
    let mut descriptor = TypeDescriptor::image(TypeTag::IconFile, 1000, 16, 16);
    descriptor.resize = None;

    let err = registry.replace(descriptor).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::MissingImageMetadata {
            property: "resize_dimensions",
            ..
        }
    ));
    assert_eq!(registry.max_bytes_for(TypeTag::IconFile), Some(300_000));
}

#[timeout(1000)]
#[test]
fn test_unsupported_version() {
    let err = EngineConfig::from_json(r#"{"version": 2, "tables": []}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(msg) if msg.contains("version")));
}
