//! Validation pipeline against recording collaborators.

use ntest::timeout;
use std::path::PathBuf;

use zenform_core::notice::{Notice, ALL_FIELDS_LABEL};
use zenform_core::validation::{validate, ValidationPolicy};
use zenform_core::{Action, RequestContext, UploadedFile};

use super::helpers::{inventory_table, people_table, Call, RecordingStorage, RecordingUploads};

fn submit() -> RequestContext {
    RequestContext::new(Action::View)
}

#[timeout(1000)]
#[test]
fn test_every_empty_value_gives_one_general_error() {
    let table = inventory_table();
    let storage = RecordingStorage::new(&table);
    let uploads = RecordingUploads::default();
    let ctx = submit()
        .with_value("id", "")
        .with_value("title", "  ")
        .with_value("notes", "")
        .with_value("count", "")
        .with_value("maker", "");

    let validated = validate(&table, &ctx, &ValidationPolicy::new(), &storage, &uploads).unwrap();
    assert!(!validated.is_savable());
    assert_eq!(validated.report.errors.len(), 1);
    assert_eq!(
        validated.report.errors_for(ALL_FIELDS_LABEL),
        &[Notice::GeneralSaveError]
    );
    assert_eq!(validated.record["in_stock"], "0");
    assert_eq!(storage.persistence_calls(), 0);
}

#[timeout(1000)]
#[test]
fn test_not_null_applies_to_every_type() {
    let table = inventory_table();
    for field in table.fields() {
        let storage = RecordingStorage::new(&table);
        let uploads = RecordingUploads::default();
        let policy = ValidationPolicy::new().not_null(field.name.clone());
        let ctx = submit()
            .with_value("title", "filler")
            .with_value(field.name.clone(), " \t ");

        let validated = validate(&table, &ctx, &policy, &storage, &uploads).unwrap();
        assert!(
            validated.report.errors_for(&field.label).contains(&Notice::CantBeNull),
            "field {} accepted an empty value",
            field.name
        );
    }
}

#[timeout(1000)]
#[test]
fn test_unique_check_excludes_own_key() {
    let table = people_table();
    let storage = RecordingStorage::new(&table);
    let uploads = RecordingUploads::default();
    let policy = ValidationPolicy::new().unique("name");

    let ctx = submit().with_value("id", "").with_value("name", "Ann");
    let first = validate(&table, &ctx, &policy, &storage, &uploads).unwrap();
    assert!(first.is_savable());
    zenform_core::storage::Storage::insert(&storage, &table, &first.record).unwrap();

    let again = validate(&table, &ctx, &policy, &storage, &uploads).unwrap();
    assert_eq!(again.report.errors_for("Name"), &[Notice::MustBeUnique]);

    let own = submit().with_value("id", "1").with_value("name", "Ann");
    let own = validate(&table, &own, &policy, &storage, &uploads).unwrap();
    assert!(own.is_savable());
    assert_eq!(own.key, Some(1));
}

#[timeout(1000)]
#[test]
fn test_forced_duplicate_is_an_error() {
    let table = people_table();
    let storage = RecordingStorage::with_duplicates(&table);
    let uploads = RecordingUploads::default();
    let policy = ValidationPolicy::new().unique("name");
    let ctx = submit().with_value("name", "Bob");

    let validated = validate(&table, &ctx, &policy, &storage, &uploads).unwrap();
    assert_eq!(validated.report.errors_for("Name"), &[Notice::MustBeUnique]);
    assert!(storage.calls().contains(&Call::IsUnique {
        field: "name".to_string(),
        value: "Bob".to_string()
    }));
}

#[timeout(1000)]
#[test]
fn test_type_filters_run_per_field() {
    let table = inventory_table();
    let storage = RecordingStorage::new(&table);
    let uploads = RecordingUploads::default();
    let ctx = submit()
        .with_value("title", "<b>Lamp</b>")
        .with_value("count", "12 pcs")
        .with_value("price", "abc")
        .with_value("added", "1899-01-01")
        .with_value("in_stock", "on");

    let validated = validate(&table, &ctx, &ValidationPolicy::new(), &storage, &uploads).unwrap();
    let report = &validated.report;
    assert_eq!(validated.record["title"], "Lamp");
    assert_eq!(validated.record["count"], "12");
    assert_eq!(validated.record["in_stock"], "1");
    assert_eq!(report.warnings_for("Count"), &[Notice::NumberCleared]);
    assert_eq!(report.errors_for("Added"), &[Notice::WrongDate]);
    assert!(report.errors_for("Price").is_empty());
    assert!(!report.is_savable());
}

#[timeout(1000)]
#[test]
fn test_extendable_filters_new_value() {
    let table = inventory_table();
    let storage = RecordingStorage::new(&table);
    let uploads = RecordingUploads::default();
    let long_label = "é".repeat(40);
    let ctx = submit()
        .with_value("maker", "<i>7</i>")
        .with_value("maker_nv", long_label.as_str());

    let validated = validate(&table, &ctx, &ValidationPolicy::new(), &storage, &uploads).unwrap();
    assert_eq!(validated.record["maker"], "<i>7</i>");
    let label = &validated.record["maker_nv"];
    assert_eq!(label.len(), 60);
    assert_eq!(label.chars().count(), 30);
    assert_eq!(
        validated.report.warnings_for("Maker"),
        &[Notice::StringTooLong]
    );
}

#[timeout(1000)]
#[test]
fn test_blocked_fields() {
    let table = people_table();
    let storage = RecordingStorage::new(&table);
    let uploads = RecordingUploads::default();
    let policy = ValidationPolicy::new().restrict("id");
    let ctx = submit().with_value("name", "Eve");

    let validated = validate(&table, &ctx, &policy, &storage, &uploads).unwrap();
    assert_eq!(validated.report.errors_for("ID"), &[Notice::KeyBlocked]);
    assert!(validated.report.errors_for("Name").is_empty());

    let policy = ValidationPolicy::new()
        .restrict("name")
        .write_through("name");
    let validated = validate(&table, &ctx, &policy, &storage, &uploads).unwrap();
    assert!(validated.is_savable());
}

#[timeout(1000)]
#[test]
fn test_upload_checks() {
    let table = inventory_table();
    let storage = RecordingStorage::new(&table);
    let uploads = RecordingUploads::default();

    let oversize = UploadedFile::received("big.png", PathBuf::from("/tmp/spool-big"), 5_000_000);
    let ctx = submit()
        .with_value("title", "Lamp")
        .with_upload("photo", oversize);
    let validated = validate(&table, &ctx, &ValidationPolicy::new(), &storage, &uploads).unwrap();
    assert!(validated.is_savable());
    assert_eq!(validated.report.warnings_for("Photo"), &[Notice::FileSizeTooBig]);
    assert!(validated.accepted_uploads.is_empty());
    assert_eq!(uploads.calls(), vec![Call::Discard("big.png".to_string())]);

    let partial = UploadedFile::failed("half.png", 3);
    let ctx = submit().with_value("title", "Lamp").with_upload("photo", partial);
    let validated = validate(&table, &ctx, &ValidationPolicy::new(), &storage, &uploads).unwrap();
    assert_eq!(validated.report.warnings_for("Photo"), &[Notice::UploadPartial]);

    let none = UploadedFile::failed("", 4);
    let ctx = submit().with_value("title", "Lamp").with_upload("photo", none);
    let validated = validate(&table, &ctx, &ValidationPolicy::new(), &storage, &uploads).unwrap();
    assert!(validated.report.warnings_for("Photo").is_empty());
}

#[timeout(1000)]
#[test]
fn test_accepted_upload_alone_is_content() {
    let table = inventory_table();
    let storage = RecordingStorage::new(&table);
    let uploads = RecordingUploads::default();
    let photo = UploadedFile::received("cat.jpg", PathBuf::from("/tmp/spool-cat"), 1000);
    let ctx = submit().with_value("id", "").with_upload("photo", photo);

    let validated = validate(&table, &ctx, &ValidationPolicy::new(), &storage, &uploads).unwrap();
    assert!(validated.is_savable());
    assert!(validated.accepted_uploads.contains_key("photo"));
}

#[timeout(1000)]
#[test]
fn test_deletion_flag_removes_stored_file() {
    let table = inventory_table();
    let storage = RecordingStorage::new(&table);
    let uploads = RecordingUploads::default();
    let ctx = submit()
        .with_value("id", "9")
        .with_value("title", "Lamp")
        .with_value("photo_nv", "1");

    let validated = validate(&table, &ctx, &ValidationPolicy::new(), &storage, &uploads).unwrap();
    assert!(!validated.record.contains_key("photo_nv"));
    assert_eq!(
        uploads.calls(),
        vec![Call::DeleteFile {
            field: "photo".to_string(),
            id: 9
        }]
    );
}
