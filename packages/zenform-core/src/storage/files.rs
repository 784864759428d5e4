//! Upload storage on the local file system.
//!
//! Files are named `<table>_<field>_<id><ext>` and live in the image folder
//! for image types and in the file folder for everything else.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::UploadStore;
use crate::error::StorageError;
use crate::request::UploadedFile;
use crate::table::{Field, Table};

/// Upload store writing into two folders.
#[derive(Debug, Clone)]
pub struct DiskUploadStore {
    image_folder: PathBuf,
    file_folder: PathBuf,
}

impl DiskUploadStore {
    pub fn new(image_folder: impl Into<PathBuf>, file_folder: impl Into<PathBuf>) -> Self {
        Self {
            image_folder: image_folder.into(),
            file_folder: file_folder.into(),
        }
    }

    /// Folder receiving uploads of `field`.
    pub fn folder_for(&self, field: &Field) -> &Path {
        if field.descriptor.is_image_type() {
            &self.image_folder
        } else {
            &self.file_folder
        }
    }

    fn stem(table: &Table, field: &Field, id: u64) -> String {
        format!("{}_{}_{}", table.name, field.name, id)
    }

    /// Every stored file of a record, whatever its extension.
    fn existing(&self, table: &Table, field: &Field, id: u64) -> Result<Vec<PathBuf>, StorageError> {
        let folder = self.folder_for(field);
        let entries = match fs::read_dir(folder) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let stem = Self::stem(table, field, id);
        let mut found = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let matches = name
                .strip_prefix(stem.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'));
            if matches {
                found.push(entry.path());
            }
        }
        found.sort();
        Ok(found)
    }
}

impl UploadStore for DiskUploadStore {
    fn locate(&self, table: &Table, field: &Field, id: u64) -> Result<Option<PathBuf>, StorageError> {
        Ok(self.existing(table, field, id)?.into_iter().next())
    }

    fn delete_existing(&self, table: &Table, field: &Field, id: u64) -> Result<(), StorageError> {
        for path in self.existing(table, field, id)? {
            fs::remove_file(&path)?;
            debug!(path = %path.display(), "Removed stored file");
        }
        Ok(())
    }

    fn store(
        &self,
        table: &Table,
        field: &Field,
        id: u64,
        file: &UploadedFile,
    ) -> Result<PathBuf, StorageError> {
        let folder = self.folder_for(field);
        fs::create_dir_all(folder)?;
        self.delete_existing(table, field, id)?;

        let target = folder.join(format!(
            "{}{}",
            Self::stem(table, field, id),
            file.extension()
        ));
        // rename fails across file systems; fall back to copying
        if fs::rename(&file.temp_path, &target).is_err() {
            fs::copy(&file.temp_path, &target)?;
            if let Err(e) = fs::remove_file(&file.temp_path) {
                warn!(path = %file.temp_path.display(), error = %e, "Failed to remove spooled upload");
            }
        }
        debug!(path = %target.display(), "Stored upload");
        Ok(target)
    }

    fn discard(&self, file: &UploadedFile) -> Result<(), StorageError> {
        if file.temp_path.as_os_str().is_empty() {
            return Ok(());
        }
        match fs::remove_file(&file.temp_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
