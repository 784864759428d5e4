//! Error and warning messages shown to the person filling in a form.

use std::fmt;

use serde::Serialize;

/// A single validation message.
///
/// Whether a notice blocks saving depends on which side of the
/// [`ValidationReport`](crate::validation::ValidationReport) it lands in,
/// not on the notice itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Notice {
    KeyBlocked,
    FieldBlocked,
    StringTooLong,
    WrongKey,
    WrongInt,
    WrongFloat,
    TextTooLong,
    WrongDate,
    NumberCleared,
    CantBeNull,
    MustBeUnique,
    GeneralSaveError,
    UploadExceedsServerLimit,
    UploadExceedsFormLimit,
    UploadPartial,
    UploadNoTempDir,
    UploadCantWrite,
    UploadExtensionBlocked,
    /// Upload failure with a code outside the known set
    UploadFailed(u16),
    FileSizeTooBig,
}

/// Label used for record-level errors that belong to no single field.
pub const ALL_FIELDS_LABEL: &str = "all fields";

impl Notice {
    /// English text for this notice.
    pub fn text(&self) -> &'static str {
        match self {
            Notice::KeyBlocked => "This table is write-protected!",
            Notice::FieldBlocked => "This field is write-protected!",
            Notice::StringTooLong => "The string in this field was trimmed due to oversize!",
            Notice::WrongKey => "Wrong Key Format!",
            Notice::WrongInt => "Wrong Integer Format!",
            Notice::WrongFloat => "Wrong Float Number Format!",
            Notice::TextTooLong => "Text size is too big! Text can not exceed 64 kb!",
            Notice::WrongDate => "Wrong Date Format! Please input date in YYYY-MM-DD format!",
            Notice::NumberCleared => "Invalid characters in numeric field were deleted!",
            Notice::CantBeNull => "This field can not be empty, please fill it in!",
            Notice::MustBeUnique => {
                "Such value already exists! Values in this field must be unique!"
            }
            Notice::GeneralSaveError => "All fields can not be empty!",
            Notice::UploadExceedsServerLimit => {
                "File was not uploaded! File size exceeds limit set at server!"
            }
            Notice::UploadExceedsFormLimit => {
                "File was not uploaded! File size exceeds limit set by sender!"
            }
            Notice::UploadPartial => "File was not uploaded! File was uploaded partially!",
            Notice::UploadNoTempDir => {
                "File was not uploaded! Access to temporary file folder is restricted!"
            }
            Notice::UploadCantWrite => "File was not uploaded! File write error!",
            Notice::UploadExtensionBlocked => {
                "File was not uploaded! An upload extension broke the uploading process!"
            }
            Notice::UploadFailed(_) => "File was not uploaded! Unknown upload error!",
            Notice::FileSizeTooBig => {
                "File was not uploaded! File size exceeds limit set by administrator for this data type!"
            }
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::UploadFailed(code) => write!(f, "{} (code {})", self.text(), code),
            other => f.write_str(other.text()),
        }
    }
}
