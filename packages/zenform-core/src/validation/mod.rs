//! Turns submitted values into a sanitized record plus a report of errors
//! and warnings.

mod pipeline;
mod policy;
mod report;

pub use pipeline::{validate, Validated};
pub use policy::ValidationPolicy;
pub use report::ValidationReport;
