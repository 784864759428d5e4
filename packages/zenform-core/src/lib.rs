//! Core engine for declarative CRUD admin screens.
//!
//! Provides the field type registry, per-type input filters, table
//! metadata, the validation pipeline, the request phase machine,
//! storage and upload contracts, and view models for lists and forms.

pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod notice;
pub mod phase;
pub mod request;
pub mod storage;
pub mod table;
pub mod types;
pub mod validation;
pub mod view;

pub use engine::{Engine, Response};
pub use phase::Phase;
pub use request::{Action, RequestContext, UploadedFile};
