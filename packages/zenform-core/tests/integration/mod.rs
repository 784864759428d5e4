//! Integration test suite.
//!
//! 1. Validation pipeline against stub collaborators
//! 2. Request lifecycle through the engine
//! 3. Schema loading and startup failures

pub mod helpers;
pub mod lifecycle_tests;
pub mod pipeline_tests;
pub mod schema_tests;
