//! HTTP surface for zenform.
//!
//! Serves one admin screen per configured table: lists, search, forms and
//! deletes, rendered as HTML or returned as JSON.

pub mod handlers;
pub mod router;
pub mod server;
