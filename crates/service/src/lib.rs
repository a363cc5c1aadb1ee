//! Store layer for the contact directory.
//! - `storage` holds the generic JSON file-backed document collection.
//! - `contacts` exposes the `ContactStore` trait and its file-backed
//!   implementation, the only state handlers ever touch.
//! - Errors are typed per operation outcome so the HTTP layer can map them.

pub mod contacts;
pub mod errors;
pub mod runtime;
pub mod storage;
