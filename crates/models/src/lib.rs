//! Entity and input models for the contact directory.

pub mod contact;
pub mod errors;

pub use contact::{Contact, ContactUpdate, NewContact};
