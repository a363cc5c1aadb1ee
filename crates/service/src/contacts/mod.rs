pub mod file_store;
pub mod store;

pub use file_store::FileContactStore;
pub use store::ContactStore;
