//! adminkit-file - Filesystem-backed session storage.

mod store;

pub use store::FileStorage;
