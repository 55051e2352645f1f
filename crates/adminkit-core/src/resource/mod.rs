//! Resource types for the CRUD collections.
//!
//! The collections are interchangeable: each holds entities with an id and
//! is listed page by page. The operations live on `adminkit_http::Resource`.

mod page;
mod types;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::types::EntityId;

pub use page::{Page, PageMeta, PageRequest};
pub use types::{Permission, Record, Role, RoleRef, User};

/// An entity stored in one of the resource collections.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Returns the id, or `None` for entities not yet created.
    fn id(&self) -> Option<&EntityId>;
}
