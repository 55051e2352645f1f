//! Core value types.
//!
//! These types enforce their invariants at construction time.

mod api_url;
mod entity_id;
mod resource_kind;

pub use api_url::ApiUrl;
pub use entity_id::EntityId;
pub use resource_kind::ResourceKind;
