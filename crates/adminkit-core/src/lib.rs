//! adminkit-core - Core session types and traits for the adminkit client.

pub mod credentials;
pub mod error;
pub mod guard;
pub mod resource;
pub mod session;
pub mod storage;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::Credentials;
pub use error::Error;
pub use resource::{Entity, Page, PageMeta, PageRequest, Permission, Record, Role, User};
pub use session::{AuthState, SessionState, TokenStore, UserProfile};
pub use storage::{MemoryStorage, Storage};
pub use tokens::{AccessToken, RefreshToken};
pub use traits::Authenticator;
pub use types::{ApiUrl, EntityId, ResourceKind};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
