//! Rust client SDK for the schmuckliCloud backend services.
//!
//! Thin, credentialed wrappers around the schmuckliCloud HTTP API. Each
//! domain client assembles one request per operation, signs it with the
//! app credentials (plus the session token when one is set), and maps the
//! backend's response envelope into a uniform [`ApiResult`].
//!
//! # Architecture
//!
//! - `auth` - email/password accounts, sessions, password reset
//! - `storage` - container rows, metadata, share links
//! - `files` - multipart upload, file tokens, deletion
//! - `messaging` - push notification dispatch
//! - `credentials` - app credential resolution
//! - `result` - the uniform response value object
//! - `error` - error taxonomy
//!
//! # Example
//!
//! ```no_run
//! use schmucklicloud::{QueryOptions, Result, StorageClient};
//!
//! async fn demo() -> Result<()> {
//!     let mut storage = StorageClient::new("app-id", "app-secret")?;
//!     storage.set_bucket(23);
//!     storage.set_dataset("production");
//!
//!     let rows = storage.get_all("messages", &QueryOptions::default()).await?;
//!     if rows.is_ok() {
//!         println!("{:?}", rows.data());
//!     }
//!     Ok(())
//! }
//! ```

pub mod auth;
mod client;
pub mod credentials;
pub mod error;
pub mod files;
pub mod messaging;
pub mod result;
pub mod storage;
pub mod types;

pub use auth::AuthClient;
pub use credentials::{resolve_credentials, AppCredentials};
pub use error::{Error, Result};
pub use files::FilesClient;
pub use messaging::MessagingClient;
pub use result::ApiResult;
pub use storage::StorageClient;
pub use types::{
    Condition, Operator, QueryOptions, ShareLinkOptions, SortDirection, Sorting, UploadFile,
};

/// SDK version reported in the user agent.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
