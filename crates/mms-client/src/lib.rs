//! MMS Client - REST access to the model management backend
//!
//! - [`ClientConfig`] - Service root, ticket and timeout, loadable from TOML
//! - [`UrlBuilder`] - Builds every backend URL from an explicit config
//! - [`status_message`] - Maps failed HTTP statuses to user-facing messages
//! - [`HttpElementStore`] - [`mms_core::ElementStore`] over reqwest

mod config;
mod error;
mod http_store;
mod status;
mod url;

pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use error::{ClientError, ClientResult};
pub use http_store::HttpElementStore;
pub use status::status_message;
pub use url::{is_timestamp, UrlBuilder};
