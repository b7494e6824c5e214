//! MMS Core - element records and the store abstraction
//!
//! This crate provides the types every other MMS crate depends on:
//!
//! - `ElementRecord` - A model element as returned by the backend
//! - `ReadContext` - Workspace/version coordinates for a read
//! - `ElementStore` - Trait for fetching elements by id
//! - `CoreError` - Errors raised by element stores

mod context;
mod element;
mod error;
mod store;

pub use context::*;
pub use element::*;
pub use error::*;
pub use store::*;
