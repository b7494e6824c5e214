//! MMS Services Layer
//!
//! This crate provides the service layer that sits between the UI and the
//! element store. Services turn raw element records into view models the UI
//! can render directly.
//!
//! # Architecture
//!
//! ```text
//! UI Layer
//!     ↓
//! Service Layer (mms-services) ← This crate
//!     ↓
//! Store abstraction (mms-core::ElementStore)
//!     ↓
//! REST access (mms-client)
//! ```
//!
//! # Services
//!
//! - [`TableService`] - Table reconstruction from element payloads
//! - [`SiteDocsService`] - Site document listing with the site-wide filter
//! - [`SpecService`] - Read/edit model of a single element
//!
//! # Design Principles
//!
//! 1. **No transport dependencies** - Services only see `Arc<dyn ElementStore>`
//! 2. **Return ViewModels** - Services return DTOs, not raw payloads
//! 3. **Fresh results** - Nothing is cached between calls

mod batch;
mod error;
mod site_docs_service;
mod spec_service;
mod table_payload;
mod table_service;
mod view_models;

pub use error::{ServiceError, ServiceResult};
pub use site_docs_service::{DocumentFilter, SiteDocsService, MASTER_FILTER_ID};
pub use spec_service::{
    is_editable, is_restricted_value, restricted_option_ids, EditField, ElementSpec, LiteralKind,
    SpecService, SpecValue,
};
pub use table_payload::{
    partition_counts, partition_rows, strip_paragraph, to_valid_id, transpose_body, CellContent,
    RawCell, RawTable, TABLE_TYPE,
};
pub use table_service::{
    cell_value, prune_empty_columns, InlineTableIds, TableService, TableServiceConfig,
};
pub use view_models::{CellValue, MultiTableResult, Table, TableFilters};
