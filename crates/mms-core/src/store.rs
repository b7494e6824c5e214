//! Element store trait

use crate::{CoreResult, ElementRecord, ReadContext};
use async_trait::async_trait;

/// Source of element records.
///
/// Implementations fetch from the REST backend (see `mms-client`) or from
/// memory in tests. All reads are scoped by a [`ReadContext`].
#[async_trait]
pub trait ElementStore: Send + Sync {
    /// Fetch a single element.
    ///
    /// Fails with [`CoreError::NotFound`](crate::CoreError::NotFound) when the
    /// element does not exist at the requested workspace/version.
    async fn get_element(&self, id: &str, ctx: &ReadContext) -> CoreResult<ElementRecord>;

    /// Fetch a batch of elements.
    ///
    /// The returned records correspond positionally to `ids`. Duplicate ids
    /// are allowed and yield one record per occurrence.
    async fn get_elements(
        &self,
        ids: &[String],
        ctx: &ReadContext,
    ) -> CoreResult<Vec<ElementRecord>>;

    /// Human readable name of the backing store, used in logs
    fn store_name(&self) -> &str {
        "element-store"
    }
}
