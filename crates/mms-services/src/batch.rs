//! Batched element fetches indexed by id

use mms_core::{ElementRecord, ElementStore, ReadContext};
use std::collections::HashMap;

use crate::error::{ServiceError, ServiceResult};

/// Result of one batched fetch, looked up by requested id rather than by
/// position so later stages do not depend on the store's result order.
#[derive(Debug, Default)]
pub(crate) struct ElementBatch {
    by_id: HashMap<String, ElementRecord>,
}

impl ElementBatch {
    /// Fetch `ids` in a single store request. An empty id list issues no
    /// request.
    pub async fn fetch(
        store: &dyn ElementStore,
        ids: &[String],
        ctx: &ReadContext,
    ) -> ServiceResult<Self> {
        if ids.is_empty() {
            return Ok(Self::default());
        }

        let records = store.get_elements(ids, ctx).await?;
        if records.len() != ids.len() {
            return Err(ServiceError::BatchMismatch {
                requested: ids.len(),
                received: records.len(),
            });
        }

        Ok(Self {
            by_id: ids.iter().cloned().zip(records).collect(),
        })
    }

    pub fn get(&self, id: &str) -> ServiceResult<&ElementRecord> {
        self.by_id
            .get(id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    /// Records for `ids`, in the order given
    pub fn resolve(&self, ids: &[String]) -> ServiceResult<Vec<ElementRecord>> {
        ids.iter().map(|id| self.get(id).cloned()).collect()
    }
}
