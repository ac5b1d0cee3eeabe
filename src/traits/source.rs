use crate::models::{
    cbsa::Cbsa,
    feature::BlockGroupCollection,
    filter::{ActiveFilterSelection, FilterCatalog},
};
use async_trait::async_trait;

/// Read side of the jobs API.
///
/// Implementations absorb their own failures: a failed or unsuccessful
/// request is logged and reported as an empty list or `None`.
#[async_trait]
pub trait JobsSource: Send + Sync {
    async fn list_cbsas(&self) -> Vec<Cbsa>;
    async fn block_groups(&self, cbsa_code: &str) -> Option<BlockGroupCollection>;
    async fn filter_catalog(&self) -> Option<FilterCatalog>;
    /// Only the non-empty selections are sent.
    async fn filtered_block_groups(
        &self,
        cbsa_code: &str,
        filters: &ActiveFilterSelection,
    ) -> Option<BlockGroupCollection>;
    async fn cbsa_detail(&self, cbsa_code: &str) -> Option<Cbsa>;
}
