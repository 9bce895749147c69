use crate::{
    db_types::{BuyerId, EventId, Profile},
    traits::StorageError,
};

/// Lookups used for presentation only. Nothing in the purchase or redemption path depends on these for correctness.
#[allow(async_fn_in_trait)]
pub trait DisplayDirectory {
    async fn event_title(&self, event_id: &EventId) -> Result<Option<String>, StorageError>;

    async fn buyer_name(&self, buyer_id: &BuyerId) -> Result<Option<String>, StorageError>;

    async fn upsert_profile(&self, buyer_id: &BuyerId, display_name: &str) -> Result<Profile, StorageError>;
}
