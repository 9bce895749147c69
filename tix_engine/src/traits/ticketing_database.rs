use crate::traits::{DisplayDirectory, EventManagement, StorageError, TicketQueries, TicketStore, TierLedger};

/// The full set of behaviour a backend must provide to run the ticketing engine.
#[allow(async_fn_in_trait)]
pub trait TicketingDatabase:
    Clone + TierLedger + TicketStore + EventManagement + DisplayDirectory + TicketQueries
{
    /// The URL of the database
    fn url(&self) -> &str;

    async fn close(&mut self) -> Result<(), StorageError>;
}
