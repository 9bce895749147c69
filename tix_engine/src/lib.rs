//! Ticket inventory and redemption engine
//!
//! The engine sells tiered admission tickets against a fixed capacity without overselling, and redeems them at the
//! door without admitting more people than paid, even when many buyers and many scanners act on the same rows at once.
//!
//! The library is divided into three main sections:
//! 1. Storage contracts ([`traits`]) and the SQLite backend ([`SqliteDatabase`]). All coordination between concurrent
//!    callers happens in the store through conditional updates; there is no shared in-process state.
//! 2. The public API ([`tix_api`]): [`PurchaseApi`], [`CheckInApi`], [`AvailabilityApi`] and [`EventSetupApi`].
//! 3. Support code: the ticket [`TokenCodec`](helpers::TokenCodec), bounded retries for transient storage faults, and
//!    event hooks ([`events`]) that fire when tickets are sold or redeemed.
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod tix_api;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::{db::db_url, SqliteDatabase};
pub use tix_api::{
    availability_api::AvailabilityApi,
    check_in_api::CheckInApi,
    errors::{AvailabilityError, CheckInError, EventSetupError, PurchaseError},
    event_setup_api::EventSetupApi,
    purchase_api::PurchaseApi,
};
pub use traits::{
    DisplayDirectory,
    EventManagement,
    StorageError,
    TicketQueries,
    TicketStore,
    TicketingDatabase,
    TierLedger,
};
