//! #  Backend contracts
//!
//! This module defines the behaviour that a storage backend must expose in order to drive the ticketing engine.
//!
//! The two shared mutable resources in the whole system are a tier's `sold` counter and a ticket's
//! `quantity_redeemed` counter. Backends must only ever change these through a single conditional update (compare and
//! increment in one statement). Application code never reads a counter, decides, and then writes it back.
//!
//! ## Traits
//! * [`TierLedger`] is the authoritative capacity accounting per tier.
//! * [`TicketStore`] holds issued tickets and performs the atomic redemption step.
//! * [`EventManagement`] lets hosts set up events and tiers.
//! * [`DisplayDirectory`] resolves event titles and buyer names. These are used for presentation only.
//! * [`TicketQueries`] provides the read-only aggregations behind availability and dashboard views.
//! * [`TicketingDatabase`] ties all of the above together and is what the public APIs are generic over.
mod data_objects;
mod display_directory;
mod event_management;
mod storage_error;
mod ticket_queries;
mod ticket_store;
mod ticketing_database;
mod tier_ledger;

pub use data_objects::{EventSnapshot, RedeemOutcome, Redeemed, RescheduleOutcome, ReserveOutcome, TierTicketTotals};
pub use display_directory::DisplayDirectory;
pub use event_management::EventManagement;
pub use storage_error::StorageError;
pub use ticket_queries::TicketQueries;
pub use ticket_store::TicketStore;
pub use ticketing_database::TicketingDatabase;
pub use tier_ledger::TierLedger;
