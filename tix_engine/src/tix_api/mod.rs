//! # Ticketing engine public API
//!
//! The `tix_api` module exposes the programmatic API of the ticketing engine. Each API is a thin, stateless struct over
//! a storage backend, so callers can construct only the ones they need.
//!
//! * [`purchase_api`] sells tickets against tier capacity. Capacity is reserved first, and released again if the ticket
//!   cannot be created.
//! * [`check_in_api`] validates door scans and consumes one admission per successful scan.
//! * [`availability_api`] provides read-only views: remaining capacity, event and host summaries, a buyer's tickets.
//! * [`event_setup_api`] lets hosts configure events and tiers.
//!
//! # API usage
//!
//! ```rust,ignore
//! use tix_engine::{PurchaseApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let api = PurchaseApi::new(db, FeeRate::default(), RetryPolicy::default(), EventProducers::default());
//! let ticket = api.purchase(&tier_id, &buyer_id, 2).await?;
//! ```
pub mod availability_api;
pub mod check_in_api;
pub mod errors;
pub mod event_setup_api;
pub mod purchase_api;
pub mod purchase_objects;
pub mod report_objects;
pub mod scan_objects;
pub mod setup_objects;
