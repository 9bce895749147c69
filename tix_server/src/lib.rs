//! # Ticketing server
//! This crate hosts the HTTP front end for the ticket engine. It is responsible for:
//! * Letting hosts set up events and ticket tiers.
//! * Selling tickets to buyers and handing back the token that gets them through the door.
//! * Checking guests in at the door by redeeming scanned tokens.
//! * Serving availability, dashboard and "my tickets" views.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! See [routes](routes/index.html) for the full list. `/health` returns a 200 OK response and nothing else.

pub mod audit;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
