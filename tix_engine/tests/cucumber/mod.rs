mod setups;
mod steps;
mod ticket_world;

pub use ticket_world::{TicketSystem, TicketWorld};
