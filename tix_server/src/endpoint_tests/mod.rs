mod check_in;
mod event_setup;
mod helpers;
mod purchase;
mod reports;
