mod ids;
mod retry;
mod token_codec;

pub use ids::new_id;
pub use retry::{retry_transient, RetryPolicy, Transient};
pub use token_codec::{TicketToken, TokenCodec, TokenError};
