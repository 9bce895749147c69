mod fee_rate;
mod money;

pub mod helpers;
pub mod op;
mod secret;

pub use fee_rate::{FeeRate, FeeRateParseError, BASIS_POINTS_PER_UNIT, DEFAULT_SERVICE_FEE_BPS};
pub use money::{Money, MINOR_UNITS_PER_MAJOR};
pub use secret::Secret;
