use rand::random;

/// Generates a random, prefixed identifier, e.g. `tkt_5c3b0e1f9a2d7c4e8b1f0a6d3c9e2b7f`.
///
/// 128 bits of randomness makes collisions between independently generated ids a non-issue, so no coordination with
/// the database is needed before an insert.
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}_{:016x}{:016x}", random::<u64>(), random::<u64>())
}
