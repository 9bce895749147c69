use log::*;
use sqlx::SqliteConnection;

use crate::{
    db_types::{EventId, NewTier, TicketTier, TierId},
    traits::{ReserveOutcome, StorageError},
};

pub async fn insert_tier(tier: &NewTier, conn: &mut SqliteConnection) -> Result<TicketTier, StorageError> {
    let tier: TicketTier = sqlx::query_as(
        r#"
            INSERT INTO ticket_tiers (id, event_id, name, price, capacity, active, display_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *;
        "#,
    )
    .bind(&tier.id)
    .bind(&tier.event_id)
    .bind(&tier.name)
    .bind(tier.price)
    .bind(tier.capacity)
    .bind(tier.active)
    .bind(tier.display_order)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Tier [{}] '{}' added to event {} with capacity {}", tier.id, tier.name, tier.event_id, tier.capacity);
    Ok(tier)
}

pub async fn fetch_tier(tier_id: &TierId, conn: &mut SqliteConnection) -> Result<Option<TicketTier>, StorageError> {
    let tier = sqlx::query_as("SELECT * FROM ticket_tiers WHERE id = $1").bind(tier_id).fetch_optional(conn).await?;
    Ok(tier)
}

pub async fn tiers_for_event(
    event_id: &EventId,
    active_only: bool,
    conn: &mut SqliteConnection,
) -> Result<Vec<TicketTier>, StorageError> {
    let tiers = sqlx::query_as(
        r#"
            SELECT * FROM ticket_tiers
            WHERE event_id = $1 AND (active OR NOT $2)
            ORDER BY display_order, created_at, id
        "#,
    )
    .bind(event_id)
    .bind(active_only)
    .fetch_all(conn)
    .await?;
    Ok(tiers)
}

/// Claims `quantity` units of capacity in one conditional update.
///
/// The `WHERE` clause carries the whole admission rule. If no row comes back, the tier is read again purely to explain
/// why; that read never feeds back into a write.
pub async fn reserve(
    tier_id: &TierId,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<ReserveOutcome, StorageError> {
    if quantity <= 0 {
        return Err(StorageError::InvalidInput(format!("Cannot reserve {quantity} units")));
    }
    let updated: Option<TicketTier> = sqlx::query_as(
        r#"
            UPDATE ticket_tiers
            SET sold = sold + $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND active AND sold + $1 <= capacity
            RETURNING *;
        "#,
    )
    .bind(quantity)
    .bind(tier_id)
    .fetch_optional(&mut *conn)
    .await?;
    if let Some(tier) = updated {
        trace!("🗃️ Reserved {quantity} on tier {tier_id}. {} of {} now sold", tier.sold, tier.capacity);
        return Ok(ReserveOutcome::Reserved(tier));
    }
    let outcome = match fetch_tier(tier_id, conn).await? {
        None => ReserveOutcome::TierNotFound,
        Some(tier) if !tier.active => ReserveOutcome::TierInactive,
        Some(tier) => ReserveOutcome::CapacityExceeded { requested: quantity, remaining: tier.remaining() },
    };
    trace!("🗃️ Reservation of {quantity} on tier {tier_id} refused: {outcome:?}");
    Ok(outcome)
}

/// Gives back capacity claimed by [`reserve`]. `sold` is never pushed below zero.
pub async fn release(
    tier_id: &TierId,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<TicketTier>, StorageError> {
    if quantity <= 0 {
        return Err(StorageError::InvalidInput(format!("Cannot release {quantity} units")));
    }
    let tier: Option<TicketTier> = sqlx::query_as(
        r#"
            UPDATE ticket_tiers
            SET sold = sold - $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND sold >= $1
            RETURNING *;
        "#,
    )
    .bind(quantity)
    .bind(tier_id)
    .fetch_optional(conn)
    .await?;
    match &tier {
        Some(t) => debug!("🗃️ Released {quantity} on tier {tier_id}. {} of {} now sold", t.sold, t.capacity),
        None => warn!("🗃️ Could not release {quantity} on tier {tier_id}. The tier is missing or has too few sales"),
    }
    Ok(tier)
}

pub async fn set_active(
    tier_id: &TierId,
    active: bool,
    conn: &mut SqliteConnection,
) -> Result<Option<TicketTier>, StorageError> {
    let tier = sqlx::query_as(
        "UPDATE ticket_tiers SET active = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(active)
    .bind(tier_id)
    .fetch_optional(conn)
    .await?;
    Ok(tier)
}
