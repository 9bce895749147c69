use sqlx::SqliteConnection;

use crate::{
    db_types::EventId,
    traits::{StorageError, TierTicketTotals},
};

/// Per-tier ticket totals for an event. Only completed tickets count towards revenue and redemptions.
/// Tiers without any completed tickets are omitted.
pub async fn tier_totals_for_event(
    event_id: &EventId,
    conn: &mut SqliteConnection,
) -> Result<Vec<TierTicketTotals>, StorageError> {
    let totals = sqlx::query_as(
        r#"
            SELECT
                tier_id,
                COUNT(*) AS tickets,
                COALESCE(SUM(quantity_redeemed), 0) AS redeemed,
                COALESCE(SUM(unit_price * quantity_purchased), 0) AS revenue,
                COALESCE(SUM(service_fee), 0) AS fees
            FROM tickets
            WHERE event_id = $1 AND payment_state = 'completed'
            GROUP BY tier_id
            ORDER BY tier_id
        "#,
    )
    .bind(event_id)
    .fetch_all(conn)
    .await?;
    Ok(totals)
}
