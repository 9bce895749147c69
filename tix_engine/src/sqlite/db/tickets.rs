use log::*;
use sqlx::SqliteConnection;

use crate::{
    db_types::{BuyerId, EventId, NewTicket, PaymentState, Redemption, Ticket, TicketId},
    traits::{RedeemOutcome, Redeemed, StorageError},
};

pub async fn insert_ticket(ticket: &NewTicket, conn: &mut SqliteConnection) -> Result<Ticket, StorageError> {
    if ticket.quantity <= 0 {
        return Err(StorageError::InvalidInput(format!("Ticket quantity must be positive, got {}", ticket.quantity)));
    }
    let ticket: Ticket = sqlx::query_as(
        r#"
            INSERT INTO tickets (
                id,
                tier_id,
                event_id,
                buyer_id,
                quantity_purchased,
                payment_state,
                unit_price,
                service_fee
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *;
        "#,
    )
    .bind(&ticket.id)
    .bind(&ticket.tier_id)
    .bind(&ticket.event_id)
    .bind(&ticket.buyer_id)
    .bind(ticket.quantity)
    .bind(ticket.payment_state)
    .bind(ticket.unit_price)
    .bind(ticket.service_fee)
    .fetch_one(conn)
    .await?;
    debug!(
        "🗃️ Ticket [{}] x{} issued to {} on tier {}",
        ticket.id, ticket.quantity_purchased, ticket.buyer_id, ticket.tier_id
    );
    Ok(ticket)
}

pub async fn fetch_ticket(ticket_id: &TicketId, conn: &mut SqliteConnection) -> Result<Option<Ticket>, StorageError> {
    let ticket = sqlx::query_as("SELECT * FROM tickets WHERE id = $1").bind(ticket_id).fetch_optional(conn).await?;
    Ok(ticket)
}

/// Consumes one admission with a single conditional update and records the scan.
///
/// This is not atomic on its own. Call it inside a transaction so that the counter and the audit row are committed
/// together.
pub async fn redeem(
    ticket_id: &TicketId,
    expected_event: &EventId,
    conn: &mut SqliteConnection,
) -> Result<RedeemOutcome, StorageError> {
    let updated: Option<Ticket> = sqlx::query_as(
        r#"
            UPDATE tickets
            SET quantity_redeemed = quantity_redeemed + 1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
              AND event_id = $2
              AND payment_state = 'completed'
              AND quantity_redeemed < quantity_purchased
            RETURNING *;
        "#,
    )
    .bind(ticket_id)
    .bind(expected_event)
    .fetch_optional(&mut *conn)
    .await?;
    match updated {
        Some(ticket) => {
            let scan_number = ticket.quantity_redeemed;
            insert_redemption(&ticket, &mut *conn).await?;
            let remaining = ticket.remaining();
            trace!("🗃️ Ticket {ticket_id} scan #{scan_number} recorded. {remaining} admissions left");
            Ok(RedeemOutcome::Redeemed(Redeemed { ticket, scan_number, remaining }))
        },
        None => {
            let outcome = classify_refusal(ticket_id, expected_event, conn).await?;
            trace!("🗃️ Redemption of ticket {ticket_id} refused: {outcome:?}");
            Ok(outcome)
        },
    }
}

/// Explains why the conditional update in [`redeem`] matched nothing. The checks are applied in the same order a door
/// attendant would care about them.
async fn classify_refusal(
    ticket_id: &TicketId,
    expected_event: &EventId,
    conn: &mut SqliteConnection,
) -> Result<RedeemOutcome, StorageError> {
    let outcome = match fetch_ticket(ticket_id, conn).await? {
        None => RedeemOutcome::NotFound,
        Some(t) if &t.event_id != expected_event => RedeemOutcome::WrongEvent { ticket_event: t.event_id },
        Some(t) if t.payment_state != PaymentState::Completed => RedeemOutcome::PaymentIncomplete(t.payment_state),
        Some(t) => RedeemOutcome::FullyRedeemed { quantity_purchased: t.quantity_purchased },
    };
    Ok(outcome)
}

async fn insert_redemption(ticket: &Ticket, conn: &mut SqliteConnection) -> Result<(), StorageError> {
    sqlx::query("INSERT INTO redemptions (ticket_id, event_id, scan_number) VALUES ($1, $2, $3)")
        .bind(&ticket.id)
        .bind(&ticket.event_id)
        .bind(ticket.quantity_redeemed)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn tickets_for_buyer(
    buyer_id: &BuyerId,
    payment_state: Option<PaymentState>,
    conn: &mut SqliteConnection,
) -> Result<Vec<Ticket>, StorageError> {
    let tickets = sqlx::query_as(
        r#"
            SELECT * FROM tickets
            WHERE buyer_id = $1 AND ($2 IS NULL OR payment_state = $2)
            ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(buyer_id)
    .bind(payment_state)
    .fetch_all(conn)
    .await?;
    Ok(tickets)
}

pub async fn tickets_for_event(event_id: &EventId, conn: &mut SqliteConnection) -> Result<Vec<Ticket>, StorageError> {
    let tickets = sqlx::query_as("SELECT * FROM tickets WHERE event_id = $1 ORDER BY created_at, rowid")
        .bind(event_id)
        .fetch_all(conn)
        .await?;
    Ok(tickets)
}

pub async fn scan_history(ticket_id: &TicketId, conn: &mut SqliteConnection) -> Result<Vec<Redemption>, StorageError> {
    let scans = sqlx::query_as("SELECT * FROM redemptions WHERE ticket_id = $1 ORDER BY scan_number")
        .bind(ticket_id)
        .fetch_all(conn)
        .await?;
    Ok(scans)
}
