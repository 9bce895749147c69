use chrono::{DateTime, Utc};
use log::*;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Event, EventId, HostId, NewEvent},
    traits::{RescheduleOutcome, StorageError},
};

pub async fn insert_event(event: &NewEvent, conn: &mut SqliteConnection) -> Result<Event, StorageError> {
    let event: Event = sqlx::query_as(
        r#"
            INSERT INTO events (id, host_id, title, starts_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(&event.id)
    .bind(&event.host_id)
    .bind(&event.title)
    .bind(event.starts_at)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Event [{}] '{}' created for host {}", event.id, event.title, event.host_id);
    Ok(event)
}

pub async fn fetch_event(event_id: &EventId, conn: &mut SqliteConnection) -> Result<Option<Event>, StorageError> {
    let event = sqlx::query_as("SELECT * FROM events WHERE id = $1").bind(event_id).fetch_optional(conn).await?;
    Ok(event)
}

pub async fn event_title(event_id: &EventId, conn: &mut SqliteConnection) -> Result<Option<String>, StorageError> {
    let title = sqlx::query_scalar("SELECT title FROM events WHERE id = $1").bind(event_id).fetch_optional(conn).await?;
    Ok(title)
}

pub async fn events_for_host(host_id: &HostId, conn: &mut SqliteConnection) -> Result<Vec<Event>, StorageError> {
    let events = sqlx::query_as("SELECT * FROM events WHERE host_id = $1 ORDER BY starts_at, id")
        .bind(host_id)
        .fetch_all(conn)
        .await?;
    Ok(events)
}

/// Moves the start time, but only while no ticket references the event and no tier has capacity claimed. Capacity is
/// claimed before the ticket row is written, so both are checked. The checks are part of the update statement, so a
/// purchase cannot slip in between the check and the write.
pub async fn reschedule(
    event_id: &EventId,
    starts_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<RescheduleOutcome, StorageError> {
    let updated: Option<Event> = sqlx::query_as(
        r#"
            UPDATE events SET starts_at = $1
            WHERE id = $2
              AND NOT EXISTS (SELECT 1 FROM tickets WHERE tickets.event_id = events.id)
              AND NOT EXISTS (SELECT 1 FROM ticket_tiers WHERE ticket_tiers.event_id = events.id AND sold > 0)
            RETURNING *;
        "#,
    )
    .bind(starts_at)
    .bind(event_id)
    .fetch_optional(&mut *conn)
    .await?;
    if let Some(event) = updated {
        debug!("🗃️ Event {event_id} rescheduled to {starts_at}");
        return Ok(RescheduleOutcome::Rescheduled(event));
    }
    let outcome = match fetch_event(event_id, conn).await? {
        Some(_) => RescheduleOutcome::Locked,
        None => RescheduleOutcome::NotFound,
    };
    Ok(outcome)
}
