use sqlx::SqliteConnection;

use crate::{
    db_types::{BuyerId, Profile},
    traits::StorageError,
};

pub async fn buyer_name(buyer_id: &BuyerId, conn: &mut SqliteConnection) -> Result<Option<String>, StorageError> {
    let name = sqlx::query_scalar("SELECT display_name FROM profiles WHERE buyer_id = $1")
        .bind(buyer_id)
        .fetch_optional(conn)
        .await?;
    Ok(name)
}

pub async fn upsert_profile(
    buyer_id: &BuyerId,
    display_name: &str,
    conn: &mut SqliteConnection,
) -> Result<Profile, StorageError> {
    let profile = sqlx::query_as(
        r#"
            INSERT INTO profiles (buyer_id, display_name) VALUES ($1, $2)
            ON CONFLICT (buyer_id) DO UPDATE SET display_name = excluded.display_name, updated_at = CURRENT_TIMESTAMP
            RETURNING buyer_id, display_name;
        "#,
    )
    .bind(buyer_id)
    .bind(display_name)
    .fetch_one(conn)
    .await?;
    Ok(profile)
}
