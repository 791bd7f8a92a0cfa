use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

/// Append a notification event. Emission is fire-and-forget by contract:
/// callers log a failure and continue, it never changes the outcome of the
/// primary operation.
pub async fn emit_event(
    pool: &DbPool,
    user_id: Option<Uuid>,
    event_type: &str,
    payload: Value,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO events (id, user_id, event_type, payload)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(event_type)
    .bind(payload)
    .execute(pool)
    .await?;

    Ok(())
}
