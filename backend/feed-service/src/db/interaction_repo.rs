use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::InteractionSink;
use crate::error::Result;
use crate::models::{Interaction, NewInteraction};

/// Append-only `interactions` table
#[derive(Clone)]
pub struct PgInteractionRepository {
    pool: PgPool,
}

impl PgInteractionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InteractionSink for PgInteractionRepository {
    async fn record(&self, event: NewInteraction) -> Result<Interaction> {
        let (id, created_at) = sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
            r#"
            INSERT INTO interactions
                (id, user_id, target_type, target_id, interaction_type, metadata, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(event.user_id)
        .bind(event.target_type.as_str())
        .bind(event.target_id)
        .bind(event.interaction_type.as_str())
        .bind(event.metadata.clone())
        .fetch_one(&self.pool)
        .await?;

        Ok(Interaction {
            id,
            user_id: event.user_id,
            target_type: event.target_type,
            target_id: event.target_id,
            interaction_type: event.interaction_type,
            metadata: event.metadata,
            created_at,
        })
    }
}
