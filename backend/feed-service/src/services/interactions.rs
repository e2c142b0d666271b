use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::db::InteractionSink;
use crate::metrics::feed::INTERACTION_EVENTS_TOTAL;
use crate::models::{InteractionType, NewInteraction, TargetType};

/// Best-effort writer for the interaction log. A failed write is logged and
/// counted; it never fails the mutation that produced it.
#[derive(Clone)]
pub struct InteractionRecorder {
    sink: Arc<dyn InteractionSink>,
}

impl InteractionRecorder {
    pub fn new(sink: Arc<dyn InteractionSink>) -> Self {
        Self { sink }
    }

    pub async fn emit(
        &self,
        user_id: Uuid,
        target_type: TargetType,
        target_id: Uuid,
        interaction_type: InteractionType,
        metadata: Value,
    ) {
        let event = NewInteraction {
            user_id,
            target_type,
            target_id,
            interaction_type,
            metadata,
        };

        match self.sink.record(event).await {
            Ok(interaction) => {
                INTERACTION_EVENTS_TOTAL
                    .with_label_values(&[interaction_type.as_str(), "recorded"])
                    .inc();
                debug!(
                    interaction_id = %interaction.id,
                    interaction_type = interaction_type.as_str(),
                    target_type = target_type.as_str(),
                    target_id = %target_id,
                    "recorded interaction"
                );
            }
            Err(e) => {
                INTERACTION_EVENTS_TOTAL
                    .with_label_values(&[interaction_type.as_str(), "failed"])
                    .inc();
                warn!(
                    user_id = %user_id,
                    interaction_type = interaction_type.as_str(),
                    target_id = %target_id,
                    error = %e,
                    "failed to record interaction"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockInteractionSink;
    use crate::error::AppError;

    #[tokio::test]
    async fn test_sink_failure_is_swallowed() {
        let mut sink = MockInteractionSink::new();
        sink.expect_record()
            .times(1)
            .returning(|_| Err(AppError::Database("disk full".into())));

        let recorder = InteractionRecorder::new(Arc::new(sink));
        recorder
            .emit(
                Uuid::new_v4(),
                TargetType::User,
                Uuid::new_v4(),
                InteractionType::Follow,
                serde_json::json!({}),
            )
            .await;
    }
}
