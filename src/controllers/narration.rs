use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use super::extract::ApiJson;
use crate::{
    domain::narration::{NarrationOrchestratorApi, NarrationResponse, NarrationTrigger},
    error::{AppError, AppResult},
    infrastructure::auth::AuthUser,
};

pub struct NarrationController {
    orchestrator: Arc<dyn NarrationOrchestratorApi>,
}

impl NarrationController {
    pub fn new(orchestrator: Arc<dyn NarrationOrchestratorApi>) -> Self {
        Self { orchestrator }
    }

    /// POST /api/narration - Generate the Darija audio of a stored report
    pub async fn narrate(
        State(controller): State<Arc<NarrationController>>,
        Extension(auth_user): Extension<AuthUser>,
        ApiJson(trigger): ApiJson<NarrationTrigger>,
    ) -> AppResult<Json<NarrationResponse>> {
        // The body names the report owner; it must be the authenticated caller
        if !trigger.user_id.trim().is_empty() && trigger.user_id.trim() != auth_user.user_id {
            return Err(AppError::Unauthorized(
                "userId does not match the authenticated user".to_string(),
            ));
        }

        let trigger = NarrationTrigger {
            user_id: auth_user.user_id,
            ..trigger
        };

        let outcome = controller.orchestrator.narrate(trigger).await?;
        Ok(Json(outcome.into()))
    }
}
