use axum::extract::rejection::JsonRejection;
use axum::Json;
use reelcast_core::error::CoreError;
use reelcast_core::script_check::{self, ScriptCheck};
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::render::{json_body, SCRIPT_REQUIRED};

#[derive(Debug, Deserialize)]
pub struct ValidateScriptRequest {
    #[serde(default)]
    pub script: String,
}

/// POST /validate-script
pub async fn validate_script(
    payload: Result<Json<ValidateScriptRequest>, JsonRejection>,
) -> AppResult<Json<ScriptCheck>> {
    let input = json_body(payload)?;
    if input.script.is_empty() {
        return Err(CoreError::Validation(SCRIPT_REQUIRED.into()).into());
    }

    Ok(Json(script_check::validate_script(&input.script)))
}
