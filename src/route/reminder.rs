use axum::{extract::State, Json};
use serde_json::{json, Value};
use time::OffsetDateTime;

use crate::reminder::run_reminder_cycle;
use crate::state::AppState;
use crate::utils::errorhandler::AppError;

/// Runs one reminder cycle right now. Meant for an external scheduler
/// (cron hitting the endpoint) or for poking the job manually.
pub async fn run_reminders(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let report = run_reminder_cycle(&state, OffsetDateTime::now_utc());
    Ok(Json(json!({"success": true, "report": report})))
}
