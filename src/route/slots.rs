use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::models::booking::SlotQueryParams;
use crate::state::AppState;
use crate::utils::errorhandler::AppError;
use crate::utils::slots::{generate_slots, parse_date};

/// Availability for a (service, date) pair: the full schedule and what is
/// left after subtracting slots held by active bookings. Read-only.
pub async fn get_available_slots(
    State(state): State<AppState>,
    Query(params): Query<SlotQueryParams>,
) -> Result<Json<Value>, AppError> {
    if parse_date(&params.date).is_none() {
        return Err(AppError::validation("invalid date, expected YYYY-MM-DD"));
    }

    let service = state
        .catalog
        .get_service(params.service_id)
        .ok_or_else(|| AppError::not_found("service not found"))?;

    let all = generate_slots(
        &service.working_hours.start,
        &service.working_hours.end,
        service.duration_minutes,
    );
    let booked = state.store.booked_slots(params.service_id, &params.date);
    let available: Vec<&String> = all.iter().filter(|s| !booked.contains(*s)).collect();

    Ok(Json(json!({"available": available, "all": all})))
}
