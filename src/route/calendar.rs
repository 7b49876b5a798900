use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::booking::ReassignReq;
use crate::state::AppState;
use crate::utils::errorhandler::AppError;
use crate::utils::slots::{generate_slots, parse_date};

pub async fn get_worker_calendar(
    State(state): State<AppState>,
    Path(worker_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state
        .workers
        .get_worker(worker_id)
        .ok_or_else(|| AppError::not_found("worker not found"))?;

    let events = state.store.calendar_for(worker_id);
    Ok(Json(json!(events)))
}

/// Backs calendar drag-and-drop: re-target the worker, optionally moving the
/// booking in time through the same conflict check as a reschedule. On any
/// failure the booking is untouched so the UI can snap the event back.
pub async fn reassign_booking(
    State(state): State<AppState>,
    Json(payload): Json<ReassignReq>,
) -> Result<Json<Value>, AppError> {
    state
        .workers
        .get_worker(payload.worker_id)
        .ok_or_else(|| AppError::not_found("worker not found"))?;

    let new_time = match (&payload.date, &payload.slot) {
        (Some(date), Some(slot)) => {
            if parse_date(date).is_none() {
                return Err(AppError::validation("invalid date, expected YYYY-MM-DD"));
            }
            Some((date.as_str(), slot.as_str()))
        }
        (None, None) => None,
        _ => {
            return Err(AppError::validation(
                "date and slot must be supplied together",
            ))
        }
    };

    let valid = if new_time.is_some() {
        let booking = state.store.get(payload.booking_id)?;
        let service = state
            .catalog
            .get_service(booking.service_id)
            .ok_or_else(|| AppError::not_found("service for this booking no longer exists"))?;
        generate_slots(
            &service.working_hours.start,
            &service.working_hours.end,
            service.duration_minutes,
        )
    } else {
        Vec::new()
    };

    let booking = state
        .store
        .reassign(payload.booking_id, payload.worker_id, new_time, &valid)?;

    Ok(Json(json!({"success": true, "booking": booking})))
}
