use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::booking::{
    AssignWorkerReq, BookingQueryParams, CreateBookingReq, PaymentInfo, RescheduleReq,
    UpdateStatusReq, VerifyOtpReq,
};
use crate::models::service::Service;
use crate::reminder::hash_code;
use crate::state::AppState;
use crate::utils::errorhandler::AppError;
use crate::utils::slots::{generate_slots, parse_date};

fn schedule_for(service: &Service) -> Vec<String> {
    generate_slots(
        &service.working_hours.start,
        &service.working_hours.end,
        service.duration_minutes,
    )
}

pub async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<CreateBookingReq>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if parse_date(&payload.date).is_none() {
        return Err(AppError::validation("invalid date, expected YYYY-MM-DD"));
    }

    let service = state
        .catalog
        .get_service(payload.service_id)
        .ok_or_else(|| AppError::not_found("service not found"))?;

    //slot must come from the service schedule
    let all = schedule_for(&service);
    if !all.iter().any(|s| s == &payload.slot) {
        return Err(AppError::invalid_slot(
            "requested slot is not in the service schedule",
        ));
    }

    //the ledger re-checks the slot under its write lock
    let booking = state.store.create(&service, payload)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({"success": true, "booking": booking})),
    ))
}

pub async fn get_booking_by_id(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booking = state.store.get(booking_id)?;
    Ok(Json(json!(booking)))
}

pub async fn list_bookings(
    State(state): State<AppState>,
    Query(params): Query<BookingQueryParams>,
) -> Result<Json<Value>, AppError> {
    let rows = state.store.list(&params);
    Ok(Json(json!({"total": rows.len(), "data": rows})))
}

pub async fn reschedule_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<RescheduleReq>,
) -> Result<Json<Value>, AppError> {
    if parse_date(&payload.date).is_none() {
        return Err(AppError::validation("invalid date, expected YYYY-MM-DD"));
    }

    let booking = state.store.get(booking_id)?;
    let service = state
        .catalog
        .get_service(booking.service_id)
        .ok_or_else(|| AppError::not_found("service for this booking no longer exists"))?;

    let valid = schedule_for(&service);
    let booking = state
        .store
        .reschedule(booking_id, &payload.date, &payload.slot, &valid)?;

    Ok(Json(json!({"success": true, "booking": booking})))
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booking = state.store.cancel(booking_id)?;
    Ok(Json(json!({"success": true, "booking": booking})))
}

pub async fn update_booking_status(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusReq>,
) -> Result<Json<Value>, AppError> {
    let booking = state.store.update_status(booking_id, payload.status)?;
    Ok(Json(json!({"success": true, "booking": booking})))
}

pub async fn mark_booking_paid(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<PaymentInfo>,
) -> Result<Json<Value>, AppError> {
    let booking = state.store.mark_paid(booking_id, payload)?;
    Ok(Json(json!({"success": true, "booking": booking})))
}

pub async fn assign_worker(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<AssignWorkerReq>,
) -> Result<Json<Value>, AppError> {
    state
        .workers
        .get_worker(payload.worker_id)
        .ok_or_else(|| AppError::not_found("worker not found"))?;

    let booking = state.store.assign_worker(booking_id, payload.worker_id)?;
    Ok(Json(json!({"success": true, "booking": booking})))
}

pub async fn verify_booking_otp(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<VerifyOtpReq>,
) -> Result<Json<Value>, AppError> {
    state
        .store
        .verify_otp(booking_id, &hash_code(&payload.code), OffsetDateTime::now_utc())?;
    Ok(Json(json!({"verified": true})))
}
