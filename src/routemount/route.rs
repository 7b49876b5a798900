use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::route::{booking::{assign_worker, cancel_booking, create_booking, get_booking_by_id, list_bookings, mark_booking_paid, reschedule_booking, update_booking_status, verify_booking_otp}, calendar::{get_worker_calendar, reassign_booking}, reminder::run_reminders, slots::get_available_slots};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
    //bookings
    .route("/bookings", post(create_booking))                        //book a slot, conflict if taken
    .route("/bookings", get(list_bookings))                          //admin listing with filters
    .route("/bookings/slots", get(get_available_slots))              //availability for serviceId+date
    .route("/bookings/{id}", get(get_booking_by_id))                 //get booking by id
    .route("/bookings/{id}", delete(cancel_booking))                 //cancel booking, frees the slot
    .route("/bookings/{id}/reschedule", put(reschedule_booking))     //move to a new date/slot
    .route("/bookings/{id}/assign", put(assign_worker))              //attach a worker
    .route("/bookings/{id}/status", put(update_booking_status))      //status transitions only along the table
    .route("/bookings/{id}/pay", put(mark_booking_paid))             //record a payment receipt
    .route("/bookings/{id}/verify-otp", post(verify_booking_otp))    //confirm service start
    //calendar
    .route("/calendar/worker/{workerId}", get(get_worker_calendar))  //worker's bookings as events
    .route("/calendar/reassign", put(reassign_booking))              //drag-and-drop reassignment
    //reminders
    .route("/reminders/run", post(run_reminders))                    //trigger one reminder cycle
    .with_state(state)
}
