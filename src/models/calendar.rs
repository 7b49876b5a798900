use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Calendar projection of a booking, shaped for the admin calendar widget.
/// `start` is the combined "YYYY-MM-DDTHH:MM" wall-clock timestamp.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub booking_id: Uuid,
    pub title: String,
    pub start: String,
    pub service_id: Uuid,
}
