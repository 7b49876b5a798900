use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Allowed edges: pending -> assigned -> in-progress -> completed,
    /// plus cancellation from any non-terminal state. Completed and
    /// cancelled are terminal.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Assigned)
                | (Assigned, InProgress)
                | (InProgress, Completed)
                | (Pending, Cancelled)
                | (Assigned, Cancelled)
                | (InProgress, Cancelled)
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub provider: String,
    pub transaction_id: String,
    pub amount: f64,
    pub currency: String,
}

/// Only the hash of the code is ever stored; the plaintext goes out once
/// through the notifier and is then gone.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOtp {
    pub code_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    pub verified: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: Uuid,
    pub service_id: Uuid,
    pub user_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: String,
    pub notes: Option<String>,
    // denormalized from the catalog at creation so the record survives
    // later catalog edits or deletion
    pub service_title: String,
    pub service_category: String,
    pub duration_minutes: i32,
    pub date: String,
    pub slot: String,
    pub assigned_worker_id: Option<Uuid>,
    pub status: BookingStatus,
    pub paid: bool,
    pub payment_info: Option<PaymentInfo>,
    pub reminder_sent: bool,
    pub service_otp: Option<ServiceOtp>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingReq {
    pub service_id: Uuid,
    pub date: String,
    pub slot: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub notes: Option<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleReq {
    pub date: String,
    pub slot: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AssignWorkerReq {
    pub worker_id: Uuid,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusReq {
    pub status: BookingStatus,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpReq {
    pub code: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReassignReq {
    pub booking_id: Uuid,
    pub worker_id: Uuid,
    pub date: Option<String>,
    pub slot: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct BookingQueryParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub service_id: Option<Uuid>,
    pub status: Option<BookingStatus>,
    pub worker_id: Option<Uuid>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SlotQueryParams {
    pub service_id: Uuid,
    pub date: String,
}

#[cfg(test)]
mod tests {
    use super::BookingStatus::*;

    #[test]
    fn happy_path_edges_are_allowed() {
        assert!(Pending.can_transition_to(Assigned));
        assert!(Assigned.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
    }

    #[test]
    fn cancellation_from_active_states_is_allowed() {
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Assigned.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(Cancelled));
    }

    #[test]
    fn terminal_states_have_no_outgoing_edges() {
        for next in [Pending, Assigned, InProgress, Completed, Cancelled] {
            assert!(!Completed.can_transition_to(next));
            assert!(!Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn skipping_states_is_rejected() {
        assert!(!Pending.can_transition_to(InProgress));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Assigned.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Pending));
    }
}
