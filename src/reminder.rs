//! Daily reminder cycle: scan tomorrow's bookings, issue a one-time code per
//! booking, hand the plaintext to the notifier and keep only the hash.
//! The cycle is an explicit operation so a cron, a timer task or a test can
//! trigger it; `main` wires it to a tokio interval.

use rand::Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use crate::external::ReminderNote;
use crate::state::AppState;
use crate::utils::slots::format_date;

/// Codes die 24 hours after they are issued.
pub const OTP_TTL_HOURS: i64 = 24;

pub fn hash_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn generate_code() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0u32..1_000_000))
}

#[derive(Debug, Default, Serialize)]
pub struct CycleReport {
    pub scanned: usize,
    pub sent: usize,
    pub failed: usize,
}

/// One reminder cycle, relative to `now`. Dispatch happens before anything
/// is persisted: a failed dispatch leaves `reminderSent` false so the next
/// cycle retries, and one stuck booking never blocks the rest of the batch.
pub fn run_reminder_cycle(state: &AppState, now: OffsetDateTime) -> CycleReport {
    let mut report = CycleReport::default();

    let Some(tomorrow) = now.date().next_day() else {
        return report;
    };
    let date = format_date(tomorrow);

    let due = state.store.due_for_reminder(&date);
    report.scanned = due.len();

    for booking in due {
        let code = generate_code();
        let note = ReminderNote {
            booking_id: booking.booking_id,
            recipient: booking.customer_phone.clone(),
            summary: format!(
                "{} on {} at {}",
                booking.service_title, booking.date, booking.slot
            ),
            otp_code: code.clone(),
        };

        match state.notifier.send_reminder(&note) {
            Ok(()) => {
                let expires_at = now + time::Duration::hours(OTP_TTL_HOURS);
                if let Err(e) = state.store.commit_reminder(
                    booking.booking_id,
                    &booking.date,
                    hash_code(&code),
                    expires_at,
                ) {
                    log::warn!("reminder sent but not recorded for booking {}: {}", booking.booking_id, e);
                }
                report.sent += 1;
            }
            Err(e) => {
                log::warn!(
                    "reminder for booking {} not sent, will retry next cycle: {}",
                    booking.booking_id,
                    e
                );
                report.failed += 1;
            }
        }
    }

    log::info!(
        "reminder cycle for {}: {} scanned, {} sent, {} failed",
        date,
        report.scanned,
        report.sent,
        report.failed
    );
    report
}

/// Background trigger, decoupled from request traffic. The first tick of a
/// tokio interval fires immediately, so it is consumed before the loop.
pub fn spawn_reminder_loop(state: AppState, every: std::time::Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await;
        loop {
            interval.tick().await;
            run_reminder_cycle(&state, OffsetDateTime::now_utc());
        }
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::external::{
        FailingNotifier, InMemoryCatalog, InMemoryWorkers, RecordingNotifier, ReminderNotifier,
    };
    use crate::models::booking::CreateBookingReq;
    use crate::models::service::{Service, WorkingHours};
    use crate::utils::errorhandler::AppError;
    use time::Duration;
    use uuid::Uuid;

    fn state_with(notifier: Arc<dyn ReminderNotifier>) -> AppState {
        AppState::new(
            Arc::new(InMemoryCatalog::new()),
            Arc::new(InMemoryWorkers::new()),
            notifier,
        )
    }

    fn book_for(state: &AppState, service: &Service, date: &str, slot: &str) -> Uuid {
        state
            .store
            .create(
                service,
                CreateBookingReq {
                    service_id: service.service_id,
                    date: date.to_string(),
                    slot: slot.to_string(),
                    customer_name: "Sam".to_string(),
                    customer_phone: "+1555111".to_string(),
                    notes: None,
                    user_id: None,
                },
            )
            .unwrap()
            .booking_id
    }

    fn test_service() -> Service {
        Service {
            service_id: Uuid::new_v4(),
            title: "Pipe repair".to_string(),
            category: "plumbing".to_string(),
            duration_minutes: 60,
            working_hours: WorkingHours {
                start: "09:00".to_string(),
                end: "17:00".to_string(),
            },
            price: 120.0,
        }
    }

    fn tomorrow_of(now: OffsetDateTime) -> String {
        format_date(now.date().next_day().unwrap())
    }

    #[test]
    fn cycle_sends_code_and_stores_only_the_hash() {
        let notifier = Arc::new(RecordingNotifier::new());
        let state = state_with(notifier.clone());
        let service = test_service();
        let now = OffsetDateTime::now_utc();
        let id = book_for(&state, &service, &tomorrow_of(now), "10:00");

        let report = run_reminder_cycle(&state, now);
        assert_eq!(report.sent, 1);
        assert_eq!(report.failed, 0);

        let notes = notifier.notes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].otp_code.len(), 6);

        let booking = state.store.get(id).unwrap();
        assert!(booking.reminder_sent);
        let otp = booking.service_otp.unwrap();
        assert!(!otp.verified);
        assert_eq!(otp.code_hash, hash_code(&notes[0].otp_code));
        assert_ne!(otp.code_hash, notes[0].otp_code);
    }

    #[test]
    fn cycle_only_picks_tomorrows_unreminded_bookings() {
        let notifier = Arc::new(RecordingNotifier::new());
        let state = state_with(notifier.clone());
        let service = test_service();
        let now = OffsetDateTime::now_utc();
        let tomorrow = tomorrow_of(now);

        let due = book_for(&state, &service, &tomorrow, "10:00");
        book_for(&state, &service, "2099-01-01", "10:00");
        let cancelled = book_for(&state, &service, &tomorrow, "11:00");
        state.store.cancel(cancelled).unwrap();

        let report = run_reminder_cycle(&state, now);
        assert_eq!(report.scanned, 1);
        assert_eq!(report.sent, 1);
        assert_eq!(notifier.notes()[0].booking_id, due);

        // second cycle is a no-op, reminderSent guards the booking
        let second = run_reminder_cycle(&state, now);
        assert_eq!(second.scanned, 0);
        assert_eq!(notifier.notes().len(), 1);
    }

    #[test]
    fn failed_dispatch_leaves_booking_ready_for_retry() {
        let state = state_with(Arc::new(FailingNotifier));
        let service = test_service();
        let now = OffsetDateTime::now_utc();
        let id = book_for(&state, &service, &tomorrow_of(now), "10:00");

        let report = run_reminder_cycle(&state, now);
        assert_eq!(report.failed, 1);
        assert_eq!(report.sent, 0);

        let booking = state.store.get(id).unwrap();
        assert!(!booking.reminder_sent);
        assert!(booking.service_otp.is_none());

        // next cycle picks it up again
        let retry = run_reminder_cycle(&state, now);
        assert_eq!(retry.scanned, 1);
    }

    #[test]
    fn otp_verifies_with_the_right_code_before_expiry() {
        let notifier = Arc::new(RecordingNotifier::new());
        let state = state_with(notifier.clone());
        let service = test_service();
        let now = OffsetDateTime::now_utc();
        let id = book_for(&state, &service, &tomorrow_of(now), "10:00");
        run_reminder_cycle(&state, now);

        let code = notifier.notes()[0].otp_code.clone();
        let booking = state.store.verify_otp(id, &hash_code(&code), now).unwrap();
        assert!(booking.service_otp.unwrap().verified);
    }

    #[test]
    fn wrong_code_fails_without_burning_the_real_one() {
        let notifier = Arc::new(RecordingNotifier::new());
        let state = state_with(notifier.clone());
        let service = test_service();
        let now = OffsetDateTime::now_utc();
        let id = book_for(&state, &service, &tomorrow_of(now), "10:00");
        run_reminder_cycle(&state, now);

        let err = state
            .store
            .verify_otp(id, &hash_code("000000x"), now)
            .unwrap_err();
        assert!(matches!(err, AppError::OtpInvalid));

        let code = notifier.notes()[0].otp_code.clone();
        state.store.verify_otp(id, &hash_code(&code), now).unwrap();
    }

    #[test]
    fn expired_code_is_rejected_even_when_correct() {
        let notifier = Arc::new(RecordingNotifier::new());
        let state = state_with(notifier.clone());
        let service = test_service();
        let now = OffsetDateTime::now_utc();
        let id = book_for(&state, &service, &tomorrow_of(now), "10:00");
        run_reminder_cycle(&state, now);

        let code = notifier.notes()[0].otp_code.clone();
        let later = now + Duration::hours(OTP_TTL_HOURS + 1);
        let err = state
            .store
            .verify_otp(id, &hash_code(&code), later)
            .unwrap_err();
        assert!(matches!(err, AppError::OtpExpired));
    }

    #[test]
    fn verification_without_an_issued_code_is_invalid() {
        let state = state_with(Arc::new(RecordingNotifier::new()));
        let service = test_service();
        let now = OffsetDateTime::now_utc();
        let id = book_for(&state, &service, &tomorrow_of(now), "10:00");

        let err = state
            .store
            .verify_otp(id, &hash_code("123456"), now)
            .unwrap_err();
        assert!(matches!(err, AppError::OtpInvalid));
    }

    #[test]
    fn reverifying_with_same_code_is_idempotent() {
        let notifier = Arc::new(RecordingNotifier::new());
        let state = state_with(notifier.clone());
        let service = test_service();
        let now = OffsetDateTime::now_utc();
        let id = book_for(&state, &service, &tomorrow_of(now), "10:00");
        run_reminder_cycle(&state, now);

        let code = notifier.notes()[0].otp_code.clone();
        state.store.verify_otp(id, &hash_code(&code), now).unwrap();
        let again = state.store.verify_otp(id, &hash_code(&code), now).unwrap();
        assert!(again.service_otp.unwrap().verified);

        let err = state
            .store
            .verify_otp(id, &hash_code("badbad"), now)
            .unwrap_err();
        assert!(matches!(err, AppError::OtpInvalid));
    }
}
