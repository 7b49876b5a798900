//! Booking ledger. The single shared mutable resource in the system.
//!
//! Every mutating operation takes the write guard before its conflict check
//! and releases it only after the mutation, so the check-then-write sequence
//! for a (service, date, slot) tuple is atomic: of N concurrent creates for
//! the same tuple exactly one can win.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::booking::{
    Booking, BookingQueryParams, BookingStatus, CreateBookingReq, PaymentInfo, ServiceOtp,
};
use crate::models::calendar::CalendarEvent;
use crate::models::service::Service;
use crate::utils::errorhandler::AppError;

pub struct BookingStore {
    bookings: RwLock<HashMap<Uuid, Booking>>,
}

/// Cancelled bookings do not occupy a slot.
fn slot_taken(
    bookings: &HashMap<Uuid, Booking>,
    service_id: Uuid,
    date: &str,
    slot: &str,
    exclude: Option<Uuid>,
) -> bool {
    bookings.values().any(|b| {
        b.status != BookingStatus::Cancelled
            && b.service_id == service_id
            && b.date == date
            && b.slot == slot
            && Some(b.booking_id) != exclude
    })
}

impl BookingStore {
    pub fn new() -> Self {
        BookingStore {
            bookings: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts a new booking unless another active booking already holds the
    /// (service, date, slot) tuple. Service title/category/duration are
    /// copied onto the record so it stays meaningful if the catalog entry
    /// later changes or disappears.
    pub fn create(&self, service: &Service, req: CreateBookingReq) -> Result<Booking, AppError> {
        let mut bookings = self.bookings.write().expect("booking ledger lock poisoned");

        if slot_taken(&bookings, service.service_id, &req.date, &req.slot, None) {
            return Err(AppError::conflict("Slot already booked"));
        }

        let now = OffsetDateTime::now_utc();
        let booking = Booking {
            booking_id: Uuid::new_v4(),
            service_id: service.service_id,
            user_id: req.user_id,
            customer_name: req.customer_name,
            customer_phone: req.customer_phone,
            notes: req.notes,
            service_title: service.title.clone(),
            service_category: service.category.clone(),
            duration_minutes: service.duration_minutes,
            date: req.date,
            slot: req.slot,
            assigned_worker_id: None,
            status: BookingStatus::Pending,
            paid: false,
            payment_info: None,
            reminder_sent: false,
            service_otp: None,
            created_at: now,
            updated_at: now,
        };

        bookings.insert(booking.booking_id, booking.clone());
        Ok(booking)
    }

    pub fn get(&self, booking_id: Uuid) -> Result<Booking, AppError> {
        self.bookings
            .read()
            .expect("booking ledger lock poisoned")
            .get(&booking_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("booking not found"))
    }

    /// Slot values held by active bookings for one (service, date) pair.
    pub fn booked_slots(&self, service_id: Uuid, date: &str) -> HashSet<String> {
        self.bookings
            .read()
            .expect("booking ledger lock poisoned")
            .values()
            .filter(|b| {
                b.status != BookingStatus::Cancelled && b.service_id == service_id && b.date == date
            })
            .map(|b| b.slot.clone())
            .collect()
    }

    /// Moves a booking to a new (date, slot). The booking itself is excluded
    /// from the conflict check, so moving to its own current slot succeeds.
    /// Worker assignment and status are untouched; reminder/OTP state is
    /// reset when the date changes, since a reminder for the old date is
    /// stale (see DESIGN.md).
    pub fn reschedule(
        &self,
        booking_id: Uuid,
        new_date: &str,
        new_slot: &str,
        valid_slots: &[String],
    ) -> Result<Booking, AppError> {
        let mut bookings = self.bookings.write().expect("booking ledger lock poisoned");

        let service_id = bookings
            .get(&booking_id)
            .map(|b| b.service_id)
            .ok_or_else(|| AppError::not_found("booking not found"))?;

        if !valid_slots.iter().any(|s| s == new_slot) {
            return Err(AppError::invalid_slot(
                "requested slot is not in the service schedule",
            ));
        }

        if slot_taken(&bookings, service_id, new_date, new_slot, Some(booking_id)) {
            return Err(AppError::conflict("Slot already booked"));
        }

        let booking = bookings
            .get_mut(&booking_id)
            .ok_or_else(|| AppError::not_found("booking not found"))?;

        if booking.date != new_date {
            booking.reminder_sent = false;
            booking.service_otp = None;
        }
        booking.date = new_date.to_string();
        booking.slot = new_slot.to_string();
        booking.updated_at = OffsetDateTime::now_utc();
        Ok(booking.clone())
    }

    /// Idempotent: cancelling an already-cancelled booking is a no-op success.
    pub fn cancel(&self, booking_id: Uuid) -> Result<Booking, AppError> {
        let mut bookings = self.bookings.write().expect("booking ledger lock poisoned");
        let booking = bookings
            .get_mut(&booking_id)
            .ok_or_else(|| AppError::not_found("booking not found"))?;

        if booking.status != BookingStatus::Cancelled {
            booking.status = BookingStatus::Cancelled;
            booking.updated_at = OffsetDateTime::now_utc();
        }
        Ok(booking.clone())
    }

    pub fn update_status(
        &self,
        booking_id: Uuid,
        next: BookingStatus,
    ) -> Result<Booking, AppError> {
        let mut bookings = self.bookings.write().expect("booking ledger lock poisoned");
        let booking = bookings
            .get_mut(&booking_id)
            .ok_or_else(|| AppError::not_found("booking not found"))?;

        if !booking.status.can_transition_to(next) {
            return Err(AppError::invalid_transition(format!(
                "cannot move booking from {:?} to {:?}",
                booking.status, next
            )));
        }

        booking.status = next;
        booking.updated_at = OffsetDateTime::now_utc();
        Ok(booking.clone())
    }

    /// Record-keeping only; the payment itself happens elsewhere.
    pub fn mark_paid(&self, booking_id: Uuid, info: PaymentInfo) -> Result<Booking, AppError> {
        let mut bookings = self.bookings.write().expect("booking ledger lock poisoned");
        let booking = bookings
            .get_mut(&booking_id)
            .ok_or_else(|| AppError::not_found("booking not found"))?;

        booking.paid = true;
        booking.payment_info = Some(info);
        booking.updated_at = OffsetDateTime::now_utc();
        Ok(booking.clone())
    }

    /// Attaches a worker. Advances pending -> assigned; a booking already
    /// further along keeps its status, assignment never regresses it.
    pub fn assign_worker(&self, booking_id: Uuid, worker_id: Uuid) -> Result<Booking, AppError> {
        let mut bookings = self.bookings.write().expect("booking ledger lock poisoned");
        let booking = bookings
            .get_mut(&booking_id)
            .ok_or_else(|| AppError::not_found("booking not found"))?;

        booking.assigned_worker_id = Some(worker_id);
        if booking.status == BookingStatus::Pending {
            booking.status = BookingStatus::Assigned;
        }
        booking.updated_at = OffsetDateTime::now_utc();
        Ok(booking.clone())
    }

    /// Calendar drag-and-drop: optionally moves the booking in time and then
    /// re-targets the worker. All checks run before any field is touched, so
    /// a Conflict or InvalidSlot leaves the booking exactly as it was and the
    /// caller can revert the calendar UI.
    pub fn reassign(
        &self,
        booking_id: Uuid,
        worker_id: Uuid,
        new_time: Option<(&str, &str)>,
        valid_slots: &[String],
    ) -> Result<Booking, AppError> {
        let mut bookings = self.bookings.write().expect("booking ledger lock poisoned");

        let service_id = bookings
            .get(&booking_id)
            .map(|b| b.service_id)
            .ok_or_else(|| AppError::not_found("booking not found"))?;

        if let Some((new_date, new_slot)) = new_time {
            if !valid_slots.iter().any(|s| s == new_slot) {
                return Err(AppError::invalid_slot(
                    "requested slot is not in the service schedule",
                ));
            }
            if slot_taken(&bookings, service_id, new_date, new_slot, Some(booking_id)) {
                return Err(AppError::conflict("Slot already booked"));
            }
        }

        let booking = bookings
            .get_mut(&booking_id)
            .ok_or_else(|| AppError::not_found("booking not found"))?;

        if let Some((new_date, new_slot)) = new_time {
            if booking.date != new_date {
                booking.reminder_sent = false;
                booking.service_otp = None;
            }
            booking.date = new_date.to_string();
            booking.slot = new_slot.to_string();
        }
        booking.assigned_worker_id = Some(worker_id);
        if booking.status == BookingStatus::Pending {
            booking.status = BookingStatus::Assigned;
        }
        booking.updated_at = OffsetDateTime::now_utc();
        Ok(booking.clone())
    }

    /// Admin/reporting listing, newest first.
    pub fn list(&self, filter: &BookingQueryParams) -> Vec<Booking> {
        let bookings = self.bookings.read().expect("booking ledger lock poisoned");
        let mut rows: Vec<Booking> = bookings
            .values()
            .filter(|b| filter.from.as_deref().is_none_or(|from| b.date.as_str() >= from))
            .filter(|b| filter.to.as_deref().is_none_or(|to| b.date.as_str() <= to))
            .filter(|b| filter.service_id.is_none_or(|id| b.service_id == id))
            .filter(|b| filter.status.is_none_or(|s| b.status == s))
            .filter(|b| {
                filter
                    .worker_id
                    .is_none_or(|id| b.assigned_worker_id == Some(id))
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    /// Committed-state projection for one worker's calendar.
    pub fn calendar_for(&self, worker_id: Uuid) -> Vec<CalendarEvent> {
        let bookings = self.bookings.read().expect("booking ledger lock poisoned");
        let mut events: Vec<CalendarEvent> = bookings
            .values()
            .filter(|b| {
                b.status != BookingStatus::Cancelled && b.assigned_worker_id == Some(worker_id)
            })
            .map(|b| CalendarEvent {
                booking_id: b.booking_id,
                title: b.service_title.clone(),
                start: format!("{}T{}", b.date, b.slot),
                service_id: b.service_id,
            })
            .collect();
        events.sort_by(|a, b| a.start.cmp(&b.start));
        events
    }

    /// Bookings the reminder cycle still owes a reminder for the given date.
    pub fn due_for_reminder(&self, date: &str) -> Vec<Booking> {
        self.bookings
            .read()
            .expect("booking ledger lock poisoned")
            .values()
            .filter(|b| {
                b.status != BookingStatus::Cancelled && b.date == date && !b.reminder_sent
            })
            .cloned()
            .collect()
    }

    /// Persists the OTP hash after a successful dispatch. Skips silently if
    /// the booking was cancelled, moved to another date, or already carries a
    /// verified OTP in the window between scan and commit.
    pub fn commit_reminder(
        &self,
        booking_id: Uuid,
        expected_date: &str,
        code_hash: String,
        expires_at: OffsetDateTime,
    ) -> Result<(), AppError> {
        let mut bookings = self.bookings.write().expect("booking ledger lock poisoned");
        let booking = bookings
            .get_mut(&booking_id)
            .ok_or_else(|| AppError::not_found("booking not found"))?;

        if booking.status == BookingStatus::Cancelled
            || booking.date != expected_date
            || booking.service_otp.as_ref().is_some_and(|otp| otp.verified)
        {
            return Ok(());
        }

        booking.service_otp = Some(ServiceOtp {
            code_hash,
            expires_at,
            verified: false,
        });
        booking.reminder_sent = true;
        booking.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    /// Compares the hash of the supplied code against the stored one.
    /// Expiry is checked before the code itself; a wrong code leaves the
    /// stored OTP untouched and usable. Success is terminal and idempotent
    /// for the same code.
    pub fn verify_otp(
        &self,
        booking_id: Uuid,
        supplied_hash: &str,
        now: OffsetDateTime,
    ) -> Result<Booking, AppError> {
        let mut bookings = self.bookings.write().expect("booking ledger lock poisoned");
        let booking = bookings
            .get_mut(&booking_id)
            .ok_or_else(|| AppError::not_found("booking not found"))?;

        let otp = booking.service_otp.as_mut().ok_or(AppError::OtpInvalid)?;

        if otp.verified && otp.code_hash == supplied_hash {
            return Ok(booking.clone());
        }
        if now > otp.expires_at {
            return Err(AppError::OtpExpired);
        }
        if otp.code_hash != supplied_hash {
            return Err(AppError::OtpInvalid);
        }

        otp.verified = true;
        booking.updated_at = now;
        Ok(booking.clone())
    }
}

impl Default for BookingStore {
    fn default() -> Self {
        Self::new()
    }
}
