//! Collaborating subsystems this core consumes: the service catalog,
//! worker management and the notification channel. Only the data contracts
//! live here; the in-memory implementations back the server and the tests.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;
use uuid::Uuid;

use crate::models::service::Service;
use crate::models::worker::Worker;

pub trait ServiceCatalog: Send + Sync {
    fn get_service(&self, service_id: Uuid) -> Option<Service>;
}

pub trait WorkerDirectory: Send + Sync {
    fn get_worker(&self, worker_id: Uuid) -> Option<Worker>;
}

/// What gets handed to the notification subsystem. The code is plaintext
/// here and nowhere else; it is never written to the ledger or the logs.
#[derive(Debug, Clone)]
pub struct ReminderNote {
    pub booking_id: Uuid,
    pub recipient: String,
    pub summary: String,
    pub otp_code: String,
}

#[derive(Debug, Error)]
#[error("reminder dispatch failed: {0}")]
pub struct DispatchError(pub String);

pub trait ReminderNotifier: Send + Sync {
    fn send_reminder(&self, note: &ReminderNote) -> Result<(), DispatchError>;
}

#[derive(Default)]
pub struct InMemoryCatalog {
    services: RwLock<HashMap<Uuid, Service>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, service: Service) {
        self.services
            .write()
            .expect("catalog lock poisoned")
            .insert(service.service_id, service);
    }
}

impl ServiceCatalog for InMemoryCatalog {
    fn get_service(&self, service_id: Uuid) -> Option<Service> {
        self.services
            .read()
            .expect("catalog lock poisoned")
            .get(&service_id)
            .cloned()
    }
}

#[derive(Default)]
pub struct InMemoryWorkers {
    workers: RwLock<HashMap<Uuid, Worker>>,
}

impl InMemoryWorkers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, worker: Worker) {
        self.workers
            .write()
            .expect("worker lock poisoned")
            .insert(worker.worker_id, worker);
    }
}

impl WorkerDirectory for InMemoryWorkers {
    fn get_worker(&self, worker_id: Uuid) -> Option<Worker> {
        self.workers
            .read()
            .expect("worker lock poisoned")
            .get(&worker_id)
            .cloned()
    }
}

/// Default notifier: records the dispatch in the log and leaves actual
/// delivery (sms/email transport) to the deployment. Logs never include
/// the code itself.
pub struct LogNotifier;

impl ReminderNotifier for LogNotifier {
    fn send_reminder(&self, note: &ReminderNote) -> Result<(), DispatchError> {
        log::info!(
            "reminder for booking {} dispatched to {}: {}",
            note.booking_id,
            note.recipient,
            note.summary
        );
        Ok(())
    }
}

/// Test double that keeps every note it was asked to deliver.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: std::sync::Mutex<Vec<ReminderNote>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> Vec<ReminderNote> {
        self.sent.lock().expect("notifier lock poisoned").clone()
    }
}

impl ReminderNotifier for RecordingNotifier {
    fn send_reminder(&self, note: &ReminderNote) -> Result<(), DispatchError> {
        self.sent
            .lock()
            .expect("notifier lock poisoned")
            .push(note.clone());
        Ok(())
    }
}

/// Test double that refuses every dispatch.
pub struct FailingNotifier;

impl ReminderNotifier for FailingNotifier {
    fn send_reminder(&self, _note: &ReminderNote) -> Result<(), DispatchError> {
        Err(DispatchError("transport unavailable".to_string()))
    }
}
