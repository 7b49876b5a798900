use std::sync::Arc;

use crate::external::{ReminderNotifier, ServiceCatalog, WorkerDirectory};
use crate::store::BookingStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<BookingStore>,
    pub catalog: Arc<dyn ServiceCatalog>,
    pub workers: Arc<dyn WorkerDirectory>,
    pub notifier: Arc<dyn ReminderNotifier>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn ServiceCatalog>,
        workers: Arc<dyn WorkerDirectory>,
        notifier: Arc<dyn ReminderNotifier>,
    ) -> Self {
        AppState {
            store: Arc::new(BookingStore::new()),
            catalog,
            workers,
            notifier,
        }
    }
}
