use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WorkingHours {
    pub start: String,
    pub end: String,
}

/// Catalog entry, owned by the catalog subsystem. This core only reads it.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub service_id: Uuid,
    pub title: String,
    pub category: String,
    pub duration_minutes: i32,
    pub working_hours: WorkingHours,
    pub price: f64,
}
