use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Worker identity, owned by worker-management. Read-only here.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub worker_id: Uuid,
    pub name: String,
    pub phone: String,
    pub verified: bool,
}
