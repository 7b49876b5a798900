use std::sync::Arc;
use std::time::Duration;

use home_services_booking_api::external::{InMemoryCatalog, InMemoryWorkers, LogNotifier};
use home_services_booking_api::models::service::Service;
use home_services_booking_api::models::worker::Worker;
use home_services_booking_api::reminder::spawn_reminder_loop;
use home_services_booking_api::routemount::route::create_router;
use home_services_booking_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let server_address = std::env::var("SERVER_ADDRESS").unwrap_or("127.0.0.1:7870".to_string());

    //seed the external collaborators from json files if configured
    let catalog = InMemoryCatalog::new();
    if let Ok(path) = std::env::var("CATALOG_FILE") {
        let raw = std::fs::read_to_string(&path).expect("catalog file not readable");
        let services: Vec<Service> =
            serde_json::from_str(&raw).expect("catalog file is not valid json");
        log::info!("loaded {} services from {}", services.len(), path);
        for service in services {
            catalog.insert(service);
        }
    } else {
        log::warn!("CATALOG_FILE not set, starting with an empty catalog");
    }

    let workers = InMemoryWorkers::new();
    if let Ok(path) = std::env::var("WORKERS_FILE") {
        let raw = std::fs::read_to_string(&path).expect("workers file not readable");
        let list: Vec<Worker> = serde_json::from_str(&raw).expect("workers file is not valid json");
        log::info!("loaded {} workers from {}", list.len(), path);
        for worker in list {
            workers.insert(worker);
        }
    }

    let state = AppState::new(Arc::new(catalog), Arc::new(workers), Arc::new(LogNotifier));

    //daily by default; tests and dev setups shrink it via env
    let every = std::env::var("REMINDER_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(86_400);
    spawn_reminder_loop(state.clone(), Duration::from_secs(every));

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&server_address).await.unwrap();
    log::info!("server running on {}", server_address);
    axum::serve(listener, app).await.unwrap();
}
