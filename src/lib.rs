pub mod external;
pub mod models;
pub mod reminder;
pub mod route;
pub mod routemount;
pub mod state;
pub mod store;
pub mod utils;
