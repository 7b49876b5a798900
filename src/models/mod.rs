pub mod booking;
pub mod calendar;
pub mod service;
pub mod worker;
