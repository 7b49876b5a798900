pub mod booking;
pub mod calendar;
pub mod reminder;
pub mod slots;
