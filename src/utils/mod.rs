pub mod errorhandler;
pub mod slots;
