pub mod attendance;
pub mod availability;
pub mod booking;
pub mod catalog;
pub mod validation;
pub mod waitlist;
