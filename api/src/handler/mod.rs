pub mod health;
pub mod report;
pub mod reservation;
pub mod session;
pub mod waitlist;
