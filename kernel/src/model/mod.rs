pub mod attendance;
pub mod id;
pub mod instructor;
pub mod member;
pub mod report;
pub mod reservation;
pub mod room;
pub mod session;
pub mod waitlist;
