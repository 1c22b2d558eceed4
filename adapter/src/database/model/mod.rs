pub mod attendance;
pub mod instructor;
pub mod member;
pub mod reservation;
pub mod room;
pub mod session;
pub mod waitlist;
