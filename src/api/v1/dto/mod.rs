pub mod session;
pub mod uploads;
