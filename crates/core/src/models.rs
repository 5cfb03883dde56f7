pub mod availability;
pub mod chat;
pub mod session;
