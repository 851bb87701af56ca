pub mod account;
pub mod clock;
pub mod error;
pub mod session;
pub mod types;
