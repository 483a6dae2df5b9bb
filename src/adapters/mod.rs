pub mod events;
pub mod http;
pub mod notices;
pub mod persistence;
