pub mod config;
pub mod notify;
pub mod profile;
pub mod store;
pub mod tracker;
