pub mod config_manager;
pub mod destination;
pub mod forwarder;
pub mod outcome;

pub use forwarder::Forwarder;
