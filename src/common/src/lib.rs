pub mod constants;
pub mod event;
pub mod http_client;
