pub mod config;
pub mod http_api;
pub mod search;
