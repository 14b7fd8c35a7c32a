// aula-api: Async Rust client for the Aula facility backend REST API

pub mod admin;
pub mod auth;
pub mod client;
pub mod error;
pub mod staff;
pub mod transport;
pub mod types;

pub use client::GatewayClient;
pub use error::Error;
pub use transport::TransportConfig;
