pub mod api;
pub mod auth;
pub mod config;
pub mod dashboards;
pub mod errors;
pub mod notify;
pub mod polling;
pub mod portal;
pub mod render;
pub mod stats;

pub use errors::{ClientError, Result};
pub use portal::Portal;
