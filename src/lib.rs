mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod report;
mod store;
mod utils;

pub use api::{Client, HttpTransport, Session};
pub use config::Config;
pub use error::ApiError;
pub use error::Error;
pub use error::Result;
pub use store::{Collection, Store};
