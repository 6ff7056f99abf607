// Library surface shared by the binary and integration tests.
pub mod aggregate;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod event;
pub mod pipeline;
pub mod render;
pub mod time_series;
pub mod util;

pub use error::TrendError;
