pub mod catalog;
pub mod config;
pub mod metric;
pub mod query;
pub mod sample;
pub mod server;

pub use catalog::Catalog;
pub use config::ServerConfig;
pub use metric::{DataResult, SeriesDescriptor};
