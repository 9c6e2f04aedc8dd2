pub mod audit;
pub mod config;
pub mod format;
pub mod loader;
pub mod logging;
pub mod metric;
pub mod palette;
pub mod queries;
pub mod schema;
pub mod state;
