pub mod cache;
pub mod columns;
pub mod config;
pub mod dataset;
pub mod error;
pub mod http;
pub mod loader;
pub mod lookup;
pub mod page;
pub mod params;
pub mod record;
pub mod render;
pub mod samples;
pub mod server;
