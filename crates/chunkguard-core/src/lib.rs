pub mod config;
pub mod logging;

pub mod chunk;
pub mod env;
pub mod error;
pub mod fallback;
pub mod host;
pub mod loader;
pub mod page;
pub mod storage;
