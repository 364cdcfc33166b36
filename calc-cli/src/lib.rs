pub mod catalogue;
pub mod config;
pub mod export;
pub mod input_loader;
pub mod logging;
