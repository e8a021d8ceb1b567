pub mod commands;
pub mod config;
pub mod provider;
pub mod theme;

pub use provider::AppContext;
