pub mod api;
pub mod client;
pub mod config;
pub mod debounce;
pub mod error;
pub mod filters;
pub mod format;
pub mod models;
pub mod scatter;
pub mod state;
pub mod table;
pub mod votes;
