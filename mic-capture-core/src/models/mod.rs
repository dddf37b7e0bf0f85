pub mod artifact;
pub mod config;
pub mod error;
pub mod events;
pub mod state;
