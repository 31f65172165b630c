pub mod completions;
pub mod config;
pub mod energy;
pub mod health;
pub mod session;
