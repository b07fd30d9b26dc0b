pub mod config;
pub mod docs;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use startup::{build_app, App, AppState, Application};
