pub mod auth;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod db;
pub mod middleware;
pub mod migrate;
pub mod navigation;
pub mod observability;
pub mod routes;
pub mod template;

pub use routes::{AppState, router};
