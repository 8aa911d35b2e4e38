pub mod api;
pub mod app;
pub mod config;
pub mod controller;
pub mod logging;
pub mod models;
pub mod router;
pub mod ui;
