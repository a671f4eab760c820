pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod grading;
pub mod model;
pub mod offline;
pub mod persistence;
pub mod state;
pub mod ui;
pub mod view_models;

pub use app::ChronicleApp;
