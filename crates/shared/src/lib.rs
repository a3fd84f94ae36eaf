pub mod config;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod markers;
pub mod models;
pub mod panel;
pub mod regions;
pub mod session;
pub mod sheet;
pub mod viewport;
pub mod zoom;
