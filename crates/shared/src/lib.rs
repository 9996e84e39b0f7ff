pub mod config;
pub mod models;
pub mod poll;
pub mod viewer;
