pub mod app;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod effects;
pub mod export;
pub mod timers;
pub mod ui;
