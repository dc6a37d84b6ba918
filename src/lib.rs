// Themesmith Server Library
// Theme tokens, palette derivation and streamed AI theme updates

pub mod commands;
pub mod models;
pub mod services;
