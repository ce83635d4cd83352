//! NavFlow command-line presentation layer: renders a navigation session in
//! the terminal and exposes the user controls (environment override, locale,
//! density, theme, favorites).

pub mod cli;
pub mod commands;
pub mod config;
pub mod render;
pub mod site;
