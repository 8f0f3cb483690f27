pub mod app;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod layout;
pub mod output;
pub mod resolver;
pub mod sanitize;
pub mod scryfall;
