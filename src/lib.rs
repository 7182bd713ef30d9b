pub mod app;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod output;
pub mod record;
pub mod search;
pub mod store;
pub mod validate;
