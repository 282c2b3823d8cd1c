//! Widgetboard domain logic.
//!
//! Pure, I/O-free building blocks for dashboard widgets: the declarative
//! widget configuration, access filtering, option conversion and resolution,
//! and the dashboard aggregate. Persistence and HTTP live in the db and api
//! crates.

pub mod access_filter;
pub mod dashboard;
pub mod error;
pub mod expression;
pub mod filter_form;
pub mod naming;
pub mod option_bag;
pub mod option_value;
pub mod permissions;
pub mod security;
pub mod store;
pub mod translation;
pub mod types;
pub mod widget_config;
pub mod widget_configs;
pub mod widget_model;
