//! Row models mapped with `sqlx::FromRow`.

pub mod dashboard;
pub mod widget;
