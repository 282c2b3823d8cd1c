pub mod dashboard;
pub mod widget;
