//! Authentication and authorization primitives.
//!
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`permissions`] -- Role to permission mapping.

pub mod jwt;
pub mod permissions;
