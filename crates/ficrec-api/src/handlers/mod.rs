//! HTTP handlers

pub mod auth;
pub mod comments;
pub mod reactions;
pub mod recommendations;
