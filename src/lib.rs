//! Foglio: a small self-hosted blog with markdown posts and a form-driven
//! admin surface.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
