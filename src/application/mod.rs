//! Application services layer.

pub mod error;
pub mod posts;
pub mod render;
pub mod repos;
