//! ecscache library: the entity-component cache facade and the stress harness
//! built on top of it.

pub mod app;
pub mod config;
pub mod entity;
pub mod errors;
pub mod version;

pub use entity::EntityCache;
