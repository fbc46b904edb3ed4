//! Repository layer for database operations

pub mod drafts;
pub mod settings;
