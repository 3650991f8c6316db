//! Configuration schema, loading and persistence.
//!
//! Settings are an explicit value passed into the engine at construction;
//! the caller decides when to load and save them.

mod load;
mod schema;

pub use load::{SettingsSaveError, default_config_path, resolve_config_path};
pub use schema::*;

#[cfg(test)]
mod tests;
