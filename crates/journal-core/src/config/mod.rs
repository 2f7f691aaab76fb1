//! Engine configuration.
//!
//! Limits the rules enforce (date window, expected lesson totals, text length
//! caps) live here rather than in the rules. Configs are YAML or JSON files
//! validated against an embedded JSON Schema.

mod parser;
mod schema;

pub use parser::{ConfigError, DateWindow, EngineConfig};
pub use schema::validate_config_schema;
