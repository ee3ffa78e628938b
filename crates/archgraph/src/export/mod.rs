//! Export for visualization clients.
//!
//! - **JSON**: D3.js-style `{nodes, links}` document with layer assignments and the
//!   layout hint

pub mod json;

pub use json::{export_json, export_json_value};
