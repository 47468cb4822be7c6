//! The JSON test-fixture format:
//!
//! ```json
//! {
//!   "table": {
//!     "name": "people",
//!     "columns": [{"name": "id", "type": "INT"}, ...],
//!     "rows": [{"id": 1, ...}, ...]
//!   },
//!   "queries": [{"sql": "...", "expected": [1, 3]}]
//! }
//! ```

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub table: Table,
    #[serde(default)]
    pub queries: Vec<Query>,
}

#[derive(Debug, Deserialize)]
pub struct Table {
    #[serde(default = "default_table_name")]
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
    #[serde(default)]
    pub rows: Vec<serde_json::Value>,
}

fn default_table_name() -> String {
    "my_table".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type", default)]
    pub data_type: String,
}

#[derive(Debug, Deserialize)]
pub struct Query {
    pub sql: String,
    /// Expected values of the `id` column for matching rows, in row order.
    #[serde(default)]
    pub expected: Vec<serde_json::Value>,
}

impl Fixture {
    pub fn from_json(text: &str) -> Result<Fixture, serde_json::Error> {
        serde_json::from_str(text)
    }
}
