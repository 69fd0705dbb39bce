//! Index template and retention policy for the daily audit-log indices.

use serde_json::{json, Value};

/// Name under which the index template is installed.
pub const TEMPLATE_NAME: &str = "auditlogs_template";

/// Build the ISM retention policy: delete indices matching `index_pattern`
/// once they are `retention_days` old.
pub fn retention_policy(index_pattern: &str, retention_days: u32) -> Value {
    json!({
        "policy": {
            "description": format!("Delete audit-log indices after {retention_days} days"),
            "default_state": "hot",
            "states": [
                {
                    "name": "hot",
                    "actions": [],
                    "transitions": [
                        {
                            "state_name": "delete",
                            "conditions": {
                                "min_index_age": format!("{retention_days}d")
                            }
                        }
                    ]
                },
                {
                    "name": "delete",
                    "actions": [ { "delete": {} } ],
                    "transitions": []
                }
            ],
            "ism_template": [
                { "index_patterns": [index_pattern] }
            ]
        }
    })
}

/// Build the index template applied to every daily index.
///
/// `time` is mapped as a `date` so range queries and sorting behave; all
/// other fields rely on dynamic mapping (strings get a `.keyword` subfield,
/// which the term filter in the query builder depends on).
pub fn index_template(index_pattern: &str) -> Value {
    json!({
        "index_patterns": [index_pattern],
        "template": {
            "mappings": {
                "properties": {
                    "time": { "type": "date" }
                }
            }
        }
    })
}
