//! Display view over the knowledge-graph schema pre-fill.
//!
//! The backend sends the schema as `{ category: { field: value } }`. Values are
//! free-form; research gaps are written as strings like "TBD - to verify in
//! interview", which the dashboard highlights.

use serde_json::Value;

const VERIFY_MARKER: &str = "to verify";

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaSection {
    pub category: String,
    pub fields: Vec<SchemaField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub name: String,
    pub value: String,
    pub needs_verification: bool,
}

/// Derive the per-category field lists, skipping empty fields and sections.
pub fn sections(schema: &Value) -> Vec<SchemaSection> {
    let Some(categories) = schema.as_object() else {
        return Vec::new();
    };

    categories
        .iter()
        .filter_map(|(category, fields)| {
            let mut out = Vec::new();
            match fields {
                Value::Object(map) => {
                    for (name, value) in map {
                        collect_field(name, value, &mut out);
                    }
                }
                // A category holding a scalar renders as a single field
                other => collect_field(category, other, &mut out),
            }
            if out.is_empty() {
                None
            } else {
                Some(SchemaSection {
                    category: category.clone(),
                    fields: out,
                })
            }
        })
        .collect()
}

fn collect_field(name: &str, value: &Value, out: &mut Vec<SchemaField>) {
    if let Value::Object(nested) = value {
        for (key, inner) in nested {
            collect_field(&format!("{}.{}", name, key), inner, out);
        }
        return;
    }

    if let Some(rendered) = render(value) {
        let needs_verification = rendered.to_lowercase().contains(VERIFY_MARKER);
        out.push(SchemaField {
            name: name.to_string(),
            value: rendered,
            needs_verification,
        });
    }
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(render).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_fields_are_skipped() {
        let schema = json!({
            "company_profile": {
                "founded": 1998,
                "headquarters": "",
                "employees": null,
                "products": []
            },
            "workforce": { "open_roles": "" }
        });
        let view = sections(&schema);
        assert_eq!(view.len(), 1, "workforce has no renderable fields");
        assert_eq!(view[0].category, "company_profile");
        assert_eq!(view[0].fields.len(), 1);
        assert_eq!(view[0].fields[0].name, "founded");
        assert_eq!(view[0].fields[0].value, "1998");
    }

    #[test]
    fn test_to_verify_flag_is_case_insensitive() {
        let schema = json!({
            "workforce": {
                "headcount": "About 200 (TO VERIFY)",
                "hiring_plan": "Expanding in Austin",
                "unions": "Unknown - To Verify in interview"
            }
        });
        let fields = &sections(&schema)[0].fields;
        let flagged: Vec<&str> = fields
            .iter()
            .filter(|f| f.needs_verification)
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(flagged, vec!["headcount", "unions"]);
    }

    #[test]
    fn test_arrays_and_nested_objects_render() {
        let schema = json!({
            "operations": {
                "sites": ["Houston", "", "Dallas"],
                "supply_chain": { "primary_vendor": "Acme Steel" }
            }
        });
        let fields = &sections(&schema)[0].fields;
        assert_eq!(fields.len(), 2);
        let sites = fields.iter().find(|f| f.name == "sites").unwrap();
        assert_eq!(sites.value, "Houston, Dallas");
        assert!(fields
            .iter()
            .any(|f| f.name == "supply_chain.primary_vendor" && f.value == "Acme Steel"));
    }

    #[test]
    fn test_non_object_schema_yields_nothing() {
        assert!(sections(&Value::Null).is_empty());
        assert!(sections(&json!("pending")).is_empty());
    }
}
