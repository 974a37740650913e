use serde::Deserialize;
use serde_json::{Map, Value};

/// A raw row from the hosted store: an opaque identifier plus an untyped
/// field bag. Typed entities are mapped from this at the data-access
/// boundary, defaulting any field the server omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// String view of a field. Numbers are rendered, everything else
    /// (missing, null, objects) becomes the empty string.
    pub fn text(&self, field: &str) -> String {
        match self.fields.get(field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    pub fn opt_text(&self, field: &str) -> Option<String> {
        match self.fields.get(field) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    /// Integer view of a field, accepting both numbers and numeric strings.
    pub fn number(&self, field: &str) -> i64 {
        match self.fields.get(field) {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    /// Boolean view, accepting checkbox booleans and legacy "true" strings.
    pub fn flag(&self, field: &str) -> bool {
        match self.fields.get(field) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s == "true",
            _ => false,
        }
    }

    /// Linked-record view: an array of record ids. A bare string is treated
    /// as a single-element list.
    pub fn id_list(&self, field: &str) -> Vec<String> {
        match self.fields.get(field) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(s)) => vec![s.clone()],
            _ => Vec::new(),
        }
    }
}

/// Wire shape of a list response.
#[derive(Debug, Deserialize)]
pub struct RecordPage {
    #[serde(default)]
    pub records: Vec<Record>,
}

/// Query parameters for a `select` against one table.
#[derive(Debug, Clone, Default)]
pub struct SelectOptions {
    pub filter_by_formula: Option<String>,
    pub sort_field: Option<&'static str>,
    pub sort_desc: bool,
    pub max_records: Option<usize>,
    pub offset: Option<usize>,
}

impl SelectOptions {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(formula) = &self.filter_by_formula {
            query.push(("filterByFormula".to_string(), formula.clone()));
        }
        if let Some(field) = self.sort_field {
            query.push(("sort[0][field]".to_string(), field.to_string()));
            let direction = if self.sort_desc { "desc" } else { "asc" };
            query.push(("sort[0][direction]".to_string(), direction.to_string()));
        }
        if let Some(max) = self.max_records {
            query.push(("maxRecords".to_string(), max.to_string()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset".to_string(), offset.to_string()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_accessors_default_instead_of_failing() {
        let record: Record = serde_json::from_value(json!({
            "id": "rec1",
            "createdTime": "2025-11-02T10:00:00.000Z",
            "fields": {
                "name": "pricing pain",
                "count": 7,
                "score": "85",
                "owner": ["recA", "recB"],
                "nothing": null
            }
        }))
        .unwrap();

        assert_eq!(record.text("name"), "pricing pain");
        assert_eq!(record.text("count"), "7");
        assert_eq!(record.text("missing"), "");
        assert_eq!(record.text("nothing"), "");
        assert_eq!(record.number("count"), 7);
        assert_eq!(record.number("score"), 85);
        assert_eq!(record.number("missing"), 0);
        assert_eq!(record.id_list("owner"), vec!["recA", "recB"]);
        assert!(record.id_list("missing").is_empty());
        assert_eq!(record.opt_text("missing"), None);
    }

    #[test]
    fn select_options_render_expected_query_pairs() {
        let options = SelectOptions {
            filter_by_formula: Some("SEARCH(\"recU\", {user_id})".to_string()),
            sort_field: Some("created_at"),
            sort_desc: true,
            max_records: Some(5),
            offset: Some(10),
        };
        let query = options.to_query();
        assert!(query.contains(&("sort[0][direction]".to_string(), "desc".to_string())));
        assert!(query.contains(&("maxRecords".to_string(), "5".to_string())));
        assert!(query.contains(&("offset".to_string(), "10".to_string())));
    }

    #[test]
    fn record_page_tolerates_missing_records_key() {
        let page: RecordPage = serde_json::from_value(json!({})).unwrap();
        assert!(page.records.is_empty());
    }
}
