use serde::Serialize;

use crate::store::Record;

/// A saved set of search criteria. Created once per search submission and
/// immutable afterwards except for `nb_leads`, which the external automation
/// keeps up to date.
#[derive(Debug, Clone)]
pub struct SearchTemplate {
    pub id: String,
    pub user_id: Vec<String>,
    pub keywords: String,
    pub subreddit: String,
    pub biz_description: String,
    pub nb_leads: u32,
}

impl SearchTemplate {
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            user_id: record.id_list("user_id"),
            keywords: record.text("keywords"),
            subreddit: record.text("subreddit"),
            biz_description: record.text("biz_description"),
            nb_leads: record.number("nb_leads").max(0) as u32,
        }
    }

    /// Splits the stored keyword string back into the tags it was built
    /// from. A template created from tags "a", "b", "c" reconstructs exactly
    /// those three.
    pub fn keyword_tags(&self) -> Vec<String> {
        self.keywords
            .split(", ")
            .map(|keyword| keyword.trim().to_string())
            .filter(|keyword| !keyword.is_empty())
            .collect()
    }
}

/// The payload shared by template creation and the automation webhook.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub keywords: String,
    pub subreddit: String,
    pub business_description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template_with_keywords(keywords: &str) -> SearchTemplate {
        let record: Record = serde_json::from_value(json!({
            "id": "recTpl1",
            "fields": { "keywords": keywords }
        }))
        .unwrap();
        SearchTemplate::from_record(&record)
    }

    #[test]
    fn keywords_round_trip_to_tags() {
        let template = template_with_keywords("a, b, c");
        assert_eq!(template.keyword_tags(), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_keywords_produce_no_tags() {
        let template = template_with_keywords("");
        assert!(template.keyword_tags().is_empty());
    }

    #[test]
    fn webhook_payload_uses_camel_case() {
        let criteria = SearchCriteria {
            keywords: "pricing".into(),
            subreddit: "startups".into(),
            business_description: "B2B billing".into(),
        };
        let payload = serde_json::to_value(&criteria).unwrap();
        assert_eq!(payload["businessDescription"], "B2B billing");
        assert_eq!(payload["subreddit"], "startups");
    }
}
