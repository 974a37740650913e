mod error;
mod record;

pub use error::{StoreError, StoreResult};
pub use record::{Record, RecordPage, SelectOptions};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde_json::{json, Value};

use crate::config::Config;
use crate::models::{
    CompanyProfile, Lead, LeadStatus, NewUser, SearchCriteria, SearchTemplate, User,
};

const USERS_TABLE: &str = "Users";
const TEMPLATES_TABLE: &str = "SearchTemplate";
const LEADS_TABLE: &str = "Leads";

/// Field every table carries; list queries sort on it, newest first.
const CREATED_FIELD: &str = "created_at";

/// Server-side page caps observed by the product: three recent templates,
/// five leads per page.
const TEMPLATE_PAGE: usize = 3;
pub const LEAD_PAGE: usize = 5;

/// Client for the hosted record store. Thin by design: it builds filtered,
/// sorted, capped queries, maps field bags to typed entities, and reports
/// failures through `StoreError` without any navigation side effects.
pub struct Store {
    http: reqwest::Client,
    base_url: String,
    workspace: String,
    api_key: String,
}

impl Store {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.store_url.trim_end_matches('/').to_string(),
            workspace: config.store_workspace.clone(),
            api_key: config.store_api_key.clone(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url, self.workspace)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.workspace, table)
    }

    async fn select(&self, table: &str, options: &SelectOptions) -> StoreResult<Vec<Record>> {
        let response = self
            .http
            .get(self.table_url(table))
            .bearer_auth(&self.api_key)
            .query(&options.to_query())
            .send()
            .await?;
        let page: RecordPage = check(response).await?.json().await?;
        Ok(page.records)
    }

    async fn create(&self, table: &str, fields: Value) -> StoreResult<Record> {
        let response = self
            .http
            .post(self.table_url(table))
            .bearer_auth(&self.api_key)
            .json(&json!({ "records": [{ "fields": fields }] }))
            .send()
            .await?;
        let page: RecordPage = check(response).await?.json().await?;
        first_record(page, table)
    }

    async fn update(&self, table: &str, id: &str, fields: Value) -> StoreResult<Record> {
        let response = self
            .http
            .patch(self.table_url(table))
            .bearer_auth(&self.api_key)
            .json(&json!({ "records": [{ "id": id, "fields": fields }] }))
            .send()
            .await?;
        let page: RecordPage = check(response).await?.json().await?;
        first_record(page, table)
    }

    // Users

    /// Looks up the account for `email` and verifies the password against
    /// the stored salted hash. Any mismatch, including an unknown email or a
    /// malformed stored hash, is `None`; only transport and store failures
    /// are errors.
    pub async fn login_user(&self, email: &str, password: &str) -> StoreResult<Option<User>> {
        let options = SelectOptions {
            filter_by_formula: Some(format!("{{email}} = '{}'", escape_single(email))),
            max_records: Some(1),
            ..SelectOptions::default()
        };
        let records = self.select(USERS_TABLE, &options).await?;
        let Some(record) = records.first() else {
            return Ok(None);
        };

        let Some(stored_hash) = record.opt_text("password_hash") else {
            return Ok(None);
        };
        let Ok(parsed) = PasswordHash::new(&stored_hash) else {
            log::warn!("stored password hash for {email} is not a valid PHC string");
            return Ok(None);
        };
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_err()
        {
            return Ok(None);
        }

        Ok(Some(User::from_record(record)))
    }

    /// Creates an account, hashing the password before it leaves the
    /// process. New accounts start on the free plan, active.
    pub async fn register_user(&self, new_user: &NewUser) -> StoreResult<User> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(new_user.password.as_bytes(), &salt)
            .map_err(|err| StoreError::PasswordHash(err.to_string()))?
            .to_string();

        let record = self
            .create(
                USERS_TABLE,
                json!({
                    "username": new_user.username,
                    "email": new_user.email,
                    "password_hash": password_hash,
                    "subscription_plan": "free",
                    "is_active": true,
                    "company_name": "",
                    "activity": "",
                    "description": "",
                    "b2b2c": "",
                }),
            )
            .await?;
        Ok(User::from_record(&record))
    }

    pub async fn update_user(&self, id: &str, profile: &CompanyProfile) -> StoreResult<User> {
        let record = self
            .update(
                USERS_TABLE,
                id,
                json!({
                    "company_name": profile.company_name,
                    "activity": profile.activity,
                    "description": profile.description,
                    "b2b2c": profile.b2b2c,
                }),
            )
            .await?;
        Ok(User::from_record(&record))
    }

    // Search templates

    pub async fn search_templates(&self, owner: &str) -> StoreResult<Vec<SearchTemplate>> {
        let options = SelectOptions {
            filter_by_formula: Some(owner_filter(owner)),
            sort_field: Some(CREATED_FIELD),
            sort_desc: true,
            max_records: Some(TEMPLATE_PAGE),
            ..SelectOptions::default()
        };
        let records = self.select(TEMPLATES_TABLE, &options).await?;
        Ok(records.iter().map(SearchTemplate::from_record).collect())
    }

    pub async fn create_search_template(
        &self,
        owner: &str,
        criteria: &SearchCriteria,
    ) -> StoreResult<SearchTemplate> {
        let record = self
            .create(
                TEMPLATES_TABLE,
                json!({
                    "user_id": [owner],
                    "keywords": criteria.keywords,
                    "subreddit": criteria.subreddit,
                    "biz_description": criteria.business_description,
                    "nb_leads": 0,
                }),
            )
            .await?;
        Ok(SearchTemplate::from_record(&record))
    }

    // Leads

    pub async fn leads(&self, owner: &str) -> StoreResult<Vec<Lead>> {
        self.lead_page(owner, None).await
    }

    /// Offset-based continuation of `leads`, used when the review table's
    /// watermark moves past the rows already fetched.
    pub async fn more_leads(&self, owner: &str, offset: usize) -> StoreResult<Vec<Lead>> {
        self.lead_page(owner, Some(offset)).await
    }

    async fn lead_page(&self, owner: &str, offset: Option<usize>) -> StoreResult<Vec<Lead>> {
        let options = SelectOptions {
            filter_by_formula: Some(owner_filter(owner)),
            sort_field: Some(CREATED_FIELD),
            sort_desc: true,
            max_records: Some(LEAD_PAGE),
            offset,
        };
        let records = self.select(LEADS_TABLE, &options).await?;
        Ok(records.iter().map(Lead::from_record).collect())
    }

    pub async fn update_lead_status(&self, id: &str, status: LeadStatus) -> StoreResult<()> {
        self.update(LEADS_TABLE, id, json!({ "status": status.as_str() }))
            .await?;
        Ok(())
    }
}

/// Ownership predicate evaluated server side: does the owner's id appear in
/// the record's `user_id` field.
fn owner_filter(owner: &str) -> String {
    format!("SEARCH(\"{}\", {{user_id}})", escape_double(owner))
}

fn escape_double(value: &str) -> String {
    value.replace('"', "\\\"")
}

fn escape_single(value: &str) -> String {
    value.replace('\'', "\\'")
}

fn first_record(page: RecordPage, table: &str) -> StoreResult<Record> {
    page.records
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::Api {
            status: 200,
            kind: "EMPTY_RESPONSE".to_string(),
            message: format!("{table} write returned no records"),
        })
}

/// Maps a non-success response to a `StoreError`, singling out the
/// authentication-required case by status or error payload.
async fn check(response: reqwest::Response) -> StoreResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body: Value = response.json().await.unwrap_or(Value::Null);
    let kind = body
        .pointer("/error/type")
        .and_then(Value::as_str)
        .or_else(|| body.get("error").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();
    let message = body
        .pointer("/error/message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    if status == reqwest::StatusCode::UNAUTHORIZED || kind == "AUTHENTICATION_REQUIRED" {
        return Err(StoreError::AuthRequired);
    }
    Err(StoreError::Api {
        status: status.as_u16(),
        kind,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_filter_embeds_the_identifier() {
        assert_eq!(owner_filter("recU1"), "SEARCH(\"recU1\", {user_id})");
    }

    #[test]
    fn formula_values_are_escaped() {
        assert_eq!(escape_double("a\"b"), "a\\\"b");
        assert_eq!(escape_single("o'brien@x.com"), "o\\'brien@x.com");
    }
}
