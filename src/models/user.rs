use serde::{Deserialize, Serialize};

use crate::store::Record;

/// An account in the hosted workspace. Serialized as-is into the session
/// file, so it never carries the password or its hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub subscription_plan: String,
    pub is_active: bool,
    pub company_name: String,
    pub activity: String,
    pub description: String,
    pub b2b2c: String,
}

impl User {
    /// Maps a raw store record to a typed user. Missing or null fields
    /// default rather than fail.
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            username: record.text("username"),
            email: record.text("email"),
            subscription_plan: record.text("subscription_plan"),
            is_active: record.flag("is_active"),
            company_name: record.text("company_name"),
            activity: record.text("activity"),
            description: record.text("description"),
            b2b2c: record.text("b2b2c"),
        }
    }

}

/// Registration payload. The plaintext password only lives long enough to be
/// hashed by the record client.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// The editable company fields collected during onboarding and on the
/// profile screen.
#[derive(Debug, Clone, Default)]
pub struct CompanyProfile {
    pub company_name: String,
    pub activity: String,
    pub description: String,
    pub b2b2c: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_missing_fields_to_defaults() {
        let record: Record = serde_json::from_value(json!({
            "id": "recUser1",
            "fields": { "email": "ada@example.com" }
        }))
        .unwrap();

        let user = User::from_record(&record);
        assert_eq!(user.id, "recUser1");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.username, "");
        assert_eq!(user.company_name, "");
        assert!(!user.is_active);
    }

    #[test]
    fn reads_boolean_and_string_flags() {
        let record: Record = serde_json::from_value(json!({
            "id": "recUser2",
            "fields": { "is_active": true }
        }))
        .unwrap();
        assert!(User::from_record(&record).is_active);

        let record: Record = serde_json::from_value(json!({
            "id": "recUser3",
            "fields": { "is_active": "true" }
        }))
        .unwrap();
        assert!(User::from_record(&record).is_active);
    }
}
