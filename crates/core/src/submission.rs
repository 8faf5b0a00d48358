use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One web contact-form submission. Lives for the duration of a single
/// request; nothing here is cached or reused across requests.
///
/// The wire format is lenient: any field may be absent and deserializes
/// to an empty string. `validate` decides what is actually acceptable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub organization_name: String,
    pub title: String,
    pub budget: String,
    pub contact_body: String,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("required field `{0}` is missing or blank")]
    MissingField(&'static str),
}

impl ContactSubmission {
    /// A person record cannot be created without a name and an email, so
    /// those two are required. Everything else passes through as-is and
    /// is rendered verbatim by the notification composer.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "Taro".to_string(),
            email: "taro@example.com".to_string(),
            phone: "0312345678".to_string(),
            organization_name: "Acme".to_string(),
            title: "Website".to_string(),
            budget: "500000".to_string(),
            contact_body: "Please call me".to_string(),
        }
    }

    #[test]
    fn complete_submission_validates() {
        assert_eq!(submission().validate(), Ok(()));
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut invalid = submission();
        invalid.name = "  ".to_string();
        assert_eq!(invalid.validate(), Err(ValidationError::MissingField("name")));
    }

    #[test]
    fn blank_email_is_rejected() {
        let mut invalid = submission();
        invalid.email = String::new();
        assert_eq!(invalid.validate(), Err(ValidationError::MissingField("email")));
    }

    #[test]
    fn optional_fields_may_be_blank() {
        let mut sparse = submission();
        sparse.phone = String::new();
        sparse.organization_name = String::new();
        sparse.budget = String::new();
        assert_eq!(sparse.validate(), Ok(()));
    }

    #[test]
    fn absent_json_fields_deserialize_to_empty_strings() {
        let parsed: ContactSubmission =
            serde_json::from_str(r#"{"name": "Taro", "email": "taro@example.com"}"#)
                .expect("deserialize");

        assert_eq!(parsed.name, "Taro");
        assert_eq!(parsed.phone, "");
        assert_eq!(parsed.contact_body, "");
    }
}
