//! Phone number domain models

use serde::{Deserialize, Serialize};

/// A phone number owned by exactly one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    #[serde(default)]
    pub id: String,
    pub number: String,
    #[serde(rename = "type", default)]
    pub phone_type: String,
    #[serde(default)]
    pub user_id: String,
}

/// Body for adding a phone; the owner comes from the request path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPhone {
    pub number: String,
    #[serde(rename = "type")]
    pub phone_type: String,
}

impl NewPhone {
    pub fn new(number: impl Into<String>, phone_type: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            phone_type: phone_type.into(),
        }
    }
}

/// Replacement values for an existing phone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhoneUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub phone_type: Option<String>,
}
