//! User domain models
//!
//! `User` mirrors what the backend returns. Fields this client does not know
//! about are kept in `extra` so list responses pass through untouched.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::phone::Phone;
use super::result::Result;

/// A user record as served by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub nic: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub birthday: Option<DateTime<Utc>>,
    #[serde(default)]
    pub gender: String,
    /// Server-relative photo path, e.g. `/uploads/abc.png`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub phones: Vec<Phone>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl User {
    /// Photo path, treating the backend's empty string as no photo
    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref().filter(|p| !p.is_empty())
    }
}

/// Empty list for a JSON `null`, which the backend sends for nil slices
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Profile of the signed-in user, as returned by the login endpoint
/// and kept in storage under the `user` key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl UserProfile {
    /// Minimal profile holding only an email
    pub fn from_email(email: impl Into<String>) -> Self {
        Self {
            id: None,
            email: email.into(),
            name: None,
            extra: Map::new(),
        }
    }
}

/// Body for creating a user (also used for public registration)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub nic: String,
    pub address: String,
    pub birthday: NaiveDate,
    pub gender: String,
    pub password: String,
    pub confirm_password: String,
}

impl NewUser {
    /// Text parts for a multipart submission
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("nic", self.nic.clone()),
            ("address", self.address.clone()),
            ("birthday", self.birthday.format("%Y-%m-%d").to_string()),
            ("gender", self.gender.clone()),
            ("password", self.password.clone()),
            ("confirmPassword", self.confirm_password.clone()),
        ]
    }
}

/// Partial update of a user; unset fields are left alone by the server
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.form_fields().is_empty()
    }

    /// Text parts for a multipart submission, only for fields that are set
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(v) = &self.name {
            fields.push(("name", v.clone()));
        }
        if let Some(v) = &self.email {
            fields.push(("email", v.clone()));
        }
        if let Some(v) = &self.nic {
            fields.push(("nic", v.clone()));
        }
        if let Some(v) = &self.address {
            fields.push(("address", v.clone()));
        }
        if let Some(v) = &self.birthday {
            fields.push(("birthday", v.format("%Y-%m-%d").to_string()));
        }
        if let Some(v) = &self.gender {
            fields.push(("gender", v.clone()));
        }
        fields
    }
}

/// Body for changing a user's password
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Image file sent as the `photo` part of a multipart request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read an image from disk, deriving the content type from its extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Ok(Self::new(file_name, content_type_for(&extension), bytes))
    }
}

fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
