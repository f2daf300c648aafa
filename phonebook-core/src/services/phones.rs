//! Phones API client, scoped under a user id

use reqwest::Method;

use crate::adapters::http::{self, ApiClient};
use crate::domain::result::Result;
use crate::domain::{NewPhone, Phone, PhoneUpdate};

use super::session::SessionStore;

#[derive(Debug, Clone)]
pub struct PhonesApi {
    api: ApiClient,
}

impl PhonesApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// GET /users/{user_id}/phones
    pub async fn list(&self, session: &SessionStore, user_id: &str) -> Result<Vec<Phone>> {
        let request = self
            .api
            .authorized(Method::GET, &phones_path(user_id), &session.auth_header());
        http::send_json_list(request).await
    }

    /// POST /users/{user_id}/phones
    pub async fn create(&self, session: &SessionStore, user_id: &str, phone: &NewPhone) -> Result<Phone> {
        let request = self
            .api
            .authorized(Method::POST, &phones_path(user_id), &session.auth_header())
            .json(phone);
        http::send_json(request).await
    }

    /// PUT /users/{user_id}/phones/{phone_id}
    pub async fn update(
        &self,
        session: &SessionStore,
        user_id: &str,
        phone_id: &str,
        update: &PhoneUpdate,
    ) -> Result<Phone> {
        let request = self
            .api
            .authorized(Method::PUT, &phone_path(user_id, phone_id), &session.auth_header())
            .json(update);
        http::send_json(request).await
    }

    /// DELETE /users/{user_id}/phones/{phone_id}
    pub async fn delete(&self, session: &SessionStore, user_id: &str, phone_id: &str) -> Result<()> {
        let request = self.api.authorized(
            Method::DELETE,
            &phone_path(user_id, phone_id),
            &session.auth_header(),
        );
        http::send(request).await?;
        Ok(())
    }
}

fn phones_path(user_id: &str) -> String {
    format!("/users/{}/phones", user_id)
}

fn phone_path(user_id: &str, phone_id: &str) -> String {
    format!("/users/{}/phones/{}", user_id, phone_id)
}
