//! Users API client
//!
//! One method per backend endpoint. Every call except `register` carries
//! the session's bearer header. Failures come back as the HTTP client's
//! own error; nothing is retried or cached.

use reqwest::Method;

use crate::adapters::http::{self, ApiClient};
use crate::domain::result::Result;
use crate::domain::{NewUser, PasswordChange, PhotoUpload, User, UserUpdate};

use super::session::SessionStore;

#[derive(Debug, Clone)]
pub struct UsersApi {
    api: ApiClient,
}

impl UsersApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// GET /users
    pub async fn list(&self, session: &SessionStore) -> Result<Vec<User>> {
        let request = self.api.authorized(Method::GET, "/users", &session.auth_header());
        http::send_json_list(request).await
    }

    /// GET /users/with-phones
    pub async fn list_with_phones(&self, session: &SessionStore) -> Result<Vec<User>> {
        let request = self
            .api
            .authorized(Method::GET, "/users/with-phones", &session.auth_header());
        http::send_json_list(request).await
    }

    /// GET /users/{id}
    pub async fn get(&self, session: &SessionStore, id: &str) -> Result<User> {
        let request = self
            .api
            .authorized(Method::GET, &user_path(id), &session.auth_header());
        http::send_json(request).await
    }

    /// GET /users/{id}/with-phones
    pub async fn get_with_phones(&self, session: &SessionStore, id: &str) -> Result<User> {
        let path = format!("{}/with-phones", user_path(id));
        let request = self.api.authorized(Method::GET, &path, &session.auth_header());
        http::send_json(request).await
    }

    /// POST /users
    pub async fn create(&self, session: &SessionStore, user: &NewUser) -> Result<User> {
        let request = self
            .api
            .authorized(Method::POST, "/users", &session.auth_header())
            .json(user);
        http::send_json(request).await
    }

    /// POST /users as multipart, with a profile photo
    pub async fn create_with_photo(
        &self,
        session: &SessionStore,
        user: &NewUser,
        photo: PhotoUpload,
    ) -> Result<User> {
        let form = http::photo_form(user.form_fields(), photo)?;
        let request = self
            .api
            .authorized(Method::POST, "/users", &session.auth_header())
            .multipart(form);
        http::send_json(request).await
    }

    /// PUT /users/{id}
    pub async fn update(&self, session: &SessionStore, id: &str, update: &UserUpdate) -> Result<User> {
        let request = self
            .api
            .authorized(Method::PUT, &user_path(id), &session.auth_header())
            .json(update);
        http::send_json(request).await
    }

    /// PUT /users/{id} as multipart, replacing the profile photo
    pub async fn update_with_photo(
        &self,
        session: &SessionStore,
        id: &str,
        update: &UserUpdate,
        photo: PhotoUpload,
    ) -> Result<User> {
        let form = http::photo_form(update.form_fields(), photo)?;
        let request = self
            .api
            .authorized(Method::PUT, &user_path(id), &session.auth_header())
            .multipart(form);
        http::send_json(request).await
    }

    /// PUT /users/{id}/password
    pub async fn update_password(
        &self,
        session: &SessionStore,
        id: &str,
        change: &PasswordChange,
    ) -> Result<()> {
        let path = format!("{}/password", user_path(id));
        let request = self
            .api
            .authorized(Method::PUT, &path, &session.auth_header())
            .json(change);
        http::send(request).await?;
        Ok(())
    }

    /// DELETE /users/{id}
    pub async fn delete(&self, session: &SessionStore, id: &str) -> Result<()> {
        let request = self
            .api
            .authorized(Method::DELETE, &user_path(id), &session.auth_header());
        http::send(request).await?;
        Ok(())
    }

    /// POST /auth/register - open to anyone, sent without credentials
    pub async fn register(&self, user: &NewUser) -> Result<User> {
        let request = self.api.request(Method::POST, "/auth/register").json(user);
        http::send_json(request).await
    }
}

fn user_path(id: &str) -> String {
    format!("/users/{}", id)
}
