//! Session provider backed by a Supabase project.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::model::{Role, SessionUser};
use super::session::{SessionError, SessionProvider};

#[derive(Deserialize)]
struct AuthUser {
    id: String,
    email: Option<String>,
}

#[derive(Deserialize)]
struct ProfileRow {
    role: Option<String>,
}

pub struct SupabaseSessionProvider {
    client: reqwest::Client,
    url: String,
    anon_key: String,
}

impl SupabaseSessionProvider {
    pub fn new(url: &str, anon_key: impl Into<String>) -> Result<Self, SessionError> {
        let client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(900))
            .timeout(Duration::from_secs(10))
            .user_agent("procurement-server/1.0")
            .build()?;
        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        })
    }
}

#[async_trait]
impl SessionProvider for SupabaseSessionProvider {
    async fn current_user(&self, token: Option<&str>) -> Result<Option<SessionUser>, SessionError> {
        let Some(token) = token else {
            return Ok(None);
        };

        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.url))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Ok(None),
            status if !status.is_success() => return Err(SessionError::Status(status.as_u16())),
            _ => {}
        }

        let user: AuthUser = response.json().await?;
        log::debug!("Session token belongs to {}", user.id);
        Ok(Some(SessionUser {
            id: user.id,
            email: user.email,
        }))
    }

    async fn role_of(&self, user_id: &str) -> Result<Option<Role>, SessionError> {
        let response = self
            .client
            .get(format!("{}/rest/v1/profile", self.url))
            .query(&[("id", format!("eq.{}", user_id)), ("select", "role".to_string())])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SessionError::Status(response.status().as_u16()));
        }

        let rows: Vec<ProfileRow> = response.json().await?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.role)
            .map(|role| Role::parse(&role)))
    }
}
