//! Session lookups and the guard decisions built on them.
//!
//! The service never signs anyone in. It asks a [`SessionProvider`] who owns a token and what
//! role that user has, then decides whether a request may enter an area.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use super::model::{Area, GuardDecision, Role, SessionUser};
use super::model::{ADMIN_HOME, END_USER_HOME, SIGN_IN_PATH};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session lookup failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("session service answered with status {0}")]
    Status(u16),
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The user owning `token`, if the session is valid.
    async fn current_user(&self, token: Option<&str>) -> Result<Option<SessionUser>, SessionError>;

    /// The role recorded for `user_id`, if any.
    async fn role_of(&self, user_id: &str) -> Result<Option<Role>, SessionError>;
}

/// In-memory sessions for tests and deployments without an identity service.
#[derive(Debug, Default, Clone)]
pub struct StaticSessionProvider {
    sessions: HashMap<String, (SessionUser, Role)>,
    anonymous: Option<(SessionUser, Role)>,
}

impl StaticSessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(mut self, token: impl Into<String>, user: SessionUser, role: Role) -> Self {
        self.sessions.insert(token.into(), (user, role));
        self
    }

    /// Treat requests with no known token as this user.
    pub fn with_anonymous(mut self, user: SessionUser, role: Role) -> Self {
        self.anonymous = Some((user, role));
        self
    }

    fn roles(&self) -> impl Iterator<Item = &(SessionUser, Role)> {
        self.sessions.values().chain(self.anonymous.iter())
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn current_user(&self, token: Option<&str>) -> Result<Option<SessionUser>, SessionError> {
        let known = token.and_then(|t| self.sessions.get(t));
        Ok(known
            .or(self.anonymous.as_ref())
            .map(|(user, _)| user.clone()))
    }

    async fn role_of(&self, user_id: &str) -> Result<Option<Role>, SessionError> {
        Ok(self
            .roles()
            .find(|(user, _)| user.id == user_id)
            .map(|(_, role)| *role))
    }
}

/// The guard rule for one area, given who is signed in and their role.
pub fn decide(user: Option<SessionUser>, role: Option<Role>, area: Area) -> GuardDecision {
    let Some(user) = user else {
        return GuardDecision::Redirect(SIGN_IN_PATH);
    };
    let role = role.unwrap_or(Role::Unknown);

    match area {
        Area::Admin if role.is_admin() => GuardDecision::Allow(user),
        Area::Admin => GuardDecision::Redirect(END_USER_HOME),
        Area::EndUser if role.is_admin() => GuardDecision::Redirect(ADMIN_HOME),
        Area::EndUser if role.is_end_user() => GuardDecision::Allow(user),
        Area::EndUser => GuardDecision::Redirect(SIGN_IN_PATH),
    }
}

/// Where the sign-in page should send a visitor who already has a session.
pub fn landing_target(user: Option<&SessionUser>, role: Option<Role>) -> Option<&'static str> {
    user?;
    match role {
        Some(role) if role.is_admin() => Some(ADMIN_HOME),
        _ => Some(END_USER_HOME),
    }
}

/// Look up the session and its role. Provider failures count as no session.
async fn lookup(
    provider: &dyn SessionProvider,
    token: Option<&str>,
) -> (Option<SessionUser>, Option<Role>) {
    let user = match provider.current_user(token).await {
        Ok(user) => user,
        Err(e) => {
            log::warn!("Session lookup failed: {}", e);
            None
        }
    };
    let role = match &user {
        Some(user) => provider.role_of(&user.id).await.unwrap_or_else(|e| {
            log::warn!("Role lookup for {} failed: {}", user.id, e);
            None
        }),
        None => None,
    };
    (user, role)
}

pub async fn guard(provider: &dyn SessionProvider, token: Option<&str>, area: Area) -> GuardDecision {
    let (user, role) = lookup(provider, token).await;
    decide(user, role, area)
}

pub async fn landing(provider: &dyn SessionProvider, token: Option<&str>) -> Option<&'static str> {
    let (user, role) = lookup(provider, token).await;
    landing_target(user.as_ref(), role)
}
