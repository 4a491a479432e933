use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Where a signed-out visitor is sent.
pub const SIGN_IN_PATH: &str = "/";
/// Home of the admin area.
pub const ADMIN_HOME: &str = "/admn";
/// Home of the end-user area.
pub const END_USER_HOME: &str = "/end";

/// The user behind a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl SessionUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
        }
    }
}

/// Role as stored in the profile table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    SuperAdmin,
    Admin,
    EndUser,
    User,
    Unknown,
}

impl Role {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "super-admin" => Role::SuperAdmin,
            "admin" => Role::Admin,
            "end-user" => Role::EndUser,
            "user" => Role::User,
            _ => Role::Unknown,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }

    pub fn is_end_user(&self) -> bool {
        matches!(self, Role::EndUser | Role::User)
    }
}

/// The two guarded areas of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    /// Admin screens served by the host application. This server only decides access to them
    /// through [`guard`](crate::auth::guard); none of its own routes live here.
    Admin,
    /// The purchase request screens and every `/api/procurement` route except the status list.
    EndUser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow(SessionUser),
    Redirect(&'static str),
}

/// Landing decision for the sign-in page
#[derive(Debug, Serialize, ToSchema)]
pub struct LandingResponse {
    /// Where to send the visitor, or null to stay on the sign-in page
    pub redirect: Option<String>,
}
