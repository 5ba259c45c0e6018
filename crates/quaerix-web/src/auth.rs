//! Identity resolution.
//!
//! A middleware resolves the request's bearer token (if any) into an
//! `Identity` before any handler runs: the authorization descriptor plus the
//! matching user row. Login/registration belong to the external
//! authentication subsystem; unknown or expired tokens simply yield the
//! anonymous identity, mirroring how an invalid session cookie would.

use crate::state::SharedState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use quaerix_common::{ApiError, ApiResult};
use quaerix_db::User;
use serde::Serialize;

/// Role name that unlocks the admin surface.
pub const ADMIN_ROLE: &str = "admin";

/// Authorization descriptor attached to most responses.
#[derive(Debug, Clone, Serialize)]
pub struct AuthData {
    pub is_authenticated: bool,
    pub is_active: bool,
    pub is_anonymous: bool,
    pub is_admin: bool,
    pub username: String,
}

impl AuthData {
    pub fn anonymous() -> Self {
        Self {
            is_authenticated: false,
            is_active: false,
            is_anonymous: true,
            is_admin: false,
            username: "Anonymous".to_string(),
        }
    }
}

/// The resolved caller: descriptor plus the user row when authenticated.
#[derive(Debug, Clone)]
pub struct Identity {
    pub auth: AuthData,
    pub user: Option<User>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self {
            auth: AuthData::anonymous(),
            user: None,
        }
    }

    pub fn authenticated(user: User, is_admin: bool) -> Self {
        let auth = AuthData {
            is_authenticated: true,
            is_active: user.active,
            is_anonymous: false,
            is_admin,
            username: user.username.clone(),
        };
        Self {
            auth,
            user: Some(user),
        }
    }

    /// The user row, or a 401 for anonymous callers.
    pub fn require_user(&self) -> ApiResult<&User> {
        self.user
            .as_ref()
            .ok_or_else(|| ApiError::Unauthorized("authentication required".to_string()))
    }

    /// The user row if it holds the admin role; 401 for anonymous callers,
    /// 403 for authenticated non-admins.
    pub fn require_admin(&self) -> ApiResult<&User> {
        let user = self.require_user()?;
        if !self.auth.is_admin {
            return Err(ApiError::forbidden());
        }
        Ok(user)
    }
}

/// Resolve the caller before handler dispatch and stash it in extensions.
/// Missing or malformed Authorization headers yield the anonymous identity.
pub async fn identity_middleware(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = match request.headers().typed_get::<Authorization<Bearer>>() {
        Some(Authorization(bearer)) => resolve(&state, bearer.token()).await?,
        None => Identity::anonymous(),
    };
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

async fn resolve(state: &SharedState, token: &str) -> ApiResult<Identity> {
    let Some(user) = state.sessions.find_user_by_token(token).await? else {
        return Ok(Identity::anonymous());
    };
    let is_admin = state.users.has_role(user.id, ADMIN_ROLE).await?;
    Ok(Identity::authenticated(user, is_admin))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(active: bool) -> User {
        User {
            id: 7,
            email: "ada@example.org".to_string(),
            username: "ada".to_string(),
            password: "argon2id$stub".to_string(),
            last_login_at: None,
            current_login_at: None,
            last_login_ip: None,
            current_login_ip: None,
            login_count: Some(3),
            active,
            confirmed_at: None,
        }
    }

    #[test]
    fn test_anonymous_descriptor() {
        let identity = Identity::anonymous();
        assert!(!identity.auth.is_authenticated);
        assert!(identity.auth.is_anonymous);
        assert!(!identity.auth.is_admin);
        assert_eq!(identity.auth.username, "Anonymous");
        assert!(identity.require_user().is_err());
    }

    #[test]
    fn test_authenticated_descriptor() {
        let identity = Identity::authenticated(user(true), false);
        assert!(identity.auth.is_authenticated);
        assert!(identity.auth.is_active);
        assert!(!identity.auth.is_anonymous);
        assert_eq!(identity.auth.username, "ada");
        assert_eq!(identity.require_user().unwrap().id, 7);
    }

    #[test]
    fn test_admin_gate() {
        let admin = Identity::authenticated(user(true), true);
        assert!(admin.require_admin().is_ok());

        let plain = Identity::authenticated(user(true), false);
        assert!(matches!(plain.require_admin(), Err(ApiError::Forbidden(_))));

        assert!(matches!(
            Identity::anonymous().require_admin(),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_inactive_user_descriptor() {
        let identity = Identity::authenticated(user(false), false);
        assert!(identity.auth.is_authenticated);
        assert!(!identity.auth.is_active);
    }
}
