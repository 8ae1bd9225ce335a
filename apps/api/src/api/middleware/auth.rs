use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::auth::jwt::{verify_token, Claims};
use crate::auth::{authorize, Action};
use crate::domain::user::{Email, NewUser, Role, User};

/// The verified caller, loaded from the store
///
/// A valid token whose subject has no record yet provisions a new user at
/// registration step 1.
///
/// Handlers take their inputs as `Result<_, _Rejection>` and unwrap them
/// only after `authorize`, so a caller without the right access gets 403
/// whatever the input looks like.
///
/// Usage:
/// ```rust,ignore
/// async fn protected_handler(
///     caller: Caller,
///     body: Result<Json<ProfileUpdate>, JsonRejection>,
/// ) -> Result<Json<UserResponse>, ApiError> {
///     let user = caller.authorize(Action::UpdateOwnProfile)?;
///     let Json(update) = body?;
///     // ...
/// }
/// ```
pub struct Caller(pub User);

impl Caller {
    /// Applies the policy for `action`, returning the user on success
    pub fn authorize(&self, action: Action) -> Result<&User, ApiError> {
        authorize(&self.0, action)?;
        Ok(&self.0)
    }

    pub fn into_user(self) -> User {
        self.0
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::unauthorized("Invalid authorization format. Use: Bearer <token>")
        })?;

        let claims = verify_token(token, &state.config.jwt_secret)
            .map_err(|e| ApiError::unauthorized(format!("Invalid token: {}", e)))?;

        if let Some(user) = state.users.find_by_identity(&claims.sub).await? {
            return Ok(Caller(user));
        }

        provision(state, claims).await.map(Caller)
    }
}

/// A caller that may be anonymous
///
/// Missing or invalid credentials read as `None`; store failures still
/// reject the request.
pub struct MaybeCaller(pub Option<Caller>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeCaller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Caller::from_request_parts(parts, state).await {
            Ok(caller) => Ok(MaybeCaller(Some(caller))),
            Err(err) if err.status == StatusCode::UNAUTHORIZED => Ok(MaybeCaller(None)),
            Err(err) => Err(err),
        }
    }
}

async fn provision(state: &AppState, claims: Claims) -> Result<User, ApiError> {
    let email = Email::new(claims.email)
        .map_err(|e| ApiError::unauthorized(format!("Invalid token: {}", e)))?;
    let name = claims
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| email.local_part().to_string());
    let role = if state.config.is_admin_email(email.as_str()) {
        Role::Admin
    } else {
        Role::User
    };

    let user = state
        .users
        .provision(NewUser {
            identity_ref: claims.sub,
            email,
            name,
            role,
        })
        .await?;

    tracing::info!(user_id = user.id, role = %user.role, "provisioned user on first sign-in");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::create_token;
    use crate::config::AppConfig;
    use crate::domain::repositories::{RepoError, RepoResult, UserFilter, UserRepository};
    use crate::domain::user::{Profile, RegistrationStage};
    use axum::http::Request;
    use std::sync::Arc;

    const SECRET: &str = "middleware-test-secret";

    /// A user store whose backing database is down
    struct UnavailableUsers;

    fn down<T>() -> RepoResult<T> {
        Err(RepoError::Storage("connection refused".into()))
    }

    #[async_trait]
    impl UserRepository for UnavailableUsers {
        async fn provision(&self, _: NewUser) -> RepoResult<User> {
            down()
        }
        async fn find_by_id(&self, _: i64) -> RepoResult<Option<User>> {
            down()
        }
        async fn find_by_identity(&self, _: &str) -> RepoResult<Option<User>> {
            down()
        }
        async fn list(&self, _: UserFilter) -> RepoResult<Vec<User>> {
            down()
        }
        async fn update_profile(&self, _: i64, _: &str, _: &Profile) -> RepoResult<User> {
            down()
        }
        async fn save_registration(&self, _: i64, _: &str, _: &Profile, _: &str) -> RepoResult<User> {
            down()
        }
        async fn transition_stage(
            &self,
            _: i64,
            _: RegistrationStage,
            _: RegistrationStage,
        ) -> RepoResult<User> {
            down()
        }
        async fn set_role(&self, _: i64, _: Role) -> RepoResult<User> {
            down()
        }
    }

    fn parts(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/auth/me");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn bearer() -> String {
        let claims = Claims::new("idp|ada", "ada@example.com", None);
        format!("Bearer {}", create_token(&claims, SECRET).unwrap())
    }

    #[tokio::test]
    async fn maybe_caller_is_none_without_credentials() {
        let state = AppState::in_memory(AppConfig::for_memory(SECRET));

        let MaybeCaller(caller) = MaybeCaller::from_request_parts(&mut parts(None), &state)
            .await
            .unwrap();
        assert!(caller.is_none());

        let MaybeCaller(caller) =
            MaybeCaller::from_request_parts(&mut parts(Some("Bearer garbage")), &state)
                .await
                .unwrap();
        assert!(caller.is_none());
    }

    #[tokio::test]
    async fn maybe_caller_provisions_on_valid_token() {
        let state = AppState::in_memory(AppConfig::for_memory(SECRET));

        let MaybeCaller(caller) =
            MaybeCaller::from_request_parts(&mut parts(Some(&bearer())), &state)
                .await
                .unwrap();
        let user = caller.expect("caller").into_user();
        assert_eq!(user.name, "ada");
        assert_eq!(user.registration_step(), 1);
    }

    #[tokio::test]
    async fn maybe_caller_surfaces_storage_failures() {
        let mut state = AppState::in_memory(AppConfig::for_memory(SECRET));
        state.users = Arc::new(UnavailableUsers);

        let err = MaybeCaller::from_request_parts(&mut parts(Some(&bearer())), &state)
            .await
            .err()
            .expect("storage failure must reject");
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
