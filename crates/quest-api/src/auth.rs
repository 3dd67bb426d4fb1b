//! Bearer token authentication.
//!
//! Tokens are HS256 JWTs issued by the business backend. The verified claims
//! become a [`Session`], and the raw token is kept so upstream calls are made
//! with the caller's own credentials.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::RequestPartsExt;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use quest_client::Session;
use quest_models::Role;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Claims carried by a backend-issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiration
    pub exp: i64,
}

/// HS256 verification key.
pub struct JwtKeys {
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> ApiResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| ApiError::unauthorized(format!("Token validation failed: {}", e)))?;
        Ok(data.claims)
    }
}

/// Authenticated caller extracted from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub session: Session,
}

impl AuthUser {
    pub fn from_claims(token: &str, claims: Claims) -> Self {
        let mut session = Session::new(token, claims.sub, claims.role);
        session.business_id = claims.business_id;
        session.email = claims.email;
        Self { session }
    }

    pub fn role(&self) -> &Role {
        &self.session.role
    }

    /// Super admins may read any business; everyone else only their own.
    pub fn can_access_business(&self, business_id: &str) -> bool {
        self.session.role.is_super_admin()
            || self.session.business_id.as_deref() == Some(business_id)
    }

    pub fn require_business_access(&self, business_id: &str) -> ApiResult<()> {
        if self.can_access_business(business_id) {
            Ok(())
        } else {
            Err(ApiError::forbidden("Cannot access another business"))
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| ApiError::unauthorized("Missing or invalid Authorization header"))?;

        let claims = state.jwt.verify(bearer.token())?;
        debug!(user_id = %claims.sub, role = %claims.role, "Authenticated request");

        Ok(AuthUser::from_claims(bearer.token(), claims))
    }
}
