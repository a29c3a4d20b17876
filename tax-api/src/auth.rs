//! HTTP Basic authentication for the admin routes.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// The single admin account.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    pub fn new(
        username: &str,
        password: &str,
    ) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn matches(
        &self,
        username: &str,
        password: &str,
    ) -> bool {
        self.username == username && self.password == password
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Checks an `Authorization: Basic ...` header against `credentials`.
///
/// The scheme name is case-insensitive.
pub fn authorize(
    headers: &HeaderMap,
    credentials: &AdminCredentials,
) -> Result<(), ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let (scheme, encoded) = value.split_once(' ').ok_or(ApiError::Unauthorized)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(ApiError::Unauthorized);
    }

    let decoded = BASE64
        .decode(encoded.trim())
        .map_err(|_| ApiError::Unauthorized)?;
    let decoded = String::from_utf8(decoded).map_err(|_| ApiError::Unauthorized)?;
    let (username, password) = decoded.split_once(':').ok_or(ApiError::Unauthorized)?;

    if credentials.matches(username, password) {
        Ok(())
    } else {
        debug!(%username, "admin credentials rejected");
        Err(ApiError::Unauthorized)
    }
}

/// Middleware guarding the admin router.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(request.headers(), &state.credentials)?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn credentials() -> AdminCredentials {
        AdminCredentials::new("adminTax", "admin!")
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn basic(user_pass: &str) -> String {
        format!("Basic {}", BASE64.encode(user_pass))
    }

    #[test]
    fn accepts_matching_credentials() {
        let headers = headers_with(&basic("adminTax:admin!"));

        assert!(authorize(&headers, &credentials()).is_ok());
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let headers = headers_with(&basic("adminTax:admin!").replace("Basic", "bAsIc"));

        assert!(authorize(&headers, &credentials()).is_ok());
    }

    #[test]
    fn password_may_contain_colons() {
        let creds = AdminCredentials::new("admin", "a:b:c");
        let headers = headers_with(&basic("admin:a:b:c"));

        assert!(authorize(&headers, &creds).is_ok());
    }

    #[test]
    fn rejects_missing_header() {
        assert!(matches!(
            authorize(&HeaderMap::new(), &credentials()),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn rejects_wrong_password() {
        let headers = headers_with(&basic("adminTax:nope"));

        assert!(matches!(
            authorize(&headers, &credentials()),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        for value in ["Bearer abc", "Basic !!!not-base64!!!", "Basic", "nonsense"] {
            let headers = headers_with(value);

            assert!(
                authorize(&headers, &credentials()).is_err(),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn debug_hides_password() {
        let rendered = format!("{:?}", credentials());

        assert!(rendered.contains("adminTax"));
        assert!(!rendered.contains("admin!"));
    }
}
