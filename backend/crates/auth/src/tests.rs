//! Service and HTTP flow tests against the in-memory store

#[cfg(test)]
mod support {
    use std::sync::Arc;

    use crate::application::{AuthConfig, CredentialService, CredentialsInput};
    use crate::infra::memory::InMemoryAuthRepository;

    pub type Service = CredentialService<InMemoryAuthRepository, InMemoryAuthRepository>;

    pub const EMAIL: &str = "user@example.com";
    pub const PASSWORD: &str = "Password123!";

    /// Development config with a cheap hash cost
    pub fn config() -> AuthConfig {
        AuthConfig {
            password_hash_iterations: 1000,
            ..AuthConfig::development()
        }
    }

    pub fn service() -> (Arc<InMemoryAuthRepository>, Service) {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let service =
            CredentialService::new(repo.clone(), repo.clone(), Arc::new(config())).unwrap();
        (repo, service)
    }

    pub fn credentials(email: &str, password: &str) -> CredentialsInput {
        CredentialsInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }
}

#[cfg(test)]
mod register_tests {
    use super::support::*;
    use crate::application::TokenType;
    use crate::domain::repository::{RefreshTokenRepository, UserRepository};
    use crate::domain::value_object::{email::Email, refresh_secret::RefreshSecret};
    use crate::error::AuthError;
    use crate::infra::jwt::AccessTokenClaims;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
    use platform::crypto;

    #[tokio::test]
    async fn test_register_issues_pair() {
        let (repo, service) = service();
        let before = Utc::now();

        let pair = service.register(credentials(EMAIL, PASSWORD)).await.unwrap();

        assert_eq!(pair.token_type, TokenType::Bearer);
        assert_eq!(pair.token_type.to_string(), "Bearer");
        assert_eq!(pair.expires_in_seconds, 3600);
        assert!(pair.refresh_token_expires_at >= before + Duration::days(14));
        assert!(pair.refresh_token_expires_at <= Utc::now() + Duration::days(14));
        assert_eq!(
            crypto::from_base64(&pair.refresh_token).unwrap().len(),
            64
        );

        // Only the hash is stored
        let stored = repo
            .find_by_hash(&RefreshSecret::from_client(pair.refresh_token.as_str()).hash())
            .await
            .unwrap()
            .unwrap();
        assert!(stored.is_active());
        assert_ne!(stored.token_hash.as_str(), pair.refresh_token);

        let user = repo
            .find_by_email(&Email::normalized(EMAIL))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.user_id, user.user_id);
        assert_eq!(user.password_hash.iterations(), Some(1000));
    }

    #[tokio::test]
    async fn test_access_token_claims() {
        let (repo, service) = service();
        let pair = service.register(credentials(EMAIL, PASSWORD)).await.unwrap();
        let user = repo
            .find_by_email(&Email::normalized(EMAIL))
            .await
            .unwrap()
            .unwrap();

        let config = config();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        let claims = decode::<AccessTokenClaims>(
            &pair.access_token,
            &DecodingKey::from_secret(config.signing_key.as_bytes()),
            &validation,
        )
        .unwrap()
        .claims;

        assert_eq!(claims.sub, user.user_id.to_string());
        assert_eq!(claims.uid, user.user_id.to_string());
        assert_eq!(claims.email, EMAIL);
        assert_eq!(claims.exp - claims.iat, pair.expires_in_seconds);
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let (repo, service) = service();
        service
            .register(credentials("  User@Example.COM ", PASSWORD))
            .await
            .unwrap();

        assert!(
            repo.exists_by_email(&Email::normalized(EMAIL))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_register_validation() {
        let (_, service) = service();

        let err = service.register(credentials("", PASSWORD)).await.unwrap_err();
        assert!(matches!(err, AuthError::ValidationFailed(ref m) if m == "Email and password are required."));

        let err = service.register(credentials(EMAIL, "   ")).await.unwrap_err();
        assert!(matches!(err, AuthError::ValidationFailed(ref m) if m == "Email and password are required."));

        let err = service.register(credentials(EMAIL, "short")).await.unwrap_err();
        assert!(matches!(err, AuthError::ValidationFailed(ref m) if m == "Password must be at least 8 characters."));

        let err = service
            .register(credentials("not-an-email", PASSWORD))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::ValidationFailed(_)));

        let too_long = format!("{}@example.com", "a".repeat(320));
        let err = service
            .register(credentials(&too_long, PASSWORD))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::ValidationFailed(_)));
    }

    #[tokio::test]
    async fn test_register_counts_characters_not_bytes() {
        let (_, service) = service();
        // 8 characters, 24 bytes
        let pair = service
            .register(credentials(EMAIL, "パスワードです！"))
            .await;
        assert!(pair.is_ok());

        let err = service
            .register(credentials("other@example.com", "パスワード"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::ValidationFailed(_)));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (repo, service) = service();
        service.register(credentials(EMAIL, PASSWORD)).await.unwrap();

        let err = service
            .register(credentials("USER@example.com", "AnotherPass1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailAlreadyRegistered));

        let user = repo
            .find_by_email(&Email::normalized(EMAIL))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(repo.refresh_token_count(&user.user_id).unwrap(), 1);
    }
}

#[cfg(test)]
mod registration_race_tests {
    use std::sync::Arc;

    use chrono::{DateTime, Utc};

    use super::support::*;
    use crate::application::CredentialService;
    use crate::domain::entity::{refresh_token::RefreshToken, user::User};
    use crate::domain::repository::{RefreshTokenRepository, UserRepository};
    use crate::domain::value_object::{
        email::Email,
        ids::{RefreshTokenId, UserId},
        refresh_secret::TokenHash,
    };
    use crate::error::{AuthError, AuthResult};
    use crate::infra::memory::InMemoryAuthRepository;

    /// Store whose existence check always misses, as if every registration
    /// raced another one for the same email
    #[derive(Default)]
    struct StaleExistenceCheck {
        inner: InMemoryAuthRepository,
    }

    impl UserRepository for StaleExistenceCheck {
        async fn create(&self, user: &User) -> AuthResult<()> {
            UserRepository::create(&self.inner, user).await
        }

        async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
            self.inner.find_by_id(user_id).await
        }

        async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
            self.inner.find_by_email(email).await
        }

        async fn exists_by_email(&self, _email: &Email) -> AuthResult<bool> {
            Ok(false)
        }
    }

    impl RefreshTokenRepository for StaleExistenceCheck {
        async fn create(&self, token: &RefreshToken) -> AuthResult<()> {
            RefreshTokenRepository::create(&self.inner, token).await
        }

        async fn find_by_hash(&self, token_hash: &TokenHash) -> AuthResult<Option<RefreshToken>> {
            self.inner.find_by_hash(token_hash).await
        }

        async fn revoke(&self, token_id: &RefreshTokenId, now: DateTime<Utc>) -> AuthResult<bool> {
            self.inner.revoke(token_id, now).await
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_registration_single_winner() {
        let repo = Arc::new(StaleExistenceCheck::default());
        let service = Arc::new(
            CredentialService::new(repo.clone(), repo.clone(), Arc::new(config())).unwrap(),
        );

        let a = tokio::spawn({
            let service = service.clone();
            async move { service.register(credentials(EMAIL, PASSWORD)).await }
        });
        let b = tokio::spawn({
            let service = service.clone();
            async move { service.register(credentials(EMAIL, PASSWORD)).await }
        });

        let results = [a.await.unwrap(), b.await.unwrap()];
        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);
        assert!(
            results
                .iter()
                .any(|r| matches!(r, Err(AuthError::EmailAlreadyRegistered)))
        );
    }
}

#[cfg(test)]
mod token_lifetime_tests {
    use std::sync::Arc;

    use super::support::*;
    use crate::application::{AuthConfig, CredentialService};
    use crate::error::AuthError;
    use crate::infra::memory::InMemoryAuthRepository;

    async fn register_with(config: AuthConfig) -> Result<(), AuthError> {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let service = CredentialService::new(repo.clone(), repo, Arc::new(config)).unwrap();
        service
            .register(credentials(EMAIL, PASSWORD))
            .await
            .map(|_| ())
    }

    #[tokio::test]
    async fn test_unrepresentable_access_lifetime_is_internal_error() {
        let result = register_with(AuthConfig {
            access_token_expiry_minutes: 1 << 60,
            ..config()
        })
        .await;
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[tokio::test]
    async fn test_unrepresentable_refresh_lifetime_is_internal_error() {
        let result = register_with(AuthConfig {
            refresh_token_validity_days: 100_000_000,
            ..config()
        })
        .await;
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }
}

#[cfg(test)]
mod login_tests {
    use super::support::*;
    use crate::error::AuthError;

    #[tokio::test]
    async fn test_login_success_case_insensitive_email() {
        let (_, service) = service();
        service.register(credentials(EMAIL, PASSWORD)).await.unwrap();

        let pair = service
            .login(credentials(" USER@example.com", PASSWORD))
            .await
            .unwrap();
        assert!(!pair.access_token.is_empty());
        assert!(!pair.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_are_indistinguishable() {
        let (_, service) = service();
        service.register(credentials(EMAIL, PASSWORD)).await.unwrap();

        let wrong_password = service
            .login(credentials(EMAIL, "WrongPassword1"))
            .await
            .unwrap_err();
        let unknown_email = service
            .login(credentials("nobody@example.com", PASSWORD))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_login_has_no_length_policy() {
        let (_, service) = service();
        service.register(credentials(EMAIL, PASSWORD)).await.unwrap();

        let err = service.login(credentials(EMAIL, "abc")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let (_, service) = service();

        let err = service.login(credentials("", PASSWORD)).await.unwrap_err();
        assert!(matches!(err, AuthError::ValidationFailed(_)));

        let err = service.login(credentials(EMAIL, "")).await.unwrap_err();
        assert!(matches!(err, AuthError::ValidationFailed(_)));
    }

    #[tokio::test]
    async fn test_each_login_issues_distinct_refresh_token() {
        let (_, service) = service();
        let first = service.register(credentials(EMAIL, PASSWORD)).await.unwrap();
        let second = service.login(credentials(EMAIL, PASSWORD)).await.unwrap();

        assert_ne!(first.refresh_token, second.refresh_token);
        assert_ne!(first.access_token, second.access_token);
    }
}

#[cfg(test)]
mod refresh_tests {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, Utc};

    use super::support::*;
    use crate::application::CredentialService;
    use crate::domain::entity::{refresh_token::RefreshToken, user::User};
    use crate::domain::repository::{RefreshTokenRepository, UserRepository};
    use crate::domain::value_object::{
        email::Email,
        ids::{RefreshTokenId, UserId},
        refresh_secret::{RefreshSecret, TokenHash},
    };
    use crate::error::{AuthError, AuthResult};
    use crate::infra::memory::InMemoryAuthRepository;

    /// Store whose user lookups by id always miss, as if the owner was
    /// deleted after its refresh token was issued
    #[derive(Default)]
    struct OwnerRemoved {
        inner: InMemoryAuthRepository,
    }

    impl UserRepository for OwnerRemoved {
        async fn create(&self, user: &User) -> AuthResult<()> {
            UserRepository::create(&self.inner, user).await
        }

        async fn find_by_id(&self, _user_id: &UserId) -> AuthResult<Option<User>> {
            Ok(None)
        }

        async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
            self.inner.find_by_email(email).await
        }

        async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
            self.inner.exists_by_email(email).await
        }
    }

    impl RefreshTokenRepository for OwnerRemoved {
        async fn create(&self, token: &RefreshToken) -> AuthResult<()> {
            RefreshTokenRepository::create(&self.inner, token).await
        }

        async fn find_by_hash(&self, token_hash: &TokenHash) -> AuthResult<Option<RefreshToken>> {
            self.inner.find_by_hash(token_hash).await
        }

        async fn revoke(&self, token_id: &RefreshTokenId, now: DateTime<Utc>) -> AuthResult<bool> {
            self.inner.revoke(token_id, now).await
        }
    }

    #[tokio::test]
    async fn test_refresh_with_missing_owner_revokes_token() {
        let repo = Arc::new(OwnerRemoved::default());
        let service =
            CredentialService::new(repo.clone(), repo.clone(), Arc::new(config())).unwrap();
        let pair = service.register(credentials(EMAIL, PASSWORD)).await.unwrap();

        let err = service.refresh(&pair.refresh_token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken));

        let stored = repo
            .inner
            .find_by_hash(&RefreshSecret::from_client(pair.refresh_token.as_str()).hash())
            .await
            .unwrap()
            .unwrap();
        assert!(stored.is_revoked());
    }

    #[tokio::test]
    async fn test_refresh_rotates_token() {
        let (repo, service) = service();
        let first = service.register(credentials(EMAIL, PASSWORD)).await.unwrap();

        let second = service.refresh(&first.refresh_token).await.unwrap();
        assert_ne!(second.refresh_token, first.refresh_token);
        assert_ne!(second.access_token, first.access_token);

        let old = repo
            .find_by_hash(&RefreshSecret::from_client(first.refresh_token.as_str()).hash())
            .await
            .unwrap()
            .unwrap();
        assert!(old.is_revoked());

        // The presented token is consumed
        let err = service.refresh(&first.refresh_token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken));

        // The replacement works exactly once too
        service.refresh(&second.refresh_token).await.unwrap();
        let err = service.refresh(&second.refresh_token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken));
    }

    #[tokio::test]
    async fn test_refresh_blank_and_unknown() {
        let (_, service) = service();

        let err = service.refresh("  ").await.unwrap_err();
        assert!(matches!(err, AuthError::ValidationFailed(ref m) if m == "Refresh token is required."));

        let err = service.refresh("never-issued").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken));
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let (repo, service) = service();
        service.register(credentials(EMAIL, PASSWORD)).await.unwrap();
        let user = repo
            .find_by_email(&Email::normalized(EMAIL))
            .await
            .unwrap()
            .unwrap();

        let secret = RefreshSecret::from_client("expired-secret");
        let expired = RefreshToken::issue(
            user.user_id,
            secret.hash(),
            Utc::now() - Duration::days(15),
            Duration::days(14),
        )
        .unwrap();
        RefreshTokenRepository::create(&*repo, &expired).await.unwrap();

        let err = service.refresh("expired-secret").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken));

        // Rejection does not revoke
        let stored = repo.find_by_hash(&secret.hash()).await.unwrap().unwrap();
        assert!(!stored.is_revoked());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_refresh_single_winner() {
        let (_, service) = service();
        let service = Arc::new(service);
        let pair = service.register(credentials(EMAIL, PASSWORD)).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                let token = pair.refresh_token.clone();
                tokio::spawn(async move { service.refresh(&token).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(e) => assert!(matches!(e, AuthError::InvalidRefreshToken)),
            }
        }
        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn test_refresh_under_deadline() {
        let (_, service) = service();
        let pair = service.register(credentials(EMAIL, PASSWORD)).await.unwrap();

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            service.refresh(&pair.refresh_token),
        )
        .await;
        assert!(matches!(result, Ok(Ok(_))));
    }
}

#[cfg(test)]
mod logout_tests {
    use chrono::{Duration, Utc};

    use super::support::*;
    use crate::domain::entity::refresh_token::RefreshToken;
    use crate::domain::repository::{RefreshTokenRepository, UserRepository};
    use crate::domain::value_object::{email::Email, refresh_secret::RefreshSecret};
    use crate::error::AuthError;

    #[tokio::test]
    async fn test_logout_revokes_and_is_idempotent() {
        let (repo, service) = service();
        let pair = service.register(credentials(EMAIL, PASSWORD)).await.unwrap();

        service.logout(&pair.refresh_token).await.unwrap();

        let stored = repo
            .find_by_hash(&RefreshSecret::from_client(pair.refresh_token.as_str()).hash())
            .await
            .unwrap()
            .unwrap();
        let revoked_at = stored.revoked_at;
        assert!(revoked_at.is_some());

        let err = service.refresh(&pair.refresh_token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken));

        // Second logout leaves the original revocation time
        service.logout(&pair.refresh_token).await.unwrap();
        let stored = repo
            .find_by_hash(&stored.token_hash)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.revoked_at, revoked_at);
    }

    #[tokio::test]
    async fn test_logout_blank_and_unknown_succeed() {
        let (_, service) = service();
        assert!(service.logout("").await.is_ok());
        assert!(service.logout(" \t").await.is_ok());
        assert!(service.logout("never-issued").await.is_ok());
    }

    #[tokio::test]
    async fn test_logout_revokes_expired_token() {
        let (repo, service) = service();
        service.register(credentials(EMAIL, PASSWORD)).await.unwrap();
        let user = repo
            .find_by_email(&Email::normalized(EMAIL))
            .await
            .unwrap()
            .unwrap();

        let secret = RefreshSecret::from_client("expired-secret");
        let expired = RefreshToken::issue(
            user.user_id,
            secret.hash(),
            Utc::now() - Duration::days(30),
            Duration::days(14),
        )
        .unwrap();
        RefreshTokenRepository::create(&*repo, &expired).await.unwrap();

        service.logout("expired-secret").await.unwrap();

        let stored = repo.find_by_hash(&secret.hash()).await.unwrap().unwrap();
        assert!(stored.is_revoked());
    }

    #[tokio::test]
    async fn test_logout_does_not_affect_other_tokens() {
        let (_, service) = service();
        let first = service.register(credentials(EMAIL, PASSWORD)).await.unwrap();
        let second = service.login(credentials(EMAIL, PASSWORD)).await.unwrap();

        service.logout(&first.refresh_token).await.unwrap();
        assert!(service.refresh(&second.refresh_token).await.is_ok());
    }
}

#[cfg(test)]
mod current_user_tests {
    use std::sync::Arc;

    use super::support::*;
    use crate::application::CurrentUserUseCase;
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::{email::Email, ids::UserId};
    use crate::error::AuthError;

    #[tokio::test]
    async fn test_current_user_lookup() {
        let (repo, service) = service();
        service.register(credentials(EMAIL, PASSWORD)).await.unwrap();
        let user = repo
            .find_by_email(&Email::normalized(EMAIL))
            .await
            .unwrap()
            .unwrap();

        let use_case = CurrentUserUseCase::new(Arc::clone(&repo));
        let current = use_case.execute(&user.user_id).await.unwrap();
        assert_eq!(current.user_id, user.user_id);
        assert_eq!(current.email.as_str(), EMAIL);

        let err = use_case.execute(&UserId::new()).await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }
}

#[cfg(test)]
mod router_tests {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::support::*;
    use crate::infra::memory::InMemoryAuthRepository;
    use crate::presentation::router::auth_router_generic;

    fn app() -> Router {
        auth_router_generic(InMemoryAuthRepository::new(), config()).unwrap()
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
        bearer: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&value).unwrap())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn register_body() -> Value {
        json!({ "email": EMAIL, "password": PASSWORD })
    }

    #[tokio::test]
    async fn test_register_login_me_flow() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/auth/register",
            Some(register_body()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tokenType"], "Bearer");
        assert_eq!(body["expiresInSeconds"], 3600);
        assert!(body["refreshTokenExpiresAt"].is_string());

        let (status, body) =
            send(&app, Method::POST, "/auth/login", Some(register_body()), None).await;
        assert_eq!(status, StatusCode::OK);
        let access_token = body["accessToken"].as_str().unwrap().to_string();

        let (status, body) = send(&app, Method::GET, "/users/me", None, Some(&access_token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], EMAIL);
        assert!(body["userId"].is_string());
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let app = app();

        let (status, _) = send(
            &app,
            Method::POST,
            "/auth/register",
            Some(json!({ "email": EMAIL, "password": "short" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        send(&app, Method::POST, "/auth/register", Some(register_body()), None).await;
        let (status, _) = send(
            &app,
            Method::POST,
            "/auth/register",
            Some(register_body()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            Method::POST,
            "/auth/login",
            Some(json!({ "email": EMAIL, "password": "WrongPassword1" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &app,
            Method::POST,
            "/auth/refresh",
            Some(json!({ "refreshToken": "never-issued" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, Method::POST, "/auth/refresh", Some(json!({})), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_refresh_and_logout_flow() {
        let app = app();
        let (_, body) = send(
            &app,
            Method::POST,
            "/auth/register",
            Some(register_body()),
            None,
        )
        .await;
        let refresh_token = body["refreshToken"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::POST,
            "/auth/refresh",
            Some(json!({ "refreshToken": refresh_token })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let rotated = body["refreshToken"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            Method::POST,
            "/auth/refresh",
            Some(json!({ "refreshToken": refresh_token })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        for _ in 0..2 {
            let (status, body) = send(
                &app,
                Method::POST,
                "/auth/logout",
                Some(json!({ "refreshToken": rotated })),
                None,
            )
            .await;
            assert_eq!(status, StatusCode::NO_CONTENT);
            assert_eq!(body, Value::Null);
        }
    }

    #[tokio::test]
    async fn test_me_requires_valid_bearer() {
        let app = app();

        let (status, _) = send(&app, Method::GET, "/users/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, Method::GET, "/users/me", None, Some("not-a-jwt")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
