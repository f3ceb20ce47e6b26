use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{CreateAdminResponse, CredentialsRequest, LoginResponse},
        password::hash_password,
        services::generate_token,
    },
    errors::{AppError, AppResult, RepositoryError},
    event::{ApiRequest, ApiResponse},
    state::AppState,
};

/// POST ?action=login
#[instrument(skip_all)]
pub async fn login(state: &AppState, req: &ApiRequest) -> AppResult<ApiResponse> {
    let payload: CredentialsRequest = req.json()?;
    let (username, password) = payload.pair().ok_or(AppError::MissingCredentials)?;

    let hash = hash_password(password);
    let Some(admin) = state.admins.find_by_credentials(username, &hash).await? else {
        warn!(%username, "login rejected");
        return Err(AppError::InvalidCredentials);
    };

    let token = generate_token();
    info!(admin_id = admin.id, %username, "admin logged in");
    Ok(ApiResponse::json(
        200,
        &LoginResponse {
            success: true,
            token,
            username: username.to_string(),
        },
    ))
}

/// POST ?action=create-admin
#[instrument(skip_all)]
pub async fn create_admin(state: &AppState, req: &ApiRequest) -> AppResult<ApiResponse> {
    let payload: CredentialsRequest = req.json()?;
    let (username, password) = payload.pair().ok_or(AppError::MissingCredentials)?;

    let hash = hash_password(password);
    let admin_id = match state.admins.create(username, &hash).await {
        Ok(id) => id,
        Err(RepositoryError::Conflict(_)) => {
            warn!(%username, "admin already exists");
            return Err(AppError::AdminExists);
        }
        Err(e) => return Err(e.into()),
    };

    info!(admin_id, %username, "admin created");
    Ok(ApiResponse::json(
        201,
        &CreateAdminResponse {
            success: true,
            admin_id,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn creds(action: &str, username: &str, password: &str) -> ApiRequest {
        ApiRequest::new("POST")
            .with_query("action", action)
            .with_body(json!({ "username": username, "password": password }).to_string())
    }

    #[tokio::test]
    async fn create_then_login_returns_hex_token() {
        let (state, _store) = AppState::in_memory();
        let res = create_admin(&state, &creds("create-admin", "root", "s3cret"))
            .await
            .expect("created");
        assert_eq!(res.status_code, 201);
        let body = res.body_json().unwrap();
        assert_eq!(body["success"], true);
        assert!(body["admin_id"].is_i64());

        let res = login(&state, &creds("login", "root", "s3cret")).await.expect("login");
        assert_eq!(res.status_code, 200);
        let body = res.body_json().unwrap();
        assert_eq!(body["username"], "root");
        let token = body["token"].as_str().unwrap();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn login_rejects_wrong_password_and_unknown_user() {
        let (state, _store) = AppState::in_memory();
        create_admin(&state, &creds("create-admin", "root", "s3cret"))
            .await
            .expect("created");

        let err = login(&state, &creds("login", "root", "nope")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        let err = login(&state, &creds("login", "ghost", "s3cret")).await.unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected_regardless_of_password() {
        let (state, _store) = AppState::in_memory();
        create_admin(&state, &creds("create-admin", "root", "one"))
            .await
            .expect("first insert");
        let err = create_admin(&state, &creds("create-admin", "root", "two"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AdminExists));
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn missing_or_empty_credentials_are_rejected() {
        let (state, _store) = AppState::in_memory();
        let empty = ApiRequest::new("POST").with_query("action", "login");
        assert!(matches!(
            login(&state, &empty).await,
            Err(AppError::MissingCredentials)
        ));
        assert!(matches!(
            create_admin(&state, &creds("create-admin", "root", "")).await,
            Err(AppError::MissingCredentials)
        ));
    }

    #[tokio::test]
    async fn malformed_body_is_internal_error() {
        let (state, _store) = AppState::in_memory();
        let req = ApiRequest::new("POST").with_body("{not json");
        assert_eq!(login(&state, &req).await.unwrap_err().status_code(), 500);
    }
}
