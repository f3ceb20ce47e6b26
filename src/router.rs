use tracing::{info, instrument};

use crate::{
    auth::handlers::{create_admin, login},
    errors::{AppError, AppResult},
    event::{ApiRequest, ApiResponse},
    products::handlers::{create_product, delete_product, list_products, update_product},
    settings::handlers::{list_settings, update_settings},
    state::AppState,
};

/// The eight `(method, action)` pairs the backend answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    CreateAdmin,
    ListSettings,
    UpdateSettings,
    ListProducts,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
}

impl Route {
    pub fn resolve(method: &str, action: &str) -> Option<Self> {
        let route = match (method, action) {
            ("POST", "login") => Self::Login,
            ("POST", "create-admin") => Self::CreateAdmin,
            ("GET", "settings") => Self::ListSettings,
            ("PUT", "settings") => Self::UpdateSettings,
            ("GET", "products") => Self::ListProducts,
            ("POST", "products") => Self::CreateProduct,
            ("PUT", "products") => Self::UpdateProduct,
            ("DELETE", "products") => Self::DeleteProduct,
            _ => return None,
        };
        Some(route)
    }

    async fn dispatch(self, state: &AppState, req: &ApiRequest) -> AppResult<ApiResponse> {
        match self {
            Self::Login => login(state, req).await,
            Self::CreateAdmin => create_admin(state, req).await,
            Self::ListSettings => list_settings(state, req).await,
            Self::UpdateSettings => update_settings(state, req).await,
            Self::ListProducts => list_products(state, req).await,
            Self::CreateProduct => create_product(state, req).await,
            Self::UpdateProduct => update_product(state, req).await,
            Self::DeleteProduct => delete_product(state, req).await,
        }
    }
}

/// Entry point for one invocation. Never fails: every error becomes a
/// `{"error": ...}` response with the matching status.
#[instrument(skip_all, fields(method = %req.http_method, action = %req.action()))]
pub async fn handle(state: &AppState, req: ApiRequest) -> ApiResponse {
    if req.http_method == "OPTIONS" {
        return ApiResponse::preflight();
    }

    let result = match Route::resolve(&req.http_method, req.action()) {
        Some(route) => route.dispatch(state, &req).await,
        None => Err(AppError::InvalidAction),
    };

    let response = result.unwrap_or_else(AppError::into_response);
    info!(status = response.status_code, "handled");
    response
}
