use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::{
    errors::{AppError, AppResult},
    event::{ApiRequest, ApiResponse, SuccessResponse},
    products::{
        dto::{CreateProductRequest, CreatedProductResponse, ProductItem, UpdateProductRequest},
        repo_types::ProductFields,
    },
    state::AppState,
};

/// GET ?action=products. Public; includes inactive products.
#[instrument(skip_all)]
pub async fn list_products(state: &AppState, _req: &ApiRequest) -> AppResult<ApiResponse> {
    let items: Vec<ProductItem> = state
        .products
        .list()
        .await?
        .into_iter()
        .map(ProductItem::from)
        .collect();
    debug!(count = items.len(), "products listed");
    Ok(ApiResponse::json(200, &items))
}

/// POST ?action=products
#[instrument(skip_all)]
pub async fn create_product(state: &AppState, req: &ApiRequest) -> AppResult<ApiResponse> {
    state.authorizer.authorize(req).await?;

    let body: CreateProductRequest = req.json()?;
    let fields = ProductFields::from(body);
    let id = state.products.create(&fields).await?;

    info!(product_id = id, name = %fields.name, "product created");
    Ok(ApiResponse::json(
        201,
        &CreatedProductResponse { success: true, id },
    ))
}

/// PUT ?action=products&id=N
#[instrument(skip_all)]
pub async fn update_product(state: &AppState, req: &ApiRequest) -> AppResult<ApiResponse> {
    state.authorizer.authorize(req).await?;

    let raw: Value = req.json()?;
    let id = product_id(req)?;
    let body: UpdateProductRequest = serde_json::from_value(raw)?;
    let touched = state.products.update(id, &body.into()).await?;

    info!(product_id = id, touched, "product updated");
    Ok(ApiResponse::json(200, &SuccessResponse::ok()))
}

/// DELETE ?action=products&id=N
#[instrument(skip_all)]
pub async fn delete_product(state: &AppState, req: &ApiRequest) -> AppResult<ApiResponse> {
    state.authorizer.authorize(req).await?;

    let id = product_id(req)?;
    let touched = state.products.deactivate(id).await?;

    info!(product_id = id, touched, "product deactivated");
    Ok(ApiResponse::json(200, &SuccessResponse::ok()))
}

fn product_id(req: &ApiRequest) -> AppResult<i32> {
    let raw = req
        .query("id")
        .filter(|s| !s.is_empty())
        .ok_or(AppError::MissingProductId)?;
    raw.parse::<i32>()
        .map_err(|e| AppError::Internal(format!("invalid product id {raw:?}: {e}")))
}
