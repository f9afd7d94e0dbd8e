use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::favorites::dtos::FavoritesResponseDto;
use crate::features::favorites::services::FavoriteService;
use crate::shared::types::ApiResponse;

/// List favorite products
#[utoipa::path(
    get,
    path = "/api/favorites",
    responses(
        (status = 200, description = "Favorites", body = ApiResponse<FavoritesResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "favorites",
    security(("bearer_auth" = []))
)]
pub async fn list_favorites(
    user: AuthenticatedUser,
    State(service): State<Arc<FavoriteService>>,
) -> Result<Json<ApiResponse<FavoritesResponseDto>>> {
    let favorites = service.list(user.telegram_id).await?;
    Ok(Json(ApiResponse::success(Some(favorites.into()), None, None)))
}

/// Add a product to favorites
#[utoipa::path(
    post,
    path = "/api/favorites/{product_id}",
    params(("product_id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Favorites", body = ApiResponse<FavoritesResponseDto>),
        (status = 404, description = "Product not found or inactive")
    ),
    tag = "favorites",
    security(("bearer_auth" = []))
)]
pub async fn add_favorite(
    user: AuthenticatedUser,
    State(service): State<Arc<FavoriteService>>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<ApiResponse<FavoritesResponseDto>>> {
    let favorites = service.add(user.telegram_id, product_id).await?;
    Ok(Json(ApiResponse::success(Some(favorites.into()), None, None)))
}

/// Remove a product from favorites
#[utoipa::path(
    delete,
    path = "/api/favorites/{product_id}",
    params(("product_id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Favorites", body = ApiResponse<FavoritesResponseDto>)
    ),
    tag = "favorites",
    security(("bearer_auth" = []))
)]
pub async fn remove_favorite(
    user: AuthenticatedUser,
    State(service): State<Arc<FavoriteService>>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<ApiResponse<FavoritesResponseDto>>> {
    let favorites = service.remove(user.telegram_id, product_id).await?;
    Ok(Json(ApiResponse::success(Some(favorites.into()), None, None)))
}
