use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::categorias::handlers;
use crate::features::categorias::services::CategoriaService;

/// Create routes for the categorias feature
///
/// Note: This feature is public (no authentication required)
pub fn routes(service: Arc<CategoriaService>) -> Router {
    Router::new()
        .route("/categorias", get(handlers::list_categorias))
        .route("/categoria", post(handlers::create_categoria))
        .route(
            "/categoria/{id}",
            get(handlers::get_categoria)
                .put(handlers::update_categoria)
                .delete(handlers::delete_categoria),
        )
        .with_state(service)
}
