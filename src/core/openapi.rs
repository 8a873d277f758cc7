use utoipa::{Modify, OpenApi};

use crate::features::categorias::{dtos as categorias_dtos, handlers as categorias_handlers};
use crate::shared::types::{DeleteResponse, ErrorResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        categorias_handlers::list_categorias,
        categorias_handlers::create_categoria,
        categorias_handlers::get_categoria,
        categorias_handlers::update_categoria,
        categorias_handlers::delete_categoria,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            DeleteResponse,
            // Categorias
            categorias_dtos::CategoriaDto,
            categorias_dtos::CategoriaResponseDto,
        )
    ),
    tags(
        (name = "categorias", description = "Category records"),
    ),
    info(
        title = "Categorias API",
        version = "0.1.0",
        description = "CRUD API for categorias",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_categoria_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/categorias"));
        assert!(paths.iter().any(|p| p.as_str() == "/categoria"));
        assert!(paths.iter().any(|p| p.as_str() == "/categoria/{id}"));
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Busqueda".to_string(),
            version: "9.9.9".to_string(),
            description: "custom".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "Busqueda");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
