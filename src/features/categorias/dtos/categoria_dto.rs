use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::categorias::models::{Categoria, NewCategoria};

/// Request body for creating or replacing a categoria
///
/// An `id` field in the body is ignored; the id comes from the store on
/// create and from the path on update.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CategoriaDto {
    /// Display name of the categoria
    #[serde(rename = "nombrecategoria")]
    #[validate(length(min = 1, max = 255, message = "nombrecategoria must be 1-255 characters"))]
    pub nombre_categoria: String,

    /// Classification tag of the categoria
    #[serde(rename = "tipocategoria")]
    #[validate(length(min = 1, max = 255, message = "tipocategoria must be 1-255 characters"))]
    pub tipo_categoria: String,
}

impl From<CategoriaDto> for NewCategoria {
    fn from(dto: CategoriaDto) -> Self {
        Self {
            nombre_categoria: dto.nombre_categoria,
            tipo_categoria: dto.tipo_categoria,
        }
    }
}

/// Response DTO for categoria
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoriaResponseDto {
    pub id: i32,
    #[serde(rename = "nombrecategoria")]
    pub nombre_categoria: String,
    #[serde(rename = "tipocategoria")]
    pub tipo_categoria: String,
}

impl From<Categoria> for CategoriaResponseDto {
    fn from(c: Categoria) -> Self {
        Self {
            id: c.id,
            nombre_categoria: c.nombre_categoria,
            tipo_categoria: c.tipo_categoria,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let dto = CategoriaResponseDto {
            id: 1,
            nombre_categoria: "Fruits".to_string(),
            tipo_categoria: "Food".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&dto).unwrap(),
            serde_json::json!({ "id": 1, "nombrecategoria": "Fruits", "tipocategoria": "Food" })
        );
    }

    #[test]
    fn test_request_ignores_id_field() {
        let dto: CategoriaDto = serde_json::from_value(serde_json::json!({
            "id": 77,
            "nombrecategoria": "Fruits",
            "tipocategoria": "Food"
        }))
        .unwrap();
        assert_eq!(dto.nombre_categoria, "Fruits");
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_empty_and_long_fields() {
        let empty = CategoriaDto {
            nombre_categoria: String::new(),
            tipo_categoria: "Food".to_string(),
        };
        assert!(empty.validate().is_err());

        let long = CategoriaDto {
            nombre_categoria: "Fruits".to_string(),
            tipo_categoria: "x".repeat(256),
        };
        assert!(long.validate().is_err());
    }
}
