use sqlx::FromRow;

/// Database model for categoria
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Categoria {
    pub id: i32,
    pub nombre_categoria: String,
    pub tipo_categoria: String,
}

/// Mutable fields of a categoria, used for inserts and full updates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategoria {
    pub nombre_categoria: String,
    pub tipo_categoria: String,
}
