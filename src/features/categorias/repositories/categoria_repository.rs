use async_trait::async_trait;
use sqlx::{Executor, PgPool};

use crate::features::categorias::models::{Categoria, NewCategoria};

/// Repository errors for database operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Categoria id {0} is already taken")]
    DuplicateId(i32),

    /// The database-assigned id already belongs to another row
    #[error("Categoria already exists")]
    UniqueViolation,

    #[error("{0} did not complete before the deadline")]
    Timeout(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// The fixed set of statements the categoria store executes.
///
/// Every statement is parameterized and runs as a persistent prepared
/// statement, so each pooled connection parses it once and reuses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoriaStatement {
    Get,
    List,
    Exists,
    Insert,
    InsertWithId,
    Update,
    Delete,
}

impl CategoriaStatement {
    pub const ALL: [CategoriaStatement; 7] = [
        CategoriaStatement::Get,
        CategoriaStatement::List,
        CategoriaStatement::Exists,
        CategoriaStatement::Insert,
        CategoriaStatement::InsertWithId,
        CategoriaStatement::Update,
        CategoriaStatement::Delete,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CategoriaStatement::Get => "get",
            CategoriaStatement::List => "list",
            CategoriaStatement::Exists => "exists",
            CategoriaStatement::Insert => "insert",
            CategoriaStatement::InsertWithId => "insert_with_id",
            CategoriaStatement::Update => "update",
            CategoriaStatement::Delete => "delete",
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            CategoriaStatement::Get => {
                r#"
                SELECT id, nombre_categoria, tipo_categoria
                FROM categorias
                WHERE id = $1
                "#
            }
            CategoriaStatement::List => {
                r#"
                SELECT id, nombre_categoria, tipo_categoria
                FROM categorias
                ORDER BY id ASC
                LIMIT $1 OFFSET $2
                "#
            }
            CategoriaStatement::Exists => {
                r#"
                SELECT EXISTS(SELECT 1 FROM categorias WHERE id = $1)
                "#
            }
            CategoriaStatement::Insert => {
                r#"
                INSERT INTO categorias (nombre_categoria, tipo_categoria)
                VALUES ($1, $2)
                RETURNING id, nombre_categoria, tipo_categoria
                "#
            }
            CategoriaStatement::InsertWithId => {
                r#"
                INSERT INTO categorias (id, nombre_categoria, tipo_categoria)
                VALUES ($1, $2, $3)
                RETURNING id, nombre_categoria, tipo_categoria
                "#
            }
            CategoriaStatement::Update => {
                r#"
                UPDATE categorias
                SET nombre_categoria = $1,
                    tipo_categoria = $2
                WHERE id = $3
                RETURNING id, nombre_categoria, tipo_categoria
                "#
            }
            CategoriaStatement::Delete => {
                r#"
                DELETE FROM categorias
                WHERE id = $1
                "#
            }
        }
    }
}

/// Trait defining categoria repository operations
#[async_trait]
pub trait CategoriaRepository: Send + Sync {
    /// Find a categoria by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Categoria>, RepositoryError>;

    /// List categorias ordered by id
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Categoria>, RepositoryError>;

    /// Check whether an id is already taken
    async fn exists(&self, id: i32) -> Result<bool, RepositoryError>;

    /// Insert with a database-assigned id
    async fn insert(&self, categoria: &NewCategoria) -> Result<Categoria, RepositoryError>;

    /// Insert with an application-assigned id
    async fn insert_with_id(
        &self,
        id: i32,
        categoria: &NewCategoria,
    ) -> Result<Categoria, RepositoryError>;

    /// Overwrite name and type; `None` when no row has this id
    async fn update(
        &self,
        id: i32,
        categoria: &NewCategoria,
    ) -> Result<Option<Categoria>, RepositoryError>;

    /// Delete by id, returning the number of rows removed
    async fn delete(&self, id: i32) -> Result<u64, RepositoryError>;
}

/// PostgreSQL implementation of CategoriaRepository
pub struct PgCategoriaRepository {
    pool: PgPool,
}

impl PgCategoriaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Prepare every statement once against a live connection.
    ///
    /// Fails fast at startup when the table does not match the statements.
    pub async fn prepare_statements(&self) -> Result<(), RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        for statement in CategoriaStatement::ALL {
            (&mut *conn).prepare(statement.sql()).await.map_err(|e| {
                tracing::error!("Failed to prepare {} statement: {:?}", statement.name(), e);
                e
            })?;
        }
        Ok(())
    }
}

fn map_insert_error(id: Option<i32>, e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return match id {
                Some(id) => RepositoryError::DuplicateId(id),
                None => RepositoryError::UniqueViolation,
            };
        }
    }
    RepositoryError::Database(e)
}

#[async_trait]
impl CategoriaRepository for PgCategoriaRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Categoria>, RepositoryError> {
        let categoria = sqlx::query_as::<_, Categoria>(CategoriaStatement::Get.sql())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(categoria)
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Categoria>, RepositoryError> {
        let categorias = sqlx::query_as::<_, Categoria>(CategoriaStatement::List.sql())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(categorias)
    }

    async fn exists(&self, id: i32) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(CategoriaStatement::Exists.sql())
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn insert(&self, categoria: &NewCategoria) -> Result<Categoria, RepositoryError> {
        sqlx::query_as::<_, Categoria>(CategoriaStatement::Insert.sql())
            .bind(&categoria.nombre_categoria)
            .bind(&categoria.tipo_categoria)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_insert_error(None, e))
    }

    async fn insert_with_id(
        &self,
        id: i32,
        categoria: &NewCategoria,
    ) -> Result<Categoria, RepositoryError> {
        sqlx::query_as::<_, Categoria>(CategoriaStatement::InsertWithId.sql())
            .bind(id)
            .bind(&categoria.nombre_categoria)
            .bind(&categoria.tipo_categoria)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_insert_error(Some(id), e))
    }

    async fn update(
        &self,
        id: i32,
        categoria: &NewCategoria,
    ) -> Result<Option<Categoria>, RepositoryError> {
        let updated = sqlx::query_as::<_, Categoria>(CategoriaStatement::Update.sql())
            .bind(&categoria.nombre_categoria)
            .bind(&categoria.tipo_categoria)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete(&self, id: i32) -> Result<u64, RepositoryError> {
        let result = sqlx::query(CategoriaStatement::Delete.sql())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
