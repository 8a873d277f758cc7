use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use crate::core::error::{AppError, Result};
use crate::features::categorias::dtos::CategoriaResponseDto;
use crate::features::categorias::models::{Categoria, NewCategoria};
use crate::features::categorias::repositories::{CategoriaRepository, RepositoryError};
use crate::shared::constants::MAX_PAGE_SIZE;

/// How a new categoria gets its id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    /// The database assigns the id (`SERIAL`)
    Database,
    /// The service draws a random id from `[0, range_max)`, re-drawing on
    /// collision at most `max_attempts` times
    Random { range_max: i32, max_attempts: u32 },
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::DuplicateId(id) => {
                AppError::Conflict(format!("Categoria with id {} already exists", id))
            }
            RepositoryError::UniqueViolation => {
                AppError::Conflict("Categoria already exists".to_string())
            }
            RepositoryError::Timeout(operation) => AppError::Timeout(format!(
                "Categoria {} did not complete in time",
                operation
            )),
            RepositoryError::Database(e) => AppError::Database(e),
        }
    }
}

/// Service for categoria operations
pub struct CategoriaService {
    repository: Arc<dyn CategoriaRepository>,
    id_strategy: IdStrategy,
    deadline: Duration,
}

impl std::fmt::Debug for CategoriaService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoriaService")
            .field("repository", &"<CategoriaRepository>")
            .field("id_strategy", &self.id_strategy)
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl CategoriaService {
    pub fn new(
        repository: Arc<dyn CategoriaRepository>,
        id_strategy: IdStrategy,
        deadline: Duration,
    ) -> Self {
        Self {
            repository,
            id_strategy,
            deadline,
        }
    }

    /// Run a repository call under the per-operation deadline
    async fn run<T, F>(
        &self,
        operation: &'static str,
        fut: F,
    ) -> std::result::Result<T, RepositoryError>
    where
        F: Future<Output = std::result::Result<T, RepositoryError>>,
    {
        match tokio::time::timeout(self.deadline, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    "Categoria {} exceeded deadline of {:?}",
                    operation,
                    self.deadline
                );
                Err(RepositoryError::Timeout(operation))
            }
        }
    }

    /// List categorias ordered by id
    ///
    /// `limit` is clamped to `[1, MAX_PAGE_SIZE]` and `offset` to `>= 0`.
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<CategoriaResponseDto>> {
        let offset = offset.max(0);
        let limit = limit.clamp(1, MAX_PAGE_SIZE);

        let categorias = self
            .run("list", self.repository.list(offset, limit))
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categorias: {:?}", e);
                AppError::from(e)
            })?;

        Ok(categorias.into_iter().map(|c| c.into()).collect())
    }

    /// Get categoria by ID
    pub async fn get(&self, id: i32) -> Result<CategoriaResponseDto> {
        self.run("get", self.repository.find_by_id(id))
            .await
            .map_err(|e| {
                tracing::error!("Failed to get categoria {}: {:?}", id, e);
                AppError::from(e)
            })?
            .map(|c| c.into())
            .ok_or_else(not_found)
    }

    /// Create a new categoria, allocating its id per the configured strategy
    pub async fn create(&self, categoria: NewCategoria) -> Result<CategoriaResponseDto> {
        let created = match self.id_strategy {
            IdStrategy::Database => self
                .run("insert", self.repository.insert(&categoria))
                .await
                .map_err(|e| {
                    tracing::error!("Failed to create categoria: {:?}", e);
                    AppError::from(e)
                })?,
            IdStrategy::Random {
                range_max,
                max_attempts,
            } => {
                self.create_with_random_id(&categoria, range_max, max_attempts)
                    .await?
            }
        };

        tracing::info!(
            "Categoria created: id={}, nombre={:?}",
            created.id,
            created.nombre_categoria
        );

        Ok(created.into())
    }

    async fn create_with_random_id(
        &self,
        categoria: &NewCategoria,
        range_max: i32,
        max_attempts: u32,
    ) -> Result<Categoria> {
        if range_max < 1 {
            return Err(AppError::IdSpaceExhausted(format!(
                "Categoria id range [0, {}) is empty",
                range_max
            )));
        }

        for attempt in 1..=max_attempts {
            let candidate = rand::thread_rng().gen_range(0..range_max);

            let taken = self
                .run("exists", self.repository.exists(candidate))
                .await
                .map_err(|e| {
                    tracing::error!("Failed to check categoria id {}: {:?}", candidate, e);
                    AppError::from(e)
                })?;
            if taken {
                tracing::debug!("Categoria id {} taken (attempt {})", candidate, attempt);
                continue;
            }

            match self
                .run(
                    "insert_with_id",
                    self.repository.insert_with_id(candidate, categoria),
                )
                .await
            {
                Ok(created) => return Ok(created),
                // A concurrent create claimed the id between the check and the insert
                Err(RepositoryError::DuplicateId(_)) => {
                    tracing::debug!(
                        "Categoria id {} claimed concurrently (attempt {})",
                        candidate,
                        attempt
                    );
                    continue;
                }
                Err(e) => {
                    tracing::error!("Failed to create categoria: {:?}", e);
                    return Err(e.into());
                }
            }
        }

        Err(AppError::IdSpaceExhausted(format!(
            "No free categoria id in [0, {}) after {} attempts",
            range_max, max_attempts
        )))
    }

    /// Overwrite name and type of an existing categoria
    pub async fn update(&self, id: i32, categoria: NewCategoria) -> Result<CategoriaResponseDto> {
        self.run("update", self.repository.update(id, &categoria))
            .await
            .map_err(|e| {
                tracing::error!("Failed to update categoria {}: {:?}", id, e);
                AppError::from(e)
            })?
            .map(|c| c.into())
            .ok_or_else(not_found)
    }

    /// Delete a categoria
    pub async fn delete(&self, id: i32) -> Result<()> {
        let deleted = self
            .run("delete", self.repository.delete(id))
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete categoria {}: {:?}", id, e);
                AppError::from(e)
            })?;

        if deleted == 0 {
            return Err(not_found());
        }

        tracing::info!("Categoria deleted: id={}", id);
        Ok(())
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Categoria not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{new_categoria, InMemoryCategoriaRepository};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use tokio_test::{assert_err, assert_ok};

    const DEADLINE: Duration = Duration::from_secs(5);

    fn service(repository: Arc<dyn CategoriaRepository>, strategy: IdStrategy) -> CategoriaService {
        CategoriaService::new(repository, strategy, DEADLINE)
    }

    fn database_service() -> CategoriaService {
        service(
            Arc::new(InMemoryCategoriaRepository::new()),
            IdStrategy::Database,
        )
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_record() {
        let service = database_service();
        let created = assert_ok!(service.create(new_categoria("Fruits", "Food")).await);
        let fetched = assert_ok!(service.get(created.id).await);
        assert_eq!(created, fetched);
        assert_eq!(fetched.nombre_categoria, "Fruits");
        assert_eq!(fetched.tipo_categoria, "Food");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let service = database_service();
        let err = assert_err!(service.get(9999).await);
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Categoria not found"));
    }

    #[tokio::test]
    async fn test_update_preserves_id() {
        let service = database_service();
        let created = assert_ok!(service.create(new_categoria("Fruits", "Food")).await);
        let updated = assert_ok!(
            service
                .update(created.id, new_categoria("Tools", "Hardware"))
                .await
        );
        assert_eq!(updated.id, created.id);

        let fetched = assert_ok!(service.get(created.id).await);
        assert_eq!(fetched, updated);
        assert_eq!(fetched.nombre_categoria, "Tools");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let service = database_service();
        let err = assert_err!(service.update(42, new_categoria("a", "b")).await);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let service = database_service();
        let created = assert_ok!(service.create(new_categoria("Fruits", "Food")).await);
        assert_ok!(service.delete(created.id).await);
        assert!(matches!(
            service.get(created.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(created.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_clamps_and_orders_by_id() {
        let service = database_service();
        for i in 0..15 {
            assert_ok!(service.create(new_categoria(&format!("c{}", i), "t")).await);
        }

        let page = assert_ok!(service.list(0, 50).await);
        assert_eq!(page.len(), 10);
        assert!(page.windows(2).all(|w| w[0].id < w[1].id));

        let tail = assert_ok!(service.list(12, 10).await);
        assert_eq!(tail.len(), 3);
        assert_eq!(tail[0].nombre_categoria, "c12");

        let clamped_low = assert_ok!(service.list(-3, 0).await);
        assert_eq!(clamped_low.len(), 1);
        assert_eq!(clamped_low[0].nombre_categoria, "c0");

        assert_eq!(page, assert_ok!(service.list(0, 10).await));
        assert!(assert_ok!(service.list(100, 10).await).is_empty());
    }

    #[tokio::test]
    async fn test_random_ids_are_unique_and_in_range() {
        let service = service(
            Arc::new(InMemoryCategoriaRepository::new()),
            IdStrategy::Random {
                range_max: 1000,
                max_attempts: 64,
            },
        );

        let mut ids = HashSet::new();
        for i in 0..50 {
            let created = assert_ok!(service.create(new_categoria(&format!("c{}", i), "t")).await);
            assert!((0..1000).contains(&created.id));
            assert!(ids.insert(created.id), "duplicate id {}", created.id);
        }
    }

    #[tokio::test]
    async fn test_random_ids_exhausted_when_range_is_full() {
        let service = service(
            Arc::new(InMemoryCategoriaRepository::new()),
            IdStrategy::Random {
                range_max: 2,
                max_attempts: 8,
            },
        );

        // Two slots; fill them, retrying until the random draws cover both
        let mut filled = HashSet::new();
        while filled.len() < 2 {
            if let Ok(created) = service.create(new_categoria("x", "y")).await {
                filled.insert(created.id);
            }
        }

        let err = assert_err!(service.create(new_categoria("z", "w")).await);
        assert!(matches!(err, AppError::IdSpaceExhausted(_)));
    }

    /// Reports every id as free so that collisions only surface at insert time
    struct RacingRepository(InMemoryCategoriaRepository);

    #[async_trait]
    impl CategoriaRepository for RacingRepository {
        async fn find_by_id(
            &self,
            id: i32,
        ) -> std::result::Result<Option<Categoria>, RepositoryError> {
            self.0.find_by_id(id).await
        }
        async fn list(
            &self,
            offset: i64,
            limit: i64,
        ) -> std::result::Result<Vec<Categoria>, RepositoryError> {
            self.0.list(offset, limit).await
        }
        async fn exists(&self, _id: i32) -> std::result::Result<bool, RepositoryError> {
            Ok(false)
        }
        async fn insert(
            &self,
            c: &NewCategoria,
        ) -> std::result::Result<Categoria, RepositoryError> {
            self.0.insert(c).await
        }
        async fn insert_with_id(
            &self,
            id: i32,
            c: &NewCategoria,
        ) -> std::result::Result<Categoria, RepositoryError> {
            self.0.insert_with_id(id, c).await
        }
        async fn update(
            &self,
            id: i32,
            c: &NewCategoria,
        ) -> std::result::Result<Option<Categoria>, RepositoryError> {
            self.0.update(id, c).await
        }
        async fn delete(&self, id: i32) -> std::result::Result<u64, RepositoryError> {
            self.0.delete(id).await
        }
    }

    #[tokio::test]
    async fn test_insert_conflict_is_treated_as_collision() {
        let inner = InMemoryCategoriaRepository::new();
        assert_ok!(inner.insert_with_id(0, &new_categoria("taken", "t")).await);

        let service = service(
            Arc::new(RacingRepository(inner)),
            IdStrategy::Random {
                range_max: 1,
                max_attempts: 3,
            },
        );

        let err = assert_err!(service.create(new_categoria("late", "t")).await);
        assert!(matches!(err, AppError::IdSpaceExhausted(_)));
    }

    #[tokio::test]
    async fn test_database_id_collision_is_conflict() {
        let repository = InMemoryCategoriaRepository::new();
        // A row written under the random strategy sits where the sequence goes next
        assert_ok!(repository.insert_with_id(1, &new_categoria("random", "t")).await);
        let service = service(Arc::new(repository), IdStrategy::Database);

        let err = assert_err!(service.create(new_categoria("serial", "t")).await);
        assert!(matches!(err, AppError::Conflict(ref m) if m == "Categoria already exists"));
        assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);

        // The sequence value was consumed, so the next create gets a fresh id
        let created = assert_ok!(service.create(new_categoria("serial", "t")).await);
        assert_eq!(created.id, 2);
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let service = service(
            Arc::new(InMemoryCategoriaRepository::failing()),
            IdStrategy::Database,
        );
        assert!(matches!(service.list(0, 10).await, Err(AppError::Database(_))));
        assert!(matches!(service.get(1).await, Err(AppError::Database(_))));
        assert!(matches!(
            service.create(new_categoria("a", "b")).await,
            Err(AppError::Database(_))
        ));
        assert!(matches!(service.delete(1).await, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_slow_store_hits_deadline() {
        let service = CategoriaService::new(
            Arc::new(InMemoryCategoriaRepository::with_latency(Duration::from_millis(200))),
            IdStrategy::Database,
            Duration::from_millis(10),
        );
        let err = assert_err!(service.list(0, 10).await);
        assert!(matches!(err, AppError::Timeout(_)));
    }
}
