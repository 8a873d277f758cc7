#[cfg(test)]
use crate::features::categorias::models::{Categoria, NewCategoria};
#[cfg(test)]
use crate::features::categorias::repositories::{CategoriaRepository, RepositoryError};

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use std::collections::BTreeMap;
#[cfg(test)]
use std::sync::Mutex;
#[cfg(test)]
use std::time::Duration;

#[cfg(test)]
pub fn new_categoria(nombre: &str, tipo: &str) -> NewCategoria {
    NewCategoria {
        nombre_categoria: nombre.to_string(),
        tipo_categoria: tipo.to_string(),
    }
}

#[cfg(test)]
pub fn categoria_with_id(id: i32, categoria: &NewCategoria) -> Categoria {
    Categoria {
        id,
        nombre_categoria: categoria.nombre_categoria.clone(),
        tipo_categoria: categoria.tipo_categoria.clone(),
    }
}

/// In-memory CategoriaRepository with SERIAL-like id assignment
#[cfg(test)]
pub struct InMemoryCategoriaRepository {
    rows: Mutex<BTreeMap<i32, Categoria>>,
    next_id: Mutex<i32>,
    should_fail: bool,
    latency: Option<Duration>,
}

#[cfg(test)]
impl InMemoryCategoriaRepository {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            next_id: Mutex::new(1),
            should_fail: false,
            latency: None,
        }
    }

    /// Every call fails with a database error
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    /// Every call sleeps before answering
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::new()
        }
    }

    async fn enter(&self) -> Result<(), RepositoryError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.should_fail {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[cfg(test)]
#[async_trait]
impl CategoriaRepository for InMemoryCategoriaRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Categoria>, RepositoryError> {
        self.enter().await?;
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Categoria>, RepositoryError> {
        self.enter().await?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn exists(&self, id: i32) -> Result<bool, RepositoryError> {
        self.enter().await?;
        Ok(self.rows.lock().unwrap().contains_key(&id))
    }

    async fn insert(&self, categoria: &NewCategoria) -> Result<Categoria, RepositoryError> {
        self.enter().await?;
        let mut rows = self.rows.lock().unwrap();
        let mut next_id = self.next_id.lock().unwrap();
        // Like a SERIAL sequence, the value is consumed even when the insert fails
        let id = *next_id;
        *next_id += 1;
        if rows.contains_key(&id) {
            return Err(RepositoryError::UniqueViolation);
        }
        let created = categoria_with_id(id, categoria);
        rows.insert(id, created.clone());
        Ok(created)
    }

    async fn insert_with_id(
        &self,
        id: i32,
        categoria: &NewCategoria,
    ) -> Result<Categoria, RepositoryError> {
        self.enter().await?;
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&id) {
            return Err(RepositoryError::DuplicateId(id));
        }
        let created = categoria_with_id(id, categoria);
        rows.insert(id, created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: i32,
        categoria: &NewCategoria,
    ) -> Result<Option<Categoria>, RepositoryError> {
        self.enter().await?;
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.get_mut(&id).map(|row| {
            *row = categoria_with_id(id, categoria);
            row.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<u64, RepositoryError> {
        self.enter().await?;
        Ok(self.rows.lock().unwrap().remove(&id).map_or(0, |_| 1))
    }
}
