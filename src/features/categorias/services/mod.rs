pub mod categoria_service;

pub use categoria_service::{CategoriaService, IdStrategy};
