pub mod categoria_dto;

pub use categoria_dto::{CategoriaDto, CategoriaResponseDto};
