//! Categoria records: a name and a type tag stored in the `categorias` table.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/categorias?count&start` | List categorias (offset/limit) |
//! | POST | `/categoria` | Create a categoria |
//! | GET | `/categoria/{id}` | Get a categoria |
//! | PUT | `/categoria/{id}` | Replace a categoria's name and type |
//! | DELETE | `/categoria/{id}` | Delete a categoria |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgCategoriaRepository;
pub use services::CategoriaService;
