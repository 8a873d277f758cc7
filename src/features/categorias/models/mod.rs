pub mod categoria;

pub use categoria::{Categoria, NewCategoria};
