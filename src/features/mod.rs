pub mod categorias;
