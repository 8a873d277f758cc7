/// Default number of categorias returned by a list call
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum number of categorias returned by a list call
pub const MAX_PAGE_SIZE: i64 = 10;
