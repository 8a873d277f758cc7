use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating the `{id}` path segment of categoria routes
    /// Must be one or more ASCII digits
    /// - Valid: "0", "42", "007"
    /// - Invalid: "abc", "-1", "1.5", "", " 1"
    pub static ref CATEGORIA_ID_REGEX: Regex = Regex::new(r"^[0-9]+$").unwrap();
}
