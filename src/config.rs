/// Parser configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum depth of nested expressions, statements and types
    pub max_nesting_depth: usize,
    /// Accept statements outside of any declaration
    pub allow_top_level_statements: bool,
    /// Stop recording diagnostics after this many errors
    pub max_errors: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_nesting_depth: 64,
            allow_top_level_statements: true,
            max_errors: None,
        }
    }
}
