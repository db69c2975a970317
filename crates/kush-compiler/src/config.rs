//! Front end options.
//!
//! Deserialized from the `[frontend]` table of `kush.toml`; every field has a
//! default so an empty or missing table is valid.

use serde::{Deserialize, Serialize};

/// Options shared by the parser, the analyzer and the compiler driver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FrontendConfig {
    /// Maximum nesting of blocks and parenthesized expressions before the
    /// parser gives up (default: 256)
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,

    /// Close statement-level scopes once their block has been analyzed
    /// (default: true)
    #[serde(default = "default_true")]
    pub close_local_scopes: bool,

    /// Run the analyzer on trees that contain syntax errors (default: true)
    #[serde(default = "default_true")]
    pub analyze_with_syntax_errors: bool,

    /// Name of the entry function (default: "main")
    #[serde(default = "default_main_function")]
    pub main_function: String,
}

fn default_max_nesting_depth() -> usize {
    256
}

fn default_true() -> bool {
    true
}

fn default_main_function() -> String {
    "main".to_string()
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: default_max_nesting_depth(),
            close_local_scopes: true,
            analyze_with_syntax_errors: true,
            main_function: default_main_function(),
        }
    }
}

impl FrontendConfig {
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn with_close_local_scopes(mut self, close: bool) -> Self {
        self.close_local_scopes = close;
        self
    }

    pub fn with_main_function(mut self, name: impl Into<String>) -> Self {
        self.main_function = name.into();
        self
    }
}
