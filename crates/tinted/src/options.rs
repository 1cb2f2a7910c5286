//! Compile settings loadable from configuration files.
//!
//! ```rust
//! use tinted::CompileOptions;
//!
//! let options = CompileOptions::from_yaml("left_delim: '<'\nright_delim: '>'\n").unwrap();
//! let mut style = options.compiler().compile("<bold>hi").unwrap();
//! assert_eq!(style.execute_to_string(&()).unwrap(), "\x1b[1mhi");
//! ```

use serde::{Deserialize, Serialize};

use crate::compiler::{Compiler, DEFAULT_LEFT_DELIM, DEFAULT_RIGHT_DELIM};
use crate::error::{Error, Result};

/// Settings applied when compiling a style.
///
/// Missing fields take their defaults, so an empty document is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Opening action delimiter. Defaults to `{`.
    pub left_delim: String,
    /// Closing action delimiter. Defaults to `}`.
    pub right_delim: String,
    /// Suppress every escape sequence while still tracking colors.
    pub no_colors: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            left_delim: DEFAULT_LEFT_DELIM.to_string(),
            right_delim: DEFAULT_RIGHT_DELIM.to_string(),
            no_colors: false,
        }
    }
}

impl CompileOptions {
    /// Parses options from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::Options)
    }

    /// A [`Compiler`] configured with these options and no extensions.
    pub fn compiler(&self) -> Compiler {
        Compiler::new()
            .left_delim(self.left_delim.as_str())
            .right_delim(self.right_delim.as_str())
            .no_colors(self.no_colors)
    }
}
