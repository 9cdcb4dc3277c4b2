//! Output directory and commit automation settings.

use serde::{Deserialize, Serialize};

fn default_dir() -> String {
    "data".to_owned()
}

fn default_commit_message() -> String {
    "granary: harvest snapshot".to_owned()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory receiving `crates.txt`, `categories.txt`, `keywords.txt`,
    /// and `time.json`.
    #[serde(default = "default_dir")]
    pub dir: String,

    /// Whether to git-commit the output directory after a harvest.
    #[serde(default)]
    pub auto_commit: bool,

    /// Commit message used when committing.
    #[serde(default = "default_commit_message")]
    pub commit_message: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            auto_commit: false,
            commit_message: default_commit_message(),
        }
    }
}
