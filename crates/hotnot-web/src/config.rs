//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::Parser;
use hotnot_board::BoardConfig;

/// hotnot web: a shared markdown board ranked by sentiment.
#[derive(Debug, Clone, Parser)]
#[command(name = "hotnot-web")]
pub struct Config {
    /// HTTP listen address.
    #[arg(long, env = "HOTNOT_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: String,

    /// Directory holding topics, comments and assessments.
    #[arg(long, env = "HOTNOT_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory for the identity audit mapping.
    #[arg(long, env = "HOTNOT_USERS_DIR", default_value = "users")]
    pub users_dir: PathBuf,

    /// Directory served under /images (reaction pictures).
    #[arg(long, env = "HOTNOT_IMAGES_DIR", default_value = "images")]
    pub images_dir: PathBuf,
}

impl Config {
    pub fn board_config(&self) -> BoardConfig {
        BoardConfig::new(&self.data_dir).with_users_dir(&self.users_dir)
    }
}
