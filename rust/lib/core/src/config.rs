use std::path::PathBuf;

/// Storage and listen settings shared by the server and the CLI.
///
/// Both binaries build this from their own flags or config file, then pass
/// it to storage initialization.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding the document store.
    pub data_dir: Option<PathBuf>,

    /// Path to the redb database file.
    /// Defaults to `{data_dir}/wip.redb` if not specified.
    pub db_path: Option<PathBuf>,

    /// Listen address for the HTTP server.
    pub listen: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_path: None,
            listen: "0.0.0.0:3001".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Resolve the redb database path, falling back to `{data_dir}/wip.redb`.
    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("wip.redb"))
    }

    fn resolve_data_subpath(&self, name: &str) -> PathBuf {
        self.data_dir
            .as_ref()
            .map(|d| d.join(name))
            .unwrap_or_else(|| PathBuf::from(name))
    }
}
