//! Where the CLI finds the shop's data.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use wip::bucket::ArchivePolicy;
use wip::WipService;
use wip_core::clock::parse_utc_offset;
use wip_core::{Clock, LocalClock, OffsetClock, ServiceConfig};

#[derive(Args, Debug)]
pub struct StoreArgs {
    /// Data directory holding wip.redb.
    #[arg(long = "data-dir", global = true, default_value = ".")]
    pub data_dir: PathBuf,

    /// Explicit redb path (overrides --data-dir).
    #[arg(long = "db", global = true)]
    pub db_path: Option<PathBuf>,

    /// Local hour from which yesterday's notes may be archived.
    #[arg(long = "archive-hour", global = true, default_value_t = 20)]
    pub archive_hour: u32,

    /// Shop wall-clock offset, e.g. -05:00. Host local time if unset.
    #[arg(long = "utc-offset", global = true)]
    pub utc_offset: Option<String>,

    /// Name recorded in the audit history.
    #[arg(long = "as", global = true, default_value = "cli")]
    pub actor: String,
}

impl StoreArgs {
    fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            data_dir: Some(self.data_dir.clone()),
            db_path: self.db_path.clone(),
            ..Default::default()
        }
    }

    fn clock(&self) -> anyhow::Result<Arc<dyn Clock>> {
        match self.utc_offset.as_deref() {
            Some(raw) => {
                let offset = parse_utc_offset(raw)
                    .ok_or_else(|| anyhow::anyhow!("--utc-offset '{}' is not +HH:MM or -HH:MM", raw))?;
                Ok(Arc::new(OffsetClock::new(offset)))
            }
            None => Ok(Arc::new(LocalClock)),
        }
    }

    /// Open the existing store. A missing file is an error, not a fresh store.
    pub fn open(&self) -> anyhow::Result<WipService> {
        if self.archive_hour > 23 {
            anyhow::bail!("--archive-hour must be 0-23, got {}", self.archive_hour);
        }
        let db_path = self.service_config().resolve_db_path();
        if !db_path.exists() {
            anyhow::bail!(
                "No document store at {}. Pass --data-dir or --db.",
                db_path.display()
            );
        }
        let kv: Arc<dyn wip_kv::KVStore> = Arc::new(
            wip_kv::RedbStore::open(&db_path)
                .map_err(|e| anyhow::anyhow!("failed to open {}: {}", db_path.display(), e))?,
        );
        Ok(WipService::new(kv, self.clock()?, ArchivePolicy::new(self.archive_hour)))
    }
}
