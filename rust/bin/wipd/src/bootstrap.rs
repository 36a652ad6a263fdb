//! Bootstrap: config checks, storage, and the startup note sweep.
//!
//! When wipd starts:
//! 1. Verify the config. Refuse to start on a bad hour or offset.
//! 2. Open the redb store and build the service on the shop's clock.
//! 3. Run one shift-note archive pass (a no-op before the archive hour).

use std::sync::Arc;

use tracing::{info, warn};
use wip::bucket::ArchivePolicy;
use wip::WipService;
use wip_core::clock::parse_utc_offset;
use wip_core::{Clock, LocalClock, OffsetClock, ServiceConfig};

use crate::config::{ServerConfig, ShiftConfig};

/// Actor recorded on audit entries written by the server itself.
pub const SYSTEM_ACTOR: &str = "system";

/// Verify server configuration is usable.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.storage.data_dir.trim().is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    if config.shift.archive_hour > 23 {
        anyhow::bail!(
            "shift.archive_hour must be 0-23, got {}.",
            config.shift.archive_hour
        );
    }
    if let Some(offset) = &config.shift.utc_offset {
        if parse_utc_offset(offset).is_none() {
            anyhow::bail!("shift.utc_offset '{}' is not +HH:MM or -HH:MM.", offset);
        }
    }
    Ok(())
}

/// The shop's wall clock: a fixed offset if configured, otherwise host local time.
pub fn shop_clock(shift: &ShiftConfig) -> anyhow::Result<Arc<dyn Clock>> {
    match shift.utc_offset.as_deref() {
        Some(raw) => {
            let offset = parse_utc_offset(raw)
                .ok_or_else(|| anyhow::anyhow!("invalid utc_offset '{}'", raw))?;
            info!(offset = %offset, "Using fixed UTC offset for shop clock");
            Ok(Arc::new(OffsetClock::new(offset)))
        }
        None => Ok(Arc::new(LocalClock)),
    }
}

/// Open the document store and build the WIP service.
pub fn open_service(
    core: &ServiceConfig,
    shift: &ShiftConfig,
) -> anyhow::Result<Arc<WipService>> {
    let db_path = core.resolve_db_path();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let kv: Arc<dyn wip_kv::KVStore> = Arc::new(
        wip_kv::RedbStore::open(&db_path)
            .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?,
    );
    info!("Opened document store at {}", db_path.display());

    let clock = shop_clock(shift)?;
    Ok(Arc::new(WipService::new(
        kv,
        clock,
        ArchivePolicy::new(shift.archive_hour),
    )))
}

/// Archive yesterday's shift notes if the archive hour has passed.
///
/// Failures are logged; the server still starts.
pub fn startup_archive(svc: &WipService) {
    match svc.archive_notes(SYSTEM_ACTOR) {
        Ok(outcome) => info!(archived = outcome.archived, "Startup note archive: {}", outcome.message),
        Err(e) => warn!("Startup note archive failed: {}", e),
    }
}
