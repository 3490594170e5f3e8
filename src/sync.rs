//! Reflects the runtime's view of container addresses into the hosts file.
//!
//! One bad container never blocks the rest: inspection failures and
//! incomplete records become [`Inspection::Skipped`] and are carried in
//! the [`SyncReport`] instead of aborting the loop.  Only a failed
//! listing or hosts file I/O fails the whole run.

use log::{debug, info};

use crate::error::DtError;
use crate::hosts::{splice_block, HostsFile};
use crate::runtime::ContainerRuntime;
use crate::types::{HostEntry, SkipReason};

/// Result of inspecting one listed container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inspection {
    Entry(HostEntry),
    Skipped { id: String, reason: SkipReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A new block was written.
    Written,
    /// Nothing usable was found; the file, including any old block, was kept.
    LeftUntouched,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Entries in the order the runtime listed the containers.
    pub entries: Vec<HostEntry>,
    pub skipped: Vec<(String, SkipReason)>,
    pub outcome: Outcome,
}

async fn inspect_one(runtime: &dyn ContainerRuntime, id: String) -> Inspection {
    let record = match runtime.inspect(&id).await {
        Ok(record) => {
            debug!("Inspected {}: {:?} {:?}", record.id, record.name, record.ip);
            record
        }
        Err(e) => {
            return Inspection::Skipped {
                id,
                reason: SkipReason::InspectFailed(format!("{:#}", e)),
            }
        }
    };
    match HostEntry::try_from(record) {
        Ok(entry) => Inspection::Entry(entry),
        Err(reason) => Inspection::Skipped { id, reason },
    }
}

/// Rebuilds the generated block in `hosts` from every container the
/// runtime knows about.
pub async fn synchronize(
    runtime: &dyn ContainerRuntime,
    hosts: &HostsFile,
) -> Result<SyncReport, DtError> {
    let ids = runtime
        .list_container_ids()
        .await
        .map_err(DtError::RuntimeList)?;
    debug!("Runtime listed {} containers", ids.len());

    let mut entries = Vec::new();
    let mut skipped = Vec::new();
    for id in ids.into_iter().filter(|id| !id.is_empty()) {
        match inspect_one(runtime, id).await {
            Inspection::Entry(entry) => entries.push(entry),
            Inspection::Skipped { id, reason } => {
                debug!("Skipping container {}: {}", id, reason);
                skipped.push((id, reason));
            }
        }
    }

    if entries.is_empty() {
        info!(
            "No container addresses found, leaving {} untouched",
            hosts.path().display()
        );
        return Ok(SyncReport {
            entries,
            skipped,
            outcome: Outcome::LeftUntouched,
        });
    }

    let current = hosts.read()?;
    hosts.write(&splice_block(&current, &entries))?;
    info!(
        "Wrote {} entries to {}",
        entries.len(),
        hosts.path().display()
    );

    Ok(SyncReport {
        entries,
        skipped,
        outcome: Outcome::Written,
    })
}
