//! Installed software update check
//!
//! Scans the installed programs, looks up the newest version of each and
//! reports the ones that are behind. Any failure ends the check with a single
//! error record; no partial results are shown.

use crate::collectors::packages;
use crate::config::{InventoryConfig, VersionOrdering};
use crate::data::{Inventory, OsFamily, SoftwareStatus};
use crate::dialogs::Dialogs;
use crate::error::{PatchnovaError, Result};
use crate::logging::UpdateLog;
use crate::updates::Outcome;
use crate::utils::command::CommandRunner;
use crate::versions::{is_newer, OutdatedFormat, OutdatedIndex, VersionSource};

const TITLE: &str = "Software Update";

/// Compare every installed program against the source's newest version
pub fn compare_inventory(
    inventory: &Inventory,
    source: &dyn VersionSource,
    ordering: VersionOrdering,
) -> Vec<SoftwareStatus> {
    inventory
        .iter()
        .map(|(name, installed)| {
            let available = source
                .latest(name)
                .filter(|latest| is_newer(ordering, installed, latest));
            SoftwareStatus {
                name: name.clone(),
                installed: installed.clone(),
                available,
            }
        })
        .collect()
}

pub struct SoftwareCheck<'a> {
    runner: &'a dyn CommandRunner,
    log: &'a UpdateLog,
    inventory: &'a InventoryConfig,
    ordering: VersionOrdering,
}

impl<'a> SoftwareCheck<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        log: &'a UpdateLog,
        inventory: &'a InventoryConfig,
        ordering: VersionOrdering,
    ) -> Self {
        Self {
            runner,
            log,
            inventory,
            ordering,
        }
    }

    pub fn run(&self, family: &OsFamily, dialogs: &mut dyn Dialogs) -> Outcome {
        match self.collect(family) {
            Ok(statuses) => {
                let summary = summarize(&statuses);
                self.log.info(&summary);
                dialogs.show(TITLE, &render_statuses(&statuses));
                Outcome::Completed { summary }
            }
            Err(PatchnovaError::UnsupportedOs(os)) => {
                let message = format!("Unsupported operating system: {}", os);
                self.log.warning(&message);
                dialogs.show(TITLE, &message);
                Outcome::Unsupported { message }
            }
            Err(err) => {
                let message = format!("Error checking software updates: {}", err);
                self.log.error(&message);
                dialogs.show(TITLE, &message);
                Outcome::Failed { message }
            }
        }
    }

    fn collect(&self, family: &OsFamily) -> Result<Vec<SoftwareStatus>> {
        let format = OutdatedFormat::for_family(family)?;
        let inventory = packages::scan(family, self.inventory, self.runner)?;
        let source = OutdatedIndex::query(format, self.runner)?;
        Ok(compare_inventory(&inventory, &source, self.ordering))
    }
}

fn summarize(statuses: &[SoftwareStatus]) -> String {
    let outdated: Vec<&str> = statuses
        .iter()
        .filter(|s| s.has_update())
        .map(|s| s.name.as_str())
        .collect();

    if outdated.is_empty() {
        format!("Software update check: all {} programs are up to date", statuses.len())
    } else {
        format!(
            "Software update check: {} of {} programs have updates ({})",
            outdated.len(),
            statuses.len(),
            outdated.join(", ")
        )
    }
}

fn render_statuses(statuses: &[SoftwareStatus]) -> String {
    let lines: Vec<String> = statuses
        .iter()
        .filter_map(|s| {
            s.available
                .as_ref()
                .map(|latest| format!("Update available for {}: {} -> {}", s.name, s.installed, latest))
        })
        .collect();

    if lines.is_empty() {
        format!("All {} programs are up to date.", statuses.len())
    } else {
        lines.join("\n")
    }
}
