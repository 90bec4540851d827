//! Application state shared by every user action

use crate::collectors::{host, platform};
use crate::config::{save_config, Config};
use crate::data::{HostProfile, OsFamily};
use crate::dialogs::Dialogs;
use crate::error::Result;
use crate::logging::UpdateLog;
use crate::software::SoftwareCheck;
use crate::updates::{Outcome, UpdateDispatcher};
use crate::utils::command::{is_elevated, CommandRunner, SystemRunner};
use std::path::{Path, PathBuf};

pub const CONSENT_PROMPT: &str = "Do you want to check for updates?";

pub struct App {
    family: OsFamily,
    config: Config,
    config_path: PathBuf,
    log: UpdateLog,
    runner: Box<dyn CommandRunner>,
    elevate_with: Option<String>,
}

impl App {
    pub fn new(family: OsFamily, config: Config, config_path: PathBuf, runner: Box<dyn CommandRunner>) -> Self {
        let log = UpdateLog::from_config(&config.logging);
        let elevate_with = Some(config.updates.elevate_with.trim())
            .filter(|helper| !helper.is_empty())
            .map(str::to_string);

        Self {
            family,
            config,
            config_path,
            log,
            runner,
            elevate_with,
        }
    }

    /// Build the app for the running host with real subprocesses
    pub fn detect(config: Config, config_path: PathBuf) -> Self {
        let family = platform::detect_os_family();
        tracing::debug!(%family, "detected operating system");

        let mut app = Self::new(family, config, config_path, Box::new(SystemRunner));
        if is_elevated() {
            app.elevate_with = None;
        }
        app
    }

    pub fn family(&self) -> &OsFamily {
        &self.family
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn log(&self) -> &UpdateLog {
        &self.log
    }

    pub fn hardware_info(&self) -> HostProfile {
        host::report()
    }

    /// "Check for Updates": ask for consent, then run the OS workflow
    pub fn check_updates(&self, dialogs: &mut dyn Dialogs) -> Outcome {
        let consent = dialogs.confirm(CONSENT_PROMPT);
        self.update_with_consent(consent, dialogs)
    }

    pub fn update_with_consent(&self, consent: bool, dialogs: &mut dyn Dialogs) -> Outcome {
        UpdateDispatcher::new(self.runner.as_ref(), &self.log, self.elevate_with.clone())
            .request_update(&self.family, consent, dialogs)
    }

    /// "Check Software Updates"
    pub fn check_software_updates(&self, dialogs: &mut dyn Dialogs) -> Outcome {
        SoftwareCheck::new(
            self.runner.as_ref(),
            &self.log,
            &self.config.inventory,
            self.config.versions.ordering,
        )
        .run(&self.family, dialogs)
    }

    /// "Choose Log Location": returns the new directory unless cancelled
    pub fn choose_log_location(&mut self, dialogs: &mut dyn Dialogs) -> Option<PathBuf> {
        let directory = dialogs.choose_directory()?;
        let message = match self.relocate_logs(&directory) {
            Ok(()) => format!("Log files will be saved in: {}", directory.display()),
            Err(err) => {
                self.log
                    .warning(&format!("Could not save log location setting: {}", err));
                format!(
                    "Log files will be saved in: {}\n(this setting could not be saved: {})",
                    directory.display(),
                    err
                )
            }
        };
        dialogs.show("Log Location Updated", &message);
        Some(directory)
    }

    /// Send future log records to `directory` and remember it for next time
    pub fn relocate_logs(&mut self, directory: &Path) -> Result<()> {
        self.log.relocate(directory);
        self.config.logging.directory = Some(directory.display().to_string());
        save_config(&self.config_path, &self.config)
    }
}
