//! Operating system update dispatch
//!
//! Each OS family maps to one fixed update workflow. Subprocess failures are
//! caught here: they are logged, shown to the user and reported as
//! [`Outcome::Failed`], never propagated as a crash.

use crate::data::{LinuxDistro, OsFamily};
use crate::dialogs::Dialogs;
use crate::logging::UpdateLog;
use crate::utils::command::{CommandRunner, CommandSpec};

/// What happens when a step in a plan fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPolicy {
    /// Attempt every step regardless of earlier failures
    RunAll,
    /// Stop at the first failure, like a `&&` chain
    StopOnFailure,
}

/// A resolved update workflow for one host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePlan {
    pub steps: Vec<CommandSpec>,
    pub policy: StepPolicy,
    /// Informational dialog shown before the first step runs
    pub notice: Option<String>,
    /// History entry written when every step succeeds
    pub completed: String,
}

impl UpdatePlan {
    /// The steps as one shell-style command line
    pub fn command_line(&self) -> String {
        self.steps
            .iter()
            .map(CommandSpec::to_string)
            .collect::<Vec<_>>()
            .join(" && ")
    }
}

/// The resolution of a host to an update workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Plan(UpdatePlan),
    Unsupported { title: String, message: String },
}

/// Result of one "Check for Updates" action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Cancelled,
    Completed { summary: String },
    Unsupported { message: String },
    Failed { message: String },
}

/// Map a host to its update workflow. `elevate_with` prefixes the Linux
/// package-manager commands.
pub fn resolve(family: &OsFamily, elevate_with: Option<&str>) -> Dispatch {
    match family {
        OsFamily::Windows => Dispatch::Plan(UpdatePlan {
            steps: vec![
                CommandSpec::new("powershell", ["Install-Module PSWindowsUpdate -Force -AllowClobber"]),
                CommandSpec::new("powershell", ["Get-WindowsUpdate -Install -AcceptAll"]),
            ],
            policy: StepPolicy::RunAll,
            notice: None,
            completed: "Windows Update checked".to_string(),
        }),
        OsFamily::MacOs => Dispatch::Plan(UpdatePlan {
            steps: vec![CommandSpec::new("softwareupdate", ["-i", "-a"])],
            policy: StepPolicy::StopOnFailure,
            notice: None,
            completed: "macOS Update checked".to_string(),
        }),
        OsFamily::Linux(distro) => linux_plan(distro, elevate_with),
        OsFamily::Other(_) => Dispatch::Unsupported {
            title: "Unsupported System".to_string(),
            message: "Updates are not supported for the current operating system.".to_string(),
        },
    }
}

fn linux_plan(distro: &LinuxDistro, elevate_with: Option<&str>) -> Dispatch {
    let steps = match distro {
        LinuxDistro::Apt { .. } => vec![
            CommandSpec::new("apt-get", ["update"]),
            CommandSpec::new("apt-get", ["upgrade", "-y"]),
        ],
        LinuxDistro::Dnf { .. } => vec![CommandSpec::new("dnf", ["update", "-y"])],
        LinuxDistro::Pacman { .. } => vec![CommandSpec::new("pacman", ["-Syu"])],
        LinuxDistro::Unknown { .. } => {
            return Dispatch::Unsupported {
                title: "Linux Update Information".to_string(),
                message: "Your Linux distribution is not supported for automatic updates."
                    .to_string(),
            }
        }
    };

    let mut plan = UpdatePlan {
        steps: steps
            .into_iter()
            .map(|step| step.elevated(elevate_with))
            .collect(),
        policy: StepPolicy::StopOnFailure,
        notice: None,
        completed: format!("Linux update completed for {}", distro.id()),
    };
    plan.notice = Some(format!(
        "For your system ({}), use the following command to update:\n{}",
        distro.id(),
        plan.command_line()
    ));
    Dispatch::Plan(plan)
}

/// Runs update workflows and records one log entry per outcome
pub struct UpdateDispatcher<'a> {
    runner: &'a dyn CommandRunner,
    log: &'a UpdateLog,
    elevate_with: Option<String>,
}

impl<'a> UpdateDispatcher<'a> {
    pub fn new(runner: &'a dyn CommandRunner, log: &'a UpdateLog, elevate_with: Option<String>) -> Self {
        Self {
            runner,
            log,
            elevate_with,
        }
    }

    pub fn request_update(&self, family: &OsFamily, consent: bool, dialogs: &mut dyn Dialogs) -> Outcome {
        if !consent {
            tracing::debug!("update declined");
            return Outcome::Cancelled;
        }

        let plan = match resolve(family, self.elevate_with.as_deref()) {
            Dispatch::Plan(plan) => plan,
            Dispatch::Unsupported { title, message } => {
                self.log
                    .warning(&format!("Automatic updates not supported for {}", family));
                dialogs.show(&title, &message);
                return Outcome::Unsupported { message };
            }
        };

        if let Some(notice) = &plan.notice {
            dialogs.show("Update Information", notice);
        }

        let failures = self.execute(&plan);
        if failures.is_empty() {
            self.log.info(&plan.completed);
            dialogs.show("Update Complete", &plan.completed);
            Outcome::Completed {
                summary: plan.completed,
            }
        } else {
            let message = failures.join("\n");
            self.log.error(&format!("Update failed: {}", failures.join("; ")));
            dialogs.show("Update Failed", &message);
            Outcome::Failed { message }
        }
    }

    fn execute(&self, plan: &UpdatePlan) -> Vec<String> {
        let mut failures = Vec::new();
        for step in &plan.steps {
            if let Err(err) = self.runner.run(step) {
                tracing::debug!(command = %step, error = %err, "update step failed");
                failures.push(err.to_string());
                if plan.policy == StepPolicy::StopOnFailure {
                    break;
                }
            }
        }
        failures
    }
}
