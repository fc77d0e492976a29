//! Host operations the installer shells out for.
//!
//! Everything that needs root or a live init system goes through [`HostOps`],
//! so the install sequence can run against a fake in tests. [`SystemHost`] is
//! the real implementation and runs the commands named in [`HostCommands`].

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use log::debug;

/// A failed external operation: the command line and what it reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    pub command: String,
    pub diagnostic: String,
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` failed: {}", self.command, self.diagnostic)
    }
}

impl std::error::Error for CommandFailure {}

/// Privileged operations needed by the install sequence.
pub trait HostOps {
    /// Whether `user` exists in the host identity database.
    fn user_exists(&self, user: &str) -> Result<bool, CommandFailure>;

    /// Create `user` as a system account without a login shell.
    fn create_system_user(&self, user: &str) -> Result<(), CommandFailure>;

    /// Append `group` to the supplementary groups of `user`.
    fn add_user_to_group(&self, user: &str, group: &str) -> Result<(), CommandFailure>;

    /// Path of the currently running executable.
    fn current_exe(&self) -> Result<PathBuf, CommandFailure>;

    fn copy_file(&self, from: &Path, to: &Path) -> Result<(), CommandFailure>;

    fn chown_recursive(&self, user: &str, path: &Path) -> Result<(), CommandFailure>;

    /// Enable `unit_name` for activation on future boots.
    fn enable_unit(&self, unit_name: &str) -> Result<(), CommandFailure>;
}

/// External command names used by [`SystemHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCommands {
    pub user_query: String,
    pub user_add: String,
    pub user_mod: String,
    pub copy: String,
    pub chown: String,
    pub service_ctl: String,
    /// Login shell given to created system accounts.
    pub nologin_shell: String,
}

impl Default for HostCommands {
    fn default() -> Self {
        Self {
            user_query: "id".into(),
            user_add: "useradd".into(),
            user_mod: "usermod".into(),
            copy: "cp".into(),
            chown: "chown".into(),
            service_ctl: "systemctl".into(),
            nologin_shell: "/bin/false".into(),
        }
    }
}

/// Identity of the targeted init system and the commands that drive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostProfile {
    pub init_system: String,
    /// Path whose presence proves the init system is running.
    pub init_marker: PathBuf,
    pub commands: HostCommands,
}

impl HostProfile {
    pub fn systemd() -> Self {
        Self {
            init_system: "systemd".into(),
            init_marker: PathBuf::from("/run/systemd/system"),
            commands: HostCommands::default(),
        }
    }
}

impl Default for HostProfile {
    fn default() -> Self {
        Self::systemd()
    }
}

/// [`HostOps`] backed by real processes.
#[derive(Debug, Clone, Default)]
pub struct SystemHost {
    commands: HostCommands,
}

impl SystemHost {
    pub fn new(commands: HostCommands) -> Self {
        Self { commands }
    }

    /// Launch `program` and wait for it. Only launch failures are errors here.
    fn output<S: AsRef<OsStr>>(&self, program: &str, args: &[S]) -> Result<Output, CommandFailure> {
        let command = command_line(program, args);
        debug!("> {command}");

        Command::new(program)
            .args(args)
            .output()
            .map_err(|e| CommandFailure {
                command,
                diagnostic: e.to_string(),
            })
    }

    /// Launch `program` and require a successful exit.
    fn run<S: AsRef<OsStr>>(&self, program: &str, args: &[S]) -> Result<(), CommandFailure> {
        let output = self.output(program, args)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(CommandFailure {
                command: command_line(program, args),
                diagnostic: if stderr.is_empty() {
                    output.status.to_string()
                } else {
                    stderr
                },
            });
        }

        Ok(())
    }
}

fn command_line<S: AsRef<OsStr>>(program: &str, args: &[S]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.as_ref().to_string_lossy());
    }
    line
}

impl HostOps for SystemHost {
    fn user_exists(&self, user: &str) -> Result<bool, CommandFailure> {
        // `id` exits non-zero for unknown users
        let output = self.output(&self.commands.user_query, &[user])?;
        Ok(output.status.success())
    }

    fn create_system_user(&self, user: &str) -> Result<(), CommandFailure> {
        self.run(
            &self.commands.user_add,
            &["-r", "-s", self.commands.nologin_shell.as_str(), user],
        )
    }

    fn add_user_to_group(&self, user: &str, group: &str) -> Result<(), CommandFailure> {
        self.run(&self.commands.user_mod, &["-a", "-G", group, user])
    }

    fn current_exe(&self) -> Result<PathBuf, CommandFailure> {
        std::env::current_exe().map_err(|e| CommandFailure {
            command: "current_exe".into(),
            diagnostic: e.to_string(),
        })
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<(), CommandFailure> {
        self.run(&self.commands.copy, &[from.as_os_str(), to.as_os_str()])
    }

    fn chown_recursive(&self, user: &str, path: &Path) -> Result<(), CommandFailure> {
        self.run(
            &self.commands.chown,
            &[OsStr::new("-R"), OsStr::new(user), path.as_os_str()],
        )
    }

    fn enable_unit(&self, unit_name: &str) -> Result<(), CommandFailure> {
        self.run(&self.commands.service_ctl, &["enable", unit_name])
    }
}
