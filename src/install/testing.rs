//! Recording [`HostOps`] fake shared by the installer tests.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::host::{CommandFailure, HostOps};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    UserExists(String),
    CreateUser(String),
    AddToGroup { user: String, group: String },
    CurrentExe,
    Copy { from: PathBuf, to: PathBuf },
    Chown { user: String, path: PathBuf },
    Enable(String),
}

/// Records every call. Copies really happen so staged files can be inspected.
/// Users created through it are remembered, so a second run sees them.
pub struct RecordingHost {
    pub exe: PathBuf,
    pub users: RefCell<BTreeSet<String>>,
    pub calls: RefCell<Vec<Call>>,
    /// Name of the operation that should fail, matched by [`RecordingHost::fails`].
    pub fail_on: Option<&'static str>,
}

impl RecordingHost {
    pub fn new(exe: impl Into<PathBuf>) -> Self {
        Self {
            exe: exe.into(),
            users: RefCell::new(BTreeSet::new()),
            calls: RefCell::new(Vec::new()),
            fail_on: None,
        }
    }

    pub fn with_user(self, user: &str) -> Self {
        self.users.borrow_mut().insert(user.to_string());
        self
    }

    pub fn failing(mut self, op: &'static str) -> Self {
        self.fail_on = Some(op);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn fails(&self, op: &'static str) -> Result<(), CommandFailure> {
        if self.fail_on == Some(op) {
            return Err(CommandFailure {
                command: op.to_string(),
                diagnostic: format!("{op}: simulated failure"),
            });
        }
        Ok(())
    }
}

impl HostOps for RecordingHost {
    fn user_exists(&self, user: &str) -> Result<bool, CommandFailure> {
        self.record(Call::UserExists(user.into()));
        self.fails("id")?;
        Ok(self.users.borrow().contains(user))
    }

    fn create_system_user(&self, user: &str) -> Result<(), CommandFailure> {
        self.record(Call::CreateUser(user.into()));
        self.fails("useradd")?;
        self.users.borrow_mut().insert(user.into());
        Ok(())
    }

    fn add_user_to_group(&self, user: &str, group: &str) -> Result<(), CommandFailure> {
        self.record(Call::AddToGroup {
            user: user.into(),
            group: group.into(),
        });
        self.fails("usermod")
    }

    fn current_exe(&self) -> Result<PathBuf, CommandFailure> {
        self.record(Call::CurrentExe);
        self.fails("current_exe")?;
        Ok(self.exe.clone())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<(), CommandFailure> {
        self.record(Call::Copy {
            from: from.into(),
            to: to.into(),
        });
        self.fails("cp")?;
        fs::copy(from, to).map_err(|e| CommandFailure {
            command: "cp".into(),
            diagnostic: e.to_string(),
        })?;
        Ok(())
    }

    fn chown_recursive(&self, user: &str, path: &Path) -> Result<(), CommandFailure> {
        self.record(Call::Chown {
            user: user.into(),
            path: path.into(),
        });
        self.fails("chown")
    }

    fn enable_unit(&self, unit_name: &str) -> Result<(), CommandFailure> {
        self.record(Call::Enable(unit_name.into()));
        self.fails("systemctl")
    }
}
