//! Shared helpers for tests that drive a fake kubectl.
//!
//! A [`FakeKubectl`] is a shell script in a temp directory. Every call
//! appends its arguments to `calls.log`, drops the leading
//! `--kubeconfig <path>` pair, and then runs the test-provided body with
//! `$STATE` pointing at the temp directory.

#![cfg(unix)]

use crate::client::{KubernetesCli, KubernetesCliBuilder};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub(crate) struct FakeKubectl {
    dir: TempDir,
    executable: PathBuf,
}

impl FakeKubectl {
    pub(crate) fn new(body: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let executable = dir.path().join("kubectl");
        let script = format!(
            "#!/bin/sh\nSTATE='{}'\nprintf '%s\\n' \"$*\" >> \"$STATE/calls.log\"\nshift 2\n{}\n",
            dir.path().display(),
            body
        );
        std::fs::write(&executable, script).unwrap();
        std::fs::set_permissions(&executable, std::fs::Permissions::from_mode(0o755)).unwrap();
        Self { dir, executable }
    }

    pub(crate) fn state_dir(&self) -> &Path {
        self.dir.path()
    }

    pub(crate) fn kubeconfig(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    pub(crate) fn builder(&self) -> KubernetesCliBuilder {
        KubernetesCli::builder(self.kubeconfig()).executable(&self.executable)
    }

    pub(crate) fn cli(&self) -> KubernetesCli {
        self.builder().build()
    }

    /// Argument lines of every call so far, oldest first.
    pub(crate) fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.dir.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub(crate) fn read_state(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).unwrap_or_default()
    }
}
