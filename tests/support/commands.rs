//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a passmenu command pointed at the temp store and home.
    ///
    /// The config written with [`Test::write_config`] is picked up if it
    /// exists when the command is created.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("passmenu").expect("failed to find passmenu binary");
        cmd.env("HOME", self.home.path());
        cmd.env("XDG_CONFIG_HOME", self.home.path().join(".config"));
        cmd.env("PASSWORD_STORE_DIR", self.root());
        if self.config_path().exists() {
            cmd.env("PASSMENU_CONFIG", self.config_path());
        } else {
            cmd.env_remove("PASSMENU_CONFIG");
        }
        cmd.env_remove("PASSMENU_LOG");
        cmd.current_dir(self.home.path());
        cmd
    }

    /// Shortcut for `passmenu list`.
    pub fn list(&self) -> Output {
        self.cmd()
            .arg("list")
            .output()
            .expect("failed to run passmenu list")
    }

    /// Shortcut for `passmenu list --json`.
    pub fn list_json(&self) -> Output {
        self.cmd()
            .args(["list", "--json"])
            .output()
            .expect("failed to run passmenu list --json")
    }

    /// Shortcut for `passmenu commit`.
    pub fn commit(&self) -> Output {
        self.cmd()
            .arg("commit")
            .output()
            .expect("failed to run passmenu commit")
    }

    /// Shortcut for `passmenu status`.
    pub fn status(&self) -> Output {
        self.cmd()
            .arg("status")
            .output()
            .expect("failed to run passmenu status")
    }
}
