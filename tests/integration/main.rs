//! Integration tests for stc

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;

    fn stc() -> Command {
        cargo_bin_cmd!("stc")
    }

    #[test]
    fn help_displays() {
        stc()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("prebuilt native binding installer"));
    }

    #[test]
    fn version_displays() {
        stc()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("stc"));
    }

    #[test]
    fn config_path() {
        stc()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = tempfile::TempDir::new().unwrap();
        stc()
            .arg("--config")
            .arg(temp.path().join("missing.toml"))
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[artifact]"))
            .stdout(predicate::str::contains("thread-sleep-compat"));
    }

    #[test]
    fn invalid_config_is_reported() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[abi]\nlegacy = \"one\"\n").unwrap();

        stc()
            .arg("--config")
            .arg(&path)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn completions_generate() {
        stc()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("stc"));
    }

    #[test]
    fn locate_unknown_runtime_fails() {
        let temp = tempfile::TempDir::new().unwrap();
        stc()
            .env("STC_HOME", temp.path())
            .args(["locate", "0.0.1", "--arch", "x64"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No ABI known"));
    }
}

/// End-to-end install runs against a fake curl serving a local archive
#[cfg(unix)]
mod install_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    struct Sandbox {
        temp: TempDir,
    }

    impl Sandbox {
        /// Cache root, fake curl, a fixture archive and a config wiring them up
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let sandbox = Self { temp };

            let release = sandbox.path("fixture/build/Release");
            std::fs::create_dir_all(&release).unwrap();
            std::fs::write(release.join("thread_sleep.node"), b"\x7fELF").unwrap();
            let status = std::process::Command::new("tar")
                .arg("-czf")
                .arg(sandbox.fixture())
                .arg("-C")
                .arg(sandbox.path("fixture"))
                .arg("build")
                .status()
                .unwrap();
            assert!(status.success());

            // 404 for every 32-bit arm artifact, the archive for everything else
            let script = format!(
                r#"#!/bin/sh
dest=""
url=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) dest="$2"; shift 2 ;;
    --connect-timeout|--max-time) shift 2 ;;
    -*) shift ;;
    *) url="$1"; shift ;;
  esac
done
echo "$url" >> '{log}'
case "$url" in
  *-arm.tar.gz) exit 22 ;;
esac
cp '{fixture}' "$dest"
"#,
                log = sandbox.fetch_log().display(),
                fixture = sandbox.fixture().display(),
            );
            let curl = sandbox.path("curl");
            std::fs::write(&curl, script).unwrap();
            std::fs::set_permissions(&curl, std::fs::Permissions::from_mode(0o755)).unwrap();

            sandbox.write_config(&curl);
            sandbox
        }

        fn path(&self, rel: &str) -> PathBuf {
            self.temp.path().join(rel)
        }

        fn home(&self) -> PathBuf {
            self.path("home")
        }

        fn fixture(&self) -> PathBuf {
            self.path("fixture.tar.gz")
        }

        fn fetch_log(&self) -> PathBuf {
            self.path("fetches.log")
        }

        fn config(&self) -> PathBuf {
            self.path("config.toml")
        }

        fn write_config(&self, curl: &Path) {
            let config = format!(
                "[artifact]\nbinaries_version = \"3\"\n\n[fetch]\ncurl = '{}'\n\n[cache]\ntemp_dir = '{}'\n",
                curl.display(),
                self.path("tmp").display()
            );
            std::fs::write(self.config(), config).unwrap();
        }

        fn stc(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("stc");
            cmd.env("STC_HOME", self.home())
                .env_remove("RUST_LOG")
                .arg("--config")
                .arg(self.config());
            cmd
        }

        fn manifest(&self) -> Option<String> {
            std::fs::read_to_string(self.home().join("bin/version.txt")).ok()
        }

        fn set_manifest(&self, version: &str) {
            std::fs::create_dir_all(self.home().join("bin")).unwrap();
            std::fs::write(self.home().join("bin/version.txt"), version).unwrap();
        }

        fn fetches(&self) -> usize {
            std::fs::read_to_string(self.fetch_log())
                .map(|log| log.lines().count())
                .unwrap_or(0)
        }

        fn tmp_is_empty(&self) -> bool {
            std::fs::read_dir(self.path("tmp"))
                .map(|mut d| d.next().is_none())
                .unwrap_or(true)
        }
    }

    #[test]
    fn fresh_install_populates_cache() {
        let sandbox = Sandbox::new();

        sandbox
            .stc()
            .arg("install")
            .assert()
            .success()
            .stdout(predicate::str::contains("Downloaded"));

        assert_eq!(sandbox.manifest().as_deref(), Some("3"));
        assert!(sandbox.fetches() > 0);
        assert!(sandbox.tmp_is_empty());

        let slots: Vec<_> = std::fs::read_dir(sandbox.home().join("bin"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|name| name.starts_with("thread-sleep-compat-node-"))
            .collect();
        assert!(!slots.is_empty());
        assert!(slots.iter().all(|name| !name.ends_with("-arm")));
    }

    #[test]
    fn second_install_is_a_no_op() {
        let sandbox = Sandbox::new();

        sandbox.stc().arg("install").assert().success();
        let fetches = sandbox.fetches();

        sandbox
            .stc()
            .arg("install")
            .assert()
            .success()
            .stdout(predicate::str::contains("already installed"));
        assert_eq!(sandbox.fetches(), fetches);
    }

    #[test]
    fn matching_manifest_skips_all_downloads() {
        let sandbox = Sandbox::new();
        sandbox.set_manifest("3");

        sandbox
            .stc()
            .arg("install")
            .assert()
            .success()
            .stdout(predicate::str::contains("already installed"));
        assert_eq!(sandbox.fetches(), 0);
    }

    #[test]
    fn stale_manifest_triggers_upgrade() {
        let sandbox = Sandbox::new();
        sandbox.set_manifest("0.0.0");

        sandbox
            .stc()
            .arg("install")
            .assert()
            .success()
            .stdout(predicate::str::contains("Upgrading"));
        assert_eq!(sandbox.manifest().as_deref(), Some("3"));
        assert!(sandbox.fetches() > 0);
    }

    #[test]
    fn force_refetches() {
        let sandbox = Sandbox::new();

        sandbox.stc().arg("install").assert().success();
        let fetches = sandbox.fetches();

        sandbox.stc().args(["install", "--force"]).assert().success();
        assert_eq!(sandbox.fetches(), fetches * 2);
    }

    #[test]
    fn missing_download_tool_still_exits_zero() {
        let sandbox = Sandbox::new();
        sandbox.write_config(&sandbox.path("no-such-curl"));

        sandbox
            .stc()
            .arg("install")
            .assert()
            .success()
            .stdout(predicate::str::contains("No binaries available"));
        assert!(sandbox.manifest().is_none());
        assert!(sandbox.tmp_is_empty());
    }

    #[test]
    fn invalid_config_does_not_fail_install() {
        let sandbox = Sandbox::new();
        std::fs::write(sandbox.config(), "[abi]\nlegacy = \"one\"\n").unwrap();

        sandbox
            .stc()
            .arg("install")
            .assert()
            .success()
            .stderr(predicate::str::contains("Warning:"));
    }

    #[test]
    fn locate_after_install() {
        let sandbox = Sandbox::new();

        sandbox
            .stc()
            .args(["locate", "0.10.48", "--arch", "x64"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Binding not installed"));

        sandbox.stc().arg("install").assert().success();

        sandbox
            .stc()
            .args(["locate", "0.10.48", "--arch", "x64"])
            .assert()
            .success()
            .stdout(predicate::str::contains("-node-v11-"))
            .stdout(predicate::str::contains("-x64/build/Release/thread_sleep.node"));
    }

    #[test]
    fn status_reports_cache() {
        let sandbox = Sandbox::new();
        sandbox.stc().arg("install").assert().success();

        let output = sandbox
            .stc()
            .args(["status", "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["installed_version"], "3");
        assert_eq!(report["up_to_date"], true);
        assert!(report["artifacts"]
            .as_array()
            .unwrap()
            .iter()
            .any(|a| a["cached"] == true));
    }

    #[test]
    fn clean_removes_installed_binaries() {
        let sandbox = Sandbox::new();
        sandbox.stc().arg("install").assert().success();

        sandbox
            .stc()
            .args(["clean", "--dry-run"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Would remove"));
        assert!(sandbox.manifest().is_some());

        sandbox.stc().arg("clean").assert().success();
        assert!(!sandbox.home().join("bin").exists());
    }
}
