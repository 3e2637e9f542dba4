//! Environment lifecycle orchestration.
//!
//! The manager owns the registry store and the platform profile, and is the
//! only component that both spawns processes and mutates the registry. The
//! ordering rule throughout: the store is updated only *after* the
//! filesystem effect is confirmed, so an interrupted operation leaves the
//! registry exactly as it was before the operation began.

pub mod install;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{BurrowError, Result};
use crate::platform::{
    probe_version, validate_runtime, PlatformKind, PlatformProfile, ShellKind,
};
use crate::process::{self, ProcessOutput, RunOptions};
use crate::registry::{validate_name, EnvironmentRecord, RegistryStore};

pub use install::InstallReport;

/// Bound on the environment-creation subprocess.
pub const CREATE_TIMEOUT: Duration = Duration::from_secs(60);

/// Optional inputs to [`EnvironmentManager::create`].
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Requested interpreter version, e.g. "3.11". The realized version is
    /// probed after creation and may differ.
    pub runtime_version: Option<String>,

    /// Manifest to apply after creation (best-effort).
    pub manifest: Option<PathBuf>,

    /// Free-text annotation.
    pub description: Option<String>,
}

/// Result of a successful create.
///
/// A manifest-install failure is deliberately reported *alongside* the
/// created record, not in place of it: the environment is usable, its
/// dependencies are simply incomplete.
#[derive(Debug)]
pub struct CreateOutcome {
    pub record: EnvironmentRecord,

    /// Present when a manifest was supplied; `Err` when applying it failed.
    pub install: Option<Result<InstallReport>>,
}

/// Orchestrates creation, activation-command emission, listing, and removal
/// of environments.
#[derive(Debug)]
pub struct EnvironmentManager {
    platform: PlatformKind,
    profile: Option<PlatformProfile>,
    store: RegistryStore,
}

impl EnvironmentManager {
    /// Build a manager for the detected host platform and shell.
    pub fn new(store: RegistryStore) -> Self {
        Self::with_platform(PlatformKind::detect(), ShellKind::detect(), store)
    }

    /// Build a manager for an explicit platform and shell. Test seam, and
    /// the single place the platform decision enters the manager.
    pub fn with_platform(platform: PlatformKind, shell: ShellKind, store: RegistryStore) -> Self {
        Self {
            platform,
            profile: PlatformProfile::new(platform, shell),
            store,
        }
    }

    pub fn store(&self) -> &RegistryStore {
        &self.store
    }

    /// Directory under which new environments are created: `envs/` next to
    /// the registry file, so a relocated registry keeps its environments
    /// with it.
    pub fn envs_root(&self) -> PathBuf {
        match self.store.path().parent() {
            Some(dir) => dir.join("envs"),
            None => PathBuf::from("envs"),
        }
    }

    /// The profile, or `UnsupportedPlatform`. Every lifecycle operation
    /// goes through this gate before touching the filesystem or spawning
    /// anything; an unsupported host is terminal.
    fn profile(&self) -> Result<&PlatformProfile> {
        self.profile
            .as_ref()
            .ok_or_else(|| BurrowError::UnsupportedPlatform {
                os: self.platform.label().to_string(),
            })
    }

    /// Create a new environment.
    ///
    /// Never overwrites: an existing record *or* directory for `name` fails
    /// with `AlreadyExists`. On creation failure nothing is registered; the
    /// partial directory, if any, is reported as orphaned in the error.
    pub fn create(&mut self, name: &str, options: &CreateOptions) -> Result<CreateOutcome> {
        let profile = self.profile()?.clone();
        validate_name(name)?;

        if self.store.get(name).is_some() {
            return Err(BurrowError::AlreadyExists {
                name: name.to_string(),
            });
        }
        let env_path = self.envs_root().join(name);
        if env_path.exists() || self.store.list().iter().any(|r| r.path == env_path) {
            return Err(BurrowError::AlreadyExists {
                name: name.to_string(),
            });
        }

        let runtime = validate_runtime(&profile)?;
        tracing::debug!(
            interpreter = %runtime.interpreter.display(),
            version = %runtime.version,
            "ambient runtime validated"
        );

        fs::create_dir_all(self.envs_root())?;
        let output = self.spawn_create(&profile, &runtime.interpreter, &env_path, options)?;
        if !output.success() {
            return Err(creation_failed(name, &env_path, &output));
        }

        // The hint is what we asked for; the record stores what we got.
        let env_python = profile.env_interpreter(&env_path);
        let realized = probe_version(&env_python).map_err(|e| BurrowError::CreationFailed {
            name: name.to_string(),
            detail: format!("environment created but its interpreter failed probing: {e}"),
        })?;

        let mut record = EnvironmentRecord::new(name, env_path, realized);
        if let Some(description) = &options.description {
            record.description = description.clone();
        }
        if let Some(manifest) = &options.manifest {
            if manifest.is_file() {
                record.manifest_path = Some(manifest.clone());
            }
        }
        self.store.upsert(record.clone())?;
        tracing::info!(env = name, version = %record.runtime_version, "environment created");

        let install = options.manifest.as_deref().map(|manifest| {
            let report = install::install(&profile, &record, manifest)?;
            if report.success() {
                Ok(report)
            } else {
                Err(BurrowError::InstallFailed {
                    name: name.to_string(),
                    detail: report.failure_detail(),
                })
            }
        });

        Ok(CreateOutcome { record, install })
    }

    /// Run the creation subprocess, preferring the version-qualified
    /// command when a version was requested and falling back once to the
    /// unqualified form if the qualified one cannot be spawned or exits
    /// non-zero. A timeout is never retried: the first attempt may still
    /// be doing work we cannot see.
    fn spawn_create(
        &self,
        profile: &PlatformProfile,
        interpreter: &Path,
        env_path: &Path,
        options: &CreateOptions,
    ) -> Result<ProcessOutput> {
        let run_opts = RunOptions::with_timeout(CREATE_TIMEOUT);

        if let Some(version) = &options.runtime_version {
            let qualified = profile.versioned_create_command(version, env_path);
            tracing::debug!(command = %qualified, "creating environment (version-qualified)");
            match process::run(qualified.command(), &run_opts) {
                Ok(output) if output.success() => return Ok(output),
                Ok(output) if output.timed_out => return Ok(output),
                outcome => {
                    match outcome {
                        Ok(output) => tracing::warn!(
                            version = %version,
                            detail = %output.status_detail(),
                            "version-qualified create failed; falling back to ambient interpreter"
                        ),
                        Err(e) => tracing::warn!(
                            version = %version,
                            error = %e,
                            "version-qualified interpreter not runnable; falling back to ambient interpreter"
                        ),
                    }
                    if env_path.exists() {
                        let _ = fs::remove_dir_all(env_path);
                    }
                }
            }
        }

        let template = profile.create_command(interpreter, env_path);
        tracing::debug!(command = %template, "creating environment");
        Ok(process::run(template.command(), &run_opts)?)
    }

    /// The activation command for an environment, as text for the caller's
    /// shell. Never executed here: activation reshapes the caller's own
    /// session. Bumps `last_used_at` before returning.
    pub fn activation_command(&mut self, name: &str) -> Result<String> {
        let profile = self.profile()?.clone();
        let mut record = self.named(name)?.clone();

        if !record.path.is_dir() {
            return Err(BurrowError::NotFound {
                name: name.to_string(),
                detail: Some(format!("directory missing at {}", record.path.display())),
            });
        }
        let script = profile.activation_script(&record.path);
        if !script.is_file() {
            return Err(BurrowError::NotFound {
                name: name.to_string(),
                detail: Some(format!("activation script missing at {}", script.display())),
            });
        }

        record.touch();
        self.store.upsert(record.clone())?;
        Ok(profile.activation_command(&record.path))
    }

    /// All registered environments, in insertion order.
    pub fn list(&self) -> Result<&[EnvironmentRecord]> {
        self.profile()?;
        Ok(self.store.list())
    }

    /// Remove an environment: directory tree first, registry entry second.
    ///
    /// If deletion fails the entry is retained: the record then accurately
    /// says "exists but could not be cleanly removed". Confirmation is the
    /// caller's concern; by the time this runs the decision has been made.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        self.profile()?;
        let record = self.named(name)?.clone();

        if record.path.exists() {
            fs::remove_dir_all(&record.path).map_err(|e| BurrowError::RemovalFailed {
                name: name.to_string(),
                path: record.path.clone(),
                detail: e.to_string(),
            })?;
        }
        self.store.remove(name)?;
        tracing::info!(env = name, "environment removed");
        Ok(())
    }

    /// Apply a manifest to an existing environment (standalone install).
    ///
    /// Unlike the best-effort install during create, a missing manifest is
    /// a hard error here. On a successful run the record's manifest
    /// reference is updated.
    pub fn install(&mut self, name: &str, manifest: &Path, dev: bool) -> Result<InstallReport> {
        let profile = self.profile()?.clone();
        let record = self.named(name)?.clone();
        if !record.path.is_dir() {
            return Err(BurrowError::NotFound {
                name: name.to_string(),
                detail: Some(format!("directory missing at {}", record.path.display())),
            });
        }

        let report = install::install(&profile, &record, manifest)?;
        if report.success() {
            let mut updated = record;
            if dev {
                updated.dev_manifest_path = Some(manifest.to_path_buf());
            } else {
                updated.manifest_path = Some(manifest.to_path_buf());
            }
            self.store.upsert(updated)?;
        }
        Ok(report)
    }

    /// The environment's realized dependency set (`pip freeze` output).
    pub fn freeze(&self, name: &str) -> Result<String> {
        let profile = self.profile()?.clone();
        let record = self.named(name)?;
        install::freeze(&profile, record)
    }

    fn named(&self, name: &str) -> Result<&EnvironmentRecord> {
        self.store.get(name).ok_or_else(|| BurrowError::NotFound {
            name: name.to_string(),
            detail: None,
        })
    }
}

fn creation_failed(name: &str, env_path: &Path, output: &ProcessOutput) -> BurrowError {
    let mut detail = output.status_detail();
    let tail = output.stderr_tail(8);
    if !tail.is_empty() {
        detail.push_str(": ");
        detail.push_str(&tail);
    }
    if env_path.exists() {
        detail.push_str(&format!(
            "; orphaned partial directory left at {}",
            env_path.display()
        ));
    }
    BurrowError::CreationFailed {
        name: name.to_string(),
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager_in(temp: &TempDir, platform: PlatformKind) -> EnvironmentManager {
        let store = RegistryStore::open(temp.path().join("registry.json")).unwrap();
        EnvironmentManager::with_platform(platform, ShellKind::Bash, store)
    }

    fn seeded_record(temp: &TempDir, name: &str) -> EnvironmentRecord {
        EnvironmentRecord::new(name, temp.path().join("envs").join(name), "3.12.1".into())
    }

    /// Insert a record directly, bypassing create, for tests that only
    /// exercise the read/remove side.
    fn seed(temp: &TempDir, record: EnvironmentRecord) {
        let mut store = RegistryStore::open(temp.path().join("registry.json")).unwrap();
        store.upsert(record).unwrap();
    }

    #[test]
    fn unsupported_platform_gates_every_operation() {
        let temp = TempDir::new().unwrap();

        let mut manager = manager_in(&temp, PlatformKind::Unsupported);
        let create = manager.create("demo", &CreateOptions::default());
        assert!(matches!(
            create.unwrap_err(),
            BurrowError::UnsupportedPlatform { .. }
        ));
        assert!(matches!(
            manager.activation_command("demo").unwrap_err(),
            BurrowError::UnsupportedPlatform { .. }
        ));
        assert!(matches!(
            manager.list().unwrap_err(),
            BurrowError::UnsupportedPlatform { .. }
        ));
        assert!(matches!(
            manager.remove("demo").unwrap_err(),
            BurrowError::UnsupportedPlatform { .. }
        ));
        assert!(matches!(
            manager
                .install("demo", Path::new("requirements.txt"), false)
                .unwrap_err(),
            BurrowError::UnsupportedPlatform { .. }
        ));
        assert!(matches!(
            manager.freeze("demo").unwrap_err(),
            BurrowError::UnsupportedPlatform { .. }
        ));
    }

    #[test]
    fn create_rejects_invalid_name() {
        let temp = TempDir::new().unwrap();
        let mut manager = manager_in(&temp, PlatformKind::Linux);

        let err = manager
            .create("bad name!", &CreateOptions::default())
            .unwrap_err();
        assert!(matches!(err, BurrowError::InvalidName { .. }));
    }

    #[test]
    fn create_rejects_registered_name() {
        let temp = TempDir::new().unwrap();
        seed(&temp, seeded_record(&temp, "dup"));
        let mut manager = manager_in(&temp, PlatformKind::Linux);

        let err = manager.create("dup", &CreateOptions::default()).unwrap_err();
        assert!(matches!(err, BurrowError::AlreadyExists { .. }));
        assert_eq!(manager.list().unwrap().len(), 1);
    }

    #[test]
    fn create_rejects_existing_directory() {
        let temp = TempDir::new().unwrap();
        let mut manager = manager_in(&temp, PlatformKind::Linux);
        fs::create_dir_all(temp.path().join("envs").join("squatter")).unwrap();

        let err = manager
            .create("squatter", &CreateOptions::default())
            .unwrap_err();
        assert!(matches!(err, BurrowError::AlreadyExists { .. }));
        // Never registered: no orphan record for a directory we didn't make.
        assert!(manager.store().get("squatter").is_none());
    }

    #[test]
    fn activation_command_not_found_for_unregistered() {
        let temp = TempDir::new().unwrap();
        let mut manager = manager_in(&temp, PlatformKind::Linux);

        let err = manager.activation_command("ghost").unwrap_err();
        assert!(matches!(err, BurrowError::NotFound { .. }));
    }

    #[test]
    fn activation_command_detects_missing_directory() {
        let temp = TempDir::new().unwrap();
        seed(&temp, seeded_record(&temp, "drifted"));
        let mut manager = manager_in(&temp, PlatformKind::Linux);

        let err = manager.activation_command("drifted").unwrap_err();
        match err {
            BurrowError::NotFound { detail, .. } => {
                assert!(detail.unwrap().contains("directory missing"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn activation_command_detects_missing_script() {
        let temp = TempDir::new().unwrap();
        let record = seeded_record(&temp, "hollow");
        fs::create_dir_all(&record.path).unwrap();
        seed(&temp, record);
        let mut manager = manager_in(&temp, PlatformKind::Linux);

        let err = manager.activation_command("hollow").unwrap_err();
        match err {
            BurrowError::NotFound { detail, .. } => {
                assert!(detail.unwrap().contains("activation script missing"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn activation_command_emits_text_and_bumps_last_used() {
        let temp = TempDir::new().unwrap();
        let record = seeded_record(&temp, "ready");
        fs::create_dir_all(record.path.join("bin")).unwrap();
        fs::write(record.path.join("bin").join("activate"), "# activate\n").unwrap();
        let before = record.last_used_at;
        seed(&temp, record);
        let mut manager = manager_in(&temp, PlatformKind::Linux);

        let command = manager.activation_command("ready").unwrap();

        assert!(command.starts_with("source "));
        assert!(command.ends_with("bin/activate"));
        let after = manager.store().get("ready").unwrap().last_used_at;
        assert!(after >= before);
    }

    #[test]
    fn list_is_insertion_ordered_and_total() {
        let temp = TempDir::new().unwrap();
        seed(&temp, seeded_record(&temp, "zed"));
        seed(&temp, seeded_record(&temp, "ant"));
        let manager = manager_in(&temp, PlatformKind::Linux);

        let names: Vec<&str> = manager.list().unwrap().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["zed", "ant"]);
    }

    #[test]
    fn list_is_empty_without_registry() {
        let temp = TempDir::new().unwrap();
        let manager = manager_in(&temp, PlatformKind::Linux);
        assert!(manager.list().unwrap().is_empty());
    }

    #[test]
    fn remove_missing_is_not_found_and_registry_unchanged() {
        let temp = TempDir::new().unwrap();
        seed(&temp, seeded_record(&temp, "keeper"));
        let mut manager = manager_in(&temp, PlatformKind::Linux);

        let err = manager.remove("missing-env").unwrap_err();
        assert!(matches!(err, BurrowError::NotFound { .. }));
        assert_eq!(manager.list().unwrap().len(), 1);
    }

    #[test]
    fn remove_deletes_directory_and_record() {
        let temp = TempDir::new().unwrap();
        let record = seeded_record(&temp, "doomed");
        fs::create_dir_all(record.path.join("bin")).unwrap();
        let path = record.path.clone();
        seed(&temp, record);
        let mut manager = manager_in(&temp, PlatformKind::Linux);

        manager.remove("doomed").unwrap();

        assert!(!path.exists());
        assert!(manager.store().get("doomed").is_none());
    }

    #[test]
    fn remove_tolerates_already_missing_directory() {
        let temp = TempDir::new().unwrap();
        seed(&temp, seeded_record(&temp, "gone"));
        let mut manager = manager_in(&temp, PlatformKind::Linux);

        manager.remove("gone").unwrap();
        assert!(manager.store().get("gone").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn failed_deletion_retains_record() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let record = seeded_record(&temp, "stuck");
        fs::create_dir_all(record.path.join("bin")).unwrap();
        let path = record.path.clone();
        seed(&temp, record);
        let mut manager = manager_in(&temp, PlatformKind::Linux);

        // A read-only environment directory makes its children undeletable.
        fs::set_permissions(&path, fs::Permissions::from_mode(0o555)).unwrap();
        let result = manager.remove("stuck");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        if std::process::Command::new("id")
            .arg("-u")
            .output()
            .map(|o| String::from_utf8_lossy(&o.stdout).trim() == "0")
            .unwrap_or(false)
        {
            // Root ignores permission bits; nothing to assert here.
            return;
        }

        let err = result.unwrap_err();
        assert!(matches!(err, BurrowError::RemovalFailed { .. }));
        assert!(manager.store().get("stuck").is_some());
    }

    #[test]
    fn standalone_install_requires_registered_env() {
        let temp = TempDir::new().unwrap();
        let mut manager = manager_in(&temp, PlatformKind::Linux);

        let err = manager
            .install("ghost", Path::new("requirements.txt"), false)
            .unwrap_err();
        assert!(matches!(err, BurrowError::NotFound { .. }));
    }

    #[test]
    fn standalone_install_hard_errors_on_missing_manifest() {
        let temp = TempDir::new().unwrap();
        let record = seeded_record(&temp, "demo");
        fs::create_dir_all(record.path.join("bin")).unwrap();
        seed(&temp, record);
        let mut manager = manager_in(&temp, PlatformKind::Linux);

        let err = manager
            .install("demo", &temp.path().join("nope.txt"), false)
            .unwrap_err();
        assert!(matches!(err, BurrowError::ManifestNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn standalone_install_records_manifest_reference() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let record = seeded_record(&temp, "demo");
        let bin = record.path.join("bin");
        fs::create_dir_all(&bin).unwrap();
        let python = bin.join("python");
        fs::write(&python, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&python, fs::Permissions::from_mode(0o755)).unwrap();
        seed(&temp, record);

        let manifest = temp.path().join("dev.txt");
        fs::write(&manifest, "pytest\n").unwrap();

        let mut manager = manager_in(&temp, PlatformKind::Linux);
        let report = manager.install("demo", &manifest, true).unwrap();

        assert!(report.success());
        assert_eq!(
            manager.store().get("demo").unwrap().dev_manifest_path,
            Some(manifest)
        );
    }
}
