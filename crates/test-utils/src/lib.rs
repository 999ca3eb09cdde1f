//! Shared test utilities for skillmatch crates.
//!
//! Fixture builders for fingerprints, developers, and tasks, a temp-dir
//! workspace that writes the JSON and TOML files the service reads, and
//! guards for tests that touch process environment.

use serde_json::json;
use skillmatch_intelligence::{
    Confidence, Developer, DomainExpertise, FrameworkSkill, LanguageSkill, SkillFingerprint, Task,
    TaskSignals, Trend, WorkloadSnapshot,
};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

/// Serialize tests that mutate process-global state (env vars, HOME).
pub fn env_guard() -> MutexGuard<'static, ()> {
    static TEST_SERIAL: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    TEST_SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// Restores an environment variable's previous value on drop.
pub struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        match &self.previous {
            Some(v) => std::env::set_var(self.key, v),
            None => std::env::remove_var(self.key),
        }
    }
}

/// Set (or with `None`, remove) an environment variable until the guard drops.
///
/// # Example
/// ```
/// let _guard = skillmatch_test_utils::set_env_var("SKILLMATCH_WORKSPACE", Some("acme"));
/// assert_eq!(std::env::var("SKILLMATCH_WORKSPACE").unwrap(), "acme");
/// ```
pub fn set_env_var(key: &'static str, value: Option<&str>) -> EnvVarGuard {
    let previous = std::env::var(key).ok();
    match value {
        Some(val) => std::env::set_var(key, val),
        None => std::env::remove_var(key),
    }
    EnvVarGuard { key, previous }
}

/// Builder for skill fingerprints.
#[derive(Debug, Clone, Default)]
pub struct FingerprintBuilder {
    fingerprint: SkillFingerprint,
}

impl FingerprintBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stable language with the given proficiency and volume.
    pub fn language(self, name: &str, proficiency: f64, commits: u64, lines: u64) -> Self {
        self.language_with_trend(name, proficiency, commits, lines, Trend::Stable)
    }

    pub fn language_with_trend(
        mut self,
        name: &str,
        proficiency: f64,
        commits: u64,
        lines: u64,
        trend: Trend,
    ) -> Self {
        self.fingerprint.languages.push(LanguageSkill {
            name: name.into(),
            proficiency,
            lines_of_code: lines,
            commits_count: commits,
            trend,
        });
        self
    }

    pub fn framework(mut self, name: &str, proficiency: f64, usage: u64) -> Self {
        self.fingerprint.frameworks.push(FrameworkSkill {
            name: name.into(),
            category: "framework".into(),
            proficiency,
            usage_count: usage,
        });
        self
    }

    /// Add a domain; panics on an out-of-range confidence.
    pub fn domain(mut self, name: &str, confidence: f64) -> Self {
        self.fingerprint.domains.push(DomainExpertise {
            name: name.into(),
            confidence: Confidence::new(confidence).expect("fixture confidence in range"),
        });
        self
    }

    pub fn tool(mut self, name: &str) -> Self {
        self.fingerprint.tools.push(name.into());
        self
    }

    pub fn build(self) -> SkillFingerprint {
        self.fingerprint
    }
}

/// Developer named after its upper-cased id.
pub fn developer(id: &str, fingerprint: SkillFingerprint) -> Developer {
    Developer {
        id: id.into(),
        name: id.to_uppercase(),
        fingerprint,
        capacity_hours: None,
    }
}

/// Signals with the given skills; panics on an out-of-range confidence.
pub fn signals(required: &[&str], preferred: &[&str], confidence: f64) -> TaskSignals {
    TaskSignals {
        required_skills: required.iter().map(|s| s.to_string()).collect(),
        preferred_skills: preferred.iter().map(|s| s.to_string()).collect(),
        confidence: Confidence::new(confidence).expect("fixture confidence in range"),
        ..Default::default()
    }
}

/// Medium-complexity task requiring `required` at full confidence.
pub fn task(id: &str, required: &[&str]) -> Task {
    Task {
        id: id.into(),
        title: format!("task {id}"),
        signals: signals(required, &[], 1.0),
        priority: None,
    }
}

pub fn workload(id: &str, tasks: u32, hours: f64) -> WorkloadSnapshot {
    WorkloadSnapshot {
        developer_id: id.into(),
        current_tasks: tasks,
        current_estimated_hours: hours,
    }
}

/// The python/django pair used to pin ranking behaviour.
///
/// `a` is strong in python but lacks django; `b` covers both at lower depth.
pub fn python_django_pair() -> (Developer, Developer) {
    let a = developer(
        "a",
        FingerprintBuilder::new()
            .language("python", 90.0, 500, 50_000)
            .framework("django", 0.0, 0)
            .build(),
    );
    let b = developer(
        "b",
        FingerprintBuilder::new()
            .language("python", 40.0, 100, 10_000)
            .framework("django", 80.0, 40)
            .build(),
    );
    (a, b)
}

/// Temp-dir workspace holding a fake HOME and input files.
///
/// The tempdir is removed when the fixture drops.
pub struct WorkspaceFixture {
    pub tempdir: tempfile::TempDir,
    /// `$HOME/.skillmatch` inside the temp dir.
    pub config_dir: PathBuf,
}

impl WorkspaceFixture {
    pub fn new() -> std::io::Result<Self> {
        let tempdir = tempfile::tempdir()?;
        let config_dir = tempdir.path().join(".skillmatch");
        std::fs::create_dir_all(&config_dir)?;
        Ok(Self {
            tempdir,
            config_dir,
        })
    }

    pub fn home_path(&self) -> &Path {
        self.tempdir.path()
    }

    /// Point HOME at the fixture until the guard drops.
    pub fn home_guard(&self) -> EnvVarGuard {
        set_env_var("HOME", self.home_path().to_str())
    }

    /// Write `$HOME/.skillmatch/config.toml`.
    pub fn write_config(&self, toml: &str) -> std::io::Result<PathBuf> {
        let path = self.config_dir.join("config.toml");
        std::fs::write(&path, toml)?;
        Ok(path)
    }

    /// Write a workspace file with developers and committed workloads.
    pub fn write_workspace(
        &self,
        name: &str,
        developers: &[Developer],
        workloads: &[WorkloadSnapshot],
    ) -> std::io::Result<PathBuf> {
        self.write_json(
            name,
            &json!({
                "developers": developers,
                "workloads": workloads,
            }),
        )
    }

    /// Write any serializable value as pretty JSON under the temp dir.
    pub fn write_json<T: serde::Serialize>(
        &self,
        name: &str,
        value: &T,
    ) -> std::io::Result<PathBuf> {
        let path = self.tempdir.path().join(name);
        let body = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
        std::fs::write(&path, body)?;
        Ok(path)
    }
}
