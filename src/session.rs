//! Scan session: owns the aggregate state of one audit run.
//!
//! A session holds the usage counter, the manufacturer mapping and the
//! project registry, plus the optional progress hook. It is a plain value;
//! build as many independent sessions as you like, but never feed one
//! session from two threads: the scan is strictly sequential and the
//! structures carry no locks.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use indexmap::IndexMap;
use serde::Serialize;

use crate::discover;
use crate::parse;
use crate::resolve;

/// One plugin's aggregate standing, as exported by ranked views and JSON.
#[derive(Debug, Clone, Serialize)]
pub struct PluginUsage {
    pub name: String,
    pub manufacturer: String,
    /// Number of project files the plugin appears in, not instance count.
    pub count: u32,
}

/// Aggregation state for a single scan.
#[derive(Default)]
pub struct AuditSession {
    usage: IndexMap<String, u32>,
    manufacturers: HashMap<String, String>,
    projects: IndexMap<PathBuf, Vec<String>>,
    processed_files: usize,
    total_files: usize,
    progress: Option<Box<dyn Fn(&str) + Send>>,
}

impl AuditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a hook receiving a human-readable message at each scan
    /// milestone. See [`crate::progress`] for a channel-backed consumer.
    pub fn set_progress_hook<F>(&mut self, hook: F)
    where
        F: Fn(&str) + Send + 'static,
    {
        self.progress = Some(Box::new(hook));
    }

    fn update_progress(&self, message: &str) {
        if let Some(hook) = &self.progress {
            hook(message);
        }
    }

    /// Runs a full scan over `root`.
    ///
    /// The only hard failure is an invalid root; everything below that is
    /// soft: unreadable directories and unparseable files are logged and
    /// skipped. Previous scan state is cleared first.
    pub fn scan_directory(&mut self, root: &Path) -> Result<()> {
        if !root.is_dir() {
            anyhow::bail!("not a directory: {}", root.display());
        }

        self.usage.clear();
        self.manufacturers.clear();
        self.projects.clear();
        self.processed_files = 0;
        self.total_files = 0;

        self.update_progress("Finding .als files...");
        let files = discover::find_project_files(root);
        self.total_files = files.len();

        if files.is_empty() {
            self.update_progress("No .als files found in directory");
            return Ok(());
        }
        self.update_progress(&format!(
            "Found {} .als files. Starting scan...",
            self.total_files
        ));

        for path in files {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.update_progress(&format!("Processing: {file_name}"));
            self.process_file(&path);
            self.processed_files += 1;
        }

        self.update_progress(&format!(
            "Scan complete! Found {} unique VSTs",
            self.usage.len()
        ));
        Ok(())
    }

    /// Parses one project file and folds its findings into the session.
    ///
    /// New references get a permanent manufacturer here: file-local path
    /// evidence first, then the name-pattern table, then `"Unknown"`.
    /// References already in the mapping keep their original attribution no
    /// matter what this file says. A file that fails to parse contributes
    /// nothing and does not interrupt the batch.
    pub fn process_file(&mut self, path: &Path) -> Vec<String> {
        let parsed = match parse::parse_project_file(path) {
            Ok(parsed) => parsed,
            Err(err) => {
                log::warn!("error parsing {}: {}", path.display(), err);
                return Vec::new();
            }
        };

        for plugin in &parsed.plugins {
            if !self.manufacturers.contains_key(plugin) {
                let manufacturer = parsed
                    .path_manufacturers
                    .get(plugin)
                    .cloned()
                    .or_else(|| resolve::manufacturer_from_name(plugin).map(str::to_owned))
                    .unwrap_or_else(|| resolve::UNKNOWN_MANUFACTURER.to_owned());
                self.manufacturers.insert(plugin.clone(), manufacturer);
            }
        }

        self.record_project(path.to_path_buf(), parsed.plugins.clone());
        parsed.plugins
    }

    /// Records a project's deduplicated plugin list: one registry entry
    /// (replacing any prior entry for the same path) and +1 usage per
    /// plugin. An empty list leaves no trace.
    pub fn record_project(&mut self, path: PathBuf, plugins: Vec<String>) {
        if plugins.is_empty() {
            return;
        }
        for plugin in &plugins {
            *self.usage.entry(plugin.clone()).or_insert(0) += 1;
        }
        self.projects.insert(path, plugins);
    }

    /// Usage counter: reference → number of projects using it, in
    /// first-counted order.
    pub fn usage(&self) -> &IndexMap<String, u32> {
        &self.usage
    }

    /// Manufacturer mapping; entries are permanent once written.
    pub fn manufacturers(&self) -> &HashMap<String, String> {
        &self.manufacturers
    }

    /// Project registry: path → deduplicated plugin list, in scan order.
    pub fn projects(&self) -> &IndexMap<PathBuf, Vec<String>> {
        &self.projects
    }

    pub fn manufacturer_of(&self, plugin: &str) -> &str {
        self.manufacturers
            .get(plugin)
            .map(String::as_str)
            .unwrap_or(resolve::UNKNOWN_MANUFACTURER)
    }

    pub fn unique_plugins(&self) -> usize {
        self.usage.len()
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    pub fn processed_files(&self) -> usize {
        self.processed_files
    }

    pub fn total_files(&self) -> usize {
        self.total_files
    }

    /// Usage sorted by count descending; ties keep first-counted order.
    pub fn usage_ranked(&self) -> Vec<PluginUsage> {
        let mut ranked: Vec<PluginUsage> = self
            .usage
            .iter()
            .map(|(name, count)| PluginUsage {
                name: name.clone(),
                manufacturer: self.manufacturer_of(name).to_string(),
                count: *count,
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }

    /// Pretty JSON export of the aggregate state.
    pub fn to_json(&self) -> Result<String> {
        let value = serde_json::json!({
            "generated": chrono::Local::now().to_rfc3339(),
            "total_projects": self.projects.len(),
            "unique_plugins": self.usage.len(),
            "plugins": self.usage_ranked(),
            "projects": self.projects,
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }
}
