//! Report rendering.
//!
//! The full report is a fixed five-section layout; its headers, rule widths
//! and column formats are part of the observable contract for anything that
//! parses the file downstream, so change them deliberately or not at all.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

use crate::session::AuditSession;

/// Renders the full five-section report.
///
/// Sections: header with timestamp and totals, usage ranked by frequency,
/// plugins grouped by manufacturer, a flat alphabetical list, and the
/// per-project breakdown. An empty usage counter collapses the whole report
/// to a single line.
pub fn render_report(session: &AuditSession) -> String {
    let mut out = String::new();

    if session.usage().is_empty() {
        out.push_str("No VST plugins found in the scanned projects.\n");
        return out;
    }

    out.push_str("ABLETON VST AUDIT REPORT\n");
    out.push_str(&format!("{}\n", "=".repeat(50)));
    out.push_str(&format!(
        "Generated: {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!(
        "Total Projects Scanned: {}\n",
        session.project_count()
    ));
    out.push_str(&format!(
        "Total Unique VSTs Found: {}\n\n",
        session.unique_plugins()
    ));

    out.push_str("VST USAGE SUMMARY (by frequency)\n");
    out.push_str(&format!("{}\n", "-".repeat(40)));
    for entry in session.usage_ranked() {
        out.push_str(&format!(
            "{:3}x  {:<35} [{}]\n",
            entry.count, entry.name, entry.manufacturer
        ));
    }

    out.push_str("\n\nVSTS BY MANUFACTURER\n");
    out.push_str(&format!("{}\n", "-".repeat(30)));
    let mut by_manufacturer: BTreeMap<&str, Vec<(&str, u32)>> = BTreeMap::new();
    for (name, count) in session.usage() {
        by_manufacturer
            .entry(session.manufacturer_of(name))
            .or_default()
            .push((name.as_str(), *count));
    }
    for (manufacturer, mut plugin_list) in by_manufacturer {
        out.push_str(&format!("\n{manufacturer}:\n"));
        plugin_list.sort_by(|a, b| a.0.cmp(b.0));
        for (name, count) in plugin_list {
            out.push_str(&format!("  • {name} ({count}x)\n"));
        }
    }

    out.push_str("\n\nALPHABETICAL VST LIST\n");
    out.push_str(&format!("{}\n", "-".repeat(30)));
    let mut names: Vec<&String> = session.usage().keys().collect();
    names.sort();
    for name in names {
        out.push_str(&format!(
            "• {:<35} [{}]\n",
            name,
            session.manufacturer_of(name)
        ));
    }

    out.push_str("\n\nPROJECT BREAKDOWN\n");
    out.push_str(&format!("{}\n", "-".repeat(25)));
    for (path, plugins) in session.projects() {
        let project_name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        out.push_str(&format!("\n{project_name}:\n"));
        let unique: BTreeSet<&String> = plugins.iter().collect();
        for name in unique {
            out.push_str(&format!(
                "  • {:<35} [{}]\n",
                name,
                session.manufacturer_of(name)
            ));
        }
    }

    out
}

/// Writes the full report to `path`. Write failures are hard errors.
pub fn write_report(session: &AuditSession, path: &Path) -> Result<()> {
    let report = render_report(session);
    fs::write(path, report)
        .context(format!("Failed to write report to {}", path.display()))?;
    Ok(())
}

/// Renders the short console summary: totals, the top `top_n` plugins by
/// usage, and a per-manufacturer plugin count.
pub fn render_summary(session: &AuditSession, top_n: usize) -> String {
    let mut out = String::new();

    if session.usage().is_empty() {
        out.push_str("No VST plugins found in the scanned projects.\n");
        return out;
    }

    out.push_str("SCAN RESULTS\n");
    out.push_str(&format!("Projects scanned: {}\n", session.project_count()));
    out.push_str(&format!(
        "Unique VSTs found: {}\n\n",
        session.unique_plugins()
    ));

    out.push_str("TOP VSTs (by usage):\n");
    let ranked = session.usage_ranked();
    for (i, entry) in ranked.iter().take(top_n).enumerate() {
        out.push_str(&format!(
            "{:2}. {} ({}x) [{}]\n",
            i + 1,
            entry.name,
            entry.count,
            entry.manufacturer
        ));
    }
    if ranked.len() > top_n {
        out.push_str(&format!("\n... and {} more\n", ranked.len() - top_n));
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in session.usage().keys() {
        *counts.entry(session.manufacturer_of(name)).or_insert(0) += 1;
    }
    let mut counts: Vec<(&str, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    out.push_str("\nMANUFACTURERS FOUND:\n");
    for (manufacturer, count) in counts {
        out.push_str(&format!("• {manufacturer}: {count} plugin(s)\n"));
    }

    out
}
