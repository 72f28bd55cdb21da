//! Human-readable formatter.

use colored::*;
use depsift_core::{Message, Report, Severity, Stats, VersionChange};
use std::fmt::Write;

pub struct HumanFormatter;

const SECTIONS: [(Severity, &str, &str); 3] = [
    (Severity::Error, "Errors", "✖"),
    (Severity::Warning, "Warnings", "⚠"),
    (Severity::Suggestion, "Suggestions", "💡"),
];

pub fn render_report(report: &Report) -> String {
    let mut out = String::new();
    let info = &report.info;
    let stats = &report.stats;

    let _ = writeln!(
        out,
        "\n📦 {} {}",
        format!("{}@{}", info.name, info.version).bold(),
        format!("({})", info.module_type).bright_black()
    );
    let _ = writeln!(out, "\n{}", "Stats:".bold());
    for (label, value) in stat_rows(stats) {
        let _ = writeln!(out, "  {:<26} {}", label, value.cyan());
    }

    if report.messages.is_empty() {
        let _ = writeln!(out, "\n{} No issues found", "✓".green());
        return out;
    }

    for (severity, title, icon) in SECTIONS {
        let messages: Vec<&Message> = report.messages_with(severity).collect();
        if messages.is_empty() {
            continue;
        }

        let _ = writeln!(out, "\n{}", format!("{} ({}):", title, messages.len()).bold());
        for message in messages {
            let icon = match severity {
                Severity::Error => icon.red(),
                Severity::Warning => icon.yellow(),
                Severity::Suggestion => icon.blue(),
            };
            let mut lines = message.message.lines();
            if let Some(first) = lines.next() {
                let _ = writeln!(out, "  {} {}", icon, highlight(first));
            }
            for line in lines {
                let _ = writeln!(out, "    {}", line.bright_black());
            }
            if let Some(fix) = &message.fixable_by {
                let _ = writeln!(out, "    fixable by: {}", fix.green());
            }
        }
    }

    out
}

fn highlight(line: &str) -> String {
    match line.strip_prefix("[duplicate dependency]") {
        Some(rest) => format!("{}{}", "[duplicate dependency]".yellow(), rest),
        None => line.to_string(),
    }
}

fn stat_rows(stats: &Stats) -> Vec<(String, String)> {
    let counts = &stats.dependency_count;
    let mut rows = Vec::new();

    if let Some(size) = stats.install_size {
        rows.push(("Install size".to_string(), format_bytes(size)));
    }
    rows.push(("Production dependencies".to_string(), counts.production.to_string()));
    rows.push(("Development dependencies".to_string(), counts.development.to_string()));
    for (label, value) in [
        ("CommonJS packages", counts.cjs),
        ("ESM packages", counts.esm),
        ("Duplicate packages", counts.duplicate),
    ] {
        if let Some(value) = value {
            rows.push((label.to_string(), value.to_string()));
        }
    }
    for stat in &stats.extra_stats {
        rows.push((stat.display_name().to_string(), stat.value.to_string()));
    }

    rows
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

pub fn render_diff(changes: &[VersionChange]) -> String {
    if changes.is_empty() {
        return format!("{} No installed version changes\n", "✓".green());
    }

    let mut out = format!("{}\n", format!("Version changes ({}):", changes.len()).bold());
    for change in changes {
        let marker = match (change.previous.is_empty(), change.current.is_empty()) {
            (true, _) => "+".green(),
            (_, true) => "-".red(),
            _ => "~".yellow(),
        };
        let _ = write!(out, "  {} {}", marker, change.name.bold());
        let removed: Vec<&str> = change.removed().map(String::as_str).collect();
        let added: Vec<&str> = change.added().map(String::as_str).collect();
        if !removed.is_empty() {
            let _ = write!(out, " {}", format!("-{}", removed.join(", -")).red());
        }
        if !added.is_empty() {
            let _ = write!(out, " {}", format!("+{}", added.join(", +")).green());
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use depsift_core::{ModuleType, PackageInfo, Stat};
    use std::collections::BTreeSet;

    fn plain() {
        colored::control::set_override(false);
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_report_groups_by_severity() {
        plain();
        let mut stats = Stats::default();
        stats.extra_stats.push(Stat::new("totalPackages", "Total packages", 5usize));

        let report = Report {
            info: PackageInfo {
                name: "app".to_string(),
                version: "1.0.0".to_string(),
                module_type: ModuleType::Dual,
            },
            stats,
            messages: vec![
                Message::new(Severity::Suggestion, "set engines"),
                Message::new(
                    Severity::Warning,
                    "[duplicate dependency] x has 2 installed versions:\n1.0.0 via the following 1 package(s) a@1.0.0",
                ),
            ],
        };

        let out = render_report(&report);
        assert!(out.contains("📦 app@1.0.0 (dual CommonJS/ESM)"));
        assert!(out.contains("Total packages"));
        assert!(out.contains("Duplicate packages"));
        assert!(!out.contains("Errors"));

        let warnings = out.find("Warnings (1):").unwrap();
        let suggestions = out.find("Suggestions (1):").unwrap();
        assert!(warnings < suggestions);
        assert!(out.contains("    1.0.0 via the following 1 package(s) a@1.0.0"));
    }

    #[test]
    fn test_clean_report() {
        plain();
        let report = Report {
            info: PackageInfo::default(),
            stats: Stats::default(),
            messages: Vec::new(),
        };
        assert!(render_report(&report).contains("No issues found"));
    }

    #[test]
    fn test_render_diff() {
        plain();
        let changes = vec![
            VersionChange {
                name: "added".to_string(),
                previous: BTreeSet::new(),
                current: set(&["1.0.0"]),
            },
            VersionChange {
                name: "changed".to_string(),
                previous: set(&["1.0.0", "2.0.0"]),
                current: set(&["2.0.0", "3.0.0"]),
            },
        ];

        let out = render_diff(&changes);
        assert!(out.contains("Version changes (2):"));
        assert!(out.contains("+ added +1.0.0"));
        assert!(out.contains("~ changed -1.0.0 +3.0.0"));
        assert!(render_diff(&[]).contains("No installed version changes"));
    }
}
