use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use walkdir::WalkDir;

/// One crash report found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrashReportEntry {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Search the platform's diagnostic-reports directories for recent reports.
///
/// Matches `.ips`/`.crash` files whose name contains `process_hint`
/// (case-insensitive) and whose modification time falls within the last
/// `within_minutes`. Returns newest-first; an unreadable directory yields an
/// empty result, never an error.
#[must_use]
pub fn find_recent_reports(process_hint: &str, within_minutes: u64) -> Vec<CrashReportEntry> {
    let mut roots: Vec<PathBuf> = Vec::new();
    if let Some(home) = std::env::var_os("HOME") {
        roots.push(PathBuf::from(home).join("Library/Logs/DiagnosticReports"));
    }
    roots.push(PathBuf::from("/Library/Logs/DiagnosticReports"));
    find_recent_reports_in(&roots, process_hint, within_minutes)
}

/// [`find_recent_reports`] over caller-supplied report directories.
#[must_use]
pub fn find_recent_reports_in(
    roots: &[PathBuf],
    process_hint: &str,
    within_minutes: u64,
) -> Vec<CrashReportEntry> {
    let cutoff = SystemTime::now().checked_sub(Duration::from_secs(within_minutes * 60));
    let hint = process_hint.to_lowercase();
    let mut entries: Vec<CrashReportEntry> = Vec::new();

    for root in roots {
        for entry in WalkDir::new(root)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !is_crash_report(path) {
                continue;
            }
            let name_matches = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.to_lowercase().contains(&hint));
            if !name_matches {
                continue;
            }

            let Some(modified) = entry.metadata().ok().and_then(|meta| meta.modified().ok())
            else {
                continue;
            };
            if let Some(cutoff) = cutoff {
                if modified < cutoff {
                    continue;
                }
            }

            entries.push(CrashReportEntry {
                path: path.to_path_buf(),
                modified,
            });
        }
    }

    entries.sort_by(|a, b| b.modified.cmp(&a.modified));
    log::debug!(
        "found {} crash reports matching '{process_hint}' within {within_minutes}m",
        entries.len()
    );
    entries
}

fn is_crash_report(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ips") || ext.eq_ignore_ascii_case("crash"))
}
