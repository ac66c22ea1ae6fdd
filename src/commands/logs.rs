//! Display recent log entries.

use crate::logging::{log_dir, LOG_FILE_PREFIX};
use anyhow::anyhow;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_LINES: usize = 50;

/// Prints the tail of the most recently written log file.
///
/// # Errors
/// - If the log directory cannot be determined or read
pub fn handle_logs() -> Result<(), anyhow::Error> {
    let dir = log_dir()?;
    if !dir.exists() {
        println!("Log directory does not exist yet: {}", dir.display());
        println!("Logs will be created when the recorder runs.");
        return Ok(());
    }

    let Some(log_file) = find_latest_log(&dir)? else {
        println!("No log files found in: {}", dir.display());
        return Ok(());
    };

    let content =
        fs::read_to_string(&log_file).map_err(|e| anyhow!("Failed to read log file: {e}"))?;
    let lines = tail(&content, DEFAULT_LINES);
    if lines.is_empty() {
        println!("Log file is empty: {}", log_file.display());
        return Ok(());
    }

    println!("Log file: {}", log_file.display());
    println!();
    for line in lines {
        println!("{line}");
    }

    Ok(())
}

/// Last `count` lines of `content`.
fn tail(content: &str, count: usize) -> Vec<&str> {
    let lines: Vec<&str> = content.lines().collect();
    lines[lines.len().saturating_sub(count)..].to_vec()
}

/// Most recently modified `taper.log*` file in `dir`.
fn find_latest_log(dir: &Path) -> Result<Option<PathBuf>, anyhow::Error> {
    let entries = fs::read_dir(dir).map_err(|e| anyhow!("Failed to read log directory: {e}"))?;

    let latest = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(LOG_FILE_PREFIX))
        })
        .filter_map(|path| {
            let modified = fs::metadata(&path).ok()?.modified().ok()?;
            Some((path, modified))
        })
        .max_by_key(|(_, modified)| *modified)
        .map(|(path, _)| path);

    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_limits_lines() {
        let content = (1..=60).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let lines = tail(&content, 50);
        assert_eq!(lines.len(), 50);
        assert_eq!(lines[0], "11");
        assert_eq!(tail("a\nb", 50), vec!["a", "b"]);
    }

    #[test]
    fn test_find_latest_log_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_latest_log(dir.path()).unwrap(), None);

        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join("taper.log.2026-10-19"), "x").unwrap();

        assert_eq!(
            find_latest_log(dir.path()).unwrap(),
            Some(dir.path().join("taper.log.2026-10-19"))
        );
    }
}
