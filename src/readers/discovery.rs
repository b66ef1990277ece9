use crate::error::{ProcessingError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Walk `root` recursively and collect table exports whose file name
/// starts with `prefix` and whose extension matches `extension`
/// (case-insensitive). Results are sorted for a stable processing order.
pub fn discover_tables(root: &Path, prefix: &str, extension: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ProcessingError::source_unavailable(
            root,
            "not a readable directory",
        ));
    }

    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), "Skipping unreadable directory: {}", e);
                continue;
            }
        };

        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if matches_table(&path, prefix, extension) {
                found.push(path);
            }
        }
    }

    found.sort();
    tracing::debug!(root = %root.display(), tables = found.len(), "Discovered tables");
    Ok(found)
}

fn matches_table(path: &Path, prefix: &str, extension: &str) -> bool {
    let name_matches = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(prefix));

    let extension_matches = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension));

    name_matches && extension_matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_tables() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        fs::create_dir_all(root.join("EFHK"))?;
        fs::create_dir_all(root.join("SQL"))?;

        fs::write(root.join("EFHK").join("EFHK_obst.csv"), "ID\n")?;
        fs::write(root.join("EFTP_obst.CSV"), "ID\n")?;
        fs::write(root.join("SQL").join("query.csv"), "ID\n")?;
        fs::write(root.join("EFKE_notes.txt"), "notes")?;

        let tables = discover_tables(root, "E", "csv")?;
        let names: Vec<_> = tables
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(tables.len(), 2);
        assert!(names.contains(&"EFHK_obst.csv".to_string()));
        assert!(names.contains(&"EFTP_obst.CSV".to_string()));

        Ok(())
    }

    #[test]
    fn test_missing_root() {
        assert!(matches!(
            discover_tables(Path::new("/no/such/root"), "E", "csv"),
            Err(ProcessingError::SourceUnavailable { .. })
        ));
    }
}
