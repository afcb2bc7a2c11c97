//! File helpers shared by the ledger store and the configuration manager.

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};

pub const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Sibling path used for staging writes, e.g. `data.json.tmp`.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `data` to a staging file and renames it over `path`, so readers see
/// either the old or the new contents.
pub fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    {
        let mut file = File::create(&tmp)?;
        file.write_all(data.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)
}

/// Builds `<prefix>_<timestamp>[_<note>].json`.
pub fn backup_file_name(prefix: &str, note: Option<&str>, at: DateTime<Utc>) -> String {
    let mut name = format!("{prefix}_{}", at.format(BACKUP_TIMESTAMP_FORMAT));
    if let Some(label) = sanitize_note(note) {
        name.push('_');
        name.push_str(&label);
    }
    name.push('.');
    name.push_str(BACKUP_EXTENSION);
    name
}

/// Returns `name` if nothing in `dir` uses it yet, otherwise the first free
/// `<stem>_2.json`, `<stem>_3.json`, ...
pub fn unique_backup_name(dir: &Path, name: String) -> String {
    if !dir.join(&name).exists() {
        return name;
    }
    let stem = name
        .strip_suffix(&format!(".{BACKUP_EXTENSION}"))
        .unwrap_or(name.as_str())
        .to_string();
    (2u32..)
        .map(|n| format!("{stem}_{n}.{BACKUP_EXTENSION}"))
        .find(|candidate| !dir.join(candidate).exists())
        .unwrap_or(name)
}

/// Backup file names in `dir` carrying `prefix`, newest first.
pub fn list_backup_files(dir: &Path, prefix: &str) -> io::Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if parse_backup_timestamp(name, prefix).is_some() {
            entries.push(name.to_string());
        }
    }
    entries.sort_by(|a, b| {
        parse_backup_timestamp(b, prefix)
            .cmp(&parse_backup_timestamp(a, prefix))
            .then_with(|| b.cmp(a))
    });
    Ok(entries)
}

/// Deletes all but the newest `retention` backups. Returns how many were removed.
pub fn prune_backups(dir: &Path, prefix: &str, retention: usize) -> io::Result<usize> {
    let backups = list_backup_files(dir, prefix)?;
    let mut removed = 0;
    for name in backups.iter().skip(retention.max(1)) {
        if fs::remove_file(dir.join(name)).is_ok() {
            removed += 1;
        }
    }
    Ok(removed)
}

/// Rejects names that could escape the backup directory.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(['/', '\\'])
        && name != "."
        && name != ".."
        && !name.starts_with('.')
}

pub fn parse_backup_timestamp(name: &str, prefix: &str) -> Option<DateTime<Utc>> {
    let rest = name.strip_prefix(prefix)?.strip_prefix('_')?;
    let stem = rest.strip_suffix(&format!(".{BACKUP_EXTENSION}"))?;
    let raw = stem.get(..15)?;
    NaiveDateTime::parse_from_str(raw, BACKUP_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

fn sanitize_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn backup_names_embed_timestamp_and_note() {
        let at = Utc.with_ymd_and_hms(2025, 4, 2, 9, 30, 5).unwrap();
        let name = backup_file_name("ledger", Some("Before Import!"), at);
        assert_eq!(name, "ledger_20250402_093005_before-import.json");
        assert_eq!(parse_backup_timestamp(&name, "ledger"), Some(at));
        assert_eq!(parse_backup_timestamp(&name, "config"), None);
    }

    #[test]
    fn atomic_write_leaves_no_staging_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("data.json");
        write_atomic(&path, "{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn prune_keeps_newest() {
        let temp = TempDir::new().unwrap();
        for minute in 0..4 {
            let at = Utc.with_ymd_and_hms(2025, 1, 1, 10, minute, 0).unwrap();
            write_atomic(&temp.path().join(backup_file_name("ledger", None, at)), "{}").unwrap();
        }
        assert_eq!(prune_backups(temp.path(), "ledger", 2).unwrap(), 2);
        let left = list_backup_files(temp.path(), "ledger").unwrap();
        assert_eq!(
            left,
            vec!["ledger_20250101_100300.json", "ledger_20250101_100200.json"]
        );
    }

    #[test]
    fn same_second_names_get_a_counter() {
        let temp = TempDir::new().unwrap();
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();
        let first = unique_backup_name(temp.path(), backup_file_name("ledger", Some("x"), at));
        assert_eq!(first, "ledger_20250101_100000_x.json");
        write_atomic(&temp.path().join(&first), "{}").unwrap();

        let second = unique_backup_name(temp.path(), backup_file_name("ledger", Some("x"), at));
        assert_eq!(second, "ledger_20250101_100000_x_2.json");
        write_atomic(&temp.path().join(&second), "{}").unwrap();
        assert_eq!(
            unique_backup_name(temp.path(), first.clone()),
            "ledger_20250101_100000_x_3.json"
        );
        assert_eq!(list_backup_files(temp.path(), "ledger").unwrap(), vec![second, first]);
    }

    #[test]
    fn rejects_path_like_names() {
        assert!(is_plain_file_name("ledger_20250101_100300.json"));
        assert!(!is_plain_file_name("../data.json"));
        assert!(!is_plain_file_name(""));
    }
}
