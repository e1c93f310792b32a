//! Section-preserving updates to INI-style profile files (`~/.aws/credentials`).
//!
//! Only the target section's own keys are touched. Other sections, comments
//! and blank lines are carried over line for line.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use chrono::SecondsFormat;
use tempfile::NamedTempFile;

use super::Credential;

/// Write `credential` into the `[section]` of the profile file at `path`,
/// creating the file (and its directory) if needed.
pub fn write_credential(credential: &Credential, path: &Path, section: &str) -> io::Result<()> {
    let expiration = credential
        .expiration
        .to_rfc3339_opts(SecondsFormat::Secs, true);
    let entries = [
        ("aws_access_key_id", credential.access_key_id.as_str()),
        ("aws_secret_access_key", credential.secret_access_key.as_str()),
        ("aws_session_token", credential.session_token.as_str()),
        ("aws_expiration", expiration.as_str()),
    ];
    write_section(path, section, &entries)
}

/// Read-modify-write one section of the file at `path`.
pub fn write_section(path: &Path, section: &str, entries: &[(&str, &str)]) -> io::Result<()> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };

    let updated = upsert_section(&existing, section, entries);

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    // Temp file in the same directory (created 0600 on unix), renamed over the target.
    // It is removed if anything fails before the rename.
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(updated.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Return `content` with `[section]` holding `entries`. Keys of that section
/// not named in `entries` are kept.
pub fn upsert_section(content: &str, section: &str, entries: &[(&str, &str)]) -> String {
    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();

    match find_section(&lines, section) {
        Some((start, end)) => {
            let mut written: Vec<&str> = Vec::new();
            let mut last_key_line = start;
            let mut drop_lines = Vec::new();

            for (i, line) in lines.iter_mut().enumerate().take(end).skip(start + 1) {
                let Some(key) = line_key(line) else {
                    continue;
                };
                last_key_line = i;
                if written.iter().any(|w| *w == key) {
                    // Duplicate of a key we already set would shadow it.
                    drop_lines.push(i);
                    continue;
                }
                if let Some((k, v)) = entries.iter().find(|(k, _)| *k == key) {
                    *line = format!("{} = {}", k, v);
                    written.push(*k);
                }
            }

            let missing: Vec<String> = entries
                .iter()
                .filter(|(k, _)| !written.contains(k))
                .map(|(k, v)| format!("{} = {}", k, v))
                .collect();
            let insert_at = last_key_line + 1;
            lines.splice(insert_at..insert_at, missing);

            // Indices before insert_at are unaffected by the splice above,
            // later ones shift by the number of inserted lines.
            let shift = entries.len() - written.len();
            for i in drop_lines.into_iter().rev() {
                let idx = if i >= insert_at { i + shift } else { i };
                lines.remove(idx);
            }
        }
        None => {
            if lines.last().is_some_and(|l| !l.trim().is_empty()) {
                lines.push(String::new());
            }
            lines.push(format!("[{}]", section));
            lines.extend(entries.iter().map(|(k, v)| format!("{} = {}", k, v)));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Locate `[section]`: (header line index, index one past its last line).
fn find_section(lines: &[String], section: &str) -> Option<(usize, usize)> {
    let start = lines
        .iter()
        .position(|l| section_name(l).is_some_and(|name| name == section))?;
    let end = lines[start + 1..]
        .iter()
        .position(|l| section_name(l).is_some())
        .map(|offset| start + 1 + offset)
        .unwrap_or(lines.len());
    Some((start, end))
}

fn section_name(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
}

fn line_key(line: &str) -> Option<String> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') || trimmed.starts_with(';') {
        return None;
    }
    trimmed
        .split_once('=')
        .map(|(key, _)| key.trim().to_string())
        .filter(|key| !key.is_empty())
}
