use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Expand a leading `~` to the home directory.
pub fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref())
}

#[cfg(target_os = "macos")]
const OPENERS: &[(&str, &[&str])] = &[("open", &[])];

#[cfg(windows)]
const OPENERS: &[(&str, &[&str])] = &[("cmd", &["/C", "start", ""])];

#[cfg(not(any(target_os = "macos", windows)))]
const OPENERS: &[(&str, &[&str])] = &[("xdg-open", &[]), ("gio", &["open"]), ("wslview", &[])];

/// The platform command that opens a file with its default application.
fn opener() -> Option<(PathBuf, Vec<&'static str>)> {
    OPENERS
        .iter()
        .find_map(|(program, args)| which::which(program).ok().map(|p| (p, args.to_vec())))
}

/// Open `path` in the default browser without waiting for it.
pub fn open_in_browser(path: &Path) -> Result<()> {
    let path = path
        .canonicalize()
        .with_context(|| format!("Report not found: {}", path.display()))?;
    let (program, args) = opener().context("No browser launcher found on PATH")?;

    Command::new(&program)
        .args(args)
        .arg(&path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to run {}", program.display()))?;
    Ok(())
}
