//! OCI config file loading
//!
//! Reads the INI-style file written by `oci setup config` just far enough to
//! find the tenancy OCID for the chosen profile. Request signing and every
//! other credential concern stay with the OCI CLI, which is handed the same
//! file path and profile name.

use crate::error::{ConfigError, Result};
use crate::utils::expand_path;
use std::path::{Path, PathBuf};

pub const DEFAULT_PROFILE: &str = "DEFAULT";

/// `~/.oci/config`, the location `oci setup config` writes to.
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".oci").join("config"))
        .unwrap_or_else(|| PathBuf::from(".oci/config"))
}

/// The resolved settings of one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OciProfile {
    pub name: String,
    pub config_path: PathBuf,
    pub tenancy: String,
    pub region: Option<String>,
}

impl OciProfile {
    /// Load `profile` (default `DEFAULT`) from `path` (default `~/.oci/config`).
    pub fn load(path: Option<&Path>, profile: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => expand_path(p),
            None => default_config_path(),
        };
        let profile = profile.unwrap_or(DEFAULT_PROFILE);

        if !config_path.exists() {
            return Err(ConfigError::NotFound(format!(
                "{} (run 'oci setup config' or pass --config-path)",
                config_path.display()
            ))
            .into());
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::parse(&content, profile, &config_path)
    }

    /// Resolve `profile` from file contents. Keys missing from the profile
    /// fall back to the `[DEFAULT]` section, as the OCI SDKs do.
    pub fn parse(content: &str, profile: &str, config_path: &Path) -> Result<Self> {
        let sections = parse_ini(content)?;
        let lookup = |section: &str| sections.iter().find(|(name, _)| name == section);

        let selected = lookup(profile).ok_or_else(|| ConfigError::ProfileNotFound {
            profile: profile.to_string(),
            path: config_path.display().to_string(),
        })?;
        let defaults = lookup(DEFAULT_PROFILE);

        let get = |key: &str| -> Option<String> {
            selected
                .1
                .iter()
                .chain(defaults.map(|d| d.1.iter()).into_iter().flatten())
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .filter(|v| !v.is_empty())
        };

        let tenancy = get("tenancy").ok_or_else(|| {
            ConfigError::MissingField(format!(
                "tenancy (profile '{}' in {})",
                profile,
                config_path.display()
            ))
        })?;

        Ok(Self {
            name: profile.to_string(),
            config_path: config_path.to_path_buf(),
            tenancy,
            region: get("region"),
        })
    }

    /// Profile name, tenancy preview and region, for the startup log line.
    pub fn describe(&self) -> String {
        format!(
            "{} (tenancy {}..., region {})",
            self.name,
            self.tenancy_preview(),
            self.region.as_deref().unwrap_or("not set")
        )
    }

    /// The first 20 characters of the tenancy OCID, for log lines.
    pub fn tenancy_preview(&self) -> &str {
        match self.tenancy.char_indices().nth(20) {
            Some((idx, _)) => &self.tenancy[..idx],
            None => &self.tenancy,
        }
    }
}

type Section = (String, Vec<(String, String)>);

fn parse_ini(content: &str) -> Result<Vec<Section>> {
    let mut sections: Vec<Section> = Vec::new();

    for (lineno, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[') {
            let name = name.strip_suffix(']').ok_or_else(|| {
                ConfigError::ParseError(format!(
                    "line {}: unterminated section header '{}'",
                    lineno + 1,
                    line
                ))
            })?;
            sections.push((name.trim().to_string(), Vec::new()));
            continue;
        }

        let (key, value) = line.split_once('=').ok_or_else(|| {
            ConfigError::ParseError(format!("line {}: expected key=value", lineno + 1))
        })?;
        let section = sections.last_mut().ok_or_else(|| {
            ConfigError::ParseError(format!(
                "line {}: key '{}' appears before any [section]",
                lineno + 1,
                key.trim()
            ))
        })?;
        section
            .1
            .push((key.trim().to_string(), value.trim().to_string()));
    }

    Ok(sections)
}
