// User configuration read from ~/.prodboard/rc
//
// Plain `key=value` lines; `#` starts a comment. Known keys:
//   data.location=<path>   database file (relative paths resolve against the rc directory)
//   org=<org id>           tenant every query is scoped to

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_ORG: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_location: PathBuf,
    pub org: String,
}

impl Config {
    /// Directory holding the rc file and default database.
    /// `HOME` wins over the platform lookup so tests can isolate themselves.
    pub fn config_dir() -> Result<PathBuf> {
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .context("Could not determine home directory")?;
        Ok(home.join(".prodboard"))
    }

    /// Load the rc file, falling back to defaults when it does not exist
    pub fn load() -> Result<Self> {
        let dir = Self::config_dir()?;
        let path = dir.join("rc");
        if !path.exists() {
            return Ok(Self::defaults(&dir));
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Ok(Self::parse(&content, &dir))
    }

    fn defaults(dir: &Path) -> Self {
        Self {
            data_location: dir.join("board.db"),
            org: DEFAULT_ORG.to_string(),
        }
    }

    /// Parse rc content. Unknown keys are ignored with a warning.
    pub fn parse(content: &str, dir: &Path) -> Self {
        let mut config = Self::defaults(dir);
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                log::warn!("Ignoring malformed config line: {}", line);
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "data.location" => {
                    let path = PathBuf::from(value);
                    config.data_location = if path.is_relative() { dir.join(path) } else { path };
                }
                "org" => {
                    if !value.is_empty() {
                        config.org = value.to_string();
                    }
                }
                other => log::warn!("Ignoring unknown config key: {}", other),
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let dir = Path::new("/tmp/pb");
        let config = Config::parse("", dir);
        assert_eq!(config.data_location, dir.join("board.db"));
        assert_eq!(config.org, DEFAULT_ORG);
    }

    #[test]
    fn test_parse_keys() {
        let dir = Path::new("/tmp/pb");
        let config = Config::parse(
            "# comment\ndata.location=./custom.db\norg = acme-appraisals\nbogus\ncolor=on\n",
            dir,
        );
        assert_eq!(config.data_location, dir.join("./custom.db"));
        assert_eq!(config.org, "acme-appraisals");
    }

    #[test]
    fn test_absolute_location_kept() {
        let config = Config::parse("data.location=/var/lib/board.db", Path::new("/tmp/pb"));
        assert_eq!(config.data_location, PathBuf::from("/var/lib/board.db"));
    }

    #[test]
    fn test_empty_org_keeps_default() {
        let config = Config::parse("org=", Path::new("/tmp/pb"));
        assert_eq!(config.org, DEFAULT_ORG);
    }
}
