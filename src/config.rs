use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Translation
    pub default_lang: String,

    // Phrase packages, lowest precedence first
    pub package_dirs: Vec<PathBuf>,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            default_lang: std::env::var("DEFAULT_LANG")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "en".to_string()),

            package_dirs: parse_package_dirs(
                &std::env::var("LANG_PACKAGE_DIRS").unwrap_or_else(|_| ".".to_string()),
            ),

            port: match std::env::var("PORT") {
                Ok(v) => v.parse().with_context(|| format!("Invalid PORT: {}", v))?,
                Err(_) => 8080,
            },
        })
    }
}

/// Split a comma-separated directory list, dropping empty entries
fn parse_package_dirs(value: &str) -> Vec<PathBuf> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_package_dirs() {
        assert_eq!(
            parse_package_dirs(".,  ./node_modules/core ,,/opt/addon"),
            vec![
                PathBuf::from("."),
                PathBuf::from("./node_modules/core"),
                PathBuf::from("/opt/addon"),
            ]
        );
    }

    #[test]
    fn test_parse_package_dirs_empty() {
        assert!(parse_package_dirs("").is_empty());
        assert!(parse_package_dirs(" , ").is_empty());
    }
}
