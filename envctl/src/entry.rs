use anyhow::{bail, ensure, Context, Result};
use container_runtime::{Entrypoint, Shell};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const DEFAULT_PROJECT_DIRECTORY: &str = "/project";

fn default_directory() -> String {
    DEFAULT_PROJECT_DIRECTORY.to_string()
}

/// A resolved run entry: which image provides a command and how to call it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub image: String,
    #[serde(default)]
    pub entrypoint: Entrypoint,
    #[serde(default)]
    pub shell: Shell,
    /// Where the project directory is mounted inside the container.
    #[serde(default = "default_directory")]
    pub directory: String,
    #[serde(default, rename = "before_script")]
    pub before_script: Vec<String>,
    #[serde(default)]
    pub container_runtime_access: bool,
    #[serde(default)]
    pub cap_add: Vec<String>,
    #[serde(default, rename = "cache")]
    pub caching: Vec<CacheEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheEntry {
    pub name: String,
    /// Directory inside the container backed by the host cache folder.
    #[serde(rename = "directory")]
    pub container_directory: String,
}

impl RunEntry {
    /// Minimal entry for `--image` runs without an entry file.
    pub fn for_image(image: impl Into<String>) -> Self {
        Self {
            name: None,
            description: None,
            image: image.into(),
            entrypoint: Entrypoint::ImageDefault,
            shell: Shell::None,
            directory: default_directory(),
            before_script: Vec::new(),
            container_runtime_access: false,
            cap_add: Vec::new(),
            caching: Vec::new(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read run entry '{}'", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid run entry '{}'", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let entry: RunEntry =
            serde_yaml::from_str(raw).context("Failed to parse run entry YAML")?;
        entry.validate()?;
        Ok(entry)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.image.trim().is_empty(), "Run entry must declare an image");
        ensure!(
            self.directory.starts_with('/'),
            "Run entry directory '{}' must be an absolute container path",
            self.directory
        );

        let mut cache_names = HashSet::new();
        for cache in &self.caching {
            if cache.name.trim().is_empty() || cache.name.contains(['/', '\\']) {
                bail!("Cache name '{}' must be a plain directory name", cache.name);
            }
            if !cache_names.insert(cache.name.as_str()) {
                bail!("Duplicate cache name '{}'", cache.name);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_entry() {
        let entry = RunEntry::parse(
            r#"
name: gradle
description: Gradle build tool
image: gradle:8-jdk17
entrypoint: /usr/bin/gradle
shell: bash
directory: /workspace
before_script:
  - export GRADLE_OPTS="-Dhttp.proxyHost={HTTPProxy}"
containerRuntimeAccess: true
capAdd:
  - SYS_PTRACE
cache:
  - name: gradle
    directory: /root/.gradle
"#,
        )
        .unwrap();

        assert_eq!(entry.image, "gradle:8-jdk17");
        assert_eq!(
            entry.entrypoint,
            Entrypoint::Override("/usr/bin/gradle".to_string())
        );
        assert_eq!(entry.shell, Shell::Bash);
        assert_eq!(entry.directory, "/workspace");
        assert_eq!(entry.before_script.len(), 1);
        assert!(entry.container_runtime_access);
        assert_eq!(entry.cap_add, vec!["SYS_PTRACE".to_string()]);
        assert_eq!(
            entry.caching,
            vec![CacheEntry {
                name: "gradle".to_string(),
                container_directory: "/root/.gradle".to_string(),
            }]
        );
    }

    #[test]
    fn defaults_apply() {
        let entry = RunEntry::parse("image: alpine:latest\n").unwrap();
        assert_eq!(entry, RunEntry::for_image("alpine:latest"));
        assert_eq!(entry.entrypoint, Entrypoint::ImageDefault);
        assert_eq!(entry.directory, DEFAULT_PROJECT_DIRECTORY);
    }

    #[test]
    fn rejects_bad_entries() {
        assert!(RunEntry::parse("image: ''\n").is_err());
        assert!(RunEntry::parse("image: alpine\ndirectory: relative\n").is_err());
        assert!(RunEntry::parse("image: alpine\nshell: fish\n").is_err());
        let dup = "image: alpine\ncache:\n  - {name: a, directory: /a}\n  - {name: a, directory: /b}\n";
        let err = RunEntry::parse(dup).unwrap_err();
        assert!(format!("{err:#}").contains("Duplicate cache name 'a'"));
    }
}
