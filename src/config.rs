//! Configuration file loading
//!
//! Runs are described by a TOML file: the GitLab root groups to crawl, any
//! explicitly seeded projects (optionally with their own token), and
//! anonymous projects synced without credentials.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::provider::ProjectNode;

const TOKEN_ENV_VAR: &str = "GITLAB_TOKEN";
const FALLBACK_DEFAULT_BRANCH: &str = "main";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unable to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("no configuration file found at {path}")]
    Missing { path: PathBuf },
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gitlab: GitlabConfig,
    #[serde(default)]
    pub anon: AnonConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct GitlabConfig {
    /// Token used for provider and sync calls; `GITLAB_TOKEN` wins over this
    pub token: Option<String>,
    /// GitLab host, defaults to gitlab.com
    pub host: Option<String>,
    /// Branch the executor is willing to fast-forward, defaults to "main"
    pub default_branch: Option<String>,
    #[serde(default)]
    pub groups: Vec<RootGroup>,
    #[serde(default)]
    pub projects: Vec<SeedProject>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnonConfig {
    #[serde(default)]
    pub projects: Vec<SeedProject>,
}

/// A configured root of the crawl.
#[derive(Debug, Deserialize)]
pub struct RootGroup {
    pub group: String,
    pub location: PathBuf,
}

/// An explicitly seeded project, synced without being discovered.
#[derive(Debug, Deserialize)]
pub struct SeedProject {
    pub url: String,
    pub location: PathBuf,
    pub token: Option<String>,
    pub default_branch: Option<String>,
}

impl Config {
    /// Loads the configuration from `path`, or from the default location
    /// (`~/.config/grove/grove.toml`) when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => default_config_path(),
        };
        if !path.exists() {
            return Err(ConfigError::Missing { path });
        }
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
    }

    /// The run-wide credential: environment variable first, config second.
    pub fn resolved_token(&self) -> Option<String> {
        std::env::var(TOKEN_ENV_VAR)
            .ok()
            .filter(|token| !token.is_empty())
            .or_else(|| self.gitlab.token.clone())
    }

    /// Builds the explicitly seeded project nodes.
    ///
    /// GitLab-section projects fall back to the run-wide token when they
    /// carry none of their own; anonymous projects never get a token.
    pub fn seed_projects(&self, run_token: Option<&str>) -> Vec<ProjectNode> {
        let default_branch = self
            .gitlab
            .default_branch
            .as_deref()
            .unwrap_or(FALLBACK_DEFAULT_BRANCH);

        let mut seeds = Vec::new();
        for seed in &self.gitlab.projects {
            let token = seed
                .token
                .clone()
                .or_else(|| run_token.map(str::to_string));
            seeds.push(
                ProjectNode::new(seed.url.clone(), &seed.location)
                    .with_token(token)
                    .with_default_branch(seed.default_branch.as_deref().unwrap_or(default_branch)),
            );
        }
        for seed in &self.anon.projects {
            seeds.push(
                ProjectNode::new(seed.url.clone(), &seed.location)
                    .with_default_branch(seed.default_branch.as_deref().unwrap_or(default_branch)),
            );
        }
        seeds
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("grove")
        .join("grove.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [gitlab]
        token = "cfg-token"
        default_branch = "master"

        [[gitlab.groups]]
        group = "teamA"
        location = "/tmp/teamA"

        [[gitlab.projects]]
        url = "https://gitlab.com/me/thing.git"
        location = "/tmp/thing"
        token = "project-token"

        [[anon.projects]]
        url = "https://github.com/foo/bar.git"
        location = "/tmp/bar"
    "#;

    #[test]
    fn test_parse_sample() {
        let config: Config = toml::from_str(SAMPLE).expect("sample parses");
        assert_eq!(config.gitlab.groups.len(), 1);
        assert_eq!(config.gitlab.groups[0].group, "teamA");
        assert_eq!(config.gitlab.projects.len(), 1);
        assert_eq!(config.anon.projects.len(), 1);
    }

    #[test]
    fn test_seed_projects_token_precedence() {
        let config: Config = toml::from_str(SAMPLE).expect("sample parses");
        let seeds = config.seed_projects(Some("run-token"));
        assert_eq!(seeds.len(), 2);

        // Per-project token wins over the run-wide one
        assert_eq!(seeds[0].token.as_deref(), Some("project-token"));
        // Anonymous projects never get a token attached
        assert_eq!(seeds[1].token, None);
    }

    #[test]
    fn test_seed_projects_fall_back_to_run_token() {
        let config: Config = toml::from_str(
            r#"
            [[gitlab.projects]]
            url = "https://gitlab.com/me/thing.git"
            location = "/tmp/thing"
            "#,
        )
        .expect("parses");
        let seeds = config.seed_projects(Some("run-token"));
        assert_eq!(seeds[0].token.as_deref(), Some("run-token"));
        assert_eq!(seeds[0].default_branch, "main");
    }

    #[test]
    fn test_default_branch_propagates() {
        let config: Config = toml::from_str(SAMPLE).expect("sample parses");
        let seeds = config.seed_projects(None);
        assert_eq!(seeds[0].default_branch, "master");
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config: Config = toml::from_str("").expect("empty config parses");
        assert!(config.gitlab.groups.is_empty());
        assert!(config.seed_projects(None).is_empty());
    }
}
