//! Command line configuration.

use anyhow::{Context, Result, bail, ensure};
use clap::{Parser, Subcommand};
use reqwest::Url;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::anchor::ShareOrigin;
use crate::cache::SheetCache;
use crate::github::GithubSettings;
use crate::highlight::Highlighter;

pub const DEFAULT_REPO: &str = "JiangWeixian/cheatsheets";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_ORIGIN: &str = "https://jiangweixian-cheatsheets.now.sh";
pub const DEFAULT_NAMESPACE: &str = "jiangweixian-cheatsheets";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Command line configuration for Cheatsheets.
#[derive(Debug, Clone, Parser)]
#[command(name = "cheatsheets", version, about, long_about = None)]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,

    /// Repository holding the issue threads (owner/name)
    #[arg(long, env = "CHEATSHEETS_REPO", default_value = DEFAULT_REPO, global = true)]
    pub repo: String,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_BASE", default_value = DEFAULT_API_BASE, global = true)]
    pub api_base: String,

    /// GitHub token for authenticated requests
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Origin used when composing share links
    #[arg(long, env = "CHEATSHEETS_ORIGIN", default_value = DEFAULT_ORIGIN, global = true)]
    pub origin: String,

    /// Cache namespace
    #[arg(long, env = "CHEATSHEETS_NAMESPACE", default_value = DEFAULT_NAMESPACE, global = true)]
    pub namespace: String,

    /// Seconds a fetched collection stays fresh
    #[arg(long, env = "CHEATSHEETS_CACHE_TTL_SECS", default_value_t = 60, global = true)]
    pub cache_ttl_secs: u64,

    /// Upstream request timeout in milliseconds
    #[arg(long, env = "CHEATSHEETS_TIMEOUT_MS", default_value_t = 10_000, global = true)]
    pub timeout_ms: u64,

    /// Maximum issue pages fetched per collection
    #[arg(long, env = "CHEATSHEETS_MAX_PAGES", default_value_t = 10, global = true)]
    pub max_pages: usize,

    /// Code fence language alias (alias=canonical), repeatable
    #[arg(long = "lang-alias", value_parser = parse_alias, global = true)]
    pub lang_aliases: Vec<(String, String)>,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve cheatsheet pages over HTTP
    Serve {
        /// Address to bind
        #[arg(long, env = "CHEATSHEETS_BIND", default_value = DEFAULT_BIND)]
        bind: String,
    },
    /// Render one cheatsheet page to an HTML file
    Render {
        /// Collection to render
        collection: String,

        /// Anchor id of the entry to highlight
        #[arg(long)]
        active: Option<String>,

        /// Output file
        #[arg(short, long, default_value = "sheet.html")]
        output: PathBuf,
    },
}

impl Config {
    /// Parses configuration from command line arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Validates configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the repository is not `owner/name`, a URL does not
    /// parse or a limit is zero.
    pub fn validate(&self) -> Result<()> {
        self.owner_and_repo()?;
        self.api_base_url()?;
        self.share_origin()?;
        ensure!(self.cache_ttl_secs > 0, "Cache TTL must be greater than 0");
        ensure!(self.timeout_ms > 0, "Timeout must be greater than 0");
        ensure!(self.max_pages > 0, "Max pages must be greater than 0");
        Ok(())
    }

    /// Splits the repository into owner and name.
    ///
    /// # Errors
    ///
    /// Returns error unless the value has exactly one `/` between two
    /// non-empty parts.
    pub fn owner_and_repo(&self) -> Result<(String, String)> {
        match self.repo.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok((owner.to_string(), name.to_string()))
            }
            _ => bail!("Repository must have the form owner/name: {}", self.repo),
        }
    }

    /// Parses the API base URL.
    ///
    /// # Errors
    ///
    /// Returns error if the value is not an http(s) URL.
    pub fn api_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.api_base)
            .with_context(|| format!("Invalid API base URL: {}", self.api_base))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            bail!("API base must use http or https: {}", self.api_base);
        }
        Ok(url)
    }

    /// Parses the share link origin.
    ///
    /// # Errors
    ///
    /// Returns error if the value is not an http(s) URL.
    pub fn share_origin(&self) -> Result<ShareOrigin> {
        ShareOrigin::parse(&self.origin)
    }

    /// Builds GitHub client settings.
    ///
    /// # Errors
    ///
    /// Returns error if the repository or API base is invalid.
    pub fn github_settings(&self) -> Result<GithubSettings> {
        let (owner, repo) = self.owner_and_repo()?;
        Ok(GithubSettings {
            api_base: self.api_base_url()?,
            owner,
            repo,
            token: self.token.clone().filter(|t| !t.trim().is_empty()),
            timeout: Duration::from_millis(self.timeout_ms),
            max_pages: self.max_pages,
        })
    }

    /// Builds an empty cache with the configured namespace and TTL.
    pub fn cache(&self) -> SheetCache {
        SheetCache::new(self.namespace.as_str(), Duration::from_secs(self.cache_ttl_secs))
    }

    /// Builds the code highlighter with the configured aliases.
    pub fn highlighter(&self) -> Highlighter {
        let aliases: HashMap<String, String> = self.lang_aliases.iter().cloned().collect();
        Highlighter::with_aliases(aliases)
    }
}

/// Parses `alias=canonical`.
fn parse_alias(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((alias, canonical)) if !alias.trim().is_empty() && !canonical.trim().is_empty() => {
            Ok((alias.trim().to_string(), canonical.trim().to_string()))
        }
        _ => Err(format!("expected alias=canonical, got `{}`", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["cheatsheets"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).expect("Arguments should parse")
    }

    #[test]
    fn test_config_defaults() {
        // Arrange & Act
        let config = parse(&["render", "rust"]);

        // Assert
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
        assert!(config.lang_aliases.is_empty(), "Alias table defaults to empty");
        match &config.command {
            Command::Render {
                collection,
                active,
                output,
            } => {
                assert_eq!(collection, "rust");
                assert!(active.is_none());
                assert_eq!(output, &PathBuf::from("sheet.html"));
            }
            other => panic!("Unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_config_serve_with_global_flags() {
        // Arrange & Act
        let config = parse(&[
            "serve",
            "--bind",
            "0.0.0.0:8080",
            "--repo",
            "octo/sheets",
            "--origin",
            "http://localhost:8080",
            "--lang-alias",
            "js=javascript",
        ]);

        // Assert
        assert!(matches!(&config.command, Command::Serve { bind } if bind == "0.0.0.0:8080"));
        assert_eq!(
            config.owner_and_repo().unwrap(),
            ("octo".to_string(), "sheets".to_string())
        );
        assert_eq!(
            config.lang_aliases,
            vec![("js".to_string(), "javascript".to_string())]
        );
        assert_eq!(config.highlighter().canonical("js"), "javascript");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_repo() {
        // Arrange
        let mut config = parse(&["render", "rust"]);

        // Act & Assert
        for repo in ["octo", "/sheets", "octo/", "a/b/c"] {
            config.repo = repo.to_string();
            assert!(config.validate().is_err(), "{} should be rejected", repo);
        }
    }

    #[test]
    fn test_validate_rejects_bad_urls_and_limits() {
        // Arrange
        let base = parse(&["render", "rust"]);

        // Act & Assert
        let mut config = base.clone();
        config.origin = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = base.clone();
        config.api_base = "nope".to_string();
        assert!(config.validate().is_err());

        let mut config = base;
        config.max_pages = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_alias() {
        assert_eq!(
            parse_alias("ts=typescript"),
            Ok(("ts".to_string(), "typescript".to_string()))
        );
        assert!(parse_alias("ts").is_err());
        assert!(parse_alias("=rust").is_err());
    }

    #[test]
    fn test_github_settings_drops_blank_token() {
        // Arrange
        let mut config = parse(&["render", "rust"]);
        config.token = Some("  ".to_string());

        // Act
        let settings = config.github_settings().unwrap();

        // Assert
        assert!(settings.token.is_none());
        assert_eq!(settings.timeout, Duration::from_millis(config.timeout_ms));
    }
}
