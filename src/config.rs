//! Site configuration management.
//!
//! Handles loading, parsing, and validating the `postdex.toml` configuration file.

use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Default values for serde deserialization
pub mod config_defaults {
    pub mod base {
        pub fn url() -> Option<String> {
            None
        }
        pub fn author() -> String {
            "<YOUR_NAME>".into()
        }
        pub fn email() -> String {
            "user@noreply.postdex".into()
        }
        pub fn language() -> String {
            "en".into()
        }
    }

    pub mod build {
        use std::path::PathBuf;

        pub fn root() -> Option<PathBuf> {
            None
        }
        pub fn pages() -> PathBuf {
            "pages".into()
        }
        pub fn extension() -> String {
            ".mdx".into()
        }
        pub fn listing() -> PathBuf {
            "posts.gen.js".into()
        }
        pub fn feed() -> PathBuf {
            "feed.xml".into()
        }
    }
}

/// `[base]` section in postdex.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site title
    pub title: String,

    /// Site description
    pub description: String,

    /// Base URL for feed links, e.g.: "https://example.com"
    #[serde(default = "config_defaults::base::url")]
    #[educe(Default = config_defaults::base::url())]
    pub url: Option<String>,

    /// Language code, e.g.: "en", "zh-Hans"
    #[serde(default = "config_defaults::base::language")]
    #[educe(Default = config_defaults::base::language())]
    pub language: String,

    /// Author name, e.g.: "Bob"
    #[serde(default = "config_defaults::base::author")]
    #[educe(Default = config_defaults::base::author())]
    pub author: String,

    /// Author email, e.g.: "bob@example.com"
    #[serde(default = "config_defaults::base::email")]
    #[educe(Default = config_defaults::base::email())]
    pub email: String,
}

/// `[build]` section in postdex.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Root directory path
    #[serde(default = "config_defaults::build::root")]
    #[educe(Default = config_defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Published-pages directory (relative to root); also the prefix
    /// stripped from source paths when deriving URL paths
    #[serde(default = "config_defaults::build::pages")]
    #[educe(Default = config_defaults::build::pages())]
    pub pages: PathBuf,

    /// Source file extension, matched as a case-sensitive suffix
    #[serde(default = "config_defaults::build::extension")]
    #[educe(Default = config_defaults::build::extension())]
    pub extension: String,

    /// Output path for the generated listing module (relative to root)
    #[serde(default = "config_defaults::build::listing")]
    #[educe(Default = config_defaults::build::listing())]
    pub listing: PathBuf,

    /// Output path for the RSS feed file (relative to root)
    #[serde(default = "config_defaults::build::feed")]
    #[educe(Default = config_defaults::build::feed())]
    pub feed: PathBuf,
}

/// Root configuration structure representing postdex.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf());
    }

    /// Published-pages directory joined onto the root
    pub fn pages_dir(&self) -> PathBuf {
        self.get_root().join(&self.build.pages)
    }

    /// Listing artifact output path joined onto the root
    pub fn listing_path(&self) -> PathBuf {
        self.get_root().join(&self.build.listing)
    }

    /// Feed artifact output path joined onto the root
    pub fn feed_path(&self) -> PathBuf {
        self.get_root().join(&self.build.feed)
    }

    /// Validate configuration before a build
    pub fn validate(&self) -> Result<()> {
        let Some(base_url) = &self.base.url else {
            bail!("[base.url] is required for feed generation");
        };

        if !base_url.starts_with("http") {
            bail!(ConfigError::Validation(
                "[base.url] must start with http:// or https://".into()
            ));
        }

        if !self.build.extension.starts_with('.') {
            bail!(ConfigError::Validation(
                "[build.extension] must start with a dot, e.g.: \".mdx\"".into()
            ));
        }

        Ok(())
    }
}

#[test]
fn validate_base_config() {
    let config = r#"
        [base]
        title = "Alice"
        description = "Alice's Blog"
        url = "https://alice.example.com"
        language = "en_US"
    "#;
    let config: SiteConfig = SiteConfig::from_str(config).unwrap();

    assert_eq!(config.base.title, "Alice");
    assert_eq!(config.base.description, "Alice's Blog");
    assert_eq!(config.base.url, Some("https://alice.example.com".to_string()));
    assert_eq!(config.base.language, "en_US");
}

#[test]
fn test_base_config_defaults() {
    let config = r#"
        [base]
        title = "Test"
        description = "Test blog"
    "#;
    let config: SiteConfig = SiteConfig::from_str(config).unwrap();

    assert_eq!(config.base.author, "<YOUR_NAME>");
    assert_eq!(config.base.email, "user@noreply.postdex");
    assert_eq!(config.base.language, "en");
    assert_eq!(config.base.url, None);
}

#[test]
fn test_build_config_defaults() {
    let config = r#"
        [base]
        title = "Test"
        description = "Test blog"
    "#;
    let config: SiteConfig = SiteConfig::from_str(config).unwrap();

    assert_eq!(config.build.pages, PathBuf::from("pages"));
    assert_eq!(config.build.extension, ".mdx");
    assert_eq!(config.build.listing, PathBuf::from("posts.gen.js"));
    assert_eq!(config.build.feed, PathBuf::from("feed.xml"));
}

#[test]
fn test_build_config_overrides() {
    let config = r#"
        [base]
        title = "Test"
        description = "Test blog"

        [build]
        pages = "articles"
        extension = ".md"
        feed = "rss.xml"
    "#;
    let config: SiteConfig = SiteConfig::from_str(config).unwrap();

    assert_eq!(config.build.pages, PathBuf::from("articles"));
    assert_eq!(config.build.extension, ".md");
    assert_eq!(config.build.feed, PathBuf::from("rss.xml"));
}

#[test]
fn test_unknown_field_rejection() {
    let config = r#"
        [base]
        title = "Test"
        description = "Test blog"
        unknown_field = "should_fail"
    "#;
    let result = SiteConfig::from_str(config);

    assert!(result.is_err());
    let err = format!("{:#}", result.unwrap_err());
    assert!(err.contains("unknown field"));
}

#[test]
fn test_paths_join_root() {
    let mut config = SiteConfig::default();
    config.set_root(Path::new("/srv/blog"));

    assert_eq!(config.pages_dir(), PathBuf::from("/srv/blog/pages"));
    assert_eq!(config.listing_path(), PathBuf::from("/srv/blog/posts.gen.js"));
    assert_eq!(config.feed_path(), PathBuf::from("/srv/blog/feed.xml"));
}

#[test]
fn test_validate_requires_url() {
    let config = r#"
        [base]
        title = "Test"
        description = "Test blog"
    "#;
    let config: SiteConfig = SiteConfig::from_str(config).unwrap();
    let err = config.validate().unwrap_err().to_string();
    assert!(err.contains("[base.url]"));
}

#[test]
fn test_validate_rejects_bad_url_scheme() {
    let config = r#"
        [base]
        title = "Test"
        description = "Test blog"
        url = "ftp://example.com"
    "#;
    let config: SiteConfig = SiteConfig::from_str(config).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_dotless_extension() {
    let config = r#"
        [base]
        title = "Test"
        description = "Test blog"
        url = "https://example.com"

        [build]
        extension = "mdx"
    "#;
    let config: SiteConfig = SiteConfig::from_str(config).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_get_root_default() {
    let config = SiteConfig::default();
    assert_eq!(config.get_root(), Path::new("./"));
}

#[test]
fn test_config_error_display() {
    let io_err = ConfigError::Io(
        PathBuf::from("postdex.toml"),
        std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
    );
    let display = format!("{}", io_err);
    assert!(display.contains("IO error"));
    assert!(display.contains("postdex.toml"));
}
