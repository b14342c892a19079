//! Site configuration. A [`SiteConfig`] is loaded once by the caller and then
//! handed by reference to every component that needs it; nothing mutates it
//! after [`SiteConfig::from_file`] returns.

use crate::util::open;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use url::Url;

/// Everything the generator needs to know about the site.
#[derive(Deserialize, Clone, Debug)]
pub struct SiteConfig {
    #[serde(rename = "Author", default)]
    pub author: String,

    /// The absolute URL the site is served from. Canonical links, feed
    /// links and sitemap locations are all built on top of it.
    #[serde(rename = "BlogURL")]
    pub blog_url: Url,

    #[serde(rename = "BlogLanguage", default)]
    pub blog_language: String,

    #[serde(rename = "BlogDescription", default)]
    pub blog_description: String,

    #[serde(rename = "BlogTitle", default)]
    pub blog_title: String,

    /// A chrono `strftime`-style format used to parse each post's `date`.
    #[serde(rename = "DateFormat", default = "default_date_format")]
    pub date_format: String,

    #[serde(rename = "NumPostsFrontPage", default = "default_page_size")]
    pub num_posts_front_page: usize,

    /// Where fetched content units live and are read from.
    #[serde(rename = "TempFolder", default = "default_temp_folder")]
    pub temp_folder: PathBuf,

    /// Where the site is generated. Cleared on every run.
    #[serde(rename = "DestFolder", default = "default_dest_folder")]
    pub dest_folder: PathBuf,

    #[serde(rename = "ThemeFolder", default = "default_theme_folder")]
    pub theme_folder: PathBuf,

    #[serde(rename = "StaticPages", default)]
    pub static_pages: Vec<StaticPage>,

    #[serde(rename = "DataSource", default)]
    pub data_source: SourceConfig,

    #[serde(rename = "Theme", default)]
    pub theme: SourceConfig,
}

/// A file from the theme folder that ends up in the site without being a
/// post, e.g. `favicon.ico` or an `about.html` page.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct StaticPage {
    /// Path relative to the theme folder.
    #[serde(rename = "File")]
    pub file: PathBuf,

    /// Path relative to the destination folder.
    #[serde(rename = "To")]
    pub to: PathBuf,

    /// Rendered through the page template instead of copied verbatim.
    #[serde(rename = "IsTemplate", default)]
    pub is_template: bool,
}

/// Where posts or the theme are fetched from.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct SourceConfig {
    /// `local` or `git`.
    #[serde(rename = "Type", default)]
    pub kind: String,

    #[serde(rename = "Repository", default)]
    pub repository: String,
}

fn default_date_format() -> String {
    String::from("%Y-%m-%d %H:%M:%S")
}

fn default_page_size() -> usize {
    10
}

fn default_temp_folder() -> PathBuf {
    PathBuf::from("./tmp")
}

fn default_dest_folder() -> PathBuf {
    PathBuf::from("./public")
}

fn default_theme_folder() -> PathBuf {
    PathBuf::from("./static")
}

impl SiteConfig {
    /// Loads and validates a configuration file. Both YAML and JSON files
    /// are accepted.
    pub fn from_file(path: &Path) -> Result<SiteConfig> {
        let config: SiteConfig = serde_yaml::from_reader(open(path, "config")?)
            .map_err(|e| anyhow!("Parsing config file `{}`: {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a configuration from a string. Mostly useful in tests.
    pub fn from_yaml(contents: &str) -> Result<SiteConfig> {
        let config: SiteConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.num_posts_front_page == 0 {
            return Err(anyhow!("`NumPostsFrontPage` must be greater than zero"));
        }
        if self.date_format.is_empty() {
            return Err(anyhow!("`DateFormat` must not be empty"));
        }
        Ok(())
    }

    /// The number of posts per front page listing.
    pub fn page_size(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.num_posts_front_page).unwrap_or(NonZeroUsize::MIN)
    }

    /// The blog URL without a trailing slash, ready to have `/path` appended.
    pub fn base_url(&self) -> &str {
        self.blog_url.as_str().trim_end_matches('/')
    }

    /// Joins a site-relative path onto [`SiteConfig::base_url`].
    pub fn site_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }
}
