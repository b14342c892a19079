//! Defines the [`Post`] and [`Meta`] types and the logic for loading content
//! units from disk. A content unit is a directory laid out as:
//!
//! ```text
//! my-first-post/
//!     meta.yml      # front matter
//!     post.md       # markdown body
//!     images/       # optional, flat list of files
//!     ...           # anything else is copied next to the rendered page
//! ```
//!
//! `meta.yml` looks like:
//!
//! ```yaml
//! title: Hello, world!
//! short: A first post.
//! date: 2021-04-16 09:30:00
//! tags: [greet, Rust]
//! categories: [misc]
//! ```

use crate::markdown;
use crate::util::{is_hidden, sort_desc_by_key};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, ParseResult, TimeZone, Utc};
use serde::Deserialize;
use std::fmt;
use std::fs::{read_dir, read_to_string};
use std::io;
use std::path::{Path, PathBuf};

pub const META_FILE: &str = "meta.yml";
pub const BODY_FILE: &str = "post.md";
pub const IMAGES_DIR: &str = "images";

/// One content unit, loaded and rendered. Posts are never mutated after
/// [`load_post`] returns them, so they can be shared freely between
/// generator threads.
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    /// The slug, taken from the content unit's directory name. The post is
    /// written to `{dest}/{name}/index.html`.
    pub name: String,

    pub meta: Meta,

    /// The body converted to HTML.
    pub html: String,

    /// The content unit directory the post was loaded from.
    pub source: PathBuf,

    /// The `images/` directory, if the content unit has one.
    pub images_dir: Option<PathBuf>,

    /// File names inside [`Post::images_dir`], sorted.
    pub images: Vec<String>,
}

/// The parsed front matter of a post.
#[derive(Clone, Debug, PartialEq)]
pub struct Meta {
    pub title: String,
    pub short: String,

    /// The date exactly as written in `meta.yml`.
    pub date: String,

    pub parsed_date: DateTime<FixedOffset>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}

#[derive(Deserialize)]
struct Frontmatter {
    #[serde(alias = "Title")]
    title: String,

    #[serde(default, alias = "Short")]
    short: String,

    #[serde(alias = "Date")]
    date: String,

    #[serde(default, alias = "Tags")]
    tags: Vec<String>,

    #[serde(default, alias = "Categories")]
    categories: Vec<String>,
}

/// Parses `date` with a chrono format string. Formats without an offset
/// are read as UTC, and date-only formats as midnight.
pub fn parse_date(date: &str, format: &str) -> ParseResult<DateTime<FixedOffset>> {
    let date = date.trim();
    if let Ok(parsed) = DateTime::parse_from_str(date, format) {
        return Ok(parsed);
    }
    let naive = match NaiveDateTime::parse_from_str(date, format) {
        Ok(naive) => naive,
        Err(err) => match NaiveDate::parse_from_str(date, format) {
            Ok(day) => match day.and_hms_opt(0, 0, 0) {
                Some(midnight) => midnight,
                None => return Err(err),
            },
            Err(_) => return Err(err),
        },
    };
    Ok(Utc.from_utc_datetime(&naive).into())
}

/// Loads the content unit at `dir`. The date in `meta.yml` must match
/// `date_format`.
pub fn load_post(dir: &Path, date_format: &str) -> Result<Post> {
    let name = dir
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::InvalidName(dir.to_owned()))?
        .to_owned();
    let meta = load_meta(&dir.join(META_FILE), date_format)?;

    let body_path = dir.join(BODY_FILE);
    let body = read_to_string(&body_path).map_err(|err| Error::ReadBody {
        path: body_path.clone(),
        err,
    })?;

    let (images_dir, images) = load_images(&dir.join(IMAGES_DIR))?;
    Ok(Post {
        name,
        meta,
        html: markdown::to_html(&body),
        source: dir.to_owned(),
        images_dir,
        images,
    })
}

fn load_meta(path: &Path, date_format: &str) -> Result<Meta> {
    let contents = read_to_string(path).map_err(|err| Error::ReadMeta {
        path: path.to_owned(),
        err,
    })?;
    let frontmatter: Frontmatter =
        serde_yaml::from_str(&contents).map_err(|err| Error::Yaml {
            path: path.to_owned(),
            err,
        })?;
    let parsed_date =
        parse_date(&frontmatter.date, date_format).map_err(|err| Error::Date {
            path: path.to_owned(),
            date: frontmatter.date.clone(),
            err,
        })?;
    Ok(Meta {
        title: frontmatter.title,
        short: frontmatter.short,
        date: frontmatter.date,
        parsed_date,
        tags: frontmatter.tags,
        categories: frontmatter.categories,
    })
}

// A missing images directory is an empty manifest, not an error.
fn load_images(dir: &Path) -> Result<(Option<PathBuf>, Vec<String>)> {
    let read_images = |err| Error::ReadImages {
        path: dir.to_owned(),
        err,
    };
    let entries = match read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok((None, Vec::new())),
        Err(e) => return Err(read_images(e)),
    };

    let mut images = Vec::new();
    for result in entries {
        let entry = result.map_err(read_images)?;
        if entry.file_type().map_err(read_images)?.is_file() {
            images.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    images.sort();
    Ok((Some(dir.to_owned()), images))
}

/// Lists the content units under `root`: every non-hidden subdirectory, in
/// name order.
pub fn content_folders(root: &Path) -> Result<Vec<PathBuf>> {
    let list = |err| Error::ListContent {
        path: root.to_owned(),
        err,
    };
    let mut dirs = Vec::new();
    for result in read_dir(root).map_err(list)? {
        let entry = result.map_err(list)?;
        if entry.file_type().map_err(list)?.is_dir() && !is_hidden(&entry.file_name()) {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Loads every content unit in `dirs` and returns the posts most recent
/// first. The first failing unit aborts the whole load.
pub fn load_posts(dirs: &[PathBuf], date_format: &str) -> Result<Vec<Post>> {
    let mut posts = dirs
        .iter()
        .map(|dir| load_post(dir, date_format))
        .collect::<Result<Vec<Post>>>()?;
    sort_by_date_desc(&mut posts);
    Ok(posts)
}

/// Stable: posts sharing a date keep the order they were loaded in.
pub fn sort_by_date_desc(posts: &mut [Post]) {
    sort_desc_by_key(posts, |p| p.meta.parsed_date);
}

/// Represents the result of loading a [`Post`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading a [`Post`] from a content unit.
#[derive(Debug)]
pub enum Error {
    /// Returned when `meta.yml` is missing or unreadable.
    ReadMeta { path: PathBuf, err: io::Error },

    /// Returned when `meta.yml` isn't valid front matter.
    Yaml {
        path: PathBuf,
        err: serde_yaml::Error,
    },

    /// Returned when the front matter date doesn't match the configured
    /// format.
    Date {
        path: PathBuf,
        date: String,
        err: chrono::ParseError,
    },

    /// Returned when `post.md` can't be read.
    ReadBody { path: PathBuf, err: io::Error },

    /// Returned when an existing `images/` directory can't be listed.
    ReadImages { path: PathBuf, err: io::Error },

    /// Returned when the content root can't be listed.
    ListContent { path: PathBuf, err: io::Error },

    /// Returned when a content unit's directory name isn't valid UTF-8.
    InvalidName(PathBuf),
}

impl Error {
    /// Whether this is a front matter problem (as opposed to plain I/O).
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            Error::ReadMeta { .. } | Error::Yaml { .. } | Error::Date { .. } | Error::InvalidName(_)
        )
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ReadMeta { path, err } => {
                write!(f, "error while reading file {}: {}", path.display(), err)
            }
            Error::Yaml { path, err } => {
                write!(f, "error reading yml in {}: {}", path.display(), err)
            }
            Error::Date { path, date, err } => write!(
                f,
                "error parsing date `{}` in {}: {}",
                date,
                path.display(),
                err
            ),
            Error::ReadBody { path, err } => {
                write!(f, "error while reading file {}: {}", path.display(), err)
            }
            Error::ReadImages { path, err } => {
                write!(f, "error while reading folder {}: {}", path.display(), err)
            }
            Error::ListContent { path, err } => {
                write!(f, "error reading contents of directory {}: {}", path.display(), err)
            }
            Error::InvalidName(path) => write!(f, "invalid content folder name: {:?}", path),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ReadMeta { err, .. } => Some(err),
            Error::Yaml { err, .. } => Some(err),
            Error::Date { err, .. } => Some(err),
            Error::ReadBody { err, .. } => Some(err),
            Error::ReadImages { err, .. } => Some(err),
            Error::ListContent { err, .. } => Some(err),
            Error::InvalidName(_) => None,
        }
    }
}
