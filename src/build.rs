//! Exports the [`build_site`] function which stitches together the high-level
//! steps of generating the site: loading the posts ([`crate::post`]),
//! deriving the tag and category indices ([`crate::index`]), and then fanning
//! out one task per output artifact ([`crate::task`]).

use crate::config::SiteConfig;
use crate::feed::{Error as FeedError, RssTask};
use crate::index::Index;
use crate::listing::ListingTask;
use crate::paginate::{page_dir, paginate};
use crate::post::{content_folders, load_posts, Error as ParseError, Post};
use crate::sitemap::SitemapTask;
use crate::statics::StaticsTask;
use crate::task::{run_tasks, Generate, PostTask, Site};
use crate::taxonomy::{Taxonomy, TaxonomyTask};
use crate::util::clear_and_create;
use crate::write::{Error as WriteError, Theme};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Generates the whole site described by `config`.
///
/// Every post is loaded and parsed before the destination folder is touched,
/// so a bad post or template leaves the previous output in place. After
/// that the destination is cleared and regenerated from scratch.
pub fn build_site(config: &SiteConfig) -> Result<()> {
    let theme = Theme::load(&config.theme_folder)?;

    let dirs = content_folders(&config.temp_folder)?;
    let posts = load_posts(&dirs, &config.date_format)?;
    info!(posts = posts.len(), source = %config.temp_folder.display(), "loaded posts");

    clear_and_create(&config.dest_folder)?;

    let refs: Vec<&Post> = posts.iter().collect();
    let tags = Index::tags(&refs);
    let categories = Index::categories(&refs);
    let site = Site {
        config,
        theme: &theme,
    };

    let tasks = create_tasks(site, &refs, &tags, &categories);
    info!(tasks = tasks.len(), dest = %config.dest_folder.display(), "generating site");
    run_tasks(tasks)
}

/// Creates one task per post and per front page, plus the archive, the tag
/// and category sections, the sitemap, the feed and the static pages.
/// `posts` must already be sorted newest first.
pub fn create_tasks<'a>(
    site: Site<'a>,
    posts: &'a [&'a Post],
    tags: &'a Index<'a>,
    categories: &'a Index<'a>,
) -> Vec<Box<dyn Generate + 'a>> {
    let mut tasks: Vec<Box<dyn Generate + 'a>> = Vec::new();

    for &post in posts {
        tasks.push(Box::new(PostTask { site, post }));
    }

    for chunk in paginate(posts, site.config.page_size()) {
        tasks.push(Box::new(ListingTask {
            site,
            posts: chunk.items,
            dir: page_dir(site.dest(), chunk.num),
            title: String::new(),
            page_num: chunk.num,
            max_page_num: chunk.total,
        }));
    }

    tasks.push(Box::new(ListingTask {
        site,
        posts,
        dir: site.dest().join("archive"),
        title: String::from("Archive"),
        page_num: 0,
        max_page_num: 0,
    }));

    tasks.push(Box::new(TaxonomyTask {
        site,
        taxonomy: Taxonomy::Tags,
        index: tags,
    }));
    tasks.push(Box::new(TaxonomyTask {
        site,
        taxonomy: Taxonomy::Categories,
        index: categories,
    }));

    tasks.push(Box::new(SitemapTask {
        site,
        posts,
        tags,
        categories,
    }));
    tasks.push(Box::new(RssTask { site, posts }));
    tasks.push(Box::new(StaticsTask::new(site)));

    tasks
}

/// The result of a fallible site-building operation.
pub type Result<T> = std::result::Result<T, Error>;

/// The broad category an [`Error`] falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Creating, reading, writing or copying a file failed.
    Io,

    /// Invalid front matter or an unparsable date.
    Parse,

    /// A template is missing, malformed, or failed to execute.
    Template,

    /// The configuration asks for something that doesn't exist.
    Config,
}

/// The error type for building a site.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors loading posts.
    Parse(ParseError),

    /// Returned for errors rendering or writing pages.
    Write(WriteError),

    /// Returned for errors generating the feed.
    Feed(FeedError),

    /// Returned for other I/O problems, e.g. while clearing or copying
    /// directories.
    Io { path: PathBuf, err: std::io::Error },

    /// Returned for errors walking a directory tree.
    WalkDir(PathBuf, walkdir::Error),

    /// Returned for configuration values that can't be acted on.
    Config(String),
}

impl Error {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: &Path, err: std::io::Error) -> Error {
        Error::Io {
            path: path.to_owned(),
            err,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse(err) if err.is_parse() => ErrorKind::Parse,
            Error::Parse(_) => ErrorKind::Io,
            Error::Write(WriteError::Io { .. }) => ErrorKind::Io,
            Error::Write(_) => ErrorKind::Template,
            Error::Feed(FeedError::Date { .. }) => ErrorKind::Parse,
            Error::Feed(_) => ErrorKind::Io,
            Error::Io { .. } | Error::WalkDir(..) => ErrorKind::Io,
            Error::Config(_) => ErrorKind::Config,
        }
    }
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::Io { path, err } => write!(f, "I/O error on '{}': {}", path.display(), err),
            Error::WalkDir(path, err) => {
                write!(f, "error walking directory '{}': {}", path.display(), err)
            }
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Feed(err) => Some(err),
            Error::Io { path: _, err } => Some(err),
            Error::WalkDir(_, err) => Some(err),
            Error::Config(_) => None,
        }
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}
