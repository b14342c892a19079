//! Templating and writing HTML pages to disk. Every HTML page in the site
//! goes through [`PageWriter::write`], which wraps a rendered body in the
//! theme's `template.html`.

use crate::config::SiteConfig;
use chrono::{Datelike, Utc};
use gtmpl_value::Value;
use quick_xml::escape::escape;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

/// A parsed theme template, remembering where it came from for error
/// messages.
pub struct Template {
    path: PathBuf,
    inner: gtmpl::Template,
}

impl Template {
    /// Reads and parses the template file at `path`.
    pub fn load(path: &Path) -> Result<Template> {
        let contents = std::fs::read_to_string(path).map_err(|err| Error::OpenTemplate {
            path: path.to_owned(),
            err,
        })?;
        Template::parse(path, &contents)
    }

    /// Parses `contents`; `path` is only used to label errors.
    pub fn parse(path: &Path, contents: &str) -> Result<Template> {
        let mut inner = gtmpl::Template::default();
        inner.parse(contents).map_err(|err| Error::Template {
            path: path.to_owned(),
            err: err.to_string(),
        })?;
        Ok(Template {
            path: path.to_owned(),
            inner,
        })
    }

    /// Executes the template against `value`, writing the result to `w`.
    pub fn execute<W: Write>(&self, w: &mut W, value: Value) -> Result<()> {
        let template_error = |err: String| Error::Template {
            path: self.path.clone(),
            err,
        };
        let context = gtmpl::Context::from(value).map_err(|e| template_error(e.to_string()))?;
        self.inner
            .execute(w, &context)
            .map_err(|e| template_error(e.to_string()))
    }

    /// Executes the template against `value` and returns the output.
    pub fn render(&self, value: Value) -> Result<String> {
        let mut buf: Vec<u8> = Vec::new();
        self.execute(&mut buf, value)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// The templates a theme folder must provide.
pub struct Theme {
    /// `template.html`: the shell every page is rendered into.
    pub page: Template,

    /// `short.html`: one post's summary block in a listing.
    pub short: Template,

    /// `tags.html`: the body of the tag index page.
    pub tags: Template,

    /// `categories.html`: the body of the category index page.
    pub categories: Template,
}

impl Theme {
    pub fn load(dir: &Path) -> Result<Theme> {
        Ok(Theme {
            page: Template::load(&dir.join("template.html"))?,
            short: Template::load(&dir.join("short.html"))?,
            tags: Template::load(&dir.join("tags.html"))?,
            categories: Template::load(&dir.join("categories.html"))?,
        })
    }
}

/// One HTML page to be written as `{dir}/index.html`.
pub struct Page<'c> {
    pub dir: PathBuf,

    /// Shown in the page and used to build the `<title>`; empty for the
    /// front page.
    pub title: &'c str,

    /// The rendered body.
    pub content: String,

    /// The page's position in a paginated listing; `0` outside listings.
    pub page_num: usize,

    /// The number of pages in the listing; `0` outside listings.
    pub max_page_num: usize,

    pub is_post: bool,
}

/// Everything `template.html` gets to see. Constructed fresh for each page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContext {
    pub html_title: String,
    pub page_title: String,
    pub content: String,
    pub year: i32,
    pub author: String,
    pub blog_title: String,
    pub canonical_link: String,
    pub page_num: usize,
    pub prev_page_num: usize,
    pub next_page_num: usize,
    pub is_post: bool,
}

impl PageContext {
    /// Converts the context into a template [`Value`]. Keys are PascalCase
    /// (`{{.HTMLTitle}}`, `{{.Content}}`, `{{.NextPageNum}}`, ...). Only
    /// `Content` is inserted as raw HTML; every other string is escaped.
    pub fn to_value(&self) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("HTMLTitle".to_owned(), text_value(&self.html_title));
        m.insert("PageTitle".to_owned(), text_value(&self.page_title));
        m.insert("Content".to_owned(), (&self.content).into());
        m.insert("Year".to_owned(), Value::from(i64::from(self.year)));
        m.insert("Name".to_owned(), text_value(&self.author));
        m.insert("BlogTitle".to_owned(), text_value(&self.blog_title));
        m.insert("CanonicalLink".to_owned(), text_value(&self.canonical_link));
        m.insert("URL".to_owned(), text_value(&self.canonical_link));
        m.insert("PageNum".to_owned(), Value::from(self.page_num as i64));
        m.insert("PrevPageNum".to_owned(), Value::from(self.prev_page_num as i64));
        m.insert("NextPageNum".to_owned(), Value::from(self.next_page_num as i64));
        m.insert("IsPost".to_owned(), Value::from(self.is_post));
        Value::Object(m)
    }
}

/// Plain text for a template, HTML-escaped. Rendered HTML goes into the
/// template as-is instead.
pub fn text_value(text: &str) -> Value {
    Value::String(escape(text).into_owned())
}

/// `"{page_title} - {blog_title}"`, or just the blog title for untitled
/// pages.
pub fn html_title(page_title: &str, blog_title: &str) -> String {
    if page_title.is_empty() {
        blog_title.to_owned()
    } else {
        format!("{} - {}", page_title, blog_title)
    }
}

/// The canonical URL of the page written to `dir`, where `root` is the
/// destination folder: `{base_url}/{dir relative to root}/index.html`, or
/// `/` for the root itself.
pub fn canonical_link(dir: &Path, root: &Path, base_url: &str) -> String {
    let relative = match dir.strip_prefix(root) {
        Ok(relative) => relative,
        Err(_) => return String::from("/"),
    };
    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if segments.is_empty() {
        return String::from("/");
    }
    format!(
        "{}/{}/index.html",
        base_url.trim_end_matches('/'),
        segments.join("/")
    )
}

/// Renders [`Page`]s through the theme's page template and writes them to
/// disk.
pub struct PageWriter<'a> {
    pub template: &'a Template,
    pub config: &'a SiteConfig,
}

impl<'a> PageWriter<'a> {
    pub fn new(template: &'a Template, config: &'a SiteConfig) -> PageWriter<'a> {
        PageWriter { template, config }
    }

    /// Builds the [`PageContext`] for `page`.
    pub fn context(&self, page: &Page) -> PageContext {
        PageContext {
            html_title: html_title(page.title, &self.config.blog_title),
            page_title: page.title.to_owned(),
            content: page.content.clone(),
            year: Utc::now().year(),
            author: self.config.author.clone(),
            blog_title: self.config.blog_title.clone(),
            canonical_link: canonical_link(
                &page.dir,
                &self.config.dest_folder,
                self.config.base_url(),
            ),
            page_num: page.page_num,
            prev_page_num: page.page_num.saturating_sub(1),
            next_page_num: if page.page_num == page.max_page_num {
                0
            } else {
                page.page_num + 1
            },
            is_post: page.is_post,
        }
    }

    /// Writes `{page.dir}/index.html`. The directory must already exist.
    pub fn write(&self, page: &Page) -> Result<()> {
        let path = page.dir.join("index.html");
        let io_error = |err| Error::Io {
            path: path.clone(),
            err,
        };
        let mut w = BufWriter::new(File::create(&path).map_err(io_error)?);
        self.template.execute(&mut w, self.context(page).to_value())?;
        w.flush().map_err(io_error)
    }
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error parsing or executing a template.
    Template { path: PathBuf, err: String },

    /// A template file couldn't be read.
    OpenTemplate { path: PathBuf, err: io::Error },

    /// An error writing the output files.
    Io { path: PathBuf, err: io::Error },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template { path, err } => {
                write!(f, "error executing template {}: {}", path.display(), err)
            }
            Error::OpenTemplate { path, err } => {
                write!(f, "error reading template {}: {}", path.display(), err)
            }
            Error::Io { path, err } => {
                write!(f, "error writing file {}: {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template { .. } => None,
            Error::OpenTemplate { err, .. } => Some(err),
            Error::Io { err, .. } => Some(err),
        }
    }
}
