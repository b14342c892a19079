//! Support for creating an RSS feed from the list of posts.

use crate::post::{parse_date, Post};
use crate::task::{Generate, Site};
use rss::extension::atom::{AtomExtension, Link};
use rss::{Channel, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use std::fmt;
use std::path::PathBuf;

/// The feed's file name under the destination folder.
pub const FEED_FILE: &str = "index.xml";

/// `pubDate` and `lastBuildDate` layout, e.g. `02 Jan 2006 15:04 -0700`.
const RSS_DATE_FORMAT: &str = "%d %b %Y %H:%M %z";

/// Writes `{dest}/index.xml`.
pub struct RssTask<'a> {
    pub site: Site<'a>,
    pub posts: &'a [&'a Post],
}

impl Generate for RssTask<'_> {
    fn describe(&self) -> String {
        String::from("rss")
    }

    fn generate(&self) -> crate::build::Result<()> {
        let channel = channel(self.site, self.posts)?;
        let path = self.site.dest().join(FEED_FILE);
        std::fs::write(&path, channel.to_string()).map_err(|err| Error::Io { path, err })?;
        Ok(())
    }
}

/// Builds the channel: one item per post, in the order given.
pub fn channel(site: Site, posts: &[&Post]) -> Result<Channel> {
    let config = site.config;
    let items = posts
        .iter()
        .map(|post| item(site, post))
        .collect::<Result<Vec<Item>>>()?;

    let mut self_link = Link::default();
    self_link.set_href(config.site_url(FEED_FILE));
    self_link.set_rel("self");
    self_link.set_mime_type(Some(String::from("application/rss+xml")));
    let mut atom = AtomExtension::default();
    atom.set_links(vec![self_link]);

    // The newest post stands in for the build time so that rebuilding
    // unchanged content gives an identical feed.
    let last_build_date = posts
        .first()
        .map(|post| post.meta.parsed_date.format(RSS_DATE_FORMAT).to_string());

    Ok(ChannelBuilder::default()
        .title(config.blog_title.clone())
        .link(config.site_url(""))
        .description(config.blog_description.clone())
        .language(Some(config.blog_language.clone()))
        .last_build_date(last_build_date)
        .atom_ext(Some(atom))
        .items(items)
        .build())
}

fn item(site: Site, post: &Post) -> Result<Item> {
    let date = &post.meta.date;
    let pub_date = parse_date(date, &site.config.date_format).map_err(|err| Error::Date {
        date: date.clone(),
        err,
    })?;
    let link = site.config.site_url(&format!("{}/", post.name));

    Ok(ItemBuilder::default()
        .title(Some(post.meta.title.clone()))
        .link(Some(link.clone()))
        .guid(Some(GuidBuilder::default().value(link).permalink(true).build()))
        .pub_date(Some(pub_date.format(RSS_DATE_FORMAT).to_string()))
        .description(Some(post.html.clone()))
        .build())
}

/// The result of a fallible feed operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error creating the feed.
#[derive(Debug)]
pub enum Error {
    /// A post's date couldn't be re-read with the configured format.
    Date {
        date: String,
        err: chrono::ParseError,
    },

    /// The feed file couldn't be written.
    Io { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Date { date, err } => write!(f, "Parsing feed date '{}': {}", date, err),
            Error::Io { path, err } => write!(f, "Writing feed '{}': {}", path.display(), err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Date { err, .. } => Some(err),
            Error::Io { err, .. } => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testutil::{self, post};
    use crate::write::{Template, Theme};
    use std::path::Path;

    fn theme() -> Theme {
        let parse = |text: &str| Template::parse(Path::new("t"), text).unwrap();
        Theme {
            page: parse(""),
            short: parse(""),
            tags: parse(""),
            categories: parse(""),
        }
    }

    #[test]
    fn test_channel() {
        let config = testutil::config(Path::new("./public"), Path::new("./theme"));
        let theme = theme();
        let site = Site {
            config: &config,
            theme: &theme,
        };
        let newer = post("newer", "2021-03-04", &[], &[]);
        let older = post("older", "2020-12-25", &[], &[]);

        let channel = channel(site, &[&newer, &older]).unwrap();
        assert_eq!(channel.title(), "Notes");
        assert_eq!(channel.link(), "https://example.com/");
        assert_eq!(channel.language(), Some("en-us"));
        assert_eq!(channel.last_build_date(), Some("04 Mar 2021 00:00 +0000"));

        let items = channel.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title(), Some("NEWER"));
        assert_eq!(items[0].link(), Some("https://example.com/newer/"));
        assert_eq!(
            items[0].guid().map(|guid| guid.value()),
            Some("https://example.com/newer/")
        );
        assert_eq!(items[1].pub_date(), Some("25 Dec 2020 00:00 +0000"));
        assert_eq!(items[1].description(), Some("<p>older body</p>"));

        let self_link = &channel.atom_ext().unwrap().links()[0];
        assert_eq!(self_link.href(), "https://example.com/index.xml");
        assert_eq!(self_link.rel(), "self");
    }

    #[test]
    fn test_bad_date() {
        let mut config = testutil::config(Path::new("./public"), Path::new("./theme"));
        config.date_format = String::from("%d/%m/%Y");
        let theme = theme();
        let site = Site {
            config: &config,
            theme: &theme,
        };
        let p = post("p", "2021-03-04", &[], &[]);
        assert!(matches!(channel(site, &[&p]), Err(Error::Date { .. })));
    }

    #[test]
    fn test_write_feed() {
        let tmp = tempfile::tempdir().unwrap();
        let config = testutil::config(tmp.path(), Path::new("./theme"));
        let theme = theme();
        let p = post("p", "2021-03-04", &[], &[]);
        RssTask {
            site: Site {
                config: &config,
                theme: &theme,
            },
            posts: &[&p],
        }
        .generate()
        .unwrap();

        let xml = std::fs::read(tmp.path().join(FEED_FILE)).unwrap();
        let channel = Channel::read_from(&xml[..]).unwrap();
        assert_eq!(channel.items().len(), 1);
        assert_eq!(channel.items()[0].link(), Some("https://example.com/p/"));
    }
}
