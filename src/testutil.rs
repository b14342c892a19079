//! Fixtures shared by the unit tests.

use crate::config::SiteConfig;
use crate::post::{Meta, Post};
use chrono::{DateTime, FixedOffset};
use std::path::{Path, PathBuf};

/// A post dated `date` (`YYYY-MM-DD`, midnight UTC) with the given labels.
pub fn post(name: &str, date: &str, tags: &[&str], categories: &[&str]) -> Post {
    Post {
        name: name.to_owned(),
        meta: Meta {
            title: name.to_uppercase(),
            short: format!("About {}", name),
            date: format!("{} 00:00:00", date),
            parsed_date: DateTime::<FixedOffset>::parse_from_rfc3339(&format!(
                "{}T00:00:00+00:00",
                date
            ))
            .unwrap(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
        },
        html: format!("<p>{} body</p>", name),
        source: PathBuf::from(name),
        images_dir: None,
        images: Vec::new(),
    }
}

/// A configuration generating into `dest` with themes read from `theme`.
pub fn config(dest: &Path, theme: &Path) -> SiteConfig {
    let mut config = SiteConfig::from_yaml(
        "Author: Jane Doe\n\
         BlogURL: https://example.com\n\
         BlogTitle: Notes\n\
         BlogLanguage: en-us\n\
         BlogDescription: A test blog\n\
         NumPostsFrontPage: 2\n",
    )
    .unwrap();
    config.dest_folder = dest.to_owned();
    config.theme_folder = theme.to_owned();
    config
}
