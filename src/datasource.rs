//! Fetching posts and themes into the folders the generator reads from.

use crate::build::{Error, Result};
use crate::post::content_folders;
use crate::util::{clear_and_create, copy_dir};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

/// Somewhere content can be fetched from.
pub trait DataSource {
    /// Replaces the contents of `to` with whatever `from` points at and
    /// returns the content folders found there.
    fn fetch(&self, from: &str, to: &Path) -> Result<Vec<PathBuf>>;
}

/// Returns the data source for a configured `Type`.
pub fn new(kind: &str) -> Result<Box<dyn DataSource>> {
    match kind {
        "local" => Ok(Box::new(Local)),
        "git" => Ok(Box::new(Git)),
        "" => Err(Error::Config(String::from("no data source type configured"))),
        other => Err(Error::Config(format!("unknown data source type `{}`", other))),
    }
}

/// A directory on the local filesystem.
pub struct Local;

impl DataSource for Local {
    fn fetch(&self, from: &str, to: &Path) -> Result<Vec<PathBuf>> {
        info!(from, to = %to.display(), "copying local data");
        clear_and_create(to)?;
        copy_dir(Path::new(from), to)?;
        content_folders(to).map_err(Error::from)
    }
}

/// The `master` branch of a git repository, pulled with the `git` binary.
pub struct Git;

impl DataSource for Git {
    fn fetch(&self, from: &str, to: &Path) -> Result<Vec<PathBuf>> {
        info!(from, to = %to.display(), "pulling git repository");
        clear_and_create(to)?;
        git(to, &["init", "."])?;
        git(to, &["remote", "add", "origin", from])?;
        git(to, &["pull", "origin", "master"])?;
        content_folders(to).map_err(Error::from)
    }
}

fn git(dir: &Path, args: &[&str]) -> Result<()> {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .map_err(|err| Error::io(dir, err))?;
    if status.success() {
        Ok(())
    } else {
        Err(Error::io(
            dir,
            io::Error::new(
                io::ErrorKind::Other,
                format!("`git {}` failed: {}", args.join(" "), status),
            ),
        ))
    }
}
