//! Running the generation tasks. Every artifact in the output tree is
//! produced by exactly one task, tasks write to disjoint parts of the tree,
//! and the inputs they share (posts, indices, configuration, templates) are
//! read-only, so tasks can run in any order on any thread.

use crate::build::{Error, Result};
use crate::config::SiteConfig;
use crate::post::{Post, IMAGES_DIR, BODY_FILE, META_FILE};
use crate::util::{copy_dir, copy_file, create_dir, is_hidden};
use crate::write::{Page, PageWriter, Theme};
use std::path::Path;
use std::thread;
use tracing::{debug, error, info};

/// How many tasks may be in flight at once.
pub const POOL_CAPACITY: usize = 50;

/// A single unit of work. [`Generate::generate`] is called exactly once.
pub trait Generate: Send {
    /// A short human-readable label for logs.
    fn describe(&self) -> String;

    fn generate(&self) -> Result<()>;
}

/// The read-only inputs shared by every task.
#[derive(Clone, Copy)]
pub struct Site<'a> {
    pub config: &'a SiteConfig,
    pub theme: &'a Theme,
}

impl<'a> Site<'a> {
    /// The destination folder.
    pub fn dest(&self) -> &'a Path {
        &self.config.dest_folder
    }

    pub fn writer(&self) -> PageWriter<'a> {
        PageWriter::new(&self.theme.page, self.config)
    }
}

/// Writes a post's page along with its images and other artifacts.
pub struct PostTask<'a> {
    pub site: Site<'a>,
    pub post: &'a Post,
}

impl Generate for PostTask<'_> {
    fn describe(&self) -> String {
        format!("post `{}`", self.post.name)
    }

    fn generate(&self) -> Result<()> {
        let dir = self.site.dest().join(&self.post.name);
        create_dir(&dir)?;
        if let Some(images_dir) = &self.post.images_dir {
            copy_dir(images_dir, &dir.join(IMAGES_DIR))?;
        }
        self.site.writer().write(&Page {
            dir: dir.clone(),
            title: &self.post.meta.title,
            content: self.post.html.clone(),
            page_num: 0,
            max_page_num: 0,
            is_post: true,
        })?;
        copy_artifacts(&self.post.source, &dir)
    }
}

// Everything in the content unit that isn't the post itself travels along
// with the rendered page.
fn copy_artifacts(source: &Path, dir: &Path) -> Result<()> {
    let entries = std::fs::read_dir(source).map_err(|err| Error::io(source, err))?;
    for result in entries {
        let entry = result.map_err(|err| Error::io(source, err))?;
        let name = entry.file_name();
        if is_hidden(&name) || name == META_FILE || name == BODY_FILE || name == IMAGES_DIR {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            copy_dir(&path, &dir.join(&name))?;
        } else {
            copy_file(&path, &dir.join(&name))?;
        }
    }
    Ok(())
}

/// Runs `tasks` on a pool of [`POOL_CAPACITY`] worker threads.
///
/// Every task runs to completion even after another one has failed. Each
/// failure is logged; the first one to be reported is returned.
pub fn run_tasks<'a>(tasks: Vec<Box<dyn Generate + 'a>>) -> Result<()> {
    run_tasks_with_capacity(tasks, POOL_CAPACITY)
}

/// [`run_tasks`] with an explicit pool size.
pub fn run_tasks_with_capacity<'a>(
    tasks: Vec<Box<dyn Generate + 'a>>,
    capacity: usize,
) -> Result<()> {
    use crossbeam_channel::unbounded;

    let total = tasks.len();
    let workers = capacity.max(1).min(total);
    let (tx, rx) = unbounded::<Box<dyn Generate + 'a>>();
    let (err_tx, err_rx) = unbounded::<Error>();

    for task in tasks {
        // `rx` outlives this loop, so the channel can't be disconnected.
        let _ = tx.send(task);
    }
    drop(tx);

    thread::scope(|s| {
        for _ in 0..workers {
            let rx = rx.clone();
            let err_tx = err_tx.clone();
            s.spawn(move || {
                for task in rx {
                    let name = task.describe();
                    debug!(task = %name, "generating");
                    if let Err(err) = task.generate() {
                        error!(task = %name, error = %err, "task failed");
                        let _ = err_tx.send(err);
                    }
                }
            });
        }
    });
    drop(err_tx);

    let mut errors = err_rx.try_iter();
    match errors.next() {
        None => {
            info!(tasks = total, "all tasks finished");
            Ok(())
        }
        Some(first) => {
            let others = errors.count();
            if others > 0 {
                error!(failed = others + 1, tasks = total, "more than one task failed");
            }
            Err(first)
        }
    }
}
