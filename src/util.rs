use crate::build::{Error, Result};
use std::fs::File;
use std::path::Path;

pub fn open(path: &Path, kind: &str) -> anyhow::Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow::anyhow!(
            "Opening {} file `{}`: {}",
            kind,
            path.display(),
            e
        )),
        Ok(file) => Ok(file),
    }
}

/// Stable sort, largest key first. Elements with equal keys keep their
/// relative order.
pub fn sort_desc_by_key<T, K, F>(items: &mut [T], key: F)
where
    K: Ord,
    F: Fn(&T) -> K,
{
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

/// Removes everything inside `dir` (but not `dir` itself) and makes sure
/// the directory exists afterwards.
pub fn clear_and_create(dir: &Path) -> Result<()> {
    match std::fs::read_dir(dir) {
        Ok(entries) => {
            for entry in entries {
                let path = entry.map_err(|err| Error::io(dir, err))?.path();
                let removed = if path.is_dir() && !path.is_symlink() {
                    std::fs::remove_dir_all(&path)
                } else {
                    std::fs::remove_file(&path)
                };
                removed.map_err(|err| Error::io(&path, err))?;
            }
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => create_dir(dir),
        Err(e) => Err(Error::io(dir, e)),
    }
}

/// `mkdir -p`.
pub fn create_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|err| Error::io(dir, err))
}

/// Copies a single file, creating the destination's parent directories.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        create_dir(parent)?;
    }
    std::fs::copy(src, dst).map_err(|err| Error::io(src, err))?;
    Ok(())
}

/// Recursively copies `src` into `dst`, skipping hidden entries.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    use walkdir::WalkDir;

    create_dir(dst)?;
    let walker = WalkDir::new(src)
        .min_depth(1)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));
    for result in walker {
        let entry = result.map_err(|err| Error::WalkDir(src.to_owned(), err))?;
        // strip_prefix can't fail: every entry lives under `src`
        let relative = match entry.path().strip_prefix(src) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        if entry.file_type().is_dir() {
            create_dir(&dst.join(relative))?;
        } else {
            copy_file(entry.path(), &dst.join(relative))?;
        }
    }
    Ok(())
}

pub fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}
