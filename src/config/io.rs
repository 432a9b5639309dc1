use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tempfile::{Builder, NamedTempFile, TempPath};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{Document, LoadOutcome};

/// Read the config file fresh. Only real I/O failures are errors; a missing
/// file, an empty file and bad JSON are reported as outcomes.
pub fn load(path: &Path) -> io::Result<LoadOutcome> {
    let content = match fs::read(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file yet");
            return Ok(LoadOutcome::Missing);
        }
        Err(e) => return Err(e),
    };

    if content.iter().all(u8::is_ascii_whitespace) {
        debug!(path = %path.display(), "config file is empty");
        return Ok(LoadOutcome::Empty);
    }

    // a literal `null` decodes to no document, same as an empty file
    Ok(match serde_json::from_slice::<Option<Document>>(&content) {
        Ok(Some(doc)) => LoadOutcome::Parsed(doc),
        Ok(None) => LoadOutcome::Empty,
        Err(e) => LoadOutcome::Malformed(e),
    })
}

/// Save the document as indented JSON, replacing the file atomically.
pub fn save(path: &Path, document: &Document) -> Result<()> {
    write_atomic(path, |out| {
        serde_json::to_writer_pretty(&mut *out, document)?;
        out.write_all(b"\n")
    })
    .map_err(|source| Error::Save { path: path.to_path_buf(), source })
}

/// Write through a sibling temp file and rename it over `path`, so readers
/// only ever see the old or the new content. The temp file never outlives a
/// failed call.
pub fn write_atomic<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let prefix = format!("{}.new", file_name.to_string_lossy());

    let temp = match create_temp(dir, &prefix) {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "creating config directory");
            create_private_dir(dir)?;
            create_temp(dir, &prefix)?
        }
        Err(e) => return Err(e),
    };

    let (file, temp_path) = temp.into_parts();
    debug!(temp = %temp_path.display(), "writing temp file");

    if let Err(e) = fill_and_close(file, write) {
        discard(temp_path);
        return Err(e);
    }

    temp_path.persist(path).map_err(|e| {
        discard(e.path);
        e.error
    })
}

fn create_temp(dir: &Path, prefix: &str) -> io::Result<NamedTempFile> {
    Builder::new().prefix(prefix).tempfile_in(dir)
}

fn fill_and_close<F>(file: File, write: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let mut out = BufWriter::new(file);
    write(&mut out)?;
    let file = out.into_inner().map_err(io::IntoInnerError::into_error)?;
    file.sync_all()?;
    // dropping the handle closes it
    drop(file);
    Ok(())
}

fn discard(temp_path: TempPath) {
    let shown = temp_path.display().to_string();
    if let Err(e) = temp_path.close() {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(temp = %shown, error = %e, "failed to remove temporary file");
        }
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}
