use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::config::has_header;
use crate::{BACKUP_EXT, Configuration};

/// Writes `config` to `path`.
///
/// A file already at `path` is first renamed to `path` + `.bak`, replacing any older backup.
///
/// # Errors
///
/// Returns [`Error::WriteFailure`] with the first error hit while renaming the old file,
/// creating the new one, or writing and flushing it.
pub fn write(config: &Configuration, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let failure = |source| Error::WriteFailure {
        path: path.to_path_buf(),
        source,
    };

    let backup = backup_path(path);
    match fs::rename(path, &backup) {
        Ok(()) => debug!(backup = %backup.display(), "backed up existing configuration"),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(failure(err)),
    }

    let file = File::create(path).map_err(failure)?;
    let file = write_to(config, BufWriter::new(file))
        .and_then(|writer| writer.into_inner().map_err(io::IntoInnerError::into_error))
        .map_err(failure)?;
    file.sync_all().map_err(failure)?;

    debug!(path = %path.display(), sections = config.len(), "wrote configuration");

    Ok(())
}

/// Writes the rendered configuration to `writer`, flushes it, and hands it back.
///
/// The section list is captured up front, so the configuration is not locked while `writer`
/// performs I/O.
///
/// # Errors
///
/// Returns the first error produced by `writer`.
pub fn write_to<W: Write>(config: &Configuration, mut writer: W) -> io::Result<W> {
    let delimiter = config.delimiter();

    for (index, section) in config.all_sections().iter().enumerate() {
        let text = section.render_with_header(delimiter, has_header(index, section));
        writer.write_all(text.as_bytes())?;
    }

    writer.flush()?;
    Ok(writer)
}

fn backup_path(path: &Path) -> PathBuf {
    let mut backup = OsString::from(path.as_os_str());
    backup.push(BACKUP_EXT);
    PathBuf::from(backup)
}

impl Configuration {
    /// Writes the configuration back to the file it was read from or created with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoFilePath`] if the configuration has no file path, otherwise the same
    /// errors as [`write`].
    pub fn save(&self) -> Result<()> {
        let path = self.file_path().ok_or(Error::NoFilePath)?;
        write(self, path)
    }
}
