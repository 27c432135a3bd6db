use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::{Delimiter, Section};

/// An ordered collection of sections loaded from, or destined for, an INI-style file.
///
/// Several sections may share the same name (e.g. repeated `[server]` blocks); they are kept in
/// the order they were added. Section names themselves are ordered by first appearance, and all
/// whole-configuration traversals (rendering, wildcard lookups, pattern queries) follow that
/// order.
///
/// The configuration is safe to share between threads. Sections are handed out as
/// [`Arc<Section>`] and carry their own lock, so options can be changed without holding the
/// configuration's lock.
#[derive(Debug, Default)]
pub struct Configuration {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    file_path: Option<PathBuf>,
    delimiter: Delimiter,
    sections: HashMap<String, Vec<Arc<Section>>>,
    order: Vec<String>,
}

impl Configuration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty configuration that [`Configuration::save`] will write to `path`.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let config = Self::new();
        config.inner.write().file_path = Some(path.into());
        config
    }

    #[must_use]
    pub fn file_path(&self) -> Option<PathBuf> {
        self.inner.read().file_path.clone()
    }

    pub fn set_file_path(&self, path: impl AsRef<Path>) {
        self.inner.write().file_path = Some(path.as_ref().to_path_buf());
    }

    /// The delimiter written between option names and values.
    #[must_use]
    pub fn delimiter(&self) -> Delimiter {
        self.inner.read().delimiter
    }

    pub fn set_delimiter(&self, delimiter: Delimiter) {
        self.inner.write().delimiter = delimiter;
    }

    /// Appends a new, empty section named `fqn` and returns it.
    ///
    /// The section is never merged with an existing section of the same name.
    pub fn add_section(&self, fqn: &str) -> Arc<Section> {
        let section = Arc::new(Section::new(fqn));
        let mut inner = self.inner.write();
        let Inner {
            sections, order, ..
        } = &mut *inner;

        sections
            .entry(fqn.to_owned())
            .or_insert_with(|| {
                order.push(fqn.to_owned());
                Vec::with_capacity(1)
            })
            .push(Arc::clone(&section));

        section
    }

    /// Returns the first section named `fqn`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no section with that name.
    pub fn section(&self, fqn: &str) -> Result<Arc<Section>> {
        self.inner
            .read()
            .sections
            .get(fqn)
            .and_then(|list| list.first())
            .cloned()
            .ok_or_else(|| Error::not_found(fqn))
    }

    /// Returns every section named `fqn` in the order they were added.
    ///
    /// An empty `fqn` matches every section; see [`Configuration::all_sections`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `fqn` is not empty and no section has that name.
    pub fn sections(&self, fqn: &str) -> Result<Vec<Arc<Section>>> {
        if fqn.is_empty() {
            return Ok(self.all_sections());
        }

        self.inner
            .read()
            .sections
            .get(fqn)
            .cloned()
            .ok_or_else(|| Error::not_found(fqn))
    }

    /// Returns every section, grouped by name in order of first appearance.
    #[must_use]
    pub fn all_sections(&self) -> Vec<Arc<Section>> {
        let inner = self.inner.read();

        inner
            .order
            .iter()
            .flat_map(|fqn| inner.sections[fqn].iter().cloned())
            .collect()
    }

    /// Distinct section names in order of first appearance.
    #[must_use]
    pub fn section_names(&self) -> Vec<String> {
        self.inner.read().order.clone()
    }

    /// Shorthand for the value of `option` in the first section named `fqn`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no section with that name.
    pub fn string_value(&self, fqn: &str, option: &str) -> Result<String> {
        Ok(self.section(fqn)?.value_of(option))
    }

    /// Returns the sections whose name contains a match for the regular expression `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if `pattern` does not compile and [`Error::NotFound`] if
    /// no section name matches.
    pub fn find(&self, pattern: &str) -> Result<Vec<Arc<Section>>> {
        let regex = compile_pattern(pattern)?;
        let inner = self.inner.read();

        let found = inner
            .order
            .iter()
            .filter(|fqn| regex.is_match(fqn))
            .flat_map(|fqn| inner.sections[fqn].iter().cloned())
            .collect::<Vec<_>>();

        if found.is_empty() {
            return Err(Error::not_found(pattern));
        }

        Ok(found)
    }

    /// Removes every section whose name matches `pattern` and returns the removed sections.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if `pattern` does not compile and [`Error::NotFound`] if
    /// no section name matches. The configuration is left untouched in both cases.
    pub fn delete(&self, pattern: &str) -> Result<Vec<Arc<Section>>> {
        let regex = compile_pattern(pattern)?;
        let mut removed = Vec::new();

        {
            let mut inner = self.inner.write();
            let Inner {
                sections, order, ..
            } = &mut *inner;

            order.retain(|fqn| {
                if !regex.is_match(fqn) {
                    return true;
                }

                if let Some(list) = sections.remove(fqn) {
                    removed.extend(list);
                }

                false
            });
        }

        if removed.is_empty() {
            return Err(Error::not_found(pattern));
        }

        debug!(pattern, count = removed.len(), "deleted sections");

        Ok(removed)
    }

    /// Number of sections, counting every section that shares a name.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().sections.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().order.is_empty()
    }

    /// Renders the whole configuration as text using its delimiter.
    #[must_use]
    pub fn render(&self) -> String {
        let delimiter = self.delimiter();

        // Sections lock themselves; the configuration lock is released before they render.
        self.all_sections()
            .iter()
            .enumerate()
            .map(|(index, section)| {
                section.render_with_header(delimiter, has_header(index, section))
            })
            .collect()
    }
}

/// Only a global section written first goes without a header. A later `[global]` block keeps
/// its header so that it reads back as a section of its own.
pub(crate) fn has_header(index: usize, section: &Section) -> bool {
    index > 0 || !section.is_global()
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::InvalidPattern {
        pattern: pattern.to_owned(),
        source,
    })
}
