use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use parking_lot::RwLock;

use crate::{Delimiter, GLOBAL_SECTION, token};

/// A named block of options within a configuration.
///
/// Options keep the order in which their names were first added. Overwriting a value keeps its
/// position; deleting and re-adding a name moves it to the end.
#[derive(Debug)]
pub struct Section {
    fqn: String,
    inner: RwLock<Options>,
}

#[derive(Debug, Default)]
struct Options {
    values: HashMap<String, String>,
    order: Vec<String>,
}

impl Options {
    fn upsert(&mut self, option: &str, value: &str) -> String {
        match self.values.entry(option.to_owned()) {
            Entry::Occupied(mut entry) => entry.insert(value.to_owned()),
            Entry::Vacant(entry) => {
                entry.insert(value.to_owned());
                self.order.push(option.to_owned());
                String::new()
            }
        }
    }
}

impl Section {
    #[must_use]
    pub fn new(fqn: impl Into<String>) -> Self {
        Self {
            fqn: fqn.into(),
            inner: RwLock::new(Options::default()),
        }
    }

    /// The fully qualified name of the section.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.fqn
    }

    #[must_use]
    pub fn is_global(&self) -> bool {
        self.fqn == GLOBAL_SECTION
    }

    #[must_use]
    pub fn exists(&self, option: &str) -> bool {
        self.inner.read().values.contains_key(option)
    }

    /// Returns the value of `option`, or an empty string if it does not exist.
    ///
    /// Use [`Section::exists`] to tell a missing option from one with an empty value.
    #[must_use]
    pub fn value_of(&self, option: &str) -> String {
        self.inner
            .read()
            .values
            .get(option)
            .cloned()
            .unwrap_or_default()
    }

    /// Replaces the value of `option` and returns the previous one.
    ///
    /// An option that did not exist is created at the end of the section, exactly as with
    /// [`Section::add`].
    pub fn set_value_for(&self, option: &str, value: &str) -> String {
        self.inner.write().upsert(option, value)
    }

    /// Adds `option` to the section, overwriting any existing value. Returns the previous value,
    /// or an empty string if the option is new.
    pub fn add(&self, option: &str, value: &str) -> String {
        self.inner.write().upsert(option, value)
    }

    /// Removes `option` and returns its value (empty if it was absent).
    pub fn delete(&self, option: &str) -> String {
        let mut inner = self.inner.write();

        match inner.values.remove(option) {
            Some(value) => {
                inner.order.retain(|name| name != option);
                value
            }
            None => String::new(),
        }
    }

    /// Tokenizes a raw option line and adds it to the section.
    pub fn ingest(&self, line: &str) {
        let (option, value) = token::split_option(line);
        self.add(option, value);
    }

    /// Option names in insertion order.
    #[must_use]
    pub fn option_names(&self) -> Vec<String> {
        self.inner.read().order.clone()
    }

    /// Name/value pairs in insertion order.
    #[must_use]
    pub fn options(&self) -> Vec<(String, String)> {
        let inner = self.inner.read();

        inner
            .order
            .iter()
            .map(|name| (name.clone(), inner.values[name].clone()))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().order.is_empty()
    }

    /// Renders the section as text: a `[name]` header (omitted for the global section) followed
    /// by one `name<delimiter>value` line per option. Options with an empty value are written
    /// as a bare name.
    ///
    /// A line that would read back differently with `:` (its name contains `:` or its value
    /// contains `=`) is always written with ` = `.
    #[must_use]
    pub fn render(&self, delimiter: Delimiter) -> String {
        self.render_with_header(delimiter, !self.is_global())
    }

    pub(crate) fn render_with_header(&self, delimiter: Delimiter, header: bool) -> String {
        let inner = self.inner.read();
        let mut text = String::with_capacity(64 * (inner.order.len() + 1));

        if header {
            text.push('[');
            text.push_str(&self.fqn);
            text.push_str("]\n");
        }

        for name in &inner.order {
            let value = &inner.values[name];
            text.push_str(name);

            if !value.is_empty() {
                text.push_str(line_delimiter(delimiter, name, value).as_str());
                text.push_str(value);
            }

            text.push('\n');
        }

        text
    }
}

fn line_delimiter(delimiter: Delimiter, name: &str, value: &str) -> Delimiter {
    match delimiter {
        Delimiter::Colon if name.contains(':') || value.contains('=') => Delimiter::Equal,
        delimiter => delimiter,
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Delimiter::default()))
    }
}
