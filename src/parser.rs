use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::{Configuration, GLOBAL_SECTION, Section, token};

/// Represents an on-going parse.
///
/// Lines are fed one at a time. Options that appear before the first header belong to the
/// global section, which is registered up front.
#[derive(Debug)]
pub struct Parser {
    config: Configuration,
    active: Arc<Section>,
    line: usize,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self::with_configuration(Configuration::new())
    }

    fn with_configuration(config: Configuration) -> Self {
        let active = config.add_section(GLOBAL_SECTION);
        Self {
            config,
            active,
            line: 0,
        }
    }

    /// Consumes a single line of text. Trailing line terminators are ignored.
    pub fn feed_line(&mut self, line: &str) {
        self.line += 1;

        if line.trim().is_empty() {
            return;
        }

        if token::is_section_header(line) {
            let fqn = token::section_name(line);
            self.active = self.config.add_section(fqn);
            return;
        }

        // Comments are not special; they are kept as key-only options.
        self.active.ingest(line);
    }

    /// Number of lines consumed so far.
    #[must_use]
    pub fn lines(&self) -> usize {
        self.line
    }

    #[must_use]
    pub fn finish(self) -> Configuration {
        self.config
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a configuration file. The returned configuration remembers `path`.
///
/// # Errors
///
/// Returns [`Error::ReadFailure`] if the file cannot be opened or read, or is not valid UTF-8.
pub fn read(path: impl AsRef<Path>) -> Result<Configuration> {
    let path = path.as_ref();
    let failure = |source| Error::ReadFailure {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(failure)?;
    let mut parser = Parser::with_configuration(Configuration::with_path(path));
    parse_lines(&mut parser, BufReader::new(file)).map_err(failure)?;

    debug!(
        path = %path.display(),
        lines = parser.lines(),
        sections = parser.config.len(),
        "read configuration"
    );

    Ok(parser.finish())
}

/// Parses a configuration from any buffered reader.
///
/// # Errors
///
/// Returns the first I/O error produced by `reader`, including invalid UTF-8.
pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Configuration> {
    let mut parser = Parser::new();
    parse_lines(&mut parser, reader)?;
    Ok(parser.finish())
}

/// Parses configuration text.
#[must_use]
pub fn parse_str(text: &str) -> Configuration {
    let mut parser = Parser::new();
    for line in text.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}

fn parse_lines<R: BufRead>(parser: &mut Parser, reader: R) -> io::Result<()> {
    for line in reader.lines() {
        parser.feed_line(&line?);
    }
    Ok(())
}

impl FromStr for Configuration {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(parse_str(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_and_named_sections() {
        let config = parse_str("a = 1\n[x]\nb = 2\n");

        let x = config.section("x").expect("expected section x");
        assert_eq!(x.value_of("b"), "2");

        let global = config.section(GLOBAL_SECTION).expect("expected global section");
        assert_eq!(global.value_of("a"), "1");
        assert_eq!(config.section_names(), vec![GLOBAL_SECTION, "x"]);
    }

    #[test]
    fn global_section_is_always_registered() {
        let config = parse_str("[only]\nkey = value\n");

        let global = config.section(GLOBAL_SECTION).expect("expected global section");
        assert!(global.is_empty());
        assert_eq!(config.render(), "[only]\nkey = value\n");
    }

    #[test]
    fn repeated_headers_create_new_sections() {
        let config = parse_str("[server]\nhost = a\n[server]\nhost = b\n");

        let servers = config.sections("server").expect("expected server sections");
        assert_eq!(servers.len(), 2);
        assert_eq!(servers[0].value_of("host"), "a");
        assert_eq!(servers[1].value_of("host"), "b");
    }

    #[test]
    fn duplicate_keys_within_a_block_collapse() {
        let config = parse_str("[s]\nk = 1\nother\nk = 2\n");

        let section = config.section("s").expect("expected section s");
        assert_eq!(section.option_names(), vec!["k", "other"]);
        assert_eq!(section.value_of("k"), "2");
    }

    #[test]
    fn colon_lines_and_key_only_options() {
        let config = parse_str(
            "
[dc1.webservers]
  HostName: web1
192.168.1.10
; primary rack
",
        );

        let section = config.section("dc1.webservers").expect("expected webservers");
        assert_eq!(
            section.options(),
            vec![
                ("HostName".to_owned(), "web1".to_owned()),
                ("192.168.1.10".to_owned(), String::new()),
                ("; primary rack".to_owned(), String::new()),
            ]
        );
    }

    #[test]
    fn header_whitespace_is_trimmed() {
        let config = parse_str("  [  MYSQLD DEFAULT ]  \r\nTotalSendBufferMemory = 128M\r\n");

        let section = config.section("MYSQLD DEFAULT").expect("expected MYSQLD DEFAULT");
        assert_eq!(section.value_of("TotalSendBufferMemory"), "128M");
    }

    #[test]
    fn explicit_global_header_stays_separate() {
        let config = parse_str("a = 1\n[global]\na = 2\n");
        assert_eq!(config.sections(GLOBAL_SECTION).expect("expected global").len(), 2);

        let text = config.render();
        assert_eq!(text, "a = 1\n[global]\na = 2\n");

        let reread = parse_str(&text);
        let globals = reread.sections(GLOBAL_SECTION).expect("expected global");
        assert_eq!(globals.len(), 2);
        assert_eq!(globals[0].value_of("a"), "1");
        assert_eq!(globals[1].value_of("a"), "2");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let mut parser = Parser::new();
        for line in ["", "a = 1", "   ", "[x]", ""] {
            parser.feed_line(line);
        }
        assert_eq!(parser.lines(), 5);

        let config = parser.finish();
        let global = config.section(GLOBAL_SECTION).expect("expected global section");
        assert_eq!(global.option_names(), vec!["a"]);
    }

    #[test]
    fn reader_rejects_invalid_utf8() {
        let result = from_reader(&b"[x]\nkey = \xFF\xFE\n"[..]);

        assert_eq!(
            result.map(|_| ()).unwrap_err().kind(),
            io::ErrorKind::InvalidData
        );
    }

    #[test]
    fn from_str_matches_parse_str() {
        let config: Configuration = "[x]\nk = v\n".parse().expect("parsing text cannot fail");

        assert_eq!(config.string_value("x", "k").expect("expected x"), "v");
    }
}
