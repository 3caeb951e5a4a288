//! Result-file parser with encoding auto-detection.
//!
//! A result file is a header line followed by data lines, all split on a
//! separator pattern. The first field of each data line is the row key.

use std::path::Path;

use regex::Regex;
use tracing::warn;

use crate::error::{ParseError, ParseResult};
use crate::models::{Conventions, FileTable};

/// Default column separator: runs of whitespace.
pub const DEFAULT_SEPARATOR: &str = r"\s+";

/// Per-file parsing settings.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Column separator pattern.
    pub separator: Regex,
    /// Prefix added to every header token.
    pub column_prefix: Option<String>,
    /// Keep rows holding an error marker instead of dropping them.
    pub keep_error_rows: bool,
    /// Suppress warnings about unparsable lines.
    pub quiet: bool,
}

impl ParseOptions {
    pub fn new(separator: &str) -> ParseResult<Self> {
        Ok(Self {
            separator: Regex::new(separator)?,
            column_prefix: None,
            keep_error_rows: false,
            quiet: false,
        })
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.column_prefix = if prefix.is_empty() { None } else { Some(prefix) };
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            separator: Regex::new(DEFAULT_SEPARATOR).expect("default separator is a valid regex"),
            column_prefix: None,
            keep_error_rows: false,
            quiet: false,
        }
    }
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes using the given encoding, falling back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn tokenize<'a>(line: &'a str, separator: &Regex) -> Vec<&'a str> {
    separator.split(line.trim()).collect()
}

/// Parse the contents of one result file.
///
/// The number of fields is pinned by the first data line; later lines with a
/// different count are skipped with a warning.
pub fn parse_str(
    content: &str,
    source_name: &str,
    options: &ParseOptions,
    conventions: &Conventions,
) -> ParseResult<FileTable> {
    let mut lines = content
        .lines()
        .enumerate()
        .skip_while(|(_, l)| l.trim().is_empty());

    let (_, header_line) = lines
        .next()
        .ok_or_else(|| ParseError::EmptyFile(source_name.to_string()))?;

    let prefix = options.column_prefix.as_deref().unwrap_or("");
    let header: Vec<String> = tokenize(header_line, &options.separator)
        .into_iter()
        .map(|h| format!("{prefix}{h}"))
        .collect();

    let mut rows = Vec::new();
    let mut pinned: Option<usize> = None;

    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }

        let fields = tokenize(line, &options.separator);
        let width = *pinned.get_or_insert(fields.len());

        if fields.len() != width {
            if !options.quiet {
                warn!(
                    "Cannot parse line {} of {}, expected {} fields, found {}: {}",
                    idx + 1,
                    source_name,
                    width,
                    fields.len(),
                    line.trim()
                );
            }
            continue;
        }

        if !options.keep_error_rows && fields[1..].iter().any(|f| conventions.is_error(f)) {
            continue;
        }

        rows.push(fields.into_iter().map(String::from).collect());
    }

    let column_count = pinned.unwrap_or(header.len() + 1);

    if header.len() != column_count && header.len() + 1 != column_count {
        return Err(ParseError::UnknownHeaderFormat {
            source_name: source_name.to_string(),
            header_len: header.len(),
            row_len: column_count,
        });
    }

    Ok(FileTable {
        header,
        rows,
        column_count,
        source_name: source_name.to_string(),
    })
}

/// Read and parse a result file, auto-detecting its encoding.
pub fn parse_file<P: AsRef<Path>>(
    path: P,
    options: &ParseOptions,
    conventions: &Conventions,
) -> ParseResult<FileTable> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let encoding = detect_encoding(&bytes);
    let content = decode_content(&bytes, &encoding);

    parse_str(&content, &path.display().to_string(), options, conventions)
}

/// Parse several files in order. The i-th prefix applies to the i-th file.
pub fn parse_files<P: AsRef<Path>>(
    paths: &[P],
    prefixes: &[String],
    options: &ParseOptions,
    conventions: &Conventions,
) -> ParseResult<Vec<FileTable>> {
    paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let file_options = match prefixes.get(i) {
                Some(prefix) => options.clone().with_prefix(prefix.as_str()),
                None => options.clone(),
            };
            parse_file(path, &file_options, conventions)
        })
        .collect()
}
