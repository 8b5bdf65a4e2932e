//! Extract a numeric column from line-oriented tool output.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Regex;
use tracing::{debug, instrument};

use crate::core::series::Series;
use crate::error::{GmxError, Result};

/// A line regex plus the name of the capture group holding the value.
#[derive(Debug, Clone)]
pub struct LinePattern {
    regex: Regex,
    field: String,
}

impl LinePattern {
    /// Compile `pattern`; it must define a named group called `field`.
    pub fn new(pattern: &str, field: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| GmxError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        if !regex.capture_names().flatten().any(|name| name == field) {
            return Err(GmxError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: format!("no capture group named {field:?}"),
            });
        }
        Ok(Self {
            regex,
            field: field.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// The field's raw text if `line` matches. A match where the group did
    /// not participate yields an empty string so it fails number parsing.
    fn extract<'l>(&self, line: &'l str) -> Option<&'l str> {
        let caps = self.regex.captures(line)?;
        Some(caps.name(&self.field).map_or("", |m| m.as_str()))
    }
}

/// Parse every matching line of the file at `path` into a [`Series`].
///
/// Non-matching lines are skipped. Zero matches is a valid, empty series; a
/// missing file is [`GmxError::FileNotFound`].
#[instrument(skip_all, fields(path = %path.display(), field = pattern.field()))]
pub fn parse_series(path: &Path, pattern: &LinePattern) -> Result<Series> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => GmxError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => GmxError::io(format!("open {}", path.display()), e),
    })?;
    parse_reader(BufReader::new(file), path, pattern)
}

/// Same as [`parse_series`] over any buffered reader. `source` names the
/// input in errors.
///
/// Lines are decoded lossily, so bytes that are not UTF-8 (e.g. Latin-1 in an
/// XVG legend) only matter if they land in the extracted field.
pub fn parse_reader<R: BufRead>(
    mut reader: R,
    source: &Path,
    pattern: &LinePattern,
) -> Result<Series> {
    let mut series = Series::default();
    let mut raw = Vec::new();
    let mut line_no = 0usize;
    loop {
        raw.clear();
        let n = reader
            .read_until(b'\n', &mut raw)
            .map_err(|e| GmxError::io(format!("read {}", source.display()), e))?;
        if n == 0 {
            break;
        }
        line_no += 1;
        let line = String::from_utf8_lossy(&raw);
        let line = line.trim_end_matches(['\n', '\r']);
        let Some(text) = pattern.extract(line) else {
            continue;
        };
        let value = text.trim().parse::<f64>().map_err(|_| GmxError::Parse {
            path: source.to_path_buf(),
            line: line_no,
            text: text.to_string(),
        })?;
        series.push(value);
    }
    debug!(count = series.len(), "parsed series");
    Ok(series)
}
