//! Ordered keyword flags rendered as `-key value` arguments.

use indexmap::IndexMap;

use crate::error::{GmxError, Result};

/// Flag mapping that preserves insertion order.
///
/// Replacing the value of an existing key keeps the key at its original
/// position, so the rendered argument order only depends on first insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    entries: IndexMap<String, String>,
}

impl Flags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a flag. Returns the previous value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove a flag, shifting later flags down so their order is preserved.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Put `key` first with `value`, or overwrite it in place if already present.
    pub(crate) fn set_leading(&mut self, key: &str, value: String) {
        if let Some(existing) = self.entries.get_mut(key) {
            *existing = value;
            return;
        }
        self.entries.insert(key.to_string(), value);
        let last = self.entries.len() - 1;
        self.entries.move_index(last, 0);
    }

    /// Render as `["-key", "value", ...]` in insertion order.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.entries.len() * 2);
        for (key, value) in &self.entries {
            args.push(format!("-{key}"));
            args.push(value.clone());
        }
        args
    }

    /// Check every key is a single token usable as `-key`.
    pub fn validate(&self) -> Result<()> {
        self.entries.keys().try_for_each(|key| validate_key(key))
    }

    /// Parse a `key=value` pair as accepted on the command line.
    pub fn parse_pair(raw: &str) -> Result<(String, String)> {
        let (key, value) = raw.split_once('=').ok_or_else(|| GmxError::InvalidFlag {
            flag: raw.to_string(),
            reason: "expected KEY=VALUE".to_string(),
        })?;
        let key = key.trim().trim_start_matches('-');
        validate_key(key)?;
        Ok((key.to_string(), value.to_string()))
    }
}

fn validate_key(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "key is empty"
    } else if key.chars().any(char::is_whitespace) {
        "key contains whitespace"
    } else if key.starts_with('-') {
        "key must not start with '-'"
    } else {
        return Ok(());
    };
    Err(GmxError::InvalidFlag {
        flag: key.to_string(),
        reason: reason.to_string(),
    })
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Flags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut flags = Flags::new();
        for (key, value) in iter {
            flags.insert(key, value);
        }
        flags
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Flags {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_in_insertion_order() {
        let flags = Flags::new()
            .with("s", "topol.tpr")
            .with("f", "traj.xtc")
            .with("n", "index.ndx");
        assert_eq!(
            flags.to_args(),
            vec!["-s", "topol.tpr", "-f", "traj.xtc", "-n", "index.ndx"]
        );
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut flags = Flags::new().with("a", "1").with("b", "2");
        let previous = flags.insert("a", "3");
        assert_eq!(previous.as_deref(), Some("1"));
        assert_eq!(flags.to_args(), vec!["-a", "3", "-b", "2"]);
    }

    #[test]
    fn remove_preserves_remaining_order() {
        let mut flags: Flags = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        flags.remove("a");
        assert_eq!(flags.to_args(), vec!["-b", "2", "-c", "3"]);
    }

    #[test]
    fn set_leading_inserts_first_or_replaces_in_place() {
        let mut absent = Flags::new().with("f", "traj.xtc");
        absent.set_leading("o", "/scratch/out.xvg".to_string());
        assert_eq!(absent.to_args(), vec!["-o", "/scratch/out.xvg", "-f", "traj.xtc"]);

        let mut present = Flags::new().with("f", "traj.xtc").with("o", "mine.xvg");
        present.set_leading("o", "/scratch/mine.xvg".to_string());
        assert_eq!(
            present.to_args(),
            vec!["-f", "traj.xtc", "-o", "/scratch/mine.xvg"]
        );
    }

    #[test]
    fn parse_pair_splits_on_first_equals() {
        let (key, value) = Flags::parse_pair("select=name CA and resid 1=5").expect("pair");
        assert_eq!(key, "select");
        assert_eq!(value, "name CA and resid 1=5");

        let (key, _) = Flags::parse_pair("-s=topol.tpr").expect("dashed pair");
        assert_eq!(key, "s");
    }

    #[test]
    fn parse_pair_rejects_bad_input() {
        assert!(matches!(
            Flags::parse_pair("novalue"),
            Err(GmxError::InvalidFlag { .. })
        ));
        assert!(matches!(
            Flags::parse_pair("two words=x"),
            Err(GmxError::InvalidFlag { .. })
        ));
        assert!(matches!(
            Flags::parse_pair("=x"),
            Err(GmxError::InvalidFlag { .. })
        ));
    }

    #[test]
    fn validate_rejects_multi_token_keys() {
        let flags = Flags::new().with("ok", "1").with("not ok", "2");
        let err = flags.validate().unwrap_err();
        assert!(err.to_string().contains("whitespace"));
    }
}
