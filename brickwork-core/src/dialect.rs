//! Placeholder style and identifier quoting.
//!
//! A [`Dialect`] is a plain `Copy` value. Statements can be rendered against
//! an explicit dialect with `build_with`, or against the process-wide default
//! with `build`.
//!
//! The default lives behind a lock and is shared by every thread in the
//! process: [`set_option`] changes the output of every `build()` that runs
//! afterwards, including statements constructed earlier. Capture
//! [`current()`] and use `build_with` when a render must not observe later
//! changes.

use std::sync::{PoisonError, RwLock};

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

/// How bound parameters are written into the SQL text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaceholderStyle {
    /// `$1, $2, ...` (PostgreSQL)
    Dollar,
    /// `:1, :2, ...` (Oracle)
    Colon,
    /// `@p1, @p2, ...` (SQL Server)
    AtP,
    /// `?` for every parameter (MySQL, SQLite)
    Question,
}

impl PlaceholderStyle {
    /// Write the placeholder for the 1-based parameter `index`
    pub fn write(&self, out: &mut String, index: usize) {
        let prefix = match self {
            PlaceholderStyle::Question => {
                out.push('?');
                return;
            }
            PlaceholderStyle::Dollar => "$",
            PlaceholderStyle::Colon => ":",
            PlaceholderStyle::AtP => "@p",
        };
        out.push_str(prefix);
        out.push_str(&index.to_string());
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "$" | "$1" => Some(PlaceholderStyle::Dollar),
            ":" | ":1" => Some(PlaceholderStyle::Colon),
            "@p" | "@p1" => Some(PlaceholderStyle::AtP),
            "?" => Some(PlaceholderStyle::Question),
            _ => None,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Dialect {
    pub placeholder: PlaceholderStyle,
    /// Identifier quote character, `None` leaves identifiers bare
    #[serde(deserialize_with = "deserialize_quote_char")]
    pub quote_char: Option<char>,
    /// Emit LIMIT/OFFSET as bound parameters instead of inline literals
    pub bind_limits: bool,
}

fn deserialize_quote_char<'de, D>(deserializer: D) -> std::result::Result<Option<char>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<char>::deserialize(deserializer)? {
        quote @ (None | Some('"') | Some('`')) => Ok(quote),
        Some(other) => Err(de::Error::invalid_value(
            Unexpected::Char(other),
            &"a double quote, a backtick or null",
        )),
    }
}

impl Dialect {
    /// `$n` placeholders, unquoted identifiers
    pub const fn postgres() -> Self {
        Self {
            placeholder: PlaceholderStyle::Dollar,
            quote_char: None,
            bind_limits: false,
        }
    }

    /// `?` placeholders, backtick-quoted identifiers
    pub const fn mysql() -> Self {
        Self {
            placeholder: PlaceholderStyle::Question,
            quote_char: Some('`'),
            bind_limits: false,
        }
    }

    /// `?` placeholders, double-quoted identifiers
    pub const fn sqlite() -> Self {
        Self {
            placeholder: PlaceholderStyle::Question,
            quote_char: Some('"'),
            bind_limits: false,
        }
    }

    /// Load a dialect from a JSON configuration document.
    ///
    /// Missing keys keep their default value. Unknown keys and quote
    /// characters other than `"` and `` ` `` are rejected.
    ///
    /// # Examples
    /// ```
    /// use brickwork_core::{Dialect, PlaceholderStyle};
    ///
    /// let dialect = Dialect::from_json(r#"{"placeholder": "question", "quoteChar": "`"}"#).unwrap();
    /// assert_eq!(dialect.placeholder, PlaceholderStyle::Question);
    /// assert_eq!(dialect.quote_char, Some('`'));
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Return a copy with the named option applied.
    ///
    /// Recognized options are `placeholder`, `quoteChar` and `bindLimits`.
    pub fn with_option(mut self, name: &str, value: &str) -> Result<Self> {
        match name {
            "placeholder" => {
                self.placeholder = PlaceholderStyle::parse(value)
                    .ok_or_else(|| Error::unsupported_option(name, value))?;
            }
            "quoteChar" => {
                self.quote_char = match value {
                    "" => None,
                    "\"" => Some('"'),
                    "`" => Some('`'),
                    _ => return Err(Error::unsupported_option(name, value)),
                };
            }
            "bindLimits" => {
                self.bind_limits = match value {
                    "true" => true,
                    "false" => false,
                    _ => return Err(Error::unsupported_option(name, value)),
                };
            }
            _ => return Err(Error::unsupported_option(name, value)),
        }
        Ok(self)
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::postgres()
    }
}

static DEFAULT_DIALECT: RwLock<Dialect> = RwLock::new(Dialect::postgres());

/// Snapshot of the process-wide default dialect
pub fn current() -> Dialect {
    *DEFAULT_DIALECT.read().unwrap_or_else(|poisoned| {
        tracing::trace!("recovering poisoned default dialect lock");
        PoisonError::into_inner(poisoned)
    })
}

/// Replace the process-wide default dialect, returning the previous one
pub fn set_default(dialect: Dialect) -> Dialect {
    let mut guard = DEFAULT_DIALECT.write().unwrap_or_else(|poisoned| {
        tracing::trace!("recovering poisoned default dialect lock");
        PoisonError::into_inner(poisoned)
    });
    std::mem::replace(&mut *guard, dialect)
}

/// Set one option on the process-wide default dialect.
///
/// An unrecognized name or value leaves the default untouched.
///
/// # Examples
/// ```no_run
/// brickwork_core::set_option("placeholder", "?").unwrap();
/// ```
pub fn set_option(name: &str, value: &str) -> Result<()> {
    set_options([(name, value)])
}

/// Apply several options to the process-wide default as one change.
///
/// Either every option is valid and all of them apply, or none do.
pub fn set_options<'a, I>(options: I) -> Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut guard = DEFAULT_DIALECT.write().unwrap_or_else(|poisoned| {
        tracing::trace!("recovering poisoned default dialect lock");
        PoisonError::into_inner(poisoned)
    });

    let mut next = *guard;
    for (name, value) in options {
        next = next.with_option(name, value).inspect_err(|_| {
            tracing::warn!(option = name, value, "rejected dialect option");
        })?;
    }
    if next != *guard {
        *guard = next;
        tracing::info!(dialect = ?next, "default dialect changed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholders(style: PlaceholderStyle) -> String {
        let mut out = String::new();
        style.write(&mut out, 1);
        out.push(',');
        style.write(&mut out, 12);
        out
    }

    #[test]
    fn test_placeholder_styles() {
        assert_eq!(placeholders(PlaceholderStyle::Dollar), "$1,$12");
        assert_eq!(placeholders(PlaceholderStyle::Colon), ":1,:12");
        assert_eq!(placeholders(PlaceholderStyle::AtP), "@p1,@p12");
        assert_eq!(placeholders(PlaceholderStyle::Question), "?,?");
    }

    #[test]
    fn test_default_is_unquoted_dollar() {
        let dialect = Dialect::default();
        assert_eq!(dialect.placeholder, PlaceholderStyle::Dollar);
        assert_eq!(dialect.quote_char, None);
        assert!(!dialect.bind_limits);
    }

    #[test]
    fn test_with_option() {
        let dialect = Dialect::default()
            .with_option("placeholder", "?")
            .unwrap()
            .with_option("quoteChar", "\"")
            .unwrap()
            .with_option("bindLimits", "true")
            .unwrap();
        assert_eq!(dialect.placeholder, PlaceholderStyle::Question);
        assert_eq!(dialect.quote_char, Some('"'));
        assert!(dialect.bind_limits);

        let cleared = dialect.with_option("quoteChar", "").unwrap();
        assert_eq!(cleared.quote_char, None);
    }

    #[test]
    fn test_unknown_option_name() {
        let err = Dialect::default().with_option("charset", "utf8").unwrap_err();
        assert!(matches!(err, Error::UnsupportedOption { .. }));
    }

    #[test]
    fn test_invalid_option_values() {
        assert!(Dialect::default().with_option("placeholder", "%s").is_err());
        assert!(Dialect::default().with_option("quoteChar", "[").is_err());
        assert!(Dialect::default().with_option("bindLimits", "yes").is_err());
    }

    #[test]
    fn test_from_json_defaults_missing_keys() {
        let dialect = Dialect::from_json(r#"{"bindLimits": true}"#).unwrap();
        assert_eq!(dialect.placeholder, PlaceholderStyle::Dollar);
        assert!(dialect.bind_limits);
    }

    #[test]
    fn test_from_json_rejects_unusable_quote_char() {
        let err = Dialect::from_json(r#"{"quoteChar": "'"}"#).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));

        let dialect = Dialect::from_json(r#"{"quoteChar": "`"}"#).unwrap();
        assert_eq!(dialect.quote_char, Some('`'));
        let dialect = Dialect::from_json(r#"{"quoteChar": null}"#).unwrap();
        assert_eq!(dialect.quote_char, None);
    }

    #[test]
    fn test_from_json_rejects_unknown_keys() {
        let err = Dialect::from_json(r#"{"placeholderStyle": "question"}"#).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_from_json_rejects_unknown_style() {
        let err = Dialect::from_json(r#"{"placeholder": "percent"}"#).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
