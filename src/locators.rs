use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

use fantoccini::Locator;
use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};

/// How a selector string should be interpreted when querying the DOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Strategy {
    Id,
    Name,
    Xpath,
    Css,
    Class,
    Link,
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "xpath" => Ok(Self::Xpath),
            "css" => Ok(Self::Css),
            "class" => Ok(Self::Class),
            "link" => Ok(Self::Link),
            other => Err(Error::UnsupportedStrategy(other.to_string())),
        }
    }
}

impl TryFrom<String> for Strategy {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Xpath => "xpath",
            Self::Css => "css",
            Self::Class => "class",
            Self::Link => "link",
        };
        f.write_str(name)
    }
}

/// One entry of a page's locator document.
#[derive(Debug, Clone, Deserialize)]
pub struct LocatorRecord {
    pub name: String,
    pub locate: Strategy,
    pub locator: String,
    #[serde(default)]
    pub is_dynamic: bool,
}

/// A locator with all substitutions applied, ready to query with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub strategy: Strategy,
    pub selector: String,
    // fantoccini speaks css/id/xpath/link-text on the wire, so name and
    // class selectors are carried as equivalent css.
    wire: String,
}

impl Resolved {
    pub fn new(strategy: Strategy, selector: impl Into<String>) -> Self {
        let selector = selector.into();
        let wire = match strategy {
            Strategy::Name => format!("[name=\"{selector}\"]"),
            Strategy::Class => format!(".{selector}"),
            _ => selector.clone(),
        };
        Self {
            strategy,
            selector,
            wire,
        }
    }

    pub fn locator(&self) -> Locator<'_> {
        match self.strategy {
            Strategy::Id => Locator::Id(&self.wire),
            Strategy::Xpath => Locator::XPath(&self.wire),
            Strategy::Link => Locator::LinkText(&self.wire),
            Strategy::Css | Strategy::Name | Strategy::Class => Locator::Css(&self.wire),
        }
    }
}

impl fmt::Display for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.strategy, self.selector)
    }
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern"))
}

/// Substitute `{key}` placeholders from the supplied pairs.
/// A placeholder without a matching key fails with a format error.
fn substitute(template: &str, args: &[(&str, &str)]) -> Result<String> {
    let mut missing: Option<String> = None;
    let out = placeholder_re().replace_all(template, |caps: &regex::Captures<'_>| {
        let key = &caps[1];
        match args.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => (*value).to_string(),
            None => {
                missing.get_or_insert_with(|| key.to_string());
                String::new()
            }
        }
    });
    if let Some(key) = missing {
        return Err(Error::Format(format!(
            "no value supplied for `{{{key}}}` in template `{template}`"
        )));
    }
    Ok(out.into_owned())
}

/// Per-page locator lookup, backed by a JSON document of [`LocatorRecord`]s
/// at `{locator_root}/{folder}/{page_name}.json`.
#[derive(Debug)]
pub struct LocatorStore {
    path: PathBuf,
    records: Vec<LocatorRecord>,
}

impl LocatorStore {
    /// Load the locator document for one page. The folder is the
    /// environment-specific subdirectory named by the active config.
    pub fn load(locator_root: impl AsRef<Path>, folder: &str, page_name: &str) -> Result<Self> {
        if folder.trim().is_empty() {
            return Err(Error::Configuration(
                "locator folder is not set; check the `folder` key of the active config".into(),
            ));
        }

        let path = locator_root
            .as_ref()
            .join(folder)
            .join(format!("{page_name}.json"));

        let raw = fs::read_to_string(&path).map_err(|e| {
            tracing::error!("failed to read locator document {}: {e}", path.display());
            Error::NotFound(format!("locator document {}", path.display()))
        })?;

        let records: Vec<LocatorRecord> = serde_json::from_str(&raw).map_err(|e| {
            tracing::error!("invalid locator document {}: {e}", path.display());
            Error::NotFound(format!(
                "locator document {} is not valid JSON: {e}",
                path.display()
            ))
        })?;

        // Duplicate names are a data-authoring error; first definition wins.
        for (i, record) in records.iter().enumerate() {
            if records[..i].iter().any(|prev| prev.name == record.name) {
                tracing::warn!(
                    "duplicate locator name `{}` in {}; first definition wins",
                    record.name,
                    path.display()
                );
            }
        }

        tracing::debug!("loaded {} locators from {}", records.len(), path.display());
        Ok(Self { path, records })
    }

    /// Resolve a static locator by name.
    pub fn resolve(&self, name: &str) -> Result<Resolved> {
        self.resolve_with(name, &[])
    }

    /// Resolve a locator by name, substituting the given key/value pairs
    /// into the selector template when the record is dynamic.
    pub fn resolve_with(&self, name: &str, substitutions: &[(&str, &str)]) -> Result<Resolved> {
        let record = self
            .records
            .iter()
            .find(|record| record.name == name)
            .ok_or_else(|| {
                tracing::error!("locator `{name}` not found in {}", self.path.display());
                Error::NotFound(format!("locator `{name}` in {}", self.path.display()))
            })?;

        let selector = if record.is_dynamic {
            substitute(&record.locator, substitutions)?
        } else {
            record.locator.clone()
        };

        Ok(Resolved::new(record.locate, selector))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
