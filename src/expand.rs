use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use tracing::trace;

use crate::{
    error::Error,
    types::{PATH_SEPARATOR, ROOT_VARIABLE_PREFIX},
};

/// Built-in path variables and the device root each one stands for.
pub const PATH_VARIABLES: &[(&str, u16, &str)] = &[
    ("PROGRAMS", 1, "\\Program Files"),
    ("WINDOWS", 2, "\\Windows"),
    ("DESKTOP", 3, "\\Windows\\Desktop"),
    ("STARTUP", 4, "\\Windows\\StartUp"),
    ("DOCUMENTS", 5, "\\My Documents"),
    ("PROGRAMS_ACCESSORIES", 6, "\\Program Files\\Accessories"),
    ("PROGRAMS_COMMUNICATION", 7, "\\Program Files\\Communication"),
    ("PROGRAMS_GAMES", 8, "\\Program Files\\Games"),
    ("PROGRAMS_OUTLOOK", 9, "\\Program Files\\Pocket Outlook"),
    ("PROGRAMS_OFFICE", 10, "\\Program Files\\Office"),
    ("STARTMENU_PROGRAMS", 11, "\\Windows\\Start Menu\\Programs"),
    ("STARTMENU_ACCESSORIES", 12, "\\Windows\\Start Menu\\Programs\\Accessories"),
    ("STARTMENU_COMMUNICATIONS", 13, "\\Windows\\Start Menu\\Programs\\Communications"),
    ("STARTMENU_GAMES", 14, "\\Windows\\Start Menu\\Programs\\Games"),
    ("FONTS", 15, "\\Windows\\Fonts"),
    ("RECENT", 16, "\\Windows\\Recent"),
    ("STARTMENU", 17, "\\Windows\\Start Menu"),
];

static VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\(([^)]*)\)").expect("variable pattern is valid"));

/// The device token for root variable `index`, e.g. `%CE1%`.
pub fn root_token(index: u16) -> String { format!("%{}{}%", ROOT_VARIABLE_PREFIX, index) }

/// Converts forward slashes to the device path separator.
pub fn normalize(path: &str) -> String { path.replace('/', &PATH_SEPARATOR.to_string()) }

/// Substitutes `$(NAME)` references in install paths.
///
/// Names are matched without regard to case. Built-in names expand to root
/// tokens, user variables to their already expanded value.
pub struct PathExpander {
    variables: IndexMap<String, String>,
}

impl Default for PathExpander {
    fn default() -> Self {
        Self {
            variables: PATH_VARIABLES
                .iter()
                .map(|&(name, index, _)| (name.to_owned(), root_token(index)))
                .collect(),
        }
    }
}

impl PathExpander {
    pub fn new() -> Self { Self::default() }

    /// Defines a user variable. `value` may reference any variable defined so far.
    pub fn define(&mut self, name: &str, value: &str) -> crate::Result<()> {
        let value = self.expand(value)?;
        trace!(name, value = value.as_str(), "defined path variable");
        self.variables.insert(name.to_uppercase(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables
            .get(&name.to_uppercase())
            .map(String::as_str)
    }

    pub fn expand(&self, path: &str) -> crate::Result<String> {
        let mut expanded = String::with_capacity(path.len());
        let mut last = 0;
        for captures in VARIABLE.captures_iter(path) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let value = self
                .get(name.as_str())
                .ok_or_else(|| Error::UnknownPathVariable(name.as_str().to_owned()))?;
            expanded.push_str(&path[last..whole.start()]);
            expanded.push_str(value);
            last = whole.end();
        }
        expanded.push_str(&path[last..]);
        Ok(normalize(&expanded))
    }
}
