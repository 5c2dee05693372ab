use std::{convert::Infallible, str::FromStr};

use log::warn;

/// How a declared field name is turned into a header.
///
/// Field-level "inherit from the record" is expressed as the absence of a
/// strategy (see [`FieldFormat::naming`](crate::core::record::FieldFormat::naming)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NamingStrategy {
    /// The declared name, untouched.
    #[default]
    AsIs,
    /// `firstName` -> `First Name`
    AsIsToSpaceSeparatedCapitalized,
    /// `firstName` -> `first_name`
    CamelToSnakeCase,
    /// `firstName` -> `FIRST_NAME`
    CamelToScreamingSnakeCase,
}

impl NamingStrategy {
    /// Applies the strategy to a declared field name.
    ///
    /// ```
    /// use csv_record_rs::core::naming::NamingStrategy;
    ///
    /// assert_eq!(NamingStrategy::AsIsToSpaceSeparatedCapitalized.apply("dayOfBirth"), "Day Of Birth");
    /// assert_eq!(NamingStrategy::CamelToSnakeCase.apply("dayOfBirth"), "day_of_birth");
    /// assert_eq!(NamingStrategy::CamelToScreamingSnakeCase.apply("dayOfBirth"), "DAY_OF_BIRTH");
    /// ```
    pub fn apply(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }

        match self {
            NamingStrategy::AsIs => raw.to_string(),
            NamingStrategy::AsIsToSpaceSeparatedCapitalized => space_separated_capitalized(raw),
            NamingStrategy::CamelToSnakeCase => split_camel_humps(raw).to_lowercase(),
            NamingStrategy::CamelToScreamingSnakeCase => split_camel_humps(raw).to_uppercase(),
        }
    }
}

fn space_separated_capitalized(raw: &str) -> String {
    let mut chars = raw.chars();
    let mut header = String::with_capacity(raw.len() + 4);

    if let Some(first) = chars.next() {
        header.extend(first.to_uppercase());
    }
    for c in chars {
        if c.is_uppercase() {
            header.push(' ');
        }
        header.push(c);
    }
    header
}

/// Inserts `_` wherever an ASCII lowercase letter is directly followed by an
/// ASCII uppercase run, i.e. `([a-z])([A-Z]+)` -> `$1_$2`.
fn split_camel_humps(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut previous: Option<char> = None;

    for c in raw.chars() {
        if c.is_ascii_uppercase() && previous.is_some_and(|p| p.is_ascii_lowercase()) {
            out.push('_');
        }
        out.push(c);
        previous = Some(c);
    }
    out
}

impl FromStr for NamingStrategy {
    type Err = Infallible;

    /// Parses `AS_IS`, `as-is`, `AsIs` and the like. Unknown names, and the
    /// `DEFAULT` sentinel, yield [`NamingStrategy::AsIs`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        let strategy = match normalized.as_str() {
            "asis" | "default" => NamingStrategy::AsIs,
            "asistospaceseparatedcapitalized" => NamingStrategy::AsIsToSpaceSeparatedCapitalized,
            "cameltosnakecase" => NamingStrategy::CamelToSnakeCase,
            "cameltoscreamingsnakecase" => NamingStrategy::CamelToScreamingSnakeCase,
            _ => {
                warn!("Unknown naming strategy '{}', falling back to AS_IS", s);
                NamingStrategy::AsIs
            }
        };
        Ok(strategy)
    }
}
