use std::str::FromStr;

use crate::error::CsvError;

/// Default character substituted for hidden characters.
pub const DEFAULT_MASK_CHAR: char = '*';

/// Default number of characters left readable by partial strategies.
pub const DEFAULT_VISIBLE_CHARS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskingStrategy {
    /// `password123` -> `***********`
    Full,
    /// Keeps the first characters: `1234567890` -> `1234******`
    PartialPrefix,
    /// Keeps the last characters: `1234567890` -> `******7890`
    PartialSuffix,
}

impl FromStr for MaskingStrategy {
    type Err = CsvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.trim_start_matches("asterisks") {
            "full" => Ok(MaskingStrategy::Full),
            "partialprefix" => Ok(MaskingStrategy::PartialPrefix),
            "partialsuffix" => Ok(MaskingStrategy::PartialSuffix),
            _ => Err(CsvError::InvalidConfiguration(format!(
                "unknown masking strategy '{}'",
                s
            ))),
        }
    }
}

/// Redaction applied to a rendered value before it is escaped.
///
/// ```
/// use csv_record_rs::core::masking::{MaskingPolicy, MaskingStrategy};
///
/// let policy = MaskingPolicy::new(MaskingStrategy::PartialSuffix).visible_chars(3);
/// assert_eq!(policy.apply("1234567890"), "*******890");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaskingPolicy {
    strategy: MaskingStrategy,
    mask_char: char,
    visible_chars: usize,
}

impl MaskingPolicy {
    pub fn new(strategy: MaskingStrategy) -> MaskingPolicy {
        MaskingPolicy {
            strategy,
            mask_char: DEFAULT_MASK_CHAR,
            visible_chars: DEFAULT_VISIBLE_CHARS,
        }
    }

    pub fn mask_char(mut self, mask_char: char) -> MaskingPolicy {
        self.mask_char = mask_char;
        self
    }

    pub fn visible_chars(mut self, visible_chars: usize) -> MaskingPolicy {
        self.visible_chars = visible_chars;
        self
    }

    pub fn strategy(&self) -> MaskingStrategy {
        self.strategy
    }

    /// Masks `value`. Lengths are counted in `char`s.
    pub fn apply(&self, value: &str) -> String {
        if value.is_empty() {
            return String::new();
        }

        let len = value.chars().count();
        let visible = self.visible_chars;

        match self.strategy {
            MaskingStrategy::Full => self.mask_run(len),
            MaskingStrategy::PartialPrefix => {
                if len <= visible {
                    return value.to_string();
                }
                let mut masked: String = value.chars().take(visible).collect();
                masked.push_str(&self.mask_run(len - visible));
                masked
            }
            MaskingStrategy::PartialSuffix => {
                if len <= visible {
                    return value.to_string();
                }
                let mut masked = self.mask_run(len - visible);
                masked.extend(value.chars().skip(len - visible));
                masked
            }
        }
    }

    fn mask_run(&self, times: usize) -> String {
        std::iter::repeat_n(self.mask_char, times).collect()
    }
}
