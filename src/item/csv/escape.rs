use std::borrow::Cow;

const QUOTE: char = '"';

/// Makes a rendered value safe to place in a delimited row.
///
/// A value is quoted when it contains the delimiter, `\n`, `\r`, `"` or the
/// line separator. Embedded quotes are doubled. Values that need neither are
/// returned borrowed.
///
/// ```
/// use csv_record_rs::item::csv::escape::escape;
///
/// assert_eq!(escape("plain", ',', "\n"), "plain");
/// assert_eq!(escape("Smith, John", ',', "\n"), "\"Smith, John\"");
/// assert_eq!(escape("He said \"hi\"", ',', "\n"), "\"He said \"\"hi\"\"\"");
/// ```
pub fn escape<'a>(value: &'a str, delimiter: char, line_separator: &str) -> Cow<'a, str> {
    let needs_quoting = value
        .chars()
        .any(|c| c == delimiter || c == '\n' || c == '\r' || c == QUOTE)
        || (!line_separator.is_empty() && value.contains(line_separator));

    let has_quotes = value.contains(QUOTE);

    if !needs_quoting && !has_quotes {
        return Cow::Borrowed(value);
    }

    let body = if has_quotes {
        Cow::Owned(value.replace(QUOTE, "\"\""))
    } else {
        Cow::Borrowed(value)
    };

    if needs_quoting {
        let mut quoted = String::with_capacity(body.len() + 2);
        quoted.push(QUOTE);
        quoted.push_str(&body);
        quoted.push(QUOTE);
        Cow::Owned(quoted)
    } else {
        body
    }
}
