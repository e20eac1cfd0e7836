//! `{i}` placeholder expansion for message templates stored in a map.

use std::sync::LazyLock;

use regex::Regex;
use tracing::instrument;

use crate::domain::error::{MapError, MapResult};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)(\})?").expect("placeholder pattern is valid"));

/// Replace every `{i}` in `template` with `args[i]`.
///
/// The template is scanned once from left to right. Text inserted from `args`
/// is copied verbatim, so placeholders it contains are not expanded.
///
/// # Errors
/// - [`MapError::UnterminatedPlaceholder`] for a `{` without a matching `}`
/// - [`MapError::InvalidPlaceholder`] when the index is not a number
/// - [`MapError::PlaceholderOutOfRange`] when `i >= args.len()`
#[instrument(level = "trace", skip(args), fields(args = args.len()))]
pub fn expand<S: AsRef<str>>(template: &str, args: &[S]) -> MapResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        if caps.get(2).is_none() {
            return Err(MapError::UnterminatedPlaceholder {
                position: whole.start,
            });
        }
        let inner = caps.get(1).map_or("", |m| m.as_str());
        let index: usize = inner
            .parse()
            .map_err(|_| MapError::InvalidPlaceholder {
                placeholder: inner.to_string(),
            })?;
        let arg = args.get(index).ok_or(MapError::PlaceholderOutOfRange {
            index,
            len: args.len(),
        })?;

        out.push_str(&template[last..whole.start]);
        out.push_str(arg.as_ref());
        last = whole.end;
    }

    out.push_str(&template[last..]);
    Ok(out)
}
