//! Web address scanning and validation.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};
use url::Url;

use super::error::{MAX_URL_LENGTH, ParseError};
use super::input::Identifier;

/// An http(s) scheme followed by everything up to whitespace, a quote,
/// an angle bracket, or a closing square bracket.
#[allow(clippy::expect_used)]
static WEB_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s<>"'\]]+"#).expect("web address regex is valid") // Static pattern, safe to panic
});

/// Punctuation that usually ends the sentence around a URL rather than the URL.
const SENTENCE_PUNCTUATION: [char; 6] = ['.', ',', ';', ':', '!', '?'];

/// Finds every http(s) URL in `input`.
///
/// Each candidate is validated on its own, so the result mixes accepted
/// URLs (normalized) with the reason any rejected one failed.
///
/// # Examples
///
/// ```
/// use papers_dl_core::parser::extract_urls;
///
/// let found = extract_urls("PDF at https://example.com/doc.pdf, slides elsewhere");
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].as_ref().unwrap().value(), "https://example.com/doc.pdf");
/// ```
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
#[must_use]
pub fn extract_urls(input: &str) -> Vec<Result<Identifier, ParseError>> {
    WEB_ADDRESS
        .find_iter(input)
        .map(|candidate| {
            let trimmed = clean_url_trailing(candidate.as_str());
            trace!(url = %trimmed, "URL candidate");
            validate_url(trimmed).map(Identifier::url).inspect_err(|error| {
                debug!(url = %trimmed, %error, "URL candidate rejected");
            })
        })
        .collect()
}

/// Returns true for an http(s) URL whose path names a PDF file.
///
/// Such URLs are downloaded as-is instead of being scanned for identifiers.
#[must_use]
pub fn is_direct_pdf_url(input: &str) -> bool {
    let Ok(parsed) = Url::parse(input) else {
        return false;
    };
    matches!(parsed.scheme(), "http" | "https")
        && parsed.host().is_some()
        && parsed.path().to_ascii_lowercase().ends_with(".pdf")
}

/// Drops trailing sentence punctuation and unbalanced closing brackets.
///
/// A final `.` is kept when it would end a short alphanumeric extension,
/// and `)`/`]` are kept while the URL has as many openers as closers.
pub(crate) fn clean_url_trailing(url: &str) -> &str {
    let mut end = url.len();
    loop {
        let current = &url[..end];
        let Some(last) = current.chars().next_back() else {
            break;
        };
        let strip = match last {
            '.' => !ends_with_extension(current),
            c if SENTENCE_PUNCTUATION.contains(&c) => true,
            ')' => unbalanced(current, '(', ')'),
            ']' => unbalanced(current, '[', ']'),
            _ => false,
        };
        if !strip {
            break;
        }
        end -= last.len_utf8();
    }
    &url[..end]
}

/// True when the text after the last dot looks like a file extension.
fn ends_with_extension(text: &str) -> bool {
    text.rsplit_once('.').is_some_and(|(_, extension)| {
        (1..=5).contains(&extension.len()) && extension.chars().all(|c| c.is_ascii_alphanumeric())
    })
}

fn unbalanced(text: &str, open: char, close: char) -> bool {
    text.matches(close).count() > text.matches(open).count()
}

/// Checks that `raw` is a usable web address and returns its normalized form.
///
/// Rules: at most [`MAX_URL_LENGTH`] bytes, parseable, http or https, and
/// with a host.
///
/// # Errors
///
/// Returns the [`ParseError`] for the first rule `raw` breaks.
pub fn validate_url(raw: &str) -> Result<String, ParseError> {
    if raw.len() > MAX_URL_LENGTH {
        return Err(ParseError::too_long(raw));
    }

    let parsed = Url::parse(raw).map_err(|e| ParseError::malformed(raw, &e.to_string()))?;
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ParseError::unsupported_scheme(raw, scheme));
    }
    if parsed.host().is_none() {
        return Err(ParseError::no_host(raw));
    }

    Ok(parsed.into())
}
