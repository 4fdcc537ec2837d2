//! Content-location scanning for mirror lookup pages.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;
use url::Url;

/// Compiles a regex at static init; panics on invalid pattern.
fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// `PDFObject.embed("…", …)` calls in inline scripts.
static PDFOBJECT_EMBED_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r#"PDFObject\.embed\(\s*["']([^"']+)["']"#)
});

/// Opening `<embed>` tags.
static EMBED_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?is)<embed\b[^>]*>"));

/// Opening `<iframe>` tags.
static IFRAME_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?is)<iframe\b[^>]*>"));

static SRC_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r#"(?is)\bsrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#));

static PDF_TYPE_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r#"(?is)\btype\s*=\s*["']?application/pdf\b"#)
});

/// Finds the PDF content location referenced by a lookup page.
///
/// Candidates are tried in order: `PDFObject.embed` script calls, `<embed>`
/// elements typed `application/pdf`, then any `<iframe>` with a `src`. The
/// first candidate that resolves to an http(s) URL against `page_url` wins.
#[must_use]
pub fn find_pdf_url(html: &str, page_url: &Url) -> Option<String> {
    let script_sources = PDFOBJECT_EMBED_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()));

    let embed_sources = EMBED_TAG_RE
        .find_iter(html)
        .map(|tag| tag.as_str())
        .filter(|tag| PDF_TYPE_ATTR_RE.is_match(tag))
        .filter_map(src_attribute);

    let iframe_sources = IFRAME_TAG_RE
        .find_iter(html)
        .filter_map(|tag| src_attribute(tag.as_str()));

    script_sources
        .chain(embed_sources)
        .chain(iframe_sources)
        .find_map(|candidate| {
            let resolved = absolutize_url(&candidate, page_url);
            trace!(candidate = %candidate, resolved = ?resolved, "content location candidate");
            resolved
        })
}

fn src_attribute(tag: &str) -> Option<String> {
    let caps = SRC_ATTR_RE.captures(tag)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Resolves a possibly relative source against the page it came from.
///
/// Protocol-relative values (`//host/...`) take the page's scheme. Results
/// that are not http(s) (`about:blank`, `javascript:`) are rejected.
#[must_use]
pub fn absolutize_url(value: &str, base_url: &Url) -> Option<String> {
    let value = value.trim().replace("&amp;", "&");
    let joined = if value.starts_with("//") {
        Url::parse(&format!("{}:{value}", base_url.scheme())).ok()?
    } else {
        base_url.join(&value).ok()?
    };
    matches!(joined.scheme(), "http" | "https").then(|| joined.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://mirror.example/10.1234/abc").unwrap()
    }

    #[test]
    fn test_find_pdf_url_pdfobject_embed() {
        let html = r##"<script>PDFObject.embed("/files/abc.pdf", "#viewer");</script>"##;
        assert_eq!(
            find_pdf_url(html, &page()).unwrap(),
            "https://mirror.example/files/abc.pdf"
        );
    }

    #[test]
    fn test_find_pdf_url_embed_requires_pdf_type() {
        let html = r#"<embed src="/flash.swf" type="application/x-shockwave-flash">
            <embed type="application/pdf" src="https://cdn.example/abc.pdf#navpanes=0">"#;
        assert_eq!(
            find_pdf_url(html, &page()).unwrap(),
            "https://cdn.example/abc.pdf#navpanes=0"
        );
    }

    #[test]
    fn test_find_pdf_url_protocol_relative_iframe() {
        let html = r#"<div><iframe id="pdf" src = '//cdn.example/x/abc.pdf'></iframe></div>"#;
        assert_eq!(
            find_pdf_url(html, &page()).unwrap(),
            "https://cdn.example/x/abc.pdf"
        );
    }

    #[test]
    fn test_find_pdf_url_protocol_relative_keeps_http_page_scheme() {
        let base = Url::parse("http://mirror.example/lookup").unwrap();
        let html = r#"<iframe src="//cdn.example/abc.pdf"></iframe>"#;
        assert_eq!(
            find_pdf_url(html, &base).unwrap(),
            "http://cdn.example/abc.pdf"
        );
    }

    #[test]
    fn test_find_pdf_url_prefers_script_over_iframe() {
        let html = r#"<iframe src="/iframe.pdf"></iframe>
            <script>PDFObject.embed('/script.pdf')</script>"#;
        assert_eq!(
            find_pdf_url(html, &page()).unwrap(),
            "https://mirror.example/script.pdf"
        );
    }

    #[test]
    fn test_find_pdf_url_skips_blank_iframes() {
        let html = r#"<iframe src="about:blank"></iframe><iframe src="/real.pdf"></iframe>"#;
        assert_eq!(
            find_pdf_url(html, &page()).unwrap(),
            "https://mirror.example/real.pdf"
        );
    }

    #[test]
    fn test_find_pdf_url_unescapes_ampersands() {
        let html = r#"<iframe src="/get?id=1&amp;dl=1"></iframe>"#;
        assert_eq!(
            find_pdf_url(html, &page()).unwrap(),
            "https://mirror.example/get?id=1&dl=1"
        );
    }

    #[test]
    fn test_find_pdf_url_none_when_missing() {
        assert!(find_pdf_url("<html><body>captcha</body></html>", &page()).is_none());
        assert!(find_pdf_url("<iframe></iframe>", &page()).is_none());
    }
}
