//! Deterministic output filenames for fetched papers.

use sha2::{Digest, Sha256};

use crate::parser::{IdKind, Identifier};

/// Longest stem kept before the `.pdf` extension.
const MAX_STEM_CHARS: usize = 200;

/// Stem used when sanitizing leaves nothing.
const FALLBACK_STEM: &str = "paper";

const PDF_EXTENSION: &str = ".pdf";

/// Bytes of the identifier digest appended to lossy names.
const DIGEST_BYTES: usize = 4;

/// Derives the filename for an identifier.
///
/// The same identifier always maps to the same name, so a repeated fetch
/// overwrites the earlier file. URL identifiers drop their scheme first.
///
/// Mapping `/` to `_` is the only rewrite kept as is. Any other rewrite, or a
/// stem cut to [`MAX_STEM_CHARS`], gets a digest of the full identifier so
/// two identifiers never share a file.
#[must_use]
pub fn filename_for_identifier(identifier: &Identifier) -> String {
    let value = identifier.value();
    let base = match identifier.kind() {
        IdKind::Url => value
            .split_once("://")
            .map_or(value, |(_, rest)| rest),
        _ => value,
    };

    let cleaned = sanitize_filename_component(base);
    let slashes_only = base.replace('/', "_");
    let lossless = cleaned == slashes_only.trim_start_matches(['.', '_']).trim_end_matches('_');
    let stem = strip_pdf_extension(&cleaned);
    if lossless && stem.chars().count() <= MAX_STEM_CHARS {
        return with_pdf_extension(stem);
    }

    let digest = short_digest(value);
    let head: String = stem.chars().take(MAX_STEM_CHARS - digest.len() - 1).collect();
    let head = head.trim_end_matches(['_', '.']);
    let head = if head.is_empty() { FALLBACK_STEM } else { head };
    format!("{head}_{digest}{PDF_EXTENSION}")
}

fn short_digest(value: &str) -> String {
    Sha256::digest(value.as_bytes())
        .iter()
        .take(DIGEST_BYTES)
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// Sanitizes a user-chosen `--name`, appending `.pdf` when missing.
///
/// Returns `None` when nothing usable remains after sanitizing.
#[must_use]
pub fn filename_from_name(name: &str) -> Option<String> {
    let stem = sanitize_filename_component(strip_pdf_extension(name.trim()));
    if stem.is_empty() {
        return None;
    }
    Some(with_pdf_extension(&stem))
}

fn with_pdf_extension(raw: &str) -> String {
    let cleaned = sanitize_filename_component(raw);
    let stem = strip_pdf_extension(&cleaned);
    let stem: String = stem.chars().take(MAX_STEM_CHARS).collect();
    let stem = stem.trim_end_matches(['_', '.']);
    if stem.is_empty() {
        format!("{FALLBACK_STEM}{PDF_EXTENSION}")
    } else {
        format!("{stem}{PDF_EXTENSION}")
    }
}

fn strip_pdf_extension(name: &str) -> &str {
    let split = name.len().saturating_sub(PDF_EXTENSION.len());
    match name.get(split..) {
        Some(tail) if tail.eq_ignore_ascii_case(PDF_EXTENSION) => &name[..split],
        _ => name,
    }
}

/// Maps characters that are unsafe on common filesystems to `_` and
/// collapses runs of `_`. Leading dots are dropped so the result is never
/// hidden or a relative path segment.
pub(crate) fn sanitize_filename_component(value: &str) -> String {
    let mut out = String::new();
    let mut prev_sep = false;
    for ch in value.chars() {
        let mapped = match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() || c.is_control() => '_',
            c => c,
        };
        if mapped == '_' {
            if !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else {
            out.push(mapped);
            prev_sep = false;
        }
    }
    out.trim_start_matches(['.', '_'])
        .trim_end_matches('_')
        .to_string()
}
