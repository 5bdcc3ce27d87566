//! Label sanitizer: raw parser text fragments → clean display strings.
//!
//! Decodes, in fixed order: percent-encoding, `\uXXXX` escapes, named HTML
//! entities, numeric entities (decimal and hex), `\xXX` escapes; then strips
//! HTML tags from the decoded result. Entity decoding runs before tag
//! stripping so an encoded tag cannot survive as markup; tag stripping runs
//! last so decoded angle brackets are still removed. A malformed escape never
//! fails the pass — the original substring is kept verbatim.

use winnow::combinator::{alt, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

/// Decode every supported escape form in `raw` and strip HTML tags.
#[must_use]
pub fn sanitize_label(raw: &str) -> String {
    let decoded = decode_percent(raw);
    let decoded = decode_pass(&decoded, '\\', unicode_escape);
    let decoded = decode_pass(&decoded, '&', named_entity);
    let decoded = decode_pass(&decoded, '&', numeric_entity);
    let decoded = decode_pass(&decoded, '\\', hex_escape);
    strip_tags(&decoded)
}

fn backtrack() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::new())
}

// ─── Generic single-char decode pass ────────────────────────────────────

/// Scan `input` for `trigger` characters and try `parser` at each one.
/// On success the parsed replacement char is emitted; on failure the
/// trigger char passes through untouched and scanning resumes after it.
fn decode_pass<F>(input: &str, trigger: char, parser: F) -> String
where
    F: Fn(&mut &str) -> ModalResult<char>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find(trigger) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let checkpoint = rest;
        match parser(&mut rest) {
            Ok(c) => out.push(c),
            Err(_) => {
                rest = checkpoint;
                out.push(trigger);
                rest = &rest[trigger.len_utf8()..];
            }
        }
    }
    out.push_str(rest);
    out
}

// ─── Percent-encoding ───────────────────────────────────────────────────

/// Decode `%XX` sequences. Consecutive escaped bytes are collected first so
/// multi-byte UTF-8 sequences (`%C3%A9` → `é`) decode as one unit; a run
/// that is not valid UTF-8 falls back to the raw text.
fn decode_percent(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let run_start = rest;
        let mut bytes = Vec::new();
        loop {
            let checkpoint = rest;
            match percent_byte(&mut rest) {
                Ok(b) => bytes.push(b),
                Err(_) => {
                    rest = checkpoint;
                    break;
                }
            }
        }
        if bytes.is_empty() {
            // Bare '%' with no hex pair — pass through.
            out.push('%');
            rest = &rest[1..];
            continue;
        }
        let consumed = &run_start[..run_start.len() - rest.len()];
        match String::from_utf8(bytes) {
            Ok(s) => out.push_str(&s),
            Err(_) => out.push_str(consumed),
        }
    }
    out.push_str(rest);
    out
}

fn percent_byte(input: &mut &str) -> ModalResult<u8> {
    let _ = '%'.parse_next(input)?;
    let digits: &str =
        take_while(2..=2, |c: char| c.is_ascii_hexdigit()).parse_next(input)?;
    u8::from_str_radix(digits, 16).map_err(|_| backtrack())
}

// ─── Backslash escapes ──────────────────────────────────────────────────

fn unicode_escape(input: &mut &str) -> ModalResult<char> {
    let _ = '\\'.parse_next(input)?;
    let _ = 'u'.parse_next(input)?;
    let digits: &str =
        take_while(4..=4, |c: char| c.is_ascii_hexdigit()).parse_next(input)?;
    let code = u32::from_str_radix(digits, 16).map_err(|_| backtrack())?;
    char::from_u32(code).ok_or_else(backtrack)
}

fn hex_escape(input: &mut &str) -> ModalResult<char> {
    let _ = '\\'.parse_next(input)?;
    let _ = 'x'.parse_next(input)?;
    let digits: &str =
        take_while(2..=2, |c: char| c.is_ascii_hexdigit()).parse_next(input)?;
    let code = u32::from_str_radix(digits, 16).map_err(|_| backtrack())?;
    char::from_u32(code).ok_or_else(backtrack)
}

// ─── HTML entities ──────────────────────────────────────────────────────

fn named_entity(input: &mut &str) -> ModalResult<char> {
    alt((
        "&amp;".value('&'),
        "&lt;".value('<'),
        "&gt;".value('>'),
        "&quot;".value('"'),
    ))
    .parse_next(input)
}

fn numeric_entity(input: &mut &str) -> ModalResult<char> {
    let _ = "&#".parse_next(input)?;
    let code = alt((
        preceded(
            one_of(('x', 'X')),
            take_while(1..=6, |c: char| c.is_ascii_hexdigit()),
        )
        .try_map(|d: &str| u32::from_str_radix(d, 16)),
        take_while(1..=7, |c: char| c.is_ascii_digit())
            .try_map(|d: &str| d.parse::<u32>()),
    ))
    .parse_next(input)?;
    let _ = ';'.parse_next(input)?;
    char::from_u32(code).ok_or_else(backtrack)
}

// ─── Tag stripping ──────────────────────────────────────────────────────

/// Remove `<...>` spans. An unterminated `<` is not a tag and passes through.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match rest.find('>') {
            Some(end) => rest = &rest[end + 1..],
            None => break,
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn percent_multibyte_and_entity() {
        assert_eq!(sanitize_label("caf%C3%A9 &amp; bar"), "café & bar");
    }

    #[test]
    fn malformed_percent_passes_through() {
        assert_eq!(sanitize_label("100% sure"), "100% sure");
        assert_eq!(sanitize_label("%zz"), "%zz");
    }

    #[test]
    fn invalid_utf8_run_kept_verbatim() {
        assert_eq!(sanitize_label("%FF%FE"), "%FF%FE");
    }

    #[test]
    fn unicode_and_hex_escapes() {
        assert_eq!(sanitize_label(r"\u00E9tat"), "état");
        assert_eq!(sanitize_label(r"caf\xE9"), "café");
        assert_eq!(sanitize_label(r"\uZZZZ"), r"\uZZZZ");
    }

    #[test]
    fn numeric_entities_decimal_and_hex() {
        assert_eq!(sanitize_label("&#65;&#x42;"), "AB");
        assert_eq!(sanitize_label("&#notanumber;"), "&#notanumber;");
    }

    #[test]
    fn tags_stripped_after_decoding() {
        assert_eq!(sanitize_label("a <b>bold</b> move"), "a bold move");
        // Encoded tags decode first, then get stripped as markup.
        assert_eq!(sanitize_label("&lt;i&gt;x&lt;/i&gt;"), "x");
    }

    #[test]
    fn unterminated_bracket_survives() {
        assert_eq!(sanitize_label("a < b"), "a < b");
    }
}
