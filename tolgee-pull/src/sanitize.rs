//! Text-level helpers applied to a single translation value before it is
//! embedded in an Android resource document.
//!
//! - [`decode_entities`] turns HTML entities from the export back into characters.
//! - [`escape_for_target`] applies Android string escaping (`\'`, `\"`, `\n`).
//! - [`contains_markup`] and [`has_multiple_placeholders`] classify a value.
//!
//! Decoding must happen before escaping, otherwise an entity such as `&quot;`
//! would survive escaping and be decoded into an unescaped quote later.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

// Named entities are replaced first, numeric ones afterwards.
const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("&#160;", " "),
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
];

const NO_BREAK_SPACE_CODE: u32 = 160;

lazy_static! {
    static ref NUMERIC_ENTITY_REGEX: Regex = Regex::new(r"&#(\d+);").unwrap();
    static ref HTML_TAG_REGEX: Regex = Regex::new(r"<[a-zA-Z][^>]*>").unwrap();
    static ref PLACEHOLDER_REGEX: Regex = Regex::new(r"%[sd]").unwrap();
}

/// Replaces HTML entities with the characters they stand for.
///
/// Non-breaking spaces (`&nbsp;`, `&#160;`) become a plain space. Numeric
/// entities that do not name a valid Unicode scalar value are left untouched.
///
/// ```rust
/// use tolgee_pull::sanitize::decode_entities;
/// assert_eq!(decode_entities("&lt;b&gt;Hi&#33;&lt;/b&gt;"), "<b>Hi!</b>");
/// assert_eq!(decode_entities("a&nbsp;b&#160;c"), "a b c");
/// ```
pub fn decode_entities(text: &str) -> String {
    let mut result = text.to_string();

    for (entity, replacement) in NAMED_ENTITIES {
        if result.contains(entity) {
            result = result.replace(entity, replacement);
        }
    }

    NUMERIC_ENTITY_REGEX
        .replace_all(&result, |caps: &Captures| {
            let code = match caps[1].parse::<u32>() {
                Ok(code) => code,
                Err(_) => return caps[0].to_string(),
            };
            if code == NO_BREAK_SPACE_CODE {
                return " ".to_string();
            }
            char::from_u32(code)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Escapes quotes and newlines the way Android string resources expect.
///
/// Quotes are escaped before newlines are replaced so the backslash inserted
/// for `\n` is never escaped a second time.
///
/// ```rust
/// use tolgee_pull::sanitize::escape_for_target;
/// assert_eq!(escape_for_target("It's \"ok\"\nnext"), r#"It\'s \"ok\"\nnext"#);
/// ```
pub fn escape_for_target(text: &str) -> String {
    text.replace('\'', "\\'")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Decodes entities, then escapes the result for the resource document.
pub fn sanitize(text: &str) -> String {
    escape_for_target(&decode_entities(text))
}

/// Returns `true` if the text contains something that looks like an HTML tag,
/// e.g. `<b>` or `<a href="...">`.
pub fn contains_markup(text: &str) -> bool {
    HTML_TAG_REGEX.is_match(text)
}

/// Returns `true` if the text holds two or more `%s`/`%d` placeholders.
pub fn has_multiple_placeholders(text: &str) -> bool {
    PLACEHOLDER_REGEX.find_iter(text).nth(1).is_some()
}

/// Splits a value so that no piece contains the CDATA terminator `]]>`.
///
/// Each returned piece can be wrapped in its own CDATA section; written back to
/// back they read as the original text.
pub(crate) fn cdata_sections(text: &str) -> Vec<Cow<'_, str>> {
    if !text.contains("]]>") {
        return vec![Cow::Borrowed(text)];
    }

    let mut sections = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find("]]>") {
        // Keep "]]" in this section and start the next one with ">".
        sections.push(Cow::Borrowed(&rest[..pos + 2]));
        rest = &rest[pos + 2..];
    }
    sections.push(Cow::Borrowed(rest));
    sections
}
