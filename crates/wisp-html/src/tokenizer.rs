//! HTML tokenizer.
//!
//! A single-pass character scanner that turns an HTML source string into a
//! flat token stream. This implements enough of
//! [WHATWG §13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! to drive the tree builder in [`crate::parser`]: tag open/close, attribute
//! lists in all three quoting styles, comments, and raw-text mode for
//! `<script>`/`<style>` contents. Full tokenizer-state conformance (CDATA,
//! character references beyond the common few, foreign content) is out of
//! scope, per spec's "Non-goals: full HTML5 parser conformance".

/// A single attribute, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name.
    pub name: String,
    /// Attribute value (entity references already decoded).
    pub value: String,
}

/// A lexical token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<tag attr="value" ...>` or a self-closing `<tag ... />`.
    StartTag {
        /// Lowercased tag name.
        name: String,
        /// Attributes in source order; first occurrence of a repeated name
        /// wins, matching the HTML parsing spec's duplicate-attribute rule.
        attrs: Vec<Attribute>,
        /// Whether the tag was written with a trailing `/>`.
        self_closing: bool,
    },
    /// `</tag>`.
    EndTag {
        /// Lowercased tag name.
        name: String,
    },
    /// A run of character data.
    Text(String),
    /// `<!-- ... -->`.
    Comment(String),
    /// A `<!DOCTYPE ...>` declaration; content is discarded.
    Doctype,
}

/// Tag names whose content is raw text: the tokenizer stops looking for
/// markup and scans forward for the matching end tag.
///
/// [§4.1 Parser] "`<script>` and `<style>` element contents as raw text
/// until the matching close tag."
fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

/// An error produced by the tokenizer or parser.
///
/// [§4.1 Parser] "Failure modes: unterminated attribute values or
/// unterminated tags yield a parse error."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Run the tokenizer over `source`, returning tokens in document order.
///
/// # Errors
///
/// Returns a [`ParseError`] for an unterminated tag or attribute value.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<char> = source.chars().collect();
    let mut pos = 0usize;
    let mut tokens = Vec::new();

    while pos < chars.len() {
        if chars[pos] == '<' {
            if matches_at(&chars, pos, "<!--") {
                pos = scan_comment(&chars, pos, &mut tokens)?;
            } else if matches_at_ci(&chars, pos, "<!doctype") {
                pos = scan_doctype(&chars, pos)?;
                tokens.push(Token::Doctype);
            } else if chars.get(pos + 1) == Some(&'/') {
                pos = scan_end_tag(&chars, pos, &mut tokens)?;
            } else if chars.get(pos + 1).is_some_and(|c| c.is_ascii_alphabetic()) {
                pos = scan_start_tag(&chars, pos, &mut tokens)?;
                if let Some(Token::StartTag {
                    name,
                    self_closing,
                    ..
                }) = tokens.last()
                    && !self_closing
                    && is_raw_text_element(name)
                {
                    let name = name.clone();
                    pos = scan_raw_text(&chars, pos, &name, &mut tokens);
                }
            } else {
                pos = scan_text(&chars, pos, &mut tokens);
            }
        } else {
            pos = scan_text(&chars, pos, &mut tokens);
        }
    }

    Ok(tokens)
}

fn matches_at(chars: &[char], pos: usize, needle: &str) -> bool {
    let needle: Vec<char> = needle.chars().collect();
    chars.len() >= pos + needle.len() && chars[pos..pos + needle.len()] == needle[..]
}

fn matches_at_ci(chars: &[char], pos: usize, needle: &str) -> bool {
    let needle: Vec<char> = needle.chars().collect();
    if chars.len() < pos + needle.len() {
        return false;
    }
    chars[pos..pos + needle.len()]
        .iter()
        .zip(needle.iter())
        .all(|(a, b)| a.eq_ignore_ascii_case(b))
}

fn scan_comment(chars: &[char], pos: usize, tokens: &mut Vec<Token>) -> Result<usize, ParseError> {
    let start = pos + 4;
    let mut i = start;
    while i < chars.len() && !matches_at(chars, i, "-->") {
        i += 1;
    }
    if i >= chars.len() {
        return Err(ParseError {
            message: "unterminated comment".to_string(),
        });
    }
    tokens.push(Token::Comment(chars[start..i].iter().collect()));
    Ok(i + 3)
}

fn scan_doctype(chars: &[char], pos: usize) -> Result<usize, ParseError> {
    let mut i = pos;
    while i < chars.len() && chars[i] != '>' {
        i += 1;
    }
    if i >= chars.len() {
        return Err(ParseError {
            message: "unterminated doctype".to_string(),
        });
    }
    Ok(i + 1)
}

fn scan_text(chars: &[char], pos: usize, tokens: &mut Vec<Token>) -> usize {
    let mut i = pos;
    let mut raw = String::new();
    while i < chars.len() && chars[i] != '<' {
        raw.push(chars[i]);
        i += 1;
    }
    if !raw.is_empty() {
        tokens.push(Token::Text(decode_entities(&raw)));
    }
    i
}

fn scan_raw_text(chars: &[char], pos: usize, tag: &str, tokens: &mut Vec<Token>) -> usize {
    let close = format!("</{tag}");
    let mut i = pos;
    let mut raw = String::new();
    while i < chars.len() && !matches_at_ci(chars, i, &close) {
        raw.push(chars[i]);
        i += 1;
    }
    if !raw.is_empty() {
        tokens.push(Token::Text(raw));
    }
    if i < chars.len() {
        // Consume the matching end tag so the main loop doesn't re-scan it
        // as markup.
        let mut j = i;
        while j < chars.len() && chars[j] != '>' {
            j += 1;
        }
        tokens.push(Token::EndTag {
            name: tag.to_string(),
        });
        return j + 1;
    }
    i
}

fn scan_end_tag(chars: &[char], pos: usize, tokens: &mut Vec<Token>) -> Result<usize, ParseError> {
    let mut i = pos + 2;
    let mut name = String::new();
    while i < chars.len() && chars[i].is_ascii_alphanumeric() {
        name.push(chars[i].to_ascii_lowercase());
        i += 1;
    }
    while i < chars.len() && chars[i] != '>' {
        i += 1;
    }
    if i >= chars.len() {
        return Err(ParseError {
            message: format!("unterminated end tag </{name}"),
        });
    }
    tokens.push(Token::EndTag { name });
    Ok(i + 1)
}

fn scan_start_tag(chars: &[char], pos: usize, tokens: &mut Vec<Token>) -> Result<usize, ParseError> {
    let mut i = pos + 1;
    let mut name = String::new();
    while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '-') {
        name.push(chars[i].to_ascii_lowercase());
        i += 1;
    }

    let mut attrs = Vec::new();
    let mut self_closing = false;

    loop {
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        if i >= chars.len() {
            return Err(ParseError {
                message: format!("unterminated start tag <{name}"),
            });
        }
        if chars[i] == '>' {
            i += 1;
            break;
        }
        if chars[i] == '/' && chars.get(i + 1) == Some(&'>') {
            self_closing = true;
            i += 2;
            break;
        }

        let attr_name_start = i;
        while i < chars.len() && chars[i] != '=' && chars[i] != '>' && !chars[i].is_whitespace() && chars[i] != '/' {
            i += 1;
        }
        let attr_name: String = chars[attr_name_start..i]
            .iter()
            .collect::<String>()
            .to_ascii_lowercase();

        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }

        let value = if chars.get(i) == Some(&'=') {
            i += 1;
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            match chars.get(i) {
                Some('"') => {
                    i += 1;
                    let start = i;
                    while i < chars.len() && chars[i] != '"' {
                        i += 1;
                    }
                    if i >= chars.len() {
                        return Err(ParseError {
                            message: format!("unterminated attribute value in <{name}"),
                        });
                    }
                    let raw: String = chars[start..i].iter().collect();
                    i += 1;
                    decode_entities(&raw)
                }
                Some('\'') => {
                    i += 1;
                    let start = i;
                    while i < chars.len() && chars[i] != '\'' {
                        i += 1;
                    }
                    if i >= chars.len() {
                        return Err(ParseError {
                            message: format!("unterminated attribute value in <{name}"),
                        });
                    }
                    let raw: String = chars[start..i].iter().collect();
                    i += 1;
                    decode_entities(&raw)
                }
                _ => {
                    let start = i;
                    while i < chars.len() && !chars[i].is_whitespace() && chars[i] != '>' {
                        i += 1;
                    }
                    decode_entities(&chars[start..i].iter().collect::<String>())
                }
            }
        } else {
            String::new()
        };

        if !attr_name.is_empty() && !attrs.iter().any(|a: &Attribute| a.name == attr_name) {
            attrs.push(Attribute {
                name: attr_name,
                value,
            });
        }
    }

    tokens.push(Token::StartTag {
        name,
        attrs,
        self_closing,
    });
    Ok(i)
}

/// Decode the common named character references plus numeric (`&#NN;`,
/// `&#xHH;`) references. Not a full implementation of
/// [WHATWG §13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html#named-character-references).
#[must_use]
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '&' {
            out.push(c);
            continue;
        }
        let mut rest = String::new();
        let mut consumed = Vec::new();
        while let Some(&next) = chars.peek() {
            consumed.push(next);
            rest.push(next);
            chars.next();
            if next == ';' || rest.len() > 10 {
                break;
            }
        }
        if let Some(decoded) = decode_one_entity(&rest) {
            out.push(decoded);
        } else {
            out.push('&');
            out.push_str(&rest);
        }
    }
    out
}

fn decode_one_entity(rest: &str) -> Option<char> {
    let body = rest.strip_suffix(';')?;
    if let Some(hex) = body.strip_prefix('#').and_then(|b| b.strip_prefix('x').or_else(|| b.strip_prefix('X'))) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(dec) = body.strip_prefix('#') {
        return dec.parse::<u32>().ok().and_then(char::from_u32);
    }
    Some(match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '\u{a9}',
        "mdash" => '\u{2014}',
        "ndash" => '\u{2013}',
        "hellip" => '\u{2026}',
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_attributes_in_all_quote_styles() {
        let tokens = tokenize(r#"<div a="1" b='2' c=3>"#).unwrap();
        assert_eq!(
            tokens,
            vec![Token::StartTag {
                name: "div".to_string(),
                attrs: vec![
                    Attribute { name: "a".to_string(), value: "1".to_string() },
                    Attribute { name: "b".to_string(), value: "2".to_string() },
                    Attribute { name: "c".to_string(), value: "3".to_string() },
                ],
                self_closing: false,
            }]
        );
    }

    #[test]
    fn unterminated_attribute_value_is_a_parse_error() {
        assert!(tokenize(r#"<div a="unterminated>"#).is_err());
    }

    #[test]
    fn script_contents_are_raw_text() {
        let tokens = tokenize("<script>if (1 < 2) {}</script>").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::StartTag {
                    name: "script".to_string(),
                    attrs: vec![],
                    self_closing: false,
                },
                Token::Text("if (1 < 2) {}".to_string()),
                Token::EndTag {
                    name: "script".to_string(),
                },
            ]
        );
    }

    #[test]
    fn decodes_common_named_and_numeric_entities() {
        assert_eq!(decode_entities("a &amp; b &#65; &#x42;"), "a & b A B");
    }
}
