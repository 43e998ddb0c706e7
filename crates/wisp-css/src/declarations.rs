//! Declaration-list parsing, serialization, and shorthand expansion.
//!
//! Used both for a rule's declaration block and for the `style="…"` inline
//! attribute; both are "semicolon-separated `prop: value` pairs" per
//! [§4.3 CSS model].

use indexmap::IndexMap;

/// An ordered mapping from (already-expanded, longhand) property name to its
/// textual value, insertion-order preserved.
pub type Declarations = IndexMap<String, String>;

/// Parse a semicolon-separated declaration list, expanding shorthands into
/// longhand properties as they are encountered. Empty or colon-less
/// declarations are skipped.
#[must_use]
pub fn parse_declarations(input: &str) -> Declarations {
    let mut out = Declarations::new();
    for decl in input.split(';') {
        let decl = decl.trim();
        if decl.is_empty() {
            continue;
        }
        let Some((prop, value)) = decl.split_once(':') else {
            continue;
        };
        let prop = prop.trim().to_ascii_lowercase();
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        expand_into(&prop, value, &mut out);
    }
    out
}

/// Serialize a declaration map back to `prop: value; prop: value` form,
/// preserving insertion order.
#[must_use]
pub fn serialize_declarations(decls: &Declarations) -> String {
    decls
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join("; ")
}

fn expand_into(prop: &str, value: &str, out: &mut Declarations) {
    match prop {
        "margin" | "padding" => {
            let sides = expand_box_values(value);
            for (side, v) in ["top", "right", "bottom", "left"].into_iter().zip(sides) {
                out.insert(format!("{prop}-{side}"), v);
            }
        }
        "border-width" => {
            let sides = expand_box_values(value);
            for (side, v) in ["top", "right", "bottom", "left"].into_iter().zip(sides) {
                out.insert(format!("border-{side}-width"), v);
            }
        }
        "border" => expand_border(value, out),
        "background" => expand_background(value, out),
        _ => {
            out.insert(prop.to_string(), value.to_string());
        }
    }
}

/// Expand a 1/2/3/4-value shorthand into `[top, right, bottom, left]`,
/// per the CSS box-shorthand convention.
fn expand_box_values(value: &str) -> [String; 4] {
    let parts: Vec<&str> = value.split_ascii_whitespace().collect();
    match parts.len() {
        1 => [parts[0]; 4].map(str::to_string),
        2 => [parts[0], parts[1], parts[0], parts[1]].map(str::to_string),
        3 => [parts[0], parts[1], parts[2], parts[1]].map(str::to_string),
        _ if parts.len() >= 4 => [parts[0], parts[1], parts[2], parts[3]].map(str::to_string),
        _ => ["0px"; 4].map(str::to_string),
    }
}

fn expand_border(value: &str, out: &mut Declarations) {
    let mut width = None;
    let mut style = None;
    let mut color = None;
    for token in value.split_ascii_whitespace() {
        if crate::color::Color::parse(token).is_some() {
            color = Some(token);
        } else if is_border_style_keyword(token) {
            style = Some(token);
        } else {
            width = Some(token);
        }
    }
    for side in ["top", "right", "bottom", "left"] {
        if let Some(w) = width {
            out.insert(format!("border-{side}-width"), w.to_string());
        }
        if let Some(s) = style {
            out.insert(format!("border-{side}-style"), s.to_string());
        }
        if let Some(c) = color {
            out.insert(format!("border-{side}-color"), c.to_string());
        }
    }
}

fn is_border_style_keyword(token: &str) -> bool {
    matches!(
        token,
        "none" | "hidden" | "dotted" | "dashed" | "solid" | "double" | "groove" | "ridge" | "inset" | "outset"
    )
}

fn expand_background(value: &str, out: &mut Declarations) {
    for token in value.split_ascii_whitespace() {
        if let Some(url) = token.strip_prefix("url(").and_then(|s| s.strip_suffix(')')) {
            let url = url.trim_matches(['"', '\'']);
            out.insert("background-image".to_string(), format!("url({url})"));
        } else if matches!(token, "repeat" | "repeat-x" | "repeat-y" | "no-repeat") {
            out.insert("background-repeat".to_string(), token.to_string());
        } else if matches!(token, "scroll" | "fixed" | "local") {
            out.insert("background-attachment".to_string(), token.to_string());
        } else if crate::color::Color::parse(token).is_some() {
            out.insert("background-color".to_string(), token.to_string());
        } else {
            // Positional keywords (`top`, `center`, `50%`, ...) accumulate into
            // `background-position` in declaration order.
            let existing = out.entry("background-position".to_string()).or_default();
            if !existing.is_empty() {
                existing.push(' ');
            }
            existing.push_str(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_empty_and_colonless_declarations() {
        let decls = parse_declarations("color: red;; margin ;width: 10px");
        assert_eq!(decls.get("color").map(String::as_str), Some("red"));
        assert_eq!(decls.get("width").map(String::as_str), Some("10px"));
        assert!(!decls.contains_key("margin"));
    }

    #[test]
    fn round_trips_through_serialize_and_reparse() {
        let decls = parse_declarations("color: red; width: 10px");
        let text = serialize_declarations(&decls);
        assert_eq!(text, "color: red; width: 10px");
        assert_eq!(parse_declarations(&text), decls);
    }

    #[test]
    fn margin_one_value_applies_to_all_sides() {
        let decls = parse_declarations("margin: 5px");
        for side in ["top", "right", "bottom", "left"] {
            assert_eq!(decls.get(&format!("margin-{side}")).map(String::as_str), Some("5px"));
        }
    }

    #[test]
    fn margin_two_values_split_axis() {
        let decls = parse_declarations("margin: 5px 10px");
        assert_eq!(decls.get("margin-top").map(String::as_str), Some("5px"));
        assert_eq!(decls.get("margin-right").map(String::as_str), Some("10px"));
        assert_eq!(decls.get("margin-bottom").map(String::as_str), Some("5px"));
        assert_eq!(decls.get("margin-left").map(String::as_str), Some("10px"));
    }

    #[test]
    fn margin_four_values_are_top_right_bottom_left() {
        let decls = parse_declarations("margin: 1px 2px 3px 4px");
        assert_eq!(decls.get("margin-top").map(String::as_str), Some("1px"));
        assert_eq!(decls.get("margin-right").map(String::as_str), Some("2px"));
        assert_eq!(decls.get("margin-bottom").map(String::as_str), Some("3px"));
        assert_eq!(decls.get("margin-left").map(String::as_str), Some("4px"));
    }

    #[test]
    fn border_shorthand_expands_all_three_components() {
        let decls = parse_declarations("border: 2px solid red");
        assert_eq!(decls.get("border-top-width").map(String::as_str), Some("2px"));
        assert_eq!(decls.get("border-top-style").map(String::as_str), Some("solid"));
        assert_eq!(decls.get("border-top-color").map(String::as_str), Some("red"));
        assert_eq!(decls.get("border-left-color").map(String::as_str), Some("red"));
    }

    #[test]
    fn background_shorthand_expands_color_and_image() {
        let decls = parse_declarations("background: url(foo.png) no-repeat red");
        assert_eq!(decls.get("background-image").map(String::as_str), Some("url(foo.png)"));
        assert_eq!(decls.get("background-repeat").map(String::as_str), Some("no-repeat"));
        assert_eq!(decls.get("background-color").map(String::as_str), Some("red"));
    }
}
