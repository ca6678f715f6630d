//! Type detection for SCSS values.

/// Color keywords recognized as `color` values.
const COLOR_NAMES: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue",
    "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki",
    "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon",
    "darkseagreen", "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise",
    "darkviolet", "deeppink", "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick",
    "floralwhite", "forestgreen", "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod",
    "gray", "green", "greenyellow", "grey", "honeydew", "hotpink", "indianred", "indigo",
    "ivory", "khaki", "lavender", "lavenderblush", "lawngreen", "lemonchiffon", "lightblue",
    "lightcoral", "lightcyan", "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey",
    "lightpink", "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray",
    "lightslategrey", "lightsteelblue", "lightyellow", "lime", "limegreen", "linen", "magenta",
    "maroon", "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple",
    "mediumseagreen", "mediumslateblue", "mediumspringgreen", "mediumturquoise",
    "mediumvioletred", "midnightblue", "mintcream", "mistyrose", "moccasin", "navajowhite",
    "navy", "oldlace", "olive", "olivedrab", "orange", "orangered", "orchid", "palegoldenrod",
    "palegreen", "paleturquoise", "palevioletred", "papayawhip", "peachpuff", "peru", "pink",
    "plum", "powderblue", "purple", "red", "rosybrown", "royalblue", "saddlebrown", "salmon",
    "sandybrown", "seagreen", "seashell", "sienna", "silver", "skyblue", "slateblue",
    "slategray", "slategrey", "snow", "springgreen", "steelblue", "tan", "teal", "thistle",
    "tomato", "transparent", "turquoise", "violet", "wheat", "white", "whitesmoke", "yellow",
    "yellowgreen",
];

/// Functions returning colors.
const COLOR_FUNCTIONS: &[&str] = &[
    "rgb", "rgba", "hsl", "hsla", "mix", "adjust-hue", "lighten", "darken", "saturate",
    "desaturate", "grayscale", "complement", "invert", "alpha", "opacify", "fade-in",
    "transparentize", "fade-out", "adjust-color", "scale-color", "change-color", "ie-hex-str",
];

/// Detect the type of an SCSS value: `number`, `string`, `color`, `boolean`
/// or `list`. `null` and unknown function calls have no type.
pub fn value_type(value: &str) -> Option<&'static str> {
    let value = strip_flags(value);
    if value.is_empty() || value == "null" {
        return None;
    }

    if split_list(value).len() > 1 {
        return Some("list");
    }

    if is_number(value) {
        Some("number")
    } else if value == "true" || value == "false" {
        Some("boolean")
    } else if is_color(value) {
        Some("color")
    } else if is_quoted(value) {
        Some("string")
    } else if value.contains('(') {
        None
    } else if value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        Some("string")
    } else {
        None
    }
}

/// Remove trailing `!default` / `!important` flags from a value.
pub fn strip_flags(value: &str) -> &str {
    let mut value = value.trim();
    while let Some(idx) = value.rfind('!') {
        let flag = &value[idx + 1..];
        if flag.chars().all(|c| c.is_ascii_alphabetic()) && !flag.is_empty() {
            value = value[..idx].trim_end();
        } else {
            break;
        }
    }
    value
}

fn is_number(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    let numeric_len = digits
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(digits.len());
    let (number, unit) = digits.split_at(numeric_len);
    if number.is_empty() || number == "." || number.matches('.').count() > 1 {
        return false;
    }
    unit.is_empty() || unit == "%" || unit.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_color(value: &str) -> bool {
    if let Some(hex) = value.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    if COLOR_NAMES.contains(&value.to_ascii_lowercase().as_str()) {
        return true;
    }
    match value.split_once('(') {
        Some((func, _)) if value.ends_with(')') => COLOR_FUNCTIONS.contains(&func.trim()),
        _ => false,
    }
}

fn is_quoted(value: &str) -> bool {
    value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
}

/// Split a value on top-level commas, or else on top-level whitespace.
fn split_list(value: &str) -> Vec<&str> {
    let by_comma = split_top_level(value, |c| c == ',');
    if by_comma.len() > 1 {
        return by_comma;
    }
    split_top_level(value, char::is_whitespace)
}

fn split_top_level(value: &str, is_sep: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (idx, c) in value.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                c if depth == 0 && is_sep(c) => {
                    let part = value[start..idx].trim();
                    if !part.is_empty() {
                        parts.push(part);
                    }
                    start = idx + c.len_utf8();
                }
                _ => {}
            },
        }
    }
    let part = value[start..].trim();
    if !part.is_empty() {
        parts.push(part);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_numbers() {
        assert_eq!(value_type("3.14"), Some("number"));
        assert_eq!(value_type("10%"), Some("number"));
        assert_eq!(value_type("15px"), Some("number"));
        assert_eq!(value_type("-2em"), Some("number"));
    }

    #[test]
    fn detects_strings() {
        assert_eq!(value_type("bold"), Some("string"));
        assert_eq!(value_type("\"blah blah\""), Some("string"));
    }

    #[test]
    fn detects_colors() {
        assert_eq!(value_type("orange"), Some("color"));
        assert_eq!(value_type("#ff00cc"), Some("color"));
        assert_eq!(value_type("rgba(255, 0, 0, 0.5)"), Some("color"));
        assert_eq!(value_type("hsl(0, 100%, 50%)"), Some("color"));
        assert_eq!(value_type("fade-in(#cc00cc, 0.2)"), Some("color"));
    }

    #[test]
    fn detects_booleans_lists_and_null() {
        assert_eq!(value_type("true"), Some("boolean"));
        assert_eq!(value_type("false"), Some("boolean"));
        assert_eq!(value_type("'Arial', Verdana, sans-serif"), Some("list"));
        assert_eq!(value_type("2px 4px 2px 4px"), Some("list"));
        assert_eq!(value_type("null"), None);
        assert_eq!(value_type("myfunc(1, 2)"), None);
    }

    #[test]
    fn strips_default_flag() {
        assert_eq!(strip_flags("10em !default"), "10em");
        assert_eq!(value_type("10em !default"), Some("number"));
    }
}
