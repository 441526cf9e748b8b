//! Naming convention utilities for generated Go code.
//!
//! # Supported Conversions
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `accountID` | [`capitalize`] | `AccountID` |
//! | `AccountID` | [`to_param_name`] | `accountID` |
//! | `TokenMintTransaction` | [`receiver_name`] | `t` |
//! | `nodeIDs` | [`singularize`] | `nodeID` |

/// Go keywords that cannot be used as parameter names
const GO_KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Capitalize the first letter of a string.
///
/// # Examples
///
/// ```
/// use wiregen::naming::capitalize;
///
/// assert_eq!(capitalize("accountID"), "AccountID");
/// assert_eq!(capitalize("Name"), "Name");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Convert an exported name to a parameter name.
///
/// Lower-cases the leading run of capitals, keeping the last one when it
/// starts a new word. A plural acronym is lowered whole. Keywords get a
/// `new` prefix.
///
/// # Examples
///
/// ```
/// use wiregen::naming::to_param_name;
///
/// assert_eq!(to_param_name("Name"), "name");
/// assert_eq!(to_param_name("AccountID"), "accountID");
/// assert_eq!(to_param_name("ID"), "id");
/// assert_eq!(to_param_name("IDs"), "ids");
/// assert_eq!(to_param_name("URLPath"), "urlPath");
/// assert_eq!(to_param_name("Type"), "newType");
/// ```
pub fn to_param_name(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let run = chars.iter().take_while(|c| c.is_uppercase()).count();

    // Keep the last capital of a run when it begins the next word: URLPath -> urlPath.
    // A lone trailing `s` pluralizes the acronym instead: IDs -> ids.
    let plural_acronym = run > 1 && chars[run..] == ['s'];
    let lower = if plural_acronym {
        chars.len()
    } else if run > 1 && run < chars.len() {
        run - 1
    } else {
        run
    };

    let mut name: String = chars[..lower]
        .iter()
        .flat_map(|c| c.to_lowercase())
        .collect();
    name.extend(&chars[lower..]);

    if GO_KEYWORDS.contains(&name.as_str()) {
        format!("new{}", capitalize(&name))
    } else {
        name
    }
}

/// Method receiver name: the lower-cased first letter of the type name.
///
/// # Examples
///
/// ```
/// use wiregen::naming::receiver_name;
///
/// assert_eq!(receiver_name("Widget"), "w");
/// assert_eq!(receiver_name("TopicInfoQuery"), "t");
/// ```
pub fn receiver_name(type_name: &str) -> String {
    type_name
        .chars()
        .next()
        .map(|c| c.to_lowercase().collect())
        .unwrap_or_else(|| "r".to_string())
}

/// Drop exactly one trailing `s`, if present.
///
/// No other pluralization rule applies.
///
/// # Examples
///
/// ```
/// use wiregen::naming::singularize;
///
/// assert_eq!(singularize("tokenIDs"), "tokenID");
/// assert_eq!(singularize("address"), "addres");
/// assert_eq!(singularize("key"), "key");
/// ```
pub fn singularize(s: &str) -> &str {
    s.strip_suffix('s').unwrap_or(s)
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn capitalize___capitalizes_first_letter() {
        assert_eq!(capitalize("memo"), "Memo");
        assert_eq!(capitalize("a"), "A");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn capitalize___preserves_rest_of_string() {
        assert_eq!(capitalize("maxTransactionFee"), "MaxTransactionFee");
        assert_eq!(capitalize("ALLCAPS"), "ALLCAPS");
    }

    #[test]
    fn to_param_name___lowers_single_capital() {
        assert_eq!(to_param_name("Memo"), "memo");
        assert_eq!(to_param_name("MaxTransactionFee"), "maxTransactionFee");
    }

    #[test]
    fn to_param_name___lowers_whole_acronym() {
        assert_eq!(to_param_name("ID"), "id");
    }

    #[test]
    fn to_param_name___plural_acronym___lowered_whole() {
        assert_eq!(to_param_name("IDs"), "ids");
        assert_eq!(to_param_name("URLs"), "urls");
        assert_eq!(to_param_name("TokenIDs"), "tokenIDs");
    }

    #[test]
    fn to_param_name___keeps_word_start_after_acronym() {
        assert_eq!(to_param_name("URLPath"), "urlPath");
        assert_eq!(to_param_name("TokenID"), "tokenID");
    }

    #[test]
    fn to_param_name___already_lower___unchanged() {
        assert_eq!(to_param_name("memo"), "memo");
        assert_eq!(to_param_name(""), "");
    }

    #[test]
    fn to_param_name___keywords___get_prefix() {
        assert_eq!(to_param_name("Type"), "newType");
        assert_eq!(to_param_name("Range"), "newRange");
        assert_eq!(to_param_name("Func"), "newFunc");
    }

    #[test]
    fn receiver_name___uses_first_letter() {
        assert_eq!(receiver_name("AccountCreateTransaction"), "a");
        assert_eq!(receiver_name("widget"), "w");
        assert_eq!(receiver_name(""), "r");
    }

    #[test]
    fn singularize___drops_one_trailing_s() {
        assert_eq!(singularize("serialNumbers"), "serialNumber");
        assert_eq!(singularize("class"), "clas");
        assert_eq!(singularize("ss"), "s");
    }

    #[test]
    fn singularize___no_trailing_s___unchanged() {
        assert_eq!(singularize("children"), "children");
        assert_eq!(singularize("Key"), "Key");
        assert_eq!(singularize(""), "");
    }

    #[test]
    fn singularize___uppercase_s___unchanged() {
        assert_eq!(singularize("IDS"), "IDS");
    }
}
