//! Text heuristics over serialized component source.
//!
//! Nothing outside the strategy module reads structural text, so a real
//! structural parser can replace this file without touching the graph engine.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static ATTRIBUTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z_$][\w$-]*)\s*=").expect("valid attribute regex"));

static HOOK_STATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\[\s*([A-Za-z_$][\w$]*)\s*,\s*[A-Za-z_$][\w$]*\s*\]\s*=\s*(?:React\.)?use(?:State|Reducer)\b",
    )
    .expect("valid state hook regex")
});

static CLASS_STATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"this\.state\s*=\s*\{([^}]*)\}").expect("valid class state regex")
});

static OBJECT_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z_$][\w$]*)\s*:").expect("valid object key regex"));

static CONTEXT_PROVIDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<\s*([A-Za-z_$][\w$]*)\.Provider\b").expect("valid provider regex")
});

static CONTEXT_CONSUMER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"useContext\(\s*([A-Za-z_$][\w$]*)\s*\)|<\s*([A-Za-z_$][\w$]*)\.Consumer\b")
        .expect("valid consumer regex")
});

/// One `<Name ...>` opening tag found in structural text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningTag {
    pub name: String,
    pub attributes: BTreeSet<String>,
}

/// Scan component-style (capitalized) opening tags and the attribute names bound on them.
/// Attribute values in quotes or braces are skipped, so `onClick={() => a > b}` stays inside the tag.
pub fn opening_tags(text: &str) -> Vec<OpeningTag> {
    let bytes = text.as_bytes();
    let mut tags = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' || !bytes.get(i + 1).is_some_and(|b| b.is_ascii_uppercase()) {
            i += 1;
            continue;
        }

        let name_start = i + 1;
        let mut j = name_start;
        while j < bytes.len() && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'_') {
            j += 1;
        }
        let name = &text[name_start..j];

        let mut depth = 0usize;
        let mut quote: Option<u8> = None;
        let mut top_level = String::new();
        while j < bytes.len() {
            let b = bytes[j];
            match (quote, b) {
                (Some(q), _) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'' | b'`') => quote = Some(b),
                (None, b'{') => depth += 1,
                (None, b'}') => depth = depth.saturating_sub(1),
                (None, b'>') if depth == 0 => break,
                (None, _) if depth == 0 => top_level.push(b as char),
                _ => {}
            }
            j += 1;
        }

        // `<Card.Header` style member tags are not component names of their own.
        if !top_level.starts_with('.') {
            let attributes = ATTRIBUTE_RE
                .captures_iter(&top_level)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .collect();
            tags.push(OpeningTag {
                name: name.to_string(),
                attributes,
            });
        }
        i = j.max(i + 1);
    }

    tags
}

/// Attribute names bound on every `<name ...>` tag in `text`; `None` when never rendered
pub fn attributes_passed_to(text: &str, name: &str) -> Option<BTreeSet<String>> {
    let mut found = None;
    for tag in opening_tags(text) {
        if tag.name == name {
            found
                .get_or_insert_with(BTreeSet::new)
                .extend(tag.attributes);
        }
    }
    found
}

/// Local state identifiers declared in `text`
pub fn state_identifiers(text: &str) -> BTreeSet<String> {
    let mut ids: BTreeSet<String> = HOOK_STATE_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect();

    for body in CLASS_STATE_RE.captures_iter(text).filter_map(|c| c.get(1)) {
        ids.extend(
            OBJECT_KEY_RE
                .captures_iter(body.as_str())
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str().to_string()),
        );
    }
    ids
}

pub fn provided_contexts(text: &str) -> BTreeSet<String> {
    CONTEXT_PROVIDER_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn consumed_contexts(text: &str) -> BTreeSet<String> {
    CONTEXT_CONSUMER_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// `onClick`, `onValueChange`, ...
pub fn is_event_handler(attribute: &str) -> bool {
    attribute
        .strip_prefix("on")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn opening_tags_skip_braced_and_quoted_values() {
        let text = r#"<Card title={user.name} onSelect={() => a > b} label="x > y" compact />
<div className="row"><Footer /></div>"#;
        let tags = opening_tags(text);

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "Card");
        assert_eq!(tags[0].attributes, set(&["title", "onSelect", "label"]));
        assert_eq!(tags[1].name, "Footer");
        assert!(tags[1].attributes.is_empty());
    }

    #[test]
    fn member_tags_are_not_components() {
        let tags = opening_tags("<Theme.Provider value={t}><Card /></Theme.Provider>");
        let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Card"]);
    }

    #[test]
    fn attributes_passed_to_merges_every_occurrence() {
        let text = "<Row id={1} /><Row selected={true} /><Rows extra={2} />";
        assert_eq!(
            attributes_passed_to(text, "Row"),
            Some(set(&["id", "selected"]))
        );
        assert_eq!(attributes_passed_to(text, "Missing"), None);
    }

    #[test]
    fn state_identifiers_from_hooks_and_class_state() {
        let text = r#"
            const [count, setCount] = useState(0);
            const [filter, dispatch] = React.useReducer(reducer, init);
            this.state = { open: false, items: [] };
        "#;
        assert_eq!(
            state_identifiers(text),
            set(&["count", "filter", "open", "items"])
        );
    }

    #[test]
    fn context_provider_and_consumer_names() {
        let provider = "<ThemeContext.Provider value={theme}>{children}</ThemeContext.Provider>";
        let consumer = "const theme = useContext(ThemeContext); <AuthContext.Consumer>{fn}</AuthContext.Consumer>";

        assert_eq!(provided_contexts(provider), set(&["ThemeContext"]));
        assert_eq!(
            consumed_contexts(consumer),
            set(&["ThemeContext", "AuthContext"])
        );
    }

    #[test]
    fn event_handler_names() {
        assert!(is_event_handler("onClick"));
        assert!(is_event_handler("onValueChange"));
        assert!(!is_event_handler("one"));
        assert!(!is_event_handler("on"));
        assert!(!is_event_handler("title"));
    }
}
