//! Best-effort JSON extraction from generative text.
//!
//! Model output is not guaranteed to be pure JSON even under a response
//! schema: it may arrive fenced in markdown or wrapped in prose. The
//! extractor never fails; total failure yields an empty object.

use serde_json::{Map, Value};

const FENCE: &str = "```";

/// Pulls a structured value out of raw model text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseExtractor;

impl ResponseExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts a JSON object or array from `raw`.
    ///
    /// # Steps
    /// 1. Trim; empty input short-circuits to `{}`
    /// 2. Strict parse of the whole text
    /// 3. Unwrap a fenced code block if present and parse strictly
    /// 4. Locate a bracketed span (object preferred) and parse it
    ///
    /// Extracting the serialization of an extracted value returns it unchanged.
    pub fn extract(&self, raw: &str) -> Value {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return empty();
        }

        // Valid JSON is taken as is, even when a string inside it holds a fence
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return value;
        }

        let working = Self::unfence(trimmed).unwrap_or(trimmed);

        if let Ok(value) = serde_json::from_str::<Value>(working) {
            return value;
        }

        Self::bracketed_span(working)
            .and_then(|span| serde_json::from_str::<Value>(span).ok())
            .unwrap_or_else(empty)
    }

    /// Same as [`extract`](Self::extract) for an absent response.
    pub fn extract_optional(&self, raw: Option<&str>) -> Value {
        raw.map(|r| self.extract(r)).unwrap_or_else(empty)
    }

    /// Returns the inner text of the first fenced block.
    ///
    /// The language tag (`json`, `JSON`, ...) on the opening line is skipped.
    fn unfence(s: &str) -> Option<&str> {
        let open = s.find(FENCE)?;
        let after_open = &s[open + FENCE.len()..];

        // Language tag runs to end of line; a fence on one line has no tag.
        let body_start = match after_open.find('\n') {
            Some(nl) if is_language_tag(&after_open[..nl]) => nl + 1,
            _ => 0,
        };
        let body = &after_open[body_start..];
        let close = body.find(FENCE)?;

        Some(body[..close].trim())
    }

    /// Finds the first JSON-looking span.
    ///
    /// An object wins when it starts no later than an array.
    fn bracketed_span(s: &str) -> Option<&str> {
        let (start, open, close) = match (s.find('{'), s.find('[')) {
            (Some(o), Some(a)) if o <= a => (o, '{', '}'),
            (Some(_), Some(a)) => (a, '[', ']'),
            (Some(o), None) => (o, '{', '}'),
            (None, Some(a)) => (a, '[', ']'),
            (None, None) => return None,
        };

        Self::balanced_span(s, start, open, close).or_else(|| {
            let end = s.rfind(close)?;
            (end > start).then(|| &s[start..=end])
        })
    }

    /// Walks from `start` to the matching closer, skipping string contents.
    fn balanced_span(s: &str, start: usize, open: char, close: char) -> Option<&str> {
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escape_next = false;

        for (offset, c) in s[start..].char_indices() {
            if escape_next {
                escape_next = false;
                continue;
            }

            match c {
                '\\' if in_string => escape_next = true,
                '"' => in_string = !in_string,
                _ if in_string => {}
                c if c == open => depth += 1,
                c if c == close => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        let end = start + offset + c.len_utf8();
                        return Some(&s[start..end]);
                    }
                }
                _ => {}
            }
        }
        None
    }
}

fn is_language_tag(line: &str) -> bool {
    let tag = line.trim();
    tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn empty() -> Value {
    Value::Object(Map::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn extract(raw: &str) -> Value {
        ResponseExtractor::new().extract(raw)
    }

    #[test]
    fn extracts_object_from_sentence() {
        assert_eq!(extract(r#"here is it: {"a":1} thanks"#), json!({"a": 1}));
    }

    #[test]
    fn extracts_identically_twice() {
        let extractor = ResponseExtractor::new();
        for raw in [
            r#"here is it: {"a":1} thanks"#,
            "```json\n{\"options\": [{\"name\": \"A\"}]}\n```",
            r#"{"options": [{"name": "A""#,
            "no json at all",
        ] {
            let first = extractor.extract(raw);
            let second = extractor.extract(raw);
            assert_eq!(first, second, "{}", raw);
            assert_eq!(extractor.extract(&first.to_string()), first, "{}", raw);
        }
    }

    #[test]
    fn fence_inside_json_string_is_left_alone() {
        let raw = r#"{"note": "wrap it in ```json``` next time"}"#;
        assert_eq!(
            extract(raw),
            json!({"note": "wrap it in ```json``` next time"})
        );
    }

    #[test]
    fn parses_plain_json() {
        assert_eq!(extract(r#"{"a": 1}"#), json!({"a": 1}));
    }

    #[test]
    fn empty_input_yields_empty_object() {
        assert_eq!(extract(""), json!({}));
        assert_eq!(extract("   \n "), json!({}));
    }

    #[test]
    fn absent_input_yields_empty_object() {
        assert_eq!(ResponseExtractor::new().extract_optional(None), json!({}));
    }

    #[test]
    fn unwraps_json_fence() {
        let raw = "Here you go:\n```json\n{\"options\": []}\n```\nThanks!";
        assert_eq!(extract(raw), json!({"options": []}));
    }

    #[test]
    fn unwraps_fence_without_language_tag() {
        let raw = "```\n[1, 2, 3]\n```";
        assert_eq!(extract(raw), json!([1, 2, 3]));
    }

    #[test]
    fn unwraps_single_line_fence() {
        assert_eq!(extract("```{\"a\":true}```"), json!({"a": true}));
    }

    #[test]
    fn finds_object_inside_prose() {
        let raw = r#"Sure! The result is {"summary": "ok", "n": [1, 2]} as requested."#;
        assert_eq!(extract(raw), json!({"summary": "ok", "n": [1, 2]}));
    }

    #[test]
    fn prefers_object_when_it_starts_first() {
        let raw = r#"result: {"list": [1]} and [2]"#;
        assert_eq!(extract(raw), json!({"list": [1]}));
    }

    #[test]
    fn takes_array_when_it_starts_first() {
        let raw = r#"values [{"a": 1}, {"b": 2}] end"#;
        assert_eq!(extract(raw), json!([{"a": 1}, {"b": 2}]));
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_matching() {
        let raw = r#"note {"text": "a } brace and \" quote"} trailing }"#;
        assert_eq!(extract(raw), json!({"text": "a } brace and \" quote"}));
    }

    #[test]
    fn handles_multibyte_text_before_and_inside_json() {
        let raw = r#"Résumé → {"name": "Café ☕"} fin"#;
        assert_eq!(extract(raw), json!({"name": "Café ☕"}));
    }

    #[test]
    fn trailing_stray_brackets_are_ignored() {
        assert_eq!(extract(r#"{"a": 1} } {"#), json!({"a": 1}));
    }

    #[test]
    fn unclosed_object_yields_empty_object() {
        assert_eq!(extract(r#"text { {"a": 1}"#), json!({}));
    }

    #[test]
    fn no_brackets_yields_empty_object() {
        assert_eq!(extract("I could not decide."), json!({}));
    }

    #[test]
    fn unparseable_span_yields_empty_object() {
        assert_eq!(extract("{not json at all}"), json!({}));
    }

    #[test]
    fn truncated_json_yields_empty_object() {
        assert_eq!(extract(r#"{"options": [{"name": "A""#), json!({}));
    }

    fn json_leaf(text: &'static str) -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            text.prop_map(Value::String),
        ]
    }

    /// Object-rooted values; integers only so text round-trips exactly.
    fn json_object(text: &'static str) -> impl Strategy<Value = Value> {
        let value = json_leaf(text).prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z_]{1,8}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        });
        prop::collection::btree_map("[a-z_]{1,8}", value, 0..5)
            .prop_map(|m| Value::Object(m.into_iter().collect()))
    }

    // Strings with brackets, quotes and escapes but no backticks
    const PROSE_SAFE: &str = r#"[a-zA-Z0-9 {}\[\]"\\:,.]{0,12}"#;

    proptest! {
        #[test]
        fn serialized_value_extracts_to_itself(value in json_object(".{0,12}")) {
            let raw = value.to_string();

            let first = extract(&raw);
            prop_assert_eq!(&first, &value);
            prop_assert_eq!(extract(&raw), first);
        }

        #[test]
        fn value_wrapped_in_prose_extracts_to_itself(value in json_object(PROSE_SAFE)) {
            let raw = format!("Here is the result: {} Let me know.", value);
            prop_assert_eq!(extract(&raw), value);
        }

        #[test]
        fn fenced_pretty_value_extracts_to_itself(value in json_object(PROSE_SAFE)) {
            let pretty = serde_json::to_string_pretty(&value).unwrap();
            let raw = format!("```json\n{}\n```", pretty);
            prop_assert_eq!(extract(&raw), value);
        }
    }
}
