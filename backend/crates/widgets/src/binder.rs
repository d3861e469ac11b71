use std::collections::BTreeMap;

use serde::Serialize;

use insights_common::error::{InsightsError, InsightsResult};

/// A value substituted for a `@placeholder`.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    /// Text placed inside a JSON string literal; escaped on render.
    Str(String),
    Int(i64),
    /// Already-serialized JSON (arrays, objects, aggregation fragments).
    Raw(String),
}

impl BindValue {
    pub fn json<T: Serialize + ?Sized>(value: &T) -> InsightsResult<Self> {
        serde_json::to_string(value)
            .map(BindValue::Raw)
            .map_err(|e| InsightsError::Internal(format!("bind value: {e}")))
    }

    fn render(&self) -> String {
        match self {
            BindValue::Str(s) => escape_json_str(s),
            BindValue::Int(n) => n.to_string(),
            BindValue::Raw(raw) => raw.clone(),
        }
    }
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        BindValue::Str(value.to_owned())
    }
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        BindValue::Str(value)
    }
}

impl From<i64> for BindValue {
    fn from(value: i64) -> Self {
        BindValue::Int(value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Bindings(BTreeMap<String, BindValue>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<BindValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<BindValue>) {
        self.0.insert(key.to_owned(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&BindValue> {
        self.0.get(key)
    }
}

/// Escape text for a JSON string literal without the surrounding quotes.
fn escape_json_str(value: &str) -> String {
    let quoted = serde_json::Value::String(value.to_owned()).to_string();
    quoted[1..quoted.len() - 1].to_owned()
}

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Placeholder names in order of appearance (duplicates kept).
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = template;
    while let Some(at) = rest.find('@') {
        let after = &rest[at + 1..];
        let len = after.find(|c: char| !is_ident(c)).unwrap_or(after.len());
        if len > 0 {
            found.push(&after[..len]);
        }
        rest = &after[len..];
    }
    found
}

/// Substitute every `@placeholder` in one left-to-right pass. Substituted text is
/// never rescanned, so values containing `@` stay literal.
pub fn bind(template_name: &str, template: &str, bindings: &Bindings) -> InsightsResult<String> {
    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;

    while let Some(at) = rest.find('@') {
        out.push_str(&rest[..at]);
        let after = &rest[at + 1..];
        let len = after.find(|c: char| !is_ident(c)).unwrap_or(after.len());

        if len == 0 {
            out.push('@');
        } else {
            let key = &after[..len];
            let value = bindings.get(key).ok_or_else(|| InsightsError::TemplateBind {
                template: template_name.to_owned(),
                missing_key: key.to_owned(),
            })?;
            out.push_str(&value.render());
        }
        rest = &after[len..];
    }
    out.push_str(rest);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str =
        r#"{"query":{"bool":{"filter":[{"term":{"org_id":"@orgId"}},{"range":{"ts":{"gte":@startTime}}}]}}}"#;

    #[test]
    fn binds_strings_and_integers() {
        let bindings = Bindings::new()
            .with("orgId", "org-1")
            .with("startTime", 1_700_000_000_000i64);
        let bound = bind("t", TEMPLATE, &bindings).unwrap();
        assert!(bound.contains(r#""org_id":"org-1""#));
        assert!(bound.contains(r#""gte":1700000000000"#));
        assert!(placeholders(&bound).is_empty());
        serde_json::from_str::<serde_json::Value>(&bound).unwrap();
    }

    #[test]
    fn missing_placeholder_names_template_and_key() {
        let bindings = Bindings::new().with("orgId", "org-1");
        let err = bind("commitTrends", TEMPLATE, &bindings).unwrap_err();
        match err {
            InsightsError::TemplateBind {
                template,
                missing_key,
            } => {
                assert_eq!(template, "commitTrends");
                assert_eq!(missing_key, "startTime");
            }
            other => panic!("expected TemplateBind, got {other:?}"),
        }
    }

    #[test]
    fn quotes_and_braces_cannot_escape_the_literal() {
        let bindings = Bindings::new()
            .with("orgId", r#"x"}},{"match_all":{}}"#)
            .with("startTime", 0i64);
        let bound = bind("t", TEMPLATE, &bindings).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&bound).unwrap();
        assert_eq!(
            parsed["query"]["bool"]["filter"][0]["term"]["org_id"],
            r#"x"}},{"match_all":{}}"#
        );
        assert_eq!(parsed["query"]["bool"]["filter"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let bindings = Bindings::new()
            .with("orgId", "@startTime")
            .with("startTime", 5i64);
        let bound = bind("t", TEMPLATE, &bindings).unwrap();
        assert!(bound.contains(r#""org_id":"@startTime""#));
    }

    #[test]
    fn lone_at_sign_is_literal() {
        let bound = bind("t", "a @ b", &Bindings::new()).unwrap();
        assert_eq!(bound, "a @ b");
    }

    #[test]
    fn raw_values_are_inserted_verbatim() {
        let bindings = Bindings::new().with_raw_list();
        let bound = bind("t", r#"{"terms":{"id":@ids}}"#, &bindings).unwrap();
        assert_eq!(bound, r#"{"terms":{"id":["a","b"]}}"#);
    }

    #[test]
    fn binding_is_deterministic() {
        let bindings = Bindings::new()
            .with("orgId", "o")
            .with("startTime", 1i64);
        let first = bind("t", TEMPLATE, &bindings).unwrap();
        let second = bind("t", TEMPLATE, &bindings).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn placeholders_are_listed_in_order() {
        assert_eq!(placeholders(TEMPLATE), vec!["orgId", "startTime"]);
    }

    impl Bindings {
        fn with_raw_list(self) -> Self {
            self.with("ids", BindValue::json(&["a", "b"]).unwrap())
        }
    }
}
