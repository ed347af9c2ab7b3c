//! Variable sources consulted while rendering a template.

use crate::archive::ArchiveComponents;
use crate::broker::Broker;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

/// Anything that can resolve a placeholder name to text.
pub trait VariableSource {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl VariableSource for ArchiveComponents {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(Cow::Borrowed)
    }
}

impl VariableSource for Broker {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(value_text)
    }
}

impl VariableSource for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl VariableSource for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

/// Two-level lookup: `overlay` is consulted first, `base` second.
///
/// Nothing is copied or written back; both levels are borrowed for the
/// duration of one render.
pub struct LayeredVars<'a> {
    overlay: &'a dyn VariableSource,
    base: &'a dyn VariableSource,
}

impl<'a> LayeredVars<'a> {
    pub fn new(overlay: &'a dyn VariableSource, base: &'a dyn VariableSource) -> Self {
        Self { overlay, base }
    }
}

impl VariableSource for LayeredVars<'_> {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.overlay
            .lookup(name)
            .or_else(|| self.base.lookup(name))
    }
}

/// Text form of a broker value: strings verbatim, `null` as empty, everything
/// else as compact JSON.
pub fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{ArchivePath, PathMatch};
    use serde_json::json;

    fn components() -> ArchiveComponents {
        match ArchivePath::parse("77/5d5892d3-1f74-4ccf-91af-548dfc9767aa/20240101120000-abc") {
            PathMatch::Matched(c) => c,
            PathMatch::NoMatch => panic!("fixture path must match"),
        }
    }

    #[test]
    fn test_overlay_wins_over_base() {
        let overlay = components();
        let mut base = Broker::new();
        base.set("cluster_id", "from-broker");
        base.set("extra", "only-in-broker");

        let vars = LayeredVars::new(&overlay, &base);
        assert_eq!(
            vars.lookup("cluster_id").as_deref(),
            Some("5d5892d3-1f74-4ccf-91af-548dfc9767aa")
        );
        assert_eq!(vars.lookup("extra").as_deref(), Some("only-in-broker"));
        assert_eq!(vars.lookup("missing"), None);
    }

    #[test]
    fn test_lookup_does_not_write_back() {
        let overlay = components();
        let base = Broker::new();
        let vars = LayeredVars::new(&overlay, &base);
        let _ = vars.lookup("org_id");
        assert!(base.is_empty());
    }

    #[test]
    fn test_broker_value_text() {
        let broker: Broker = [
            ("s", json!("text")),
            ("n", json!(12)),
            ("b", json!(true)),
            ("z", Value::Null),
            ("a", json!([1, "x"])),
        ]
        .into_iter()
        .collect();

        assert_eq!(broker.lookup("s").as_deref(), Some("text"));
        assert_eq!(broker.lookup("n").as_deref(), Some("12"));
        assert_eq!(broker.lookup("b").as_deref(), Some("true"));
        assert_eq!(broker.lookup("z").as_deref(), Some(""));
        assert_eq!(broker.lookup("a").as_deref(), Some("[1,\"x\"]"));
    }

    #[test]
    fn test_map_sources() {
        let mut map = HashMap::new();
        map.insert("x".to_string(), "abcdef".to_string());
        assert_eq!(map.lookup("x").as_deref(), Some("abcdef"));

        let tree: BTreeMap<String, String> = [("y".to_string(), "1".to_string())].into();
        assert_eq!(tree.lookup("y").as_deref(), Some("1"));
    }
}
