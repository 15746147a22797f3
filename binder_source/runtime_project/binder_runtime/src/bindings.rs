use binder_core::CallBinding;
use serde::{Deserialize, Serialize};

/// A stored binding and the event it listens to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BindingEntry {
    pub event: String,
    pub binding: CallBinding,
}

impl BindingEntry {
    pub fn new(event: impl Into<String>, binding: CallBinding) -> Self {
        Self {
            event: event.into(),
            binding,
        }
    }
}

/// Parse a JSON list of `{ "event", "binding" }` entries.
pub fn load_bindings(source: &str) -> serde_json::Result<Vec<BindingEntry>> {
    serde_json::from_str(source)
}

pub fn save_bindings(entries: &[BindingEntry]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(entries)
}

#[cfg(test)]
mod tests {
    use binder_core::{ArgumentSource, BindingState, LiteralKind};
    use binder_ids::ObjectID;
    use binder_variant::ValueType;

    use super::*;

    const BINDINGS: &str = r#"[
        {
            "event": "coin_collected",
            "binding": {
                "target": "Events",
                "method": "SetScore",
                "params": [
                    { "name": "score", "ty": "Int", "source": "property",
                      "object": 1, "component": "Wallet", "property": "Coins" }
                ]
            }
        },
        {
            "event": "reset",
            "binding": {
                "target": "Events",
                "method": "SetScore",
                "params": [
                    { "name": "score", "ty": "Int", "source": "literal", "kind": "Int", "value": "" }
                ]
            }
        },
        { "event": "idle", "binding": { "target": "Events" } }
    ]"#;

    #[test]
    fn loads_tagged_sources() {
        let entries = load_bindings(BINDINGS).unwrap();
        assert_eq!(entries.len(), 3);

        let coin = &entries[0].binding;
        assert_eq!(coin.state(), BindingState::Configured);
        assert_eq!(coin.slot(0).map(|s| &s.ty), Some(&ValueType::Int));
        assert_eq!(
            coin.slot(0).map(|s| &s.source),
            Some(&ArgumentSource::property(ObjectID::new(1), "Wallet", "Coins"))
        );

        assert_eq!(
            entries[1].binding.slot(0).map(|s| &s.source),
            Some(&ArgumentSource::literal(LiteralKind::Int, ""))
        );
        assert_eq!(entries[2].binding.state(), BindingState::Unconfigured);
    }

    #[test]
    fn saved_entries_load_back() {
        let entries = load_bindings(BINDINGS).unwrap();
        let saved = save_bindings(&entries).unwrap();
        assert_eq!(load_bindings(&saved).unwrap(), entries);
    }

    #[test]
    fn rejects_unknown_source_tag() {
        let bad = r#"[{"event":"x","binding":{"target":"Events","method":"M",
            "params":[{"name":"a","ty":"Int","source":"global","value":"1"}]}}]"#;
        assert!(load_bindings(bad).is_err());
    }
}
