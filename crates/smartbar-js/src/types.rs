//! Types exposed to JavaScript via wasm-bindgen.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use smartbar_browser::{BrowserConfig, EditKind, OwnerMessage, SmolStr};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

/// Options accepted by the `SmartBar` constructor. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase", default)]
pub struct SmartBarOptions {
    /// Element id of the contenteditable bar. Defaults to "awesomebar".
    pub surface_id: Option<String>,
    /// Attribute carrying a decoration's logical discount.
    pub decoration_attribute: Option<String>,
    pub recovery_delay_ms: Option<u32>,
    /// Abandon an intent the owner never answers. Off unless set.
    pub owner_reply_timeout_ms: Option<u32>,
    pub activation_retry_ms: Option<u32>,
    pub special_keys: Option<Vec<String>>,
    pub navigation_keys: Option<Vec<String>>,
}

impl SmartBarOptions {
    pub fn into_config(self) -> BrowserConfig {
        let mut config = BrowserConfig::default();
        if let Some(id) = self.surface_id {
            config.surface_id = id;
        }
        if let Some(attribute) = self.decoration_attribute {
            config.decoration_attribute = attribute;
        }
        if let Some(ms) = self.activation_retry_ms {
            config.activation_retry = Duration::from_millis(ms.into());
        }
        if let Some(ms) = self.recovery_delay_ms {
            config.sync.recovery_delay = Duration::from_millis(ms.into());
        }
        config.sync.owner_reply_timeout = self
            .owner_reply_timeout_ms
            .map(|ms| Duration::from_millis(ms.into()));
        if let Some(keys) = self.special_keys {
            config.sync.special_keys = keys.into_iter().map(SmolStr::from).collect();
        }
        if let Some(keys) = self.navigation_keys {
            config.sync.navigation_keys = keys.into_iter().map(SmolStr::from).collect();
        }
        config
    }
}

/// A message for the owning app, as handed to the `onMessage` callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum JsOwnerMessage {
    EditIntent {
        /// "insert", "delete", "replace" or "pasteReplace".
        kind: String,
        /// Deletion scope, only present for deletes.
        #[serde(skip_serializing_if = "Option::is_none")]
        scope: Option<String>,
        text: String,
        start: usize,
        end: usize,
    },
    NavigationCaretChanged {
        offset: usize,
    },
    SpecialKey {
        key: String,
    },
    SurfaceDetached,
}

impl From<OwnerMessage> for JsOwnerMessage {
    fn from(message: OwnerMessage) -> Self {
        match message {
            OwnerMessage::EditIntent(intent) => {
                let scope = match intent.kind {
                    EditKind::Delete(scope) => Some(scope.as_str().to_string()),
                    _ => None,
                };
                Self::EditIntent {
                    kind: intent.kind.as_str().to_string(),
                    scope,
                    text: intent.text,
                    start: intent.range.start(),
                    end: intent.range.end(),
                }
            }
            OwnerMessage::NavigationCaretChanged(offset) => Self::NavigationCaretChanged { offset },
            OwnerMessage::SpecialKey(key) => Self::SpecialKey {
                key: key.name().to_string(),
            },
            OwnerMessage::SurfaceDetached => Self::SurfaceDetached,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartbar_browser::{DeleteScope, EditIntent, SelectionRange, SpecialKey};

    #[test]
    fn test_empty_options_keep_defaults() {
        let config = SmartBarOptions::default().into_config();
        assert_eq!(config.surface_id, "awesomebar");
        assert_eq!(config.decoration_attribute, "data-completionlen");
        assert_eq!(config.sync.recovery_delay, Duration::from_millis(50));
        assert_eq!(config.sync.owner_reply_timeout, None);
        assert!(config.sync.is_special_key("Tab"));
    }

    #[test]
    fn test_options_override() {
        let options = SmartBarOptions {
            surface_id: Some("urlbar".into()),
            recovery_delay_ms: Some(120),
            owner_reply_timeout_ms: Some(1000),
            special_keys: Some(vec!["Enter".into()]),
            ..Default::default()
        };
        let config = options.into_config();
        assert_eq!(config.surface_id, "urlbar");
        assert_eq!(config.sync.recovery_delay, Duration::from_millis(120));
        assert_eq!(config.sync.owner_reply_timeout, Some(Duration::from_secs(1)));
        assert!(config.sync.is_special_key("Enter"));
        assert!(!config.sync.is_special_key("Tab"));
    }

    #[test]
    fn test_delete_intent_carries_scope() {
        let message = OwnerMessage::EditIntent(EditIntent {
            kind: EditKind::Delete(DeleteScope::WordBackward),
            text: String::new(),
            range: SelectionRange::caret(4),
        });
        assert_eq!(
            JsOwnerMessage::from(message),
            JsOwnerMessage::EditIntent {
                kind: "delete".into(),
                scope: Some("wordBackward".into()),
                text: String::new(),
                start: 4,
                end: 4,
            }
        );
    }

    #[test]
    fn test_other_messages() {
        assert_eq!(
            JsOwnerMessage::from(OwnerMessage::SpecialKey(SpecialKey("Tab".into()))),
            JsOwnerMessage::SpecialKey { key: "Tab".into() }
        );
        assert_eq!(
            JsOwnerMessage::from(OwnerMessage::NavigationCaretChanged(3)),
            JsOwnerMessage::NavigationCaretChanged { offset: 3 }
        );
    }
}
