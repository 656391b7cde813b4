//! Translation of a chat history into a single agent prompt.

use super::request::{ChatMessage, ResponseFormat};
use serde_json::Value;

/// Flatten a chat history into one prompt string.
///
/// Each message becomes one paragraph and paragraphs are separated by a
/// blank line:
///
/// - `system` → `[System]: <content>`
/// - `user` → `<content>`
/// - `assistant` → `[Previous response]: <content>`
///
/// Messages with any other role are dropped.
pub fn flatten_messages(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .filter_map(|message| {
            let content = message.content.to_text();
            match message.role.as_str() {
                "system" => Some(format!("[System]: {content}")),
                "user" => Some(content),
                "assistant" => Some(format!("[Previous response]: {content}")),
                _ => None,
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Extract the JSON schema constraint from `response_format`, serialized.
///
/// Only `type == "json_schema"` with a non-empty `json_schema.schema`
/// produces a constraint.
pub fn extract_json_schema(response_format: Option<&ResponseFormat>) -> Option<String> {
    let format = response_format?;
    if format.kind != "json_schema" {
        return None;
    }
    let schema = format.json_schema.as_ref()?.schema.as_ref()?;
    match schema {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::request::{JsonSchemaFormat, MessageContent};
    use serde_json::json;

    #[test]
    fn system_and_user_flatten_with_blank_line() {
        let messages = vec![
            ChatMessage::new("system", "Be terse"),
            ChatMessage::new("user", "Hi"),
        ];
        assert_eq!(flatten_messages(&messages), "[System]: Be terse\n\nHi");
    }

    #[test]
    fn assistant_turns_are_marked_as_previous_responses() {
        let messages = vec![
            ChatMessage::new("user", "What is 2+2?"),
            ChatMessage::new("assistant", "4"),
            ChatMessage::new("user", "Times 3?"),
        ];
        assert_eq!(
            flatten_messages(&messages),
            "What is 2+2?\n\n[Previous response]: 4\n\nTimes 3?"
        );
    }

    #[test]
    fn unknown_roles_are_dropped() {
        let messages = vec![
            ChatMessage::new("tool", "{\"ok\":true}"),
            ChatMessage::new("user", "Continue"),
        ];
        assert_eq!(flatten_messages(&messages), "Continue");
    }

    #[test]
    fn part_content_is_joined_with_newlines() {
        let messages = vec![ChatMessage {
            role: "user".to_string(),
            content: MessageContent::Parts(vec![
                json!({"type": "text", "text": "line one"}),
                json!({"type": "text", "text": "line two"}),
            ]),
        }];
        assert_eq!(flatten_messages(&messages), "line one\nline two");
    }

    fn format(kind: &str, schema: Option<serde_json::Value>) -> ResponseFormat {
        ResponseFormat {
            kind: kind.to_string(),
            json_schema: Some(JsonSchemaFormat { name: None, schema }),
        }
    }

    #[test]
    fn json_schema_format_yields_serialized_schema() {
        let schema = json!({"type": "object", "properties": {"n": {"type": "integer"}}});
        let extracted = extract_json_schema(Some(&format("json_schema", Some(schema.clone()))));
        let parsed: serde_json::Value = serde_json::from_str(&extracted.unwrap()).unwrap();
        assert_eq!(parsed, schema);
    }

    #[test]
    fn other_formats_yield_no_constraint() {
        assert_eq!(extract_json_schema(None), None);
        assert_eq!(
            extract_json_schema(Some(&format("json_object", Some(json!({"type": "object"}))))),
            None
        );
        assert_eq!(extract_json_schema(Some(&format("text", None))), None);
    }

    #[test]
    fn empty_schema_yields_no_constraint() {
        assert_eq!(extract_json_schema(Some(&format("json_schema", None))), None);
        assert_eq!(
            extract_json_schema(Some(&format("json_schema", Some(json!({}))))),
            None
        );
        let missing = ResponseFormat {
            kind: "json_schema".to_string(),
            json_schema: None,
        };
        assert_eq!(extract_json_schema(Some(&missing)), None);
    }
}
