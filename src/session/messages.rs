//! Message types for a clip session
//!
//! This module contains:
//! - Msg enum with nested sub-enums for pointer, toolbar and text input
//! - SessionEvent enum for everything the session reports outward

use serde::{Deserialize, Serialize};

use crate::domain::{ClipRegion, Cursor, ToolOptions};
use crate::screenshot::export::ExportResult;
use crate::screenshot::toolbar::ToolbarPlacement;

// ============================================================================
// Input
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    #[default]
    Left,
    Middle,
    /// Cancels the session
    Right,
}

/// Pointer input in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerMsg {
    Down {
        x: f32,
        y: f32,
        #[serde(default)]
        button: Button,
    },
    Move {
        x: f32,
        y: f32,
    },
    Up {
        x: f32,
        y: f32,
    },
}

/// Actions reported by the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolbarMsg {
    ToolSelected(ToolOptions),
    ToolDeselected,
    Undo,
    /// Export without ending the session
    Save,
    Confirm,
    Cancel,
}

/// Edits to the open text annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextMsg {
    Insert { text: String },
    Backspace,
    /// Replace the whole buffer
    Set { text: String },
}

/// Top-level session input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Msg {
    Pointer(PointerMsg),
    Toolbar(ToolbarMsg),
    Text(TextMsg),
}

// ============================================================================
// Output
// ============================================================================

/// Notifications sent on the session's event channel
#[derive(Debug, Clone)]
pub enum SessionEvent {
    CursorChanged(Cursor),
    /// A drag finished with this normalized region
    RegionSelected(ClipRegion),
    ToolbarPlaced(ToolbarPlacement),
    /// Undo removed the last stroke
    AnnotationsExhausted,
    /// A save was requested; `file_name` is the suggested name
    Saved {
        file_name: String,
        result: ExportResult,
    },
    /// The session ended
    Finished { confirmed: bool },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ToolKind;

    #[test]
    fn test_script_messages_deserialize() {
        let script = r#"[
            {"pointer": {"type": "down", "x": 10, "y": 20}},
            {"pointer": {"type": "down", "x": 1, "y": 2, "button": "right"}},
            {"toolbar": {"type": "tool_selected", "kind": "arrow", "size": 3, "color": {"r": 1, "g": 0, "b": 0}}},
            {"toolbar": {"type": "undo"}},
            {"text": {"type": "insert", "text": "hi"}}
        ]"#;
        let msgs: Vec<Msg> = serde_json::from_str(script).unwrap();

        assert_eq!(
            msgs[0],
            Msg::Pointer(PointerMsg::Down {
                x: 10.0,
                y: 20.0,
                button: Button::Left
            })
        );
        assert!(matches!(
            msgs[1],
            Msg::Pointer(PointerMsg::Down {
                button: Button::Right,
                ..
            })
        ));
        match &msgs[2] {
            Msg::Toolbar(ToolbarMsg::ToolSelected(options)) => {
                assert_eq!(options.kind, ToolKind::Arrow);
                assert_eq!(options.size, 3);
                assert_eq!(options.color.a, 1.0);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(msgs[3], Msg::Toolbar(ToolbarMsg::Undo));
        assert_eq!(
            msgs[4],
            Msg::Text(TextMsg::Insert {
                text: "hi".to_string()
            })
        );
    }
}
