//! JSON command protocol for driving the viewer headlessly.
//!
//! Every mutation and query the GUI offers has a command here, plus raw
//! pointer input, render ticks, picking and frame export.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use shared::{PrimitiveKind, Transform};

use crate::harness::TestHarness;
use crate::viewport::input::PointerButton;

/// Pointer event kind for the `pointer` command
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PointerAction {
    Down,
    Move,
    Up,
    Wheel,
}

/// A command the harness can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Add a primitive at a random spot
    AddObject {
        kind: PrimitiveKind,
        /// Optional transform applied right after creation
        #[serde(default)]
        transform: Option<Transform>,
    },
    DeleteObject {
        id: String,
    },
    DuplicateObject {
        id: String,
    },
    SetVisible {
        id: String,
        visible: bool,
    },
    SetTransform {
        id: String,
        transform: Transform,
    },
    SetColor {
        id: String,
        color: [f32; 3],
    },
    /// Select an object; `null` or a missing id clears
    Select {
        #[serde(default)]
        id: Option<String>,
    },
    ClearSelection,
    ListObjects,
    GetSelection,
    /// Pick at a viewport point without selecting
    Pick {
        x: f32,
        y: f32,
    },
    /// Raw pointer event. `button` is the DOM button index (0 primary, 2 secondary).
    Pointer {
        action: PointerAction,
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
        #[serde(default)]
        button: u16,
        #[serde(default)]
        delta_y: f32,
    },
    /// Run render ticks
    Tick {
        #[serde(default = "default_ticks")]
        count: usize,
    },
    /// Export one frame to `dir` (or the configured directory)
    ExportFrame {
        #[serde(default)]
        dir: Option<PathBuf>,
        #[serde(default)]
        multiplier: Option<f32>,
    },
}

fn default_ticks() -> usize {
    1
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }

    fn not_found(id: &str) -> Self {
        Self::err(crate::error::ViewerError::ObjectNotFound(id.to_string()).to_string())
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::AddObject { kind, transform } => {
            let id = harness.add(kind);
            if let Some(transform) = transform {
                harness.state.set_transform(&id, transform);
            }
            CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
        }

        AgentCommand::DeleteObject { id } => {
            if harness.delete(&id) {
                CommandResponse::ok()
            } else {
                CommandResponse::not_found(&id)
            }
        }

        AgentCommand::DuplicateObject { id } => match harness.duplicate(&id) {
            Some(new_id) => CommandResponse::ok_with_data(serde_json::json!({ "id": new_id })),
            None => CommandResponse::not_found(&id),
        },

        AgentCommand::SetVisible { id, visible } => {
            if harness.state.set_visible(&id, visible) {
                CommandResponse::ok()
            } else {
                CommandResponse::not_found(&id)
            }
        }

        AgentCommand::SetTransform { id, transform } => {
            if harness.state.set_transform(&id, transform) {
                CommandResponse::ok()
            } else {
                CommandResponse::not_found(&id)
            }
        }

        AgentCommand::SetColor { id, color } => {
            if harness.state.set_color(&id, color) {
                CommandResponse::ok()
            } else {
                CommandResponse::not_found(&id)
            }
        }

        AgentCommand::Select { id } => {
            let selected = harness.state.select(id.as_deref());
            CommandResponse::ok_with_data(serde_json::json!({ "selected": selected }))
        }

        AgentCommand::ClearSelection => {
            harness.clear_selection();
            CommandResponse::ok()
        }

        AgentCommand::ListObjects => {
            let objects = harness.objects();
            CommandResponse::ok_with_data(serde_json::json!({
                "count": objects.len(),
                "objects": objects,
            }))
        }

        AgentCommand::GetSelection => {
            CommandResponse::ok_with_data(serde_json::json!({ "selected": harness.selection() }))
        }

        AgentCommand::Pick { x, y } => {
            CommandResponse::ok_with_data(serde_json::json!({ "hit": harness.pick_at(x, y) }))
        }

        AgentCommand::Pointer {
            action,
            x,
            y,
            button,
            delta_y,
        } => {
            let button = match action {
                PointerAction::Down | PointerAction::Up => match PointerButton::from_index(button) {
                    Some(b) => Some(b),
                    None => return CommandResponse::err(format!("Unknown pointer button {button}")),
                },
                PointerAction::Move | PointerAction::Wheel => None,
            };
            match (action, button) {
                (PointerAction::Down, Some(b)) => harness.pointer_down(b, x, y),
                (PointerAction::Up, Some(b)) => harness.pointer_up(b, x, y),
                (PointerAction::Move, _) => harness.pointer_move(x, y),
                (PointerAction::Wheel, _) => harness.wheel(delta_y),
                _ => {}
            }
            CommandResponse::ok_with_data(serde_json::json!({
                "gesture": format!("{:?}", harness.viewport.gesture()),
            }))
        }

        AgentCommand::Tick { count } => {
            let mut moving = false;
            for _ in 0..count {
                moving = harness.tick();
            }
            let pose = harness.viewport.pose();
            CommandResponse::ok_with_data(serde_json::json!({
                "moving": moving,
                "radius": pose.radius(),
                "position": pose.position.to_array(),
                "target": pose.target.to_array(),
            }))
        }

        AgentCommand::ExportFrame { dir, multiplier } => {
            let dir = dir.unwrap_or_else(|| harness.state.settings.export.resolved_output_dir());
            let multiplier = multiplier.unwrap_or(harness.state.settings.export.multiplier);
            match harness.export_frame_with(&dir, multiplier) {
                Ok(path) => CommandResponse::ok_with_data(serde_json::json!({ "path": path })),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serde_add_object() {
        let json = r#"{"command": "add_object", "kind": "torus"}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        match cmd {
            AgentCommand::AddObject { kind, transform } => {
                assert_eq!(kind, PrimitiveKind::Torus);
                assert!(transform.is_none());
            }
            _ => panic!("Expected AddObject"),
        }
    }

    #[test]
    fn test_command_serde_select_null() {
        let cmd: AgentCommand = serde_json::from_str(r#"{"command": "select", "id": null}"#).unwrap();
        assert!(matches!(cmd, AgentCommand::Select { id: None }));
        let cmd: AgentCommand = serde_json::from_str(r#"{"command": "select"}"#).unwrap();
        assert!(matches!(cmd, AgentCommand::Select { id: None }));
    }

    #[test]
    fn test_command_serde_pointer_defaults() {
        let cmd: AgentCommand =
            serde_json::from_str(r#"{"command": "pointer", "action": "wheel", "delta_y": -3}"#)
                .unwrap();
        match cmd {
            AgentCommand::Pointer {
                action, button, delta_y, ..
            } => {
                assert_eq!(action, PointerAction::Wheel);
                assert_eq!(button, 0);
                assert_eq!(delta_y, -3.0);
            }
            _ => panic!("Expected Pointer"),
        }
    }

    #[test]
    fn test_execute_add_and_list() {
        let mut h = TestHarness::new();
        let resp = execute_json(&mut h, r#"{"command": "add_object", "kind": "cube"}"#).unwrap();
        assert!(resp.success);
        assert_eq!(resp.data.unwrap()["id"], "obj-1");

        let resp = execute_json(&mut h, r#"{"command": "list_objects"}"#).unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data["count"], 1);
        assert_eq!(data["objects"][0]["kind"], "cube");
        assert_eq!(data["objects"][0]["name"], "Cube 1");
    }

    #[test]
    fn test_execute_delete_missing_fails() {
        let mut h = TestHarness::new();
        let resp = execute_json(&mut h, r#"{"command": "delete_object", "id": "ghost"}"#).unwrap();
        assert!(!resp.success);
        assert!(resp.error.unwrap().contains("ghost"));
    }

    #[test]
    fn test_execute_select_and_get() {
        let mut h = TestHarness::new();
        let id = h.add(PrimitiveKind::Sphere);
        let resp = execute_json(&mut h, &format!(r#"{{"command": "select", "id": "{id}"}}"#)).unwrap();
        assert_eq!(resp.data.unwrap()["selected"], id.as_str());

        let resp = execute_json(&mut h, r#"{"command": "get_selection"}"#).unwrap();
        assert_eq!(resp.data.unwrap()["selected"], id.as_str());

        execute_json(&mut h, r#"{"command": "clear_selection"}"#).unwrap();
        let resp = execute_json(&mut h, r#"{"command": "get_selection"}"#).unwrap();
        assert!(resp.data.unwrap()["selected"].is_null());
    }

    #[test]
    fn test_execute_bad_button() {
        let mut h = TestHarness::new();
        let resp = execute_json(
            &mut h,
            r#"{"command": "pointer", "action": "down", "button": 9, "x": 1, "y": 1}"#,
        )
        .unwrap();
        assert!(!resp.success);
    }

    #[test]
    fn test_execute_pointer_gesture() {
        let mut h = TestHarness::new();
        let resp = execute_json(
            &mut h,
            r#"{"command": "pointer", "action": "down", "button": 2, "x": 10, "y": 10}"#,
        )
        .unwrap();
        assert_eq!(resp.data.unwrap()["gesture"], "Panning");
    }

    #[test]
    fn test_execute_invalid_json() {
        let mut h = TestHarness::new();
        let result = execute_json(&mut h, "not valid json");
        assert!(result.is_err());
    }
}
