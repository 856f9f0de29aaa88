//! Keyboard shortcut handling

use eframe::egui;

use crate::state::AppState;
use crate::ui::toolbar;
use crate::viewport::ViewportPanel;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context, state: &mut AppState, viewport: &mut ViewportPanel) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    let (escape, delete, duplicate, focus, home, export) = ctx.input(|i| {
        (
            i.key_pressed(egui::Key::Escape),
            i.key_pressed(egui::Key::Delete),
            i.modifiers.command && i.key_pressed(egui::Key::D),
            !i.modifiers.command && i.key_pressed(egui::Key::F),
            i.key_pressed(egui::Key::Home),
            i.modifiers.command && i.key_pressed(egui::Key::E),
        )
    });

    if escape {
        state.clear_selection();
    }
    if delete {
        toolbar::action_delete(state);
    }
    if duplicate {
        toolbar::action_duplicate(state);
    }
    if focus {
        viewport.focus_selected(state);
    }
    if home {
        viewport.reset_camera();
    }
    if export {
        toolbar::action_export(state, viewport);
    }
}
