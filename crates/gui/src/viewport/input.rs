//! Pointer/wheel gesture classification

use glam::Vec2;

/// Pointer button, numbered like DOM `MouseEvent.button`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

impl PointerButton {
    pub fn from_index(index: u16) -> Option<Self> {
        match index {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Raw input from the window shell, in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { button: PointerButton, pos: Vec2 },
    PointerMove { pos: Vec2 },
    PointerUp { button: PointerButton, pos: Vec2 },
    /// Wheel notch. Negative `delta_y` scrolls up (zoom in).
    Wheel { delta_y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Rotating,
    Panning,
}

/// What an event asks the camera to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEffect {
    None,
    /// Pixel delta for the orbit accumulator
    Rotate(Vec2),
    /// Pixel delta for the pan accumulator
    Pan(Vec2),
    /// Multiplicative radius step
    Zoom(f32),
}

/// Turns press/move/release sequences into camera gestures.
///
/// Primary press starts rotating, secondary press starts panning, releasing
/// the same button returns to idle. Wheel events zoom regardless of the
/// current gesture. Once detached every event is ignored.
pub struct InputStateMachine {
    gesture: Gesture,
    button: Option<PointerButton>,
    last_pointer: Vec2,
    zoom_step: f32,
    attached: bool,
}

impl InputStateMachine {
    pub fn new(zoom_step: f32) -> Self {
        let zoom_step = if zoom_step.is_finite() && zoom_step > 0.0 && zoom_step < 1.0 {
            zoom_step
        } else {
            0.95
        };
        Self {
            gesture: Gesture::Idle,
            button: None,
            last_pointer: Vec2::ZERO,
            zoom_step,
            attached: true,
        }
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn zoom_step(&self) -> f32 {
        self.zoom_step
    }

    pub fn handle(&mut self, event: InputEvent) -> InputEffect {
        if !self.attached {
            return InputEffect::None;
        }

        match event {
            InputEvent::PointerDown { button, pos } => {
                if self.gesture != Gesture::Idle {
                    return InputEffect::None;
                }
                self.gesture = match button {
                    PointerButton::Primary => Gesture::Rotating,
                    PointerButton::Secondary => Gesture::Panning,
                    PointerButton::Middle => return InputEffect::None,
                };
                self.button = Some(button);
                self.last_pointer = pos;
                InputEffect::None
            }
            InputEvent::PointerMove { pos } => {
                let delta = pos - self.last_pointer;
                self.last_pointer = pos;
                match self.gesture {
                    Gesture::Idle => InputEffect::None,
                    Gesture::Rotating => InputEffect::Rotate(delta),
                    Gesture::Panning => InputEffect::Pan(delta),
                }
            }
            InputEvent::PointerUp { button, pos } => {
                if self.button == Some(button) {
                    self.last_pointer = pos;
                    self.cancel();
                }
                InputEffect::None
            }
            InputEvent::Wheel { delta_y } => {
                if delta_y < 0.0 {
                    InputEffect::Zoom(self.zoom_step)
                } else if delta_y > 0.0 {
                    InputEffect::Zoom(1.0 / self.zoom_step)
                } else {
                    InputEffect::None
                }
            }
        }
    }

    /// Abandon the current gesture
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
        self.button = None;
    }

    /// Stop routing events. Irreversible.
    pub fn detach(&mut self) {
        self.cancel();
        self.attached = false;
    }
}
