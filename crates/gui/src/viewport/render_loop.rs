use super::camera::{CameraPose, CameraRig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
    /// Terminal: a disposed loop never runs again
    Disposed,
}

/// The one scheduled tick: integrate the camera, then draw.
///
/// Input handlers run between ticks on the same thread, so a tick always
/// sees a consistent accumulator.
pub struct RenderLoop {
    state: LoopState,
    frames: u64,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Stopped,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn start(&mut self) {
        if self.state == LoopState::Stopped {
            self.state = LoopState::Running;
        }
    }

    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            self.state = LoopState::Stopped;
        }
    }

    pub fn dispose(&mut self) {
        self.state = LoopState::Disposed;
    }

    /// Run one tick. Returns true when the camera is still moving and
    /// another tick should be scheduled. Does nothing unless running.
    pub fn tick<F>(&mut self, rig: &mut CameraRig, viewport_height: f32, draw: F) -> bool
    where
        F: FnOnce(&CameraPose),
    {
        if !self.is_running() {
            return false;
        }
        let moving = rig.tick(viewport_height);
        draw(rig.pose());
        self.frames += 1;
        moving
    }
}
