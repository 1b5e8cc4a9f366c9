/// Keyboard commands and their effect on the transform parameters
use crossterm::event::KeyCode;
use nalgebra::Vector3;
use xform3d_core::{Float, Transformations};

/// Parameter group the axis keys currently adjust
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Scale,
    Translate,
    Rotate,
    Custom,
    View,
}

impl Group {
    pub fn name(self) -> &'static str {
        match self {
            Group::Scale => "scale",
            Group::Translate => "translate",
            Group::Rotate => "rotate",
            Group::Custom => "custom axis",
            Group::View => "view",
        }
    }

    /// Amount added per key press
    pub fn step(self) -> Float {
        match self {
            Group::Scale => 0.1,
            Group::Translate => 0.25,
            Group::Rotate | Group::Custom | Group::View => 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Select(Group),
    /// Change one component (0 = x, 1 = y, 2 = z) of the selected group
    Nudge { axis: usize, direction: Float },
    CycleAxis,
    ResetScale,
    ResetTranslate,
    ResetRotation,
    /// Back to the configured starting view
    PresetView,
    /// Zero the view orbit
    ClearView,
    ResetAll,
    ToggleFaces,
    ToggleWireframe,
    ToggleLabels,
    Quit,
}

pub fn command_for(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        KeyCode::Char('1') => Command::Select(Group::Scale),
        KeyCode::Char('2') => Command::Select(Group::Translate),
        KeyCode::Char('3') => Command::Select(Group::Rotate),
        KeyCode::Char('4') => Command::Select(Group::Custom),
        KeyCode::Char('5') => Command::Select(Group::View),
        KeyCode::Char('x') | KeyCode::Left => Command::Nudge { axis: 0, direction: -1.0 },
        KeyCode::Char('X') | KeyCode::Right => Command::Nudge { axis: 0, direction: 1.0 },
        KeyCode::Char('y') | KeyCode::Down => Command::Nudge { axis: 1, direction: -1.0 },
        KeyCode::Char('Y') | KeyCode::Up => Command::Nudge { axis: 1, direction: 1.0 },
        KeyCode::Char('z') | KeyCode::PageDown => Command::Nudge { axis: 2, direction: -1.0 },
        KeyCode::Char('Z') | KeyCode::PageUp => Command::Nudge { axis: 2, direction: 1.0 },
        KeyCode::Char('a') => Command::CycleAxis,
        KeyCode::Char('s') => Command::ResetScale,
        KeyCode::Char('t') => Command::ResetTranslate,
        KeyCode::Char('r') => Command::ResetRotation,
        KeyCode::Char('v') => Command::PresetView,
        KeyCode::Char('V') => Command::ClearView,
        KeyCode::Char('0') => Command::ResetAll,
        KeyCode::Char('f') => Command::ToggleFaces,
        KeyCode::Char('w') => Command::ToggleWireframe,
        KeyCode::Char('l') => Command::ToggleLabels,
        _ => return None,
    };
    Some(command)
}

/// Axes offered by the custom rotation preset key
pub const AXIS_PRESETS: [[Float; 3]; 5] = [
    [1.0, 1.0, 1.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 0.0],
];

/// Which group is selected and which custom axis preset is active
#[derive(Debug, Clone)]
pub struct Controls {
    pub group: Group,
    axis_preset: usize,
}

impl Controls {
    pub fn new() -> Self {
        Self {
            group: Group::Rotate,
            axis_preset: 0,
        }
    }

    /// Apply a parameter command to `transformations`.
    ///
    /// Returns `false` for commands that are not about transform parameters
    /// (toggles, quit, view presets); the caller handles those.
    pub fn apply(&mut self, command: Command, transformations: &mut Transformations) -> bool {
        match command {
            Command::Select(group) => self.group = group,
            Command::Nudge { axis, direction } => self.nudge(axis, direction, transformations),
            Command::CycleAxis => {
                self.axis_preset = (self.axis_preset + 1) % AXIS_PRESETS.len();
                let [x, y, z] = AXIS_PRESETS[self.axis_preset];
                let angle = transformations.state().custom_angle;
                transformations.set_custom_rotation(Vector3::new(x, y, z), angle);
            }
            Command::ResetScale => transformations.reset_scale(),
            Command::ResetTranslate => transformations.reset_translate(),
            Command::ResetRotation => transformations.reset_rotation(),
            Command::ClearView => transformations.reset_view(),
            Command::ResetAll => {
                transformations.reset_all();
                self.axis_preset = 0;
            }
            _ => return false,
        }
        true
    }

    fn nudge(&self, axis: usize, direction: Float, transformations: &mut Transformations) {
        let delta = self.group.step() * direction;
        if self.group == Group::Custom {
            // One angle, so every axis key turns it
            let angle = transformations.state().custom_angle + delta;
            transformations.set_custom_angle(angle);
            return;
        }
        let state = transformations.state_mut();
        let target = match self.group {
            Group::Scale => &mut state.scale,
            Group::Translate => &mut state.translate,
            Group::Rotate => &mut state.rotate,
            Group::View | Group::Custom => &mut state.view_rotation,
        };
        match target.get_mut(axis) {
            Some(component) => *component += delta,
            None => log::debug!("ignoring nudge of component {axis}"),
        }
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::new()
    }
}
