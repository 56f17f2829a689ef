use petctl::command::{ControlCommand, Mode, SizePreset};
use strum::IntoEnumIterator;

/// What the menu reflects: the active mode and, if it is one of the presets, the size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuState {
    pub mode: Mode,
    pub size: Option<SizePreset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    /// Insensitive caption naming the active mode.
    Header(Mode),
    Mode(Mode),
    Size(SizePreset),
    Quit,
}

impl MenuEntry {
    pub fn label(&self) -> String {
        match self {
            Self::Header(mode) => format!("Mode (current: {})", mode.label()),
            Self::Mode(mode) => mode.label().to_string(),
            Self::Size(size) => format!("Size: {}", size.label()),
            Self::Quit => "Quit".to_string(),
        }
    }

    /// The command selecting this entry issues, `None` for captions.
    pub fn command(&self) -> Option<ControlCommand> {
        match self {
            Self::Header(_) => None,
            Self::Mode(mode) => Some(ControlCommand::Mode(*mode)),
            Self::Size(size) => Some(ControlCommand::Size(*size)),
            Self::Quit => Some(ControlCommand::Quit),
        }
    }

    pub fn is_checked(&self, state: &MenuState) -> bool {
        match self {
            Self::Mode(mode) => *mode == state.mode,
            Self::Size(size) => Some(*size) == state.size,
            Self::Header(_) | Self::Quit => false,
        }
    }
}

/// Menu layout: modes, sizes, then quit, each group its own section.
pub fn sections(state: &MenuState) -> Vec<Vec<MenuEntry>> {
    let modes = std::iter::once(MenuEntry::Header(state.mode))
        .chain(Mode::iter().map(MenuEntry::Mode))
        .collect();
    let sizes = SizePreset::iter().map(MenuEntry::Size).collect();

    vec![modes, sizes, vec![MenuEntry::Quit]]
}
