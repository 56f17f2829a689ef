use petctl::command::{ControlCommand, Mode, SizePreset};

/// Events delivered from background services to the GUI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    SetMode(Mode),
    SetSize(SizePreset),
    Quit,
    ConfigReload,
}

impl From<ControlCommand> for AppEvent {
    fn from(command: ControlCommand) -> Self {
        match command {
            ControlCommand::Mode(mode) => AppEvent::SetMode(mode),
            ControlCommand::Size(size) => AppEvent::SetSize(size),
            ControlCommand::Quit => AppEvent::Quit,
        }
    }
}
