use clap::{Parser, Subcommand};
use petctl::command::{self, ControlCommand, Mode, SOCKET_PATH, SizePreset};

#[derive(Parser, Debug)]
#[command(name = "petctl", version, about = "Control a running deskpet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Switch the behaviour mode (static, free-fly, follow-cursor)
    Mode { mode: Mode },
    /// Resize the pet (small, medium, large)
    Size { size: SizePreset },
    /// Close the pet
    Quit,
}

impl From<Commands> for ControlCommand {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Mode { mode } => ControlCommand::Mode(mode),
            Commands::Size { size } => ControlCommand::Size(size),
            Commands::Quit => ControlCommand::Quit,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let command = ControlCommand::from(cli.command);
    log::debug!("Sending '{}' to {}", command, SOCKET_PATH);

    command::send(&command).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to deskpet at {}: {}. Is deskpet running?",
            SOCKET_PATH,
            e
        )
    })
}
