//! Command surface exposed to the host application.

use crate::controller::{PaletteController, PaletteError};
use crate::flows::{LoadFlow, SaveFlow};
use tracing::debug;

/// Invocable palette commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaletteCommand {
    SaveStyle,
    LoadStyle,
}

impl PaletteCommand {
    pub const ALL: [PaletteCommand; 2] = [PaletteCommand::SaveStyle, PaletteCommand::LoadStyle];

    /// Stable identifier used for command registration.
    pub const fn id(self) -> &'static str {
        match self {
            Self::SaveStyle => "save-style",
            Self::LoadStyle => "load-style",
        }
    }

    /// Human-readable command title.
    pub const fn title(self) -> &'static str {
        match self {
            Self::SaveStyle => "Save style",
            Self::LoadStyle => "Load style",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.id() == id)
    }
}

/// Sink for short, transient user notices.
pub trait Notifier {
    fn notice(&self, message: &str);
}

/// Flow opened by a successful command invocation.
pub enum OpenedFlow {
    Save(SaveFlow),
    Load(LoadFlow),
}

/// Runs `command`, opening its flow.
///
/// When no valid tool is active the user gets a notice and `Ok(None)` is
/// returned; other failures propagate.
pub fn run_command(
    command: PaletteCommand,
    controller: &PaletteController,
    notifier: &dyn Notifier,
) -> Result<Option<OpenedFlow>, PaletteError> {
    debug!(command = command.id(), "Running palette command");
    let opened = match command {
        PaletteCommand::SaveStyle => SaveFlow::open(controller.clone()).map(OpenedFlow::Save),
        PaletteCommand::LoadStyle => LoadFlow::open(controller.clone()).map(OpenedFlow::Load),
    };
    match opened {
        Ok(flow) => Ok(Some(flow)),
        Err(PaletteError::NoValidTool) => {
            notifier.notice(&PaletteError::NoValidTool.to_string());
            Ok(None)
        }
        Err(error) => Err(error),
    }
}
