pub mod model;
pub mod view;

pub use model::{MenuEntry, MenuState, sections};
pub use view::{build, install_actions, sync};

pub const ACTION_GROUP: &str = "pet";
pub const MODE_ACTION: &str = "mode";
pub const SIZE_ACTION: &str = "size";
pub const QUIT_ACTION: &str = "quit";
