pub mod command;
pub mod macros;
pub mod wm;
