pub mod app;
pub mod menu;
pub mod sprite;
pub mod theme;
pub mod window;
