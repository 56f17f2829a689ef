pub mod config;
pub mod events;
pub mod gui;
pub mod pet;
pub mod sys;
