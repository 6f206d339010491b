pub mod chip;
pub mod config;
pub mod editor;
pub mod render;
pub mod surface;
pub mod theme;
pub mod view;
