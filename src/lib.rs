pub mod audio;
pub mod config;
pub mod gesture;
pub mod interaction;
pub mod landmark;
pub mod store;
