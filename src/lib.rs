pub mod app;
pub mod channel;
pub mod color;
pub mod config;
pub mod link;
pub mod panel;
pub mod state;
pub mod wire;
