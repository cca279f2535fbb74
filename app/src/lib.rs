pub mod adapter;
pub mod automation;
pub mod core;
pub mod port;
pub mod session;
pub mod settings;
