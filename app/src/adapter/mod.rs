mod feed;
mod session_file;
mod sink;

pub use feed::JsonlFeed;
pub use session_file::FileConfigStore;
pub use sink::LoggingCommandSink;
