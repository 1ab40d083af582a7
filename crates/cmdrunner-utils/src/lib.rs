pub mod error;
pub mod logging;
pub mod paths;
pub mod session_log;
pub mod types;
