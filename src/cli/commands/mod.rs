mod command_result;
pub mod helper;
pub mod init;
pub mod lookup;
pub mod unused;
pub mod usages;
pub mod watch;

pub use command_result::*;
