//! 应用层 - 命令
//!
//! 会触发上游写操作（创建音色、合成音频）的用例

mod synthesis_commands;
mod voice_commands;

pub mod handlers;

pub use synthesis_commands::*;
pub use voice_commands::*;
