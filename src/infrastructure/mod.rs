//! Infrastructure Layer - 基础设施层
//!
//! 提供端口的具体实现与 HTTP 接口

pub mod adapters;
pub mod http;

pub use adapters::{FakeVoiceClient, HttpVoiceClient};
