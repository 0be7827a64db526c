//! VoxRelay - 声音克隆中继服务
//!
//! 架构设计: Hexagonal Architecture + CQRS
//!
//! 领域层 (domain/):
//! - Text Chunker: 按标点把长文本切成上游可接受的块
//! - Voice: 音色标识、名称与音频样本校验
//!
//! 应用层 (application/):
//! - Ports: VoiceProviderPort（上游语音服务）
//! - Commands: 克隆音色、文本转语音
//! - Queries: 音色列表
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API（axum）
//! - Adapters: HTTP 上游客户端、离线假上游

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
