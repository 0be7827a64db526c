//! Domain Layer - 领域层
//!
//! - Voice Context: 音色标识与克隆样本
//! - 文本分块器: 按上游长度限制切分待合成文本

pub mod voice;

mod text_chunker;

pub use text_chunker::{chunk_text, ChunkConfig, TextChunk, DEFAULT_BOUNDARIES, DEFAULT_MAX_CHARS};
