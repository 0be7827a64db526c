//! Voice Queries

/// 列出上游音色查询
#[derive(Debug, Clone)]
pub struct ListVoices;
