//! 文本分块器
//!
//! 把任意长度的文本切成不超过上游长度限制的片段，优先在标点处断开。
//! 所有片段按顺序拼接后与原文完全一致。

use std::num::NonZeroUsize;

/// 默认单块最大字符数（上游建议的单次合成长度）
pub const DEFAULT_MAX_CHARS: usize = 1000;

/// 默认断点标点，按优先级从高到低排列
pub const DEFAULT_BOUNDARIES: &[char] = &[
    '\n', '。', '！', '？', '.', '!', '?', '；', ';', '，', ',',
];

/// 分块配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkConfig {
    /// 单块最大字符数（按 Unicode 标量计数）
    pub max_chars: NonZeroUsize,
    /// 断点标点（优先级从高到低）
    pub boundaries: Vec<char>,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chars: NonZeroUsize::new(DEFAULT_MAX_CHARS).unwrap_or(NonZeroUsize::MIN),
            boundaries: DEFAULT_BOUNDARIES.to_vec(),
        }
    }
}

impl ChunkConfig {
    pub fn new(max_chars: NonZeroUsize, boundaries: Vec<char>) -> Self {
        Self {
            max_chars,
            boundaries,
        }
    }

    pub fn with_max_chars(mut self, max_chars: NonZeroUsize) -> Self {
        self.max_chars = max_chars;
        self
    }
}

/// 文本片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub index: usize,
    pub content: String,
}

impl TextChunk {
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// 对文本进行分块
///
/// 分块策略：
/// 1. 剩余文本不超过 `max_chars` 时整体作为最后一块
/// 2. 否则取前 `max_chars` 个字符作为窗口，按优先级依次查找标点在窗口内最右侧的位置，
///    找到的第一个标点决定断点（断在标点之后）
/// 3. 窗口内没有任何标点时在 `max_chars` 处硬切（可能切断单词）
///
/// 空文本返回空列表。
pub fn chunk_text(text: &str, config: &ChunkConfig) -> Vec<TextChunk> {
    split_spans(text, config)
        .into_iter()
        .enumerate()
        .map(|(index, content)| TextChunk {
            index,
            content: content.to_string(),
        })
        .collect()
}

fn split_spans<'a>(text: &'a str, config: &ChunkConfig) -> Vec<&'a str> {
    let max_chars = config.max_chars.get();
    let mut spans = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        // 窗口结束处的字节偏移；None 表示剩余文本已经放得下
        let window_end = match rest.char_indices().nth(max_chars) {
            Some((offset, _)) => offset,
            None => {
                spans.push(rest);
                break;
            }
        };

        let window = &rest[..window_end];
        let cut = find_boundary(window, &config.boundaries).unwrap_or(window_end);

        spans.push(&rest[..cut]);
        rest = &rest[cut..];
    }

    spans
}

/// 在窗口内查找断点，返回断点（标点之后）的字节偏移
///
/// 位于窗口开头的标点不作为断点。
fn find_boundary(window: &str, boundaries: &[char]) -> Option<usize> {
    boundaries.iter().find_map(|&mark| {
        window
            .rfind(mark)
            .filter(|&offset| offset > 0)
            .map(|offset| offset + mark.len_utf8())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_chars: usize) -> ChunkConfig {
        ChunkConfig::default().with_max_chars(NonZeroUsize::new(max_chars).unwrap())
    }

    fn joined(chunks: &[TextChunk]) -> String {
        chunks.iter().map(|c| c.content.as_str()).collect()
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(chunk_text("", &config(10)).is_empty());
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let text = "你好。世界！";
        let chunks = chunk_text(text, &config(100));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, text);
        assert_eq!(chunks[0].index, 0);
    }

    #[test]
    fn test_text_exactly_max_is_single_chunk() {
        let text = "abc.defghi";
        let chunks = chunk_text(text, &config(10));
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_cuts_after_rightmost_sentence_mark() {
        let text = "One. Two. Three four five six";
        let chunks = chunk_text(text, &config(12));
        assert_eq!(chunks[0].content, "One. Two.");
        assert_eq!(joined(&chunks), text);
    }

    #[test]
    fn test_prefers_punctuation_over_hard_cut() {
        // 窗口内有句号，也存在更靠后的硬切点
        let text = format!("{}.{}", "a".repeat(5), "b".repeat(20));
        let chunks = chunk_text(&text, &config(10));
        assert_eq!(chunks[0].content, "aaaaa.");
        assert!(chunks.iter().all(|c| c.char_count() <= 10));
        assert_eq!(joined(&chunks), text);
    }

    #[test]
    fn test_higher_priority_mark_wins_even_if_earlier() {
        let text = "ab\ncd，ef，ghijklmnop";
        let chunks = chunk_text(text, &config(10));
        assert_eq!(chunks[0].content, "ab\n");
    }

    #[test]
    fn test_hard_cut_without_marks() {
        let text = "abcdefghijklmnopqrstuvwxyz";
        let chunks = chunk_text(text, &config(10));
        let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["abcdefghij", "klmnopqrst", "uvwxyz"]);
    }

    #[test]
    fn test_mark_at_window_start_is_ignored() {
        let text = ".abcdefghijklmn";
        let chunks = chunk_text(text, &config(5));
        assert_eq!(chunks[0].content, ".abcd");
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        let text = "一二三四五六七八九十一二三";
        let chunks = chunk_text(text, &config(5));
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.char_count() <= 5));
        assert_eq!(joined(&chunks), text);
    }

    #[test]
    fn test_indices_are_sequential() {
        let text = "a.b.c.d.e.f.g.h.i.j.";
        let chunks = chunk_text(text, &config(4));
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }

    #[test]
    fn test_round_trip_and_bound_over_many_inputs() {
        let texts = [
            "The quick brown fox jumps over the lazy dog. It barked! Why? Nobody knows; maybe, maybe not.\nNext line.",
            "斗之力，三段！望着测验魔石碑上面闪亮得甚至有些刺眼的五个大字，少年面无表情。\n\"三段？嘿嘿，果然不出我所料！\"",
            "nopunctuationatallinthisverylongstringofcharacters",
            "\n\n\n...,,,;;;!!!???",
            "mixed 中文 and English. 再来一句。And more, with commas, everywhere",
        ];

        for text in texts {
            for max in 1..=40 {
                let chunks = chunk_text(text, &config(max));
                assert_eq!(joined(&chunks), text, "round trip failed for max={}", max);
                for chunk in &chunks {
                    assert!(!chunk.content.is_empty());
                    assert!(chunk.char_count() <= max, "chunk over bound for max={}", max);
                }
            }
        }
    }

    #[test]
    fn test_long_text_scenario() {
        // 2400 字符，每 200 字符一个句号
        let sentence = format!("{}.", "a".repeat(199));
        let text = sentence.repeat(12);
        assert_eq!(text.chars().count(), 2400);

        let chunks = chunk_text(&text, &config(1000));
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].char_count(), 1000);
        assert_eq!(chunks[1].char_count(), 1000);
        assert_eq!(chunks[2].char_count(), 400);
        assert!(chunks.iter().all(|c| c.content.ends_with('.')));
        assert_eq!(joined(&chunks), text);
    }

    #[test]
    fn test_custom_boundaries() {
        let config = ChunkConfig::new(NonZeroUsize::new(6).unwrap(), vec!['|']);
        let chunks = chunk_text("ab|cd.efgh", &config);
        assert_eq!(chunks[0].content, "ab|");
    }
}
