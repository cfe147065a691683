//! 可搜索叶子值：标量包装与大小写不敏感的子串匹配

use std::ops::Range;

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use serde_json::Number;

use crate::model::tree::NodeKind;

/// 叶子值（标量或 null），复合值不会出现在这一层
#[derive(Debug, Clone, PartialEq)]
pub enum LeafValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl LeafValue {
    /// 规范文本：必须与渲染层显示的字符串完全一致，高亮偏移量以它为准
    pub fn display_text(&self) -> String {
        match self {
            LeafValue::Null => "null".to_string(),
            LeafValue::Bool(b) => b.to_string(),
            LeafValue::Number(n) => n.to_string(),
            LeafValue::String(s) => s.clone(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            LeafValue::Null => NodeKind::Null,
            LeafValue::Bool(_) => NodeKind::Bool,
            LeafValue::Number(_) => NodeKind::Number,
            LeafValue::String(_) => NodeKind::String,
        }
    }
}

/// 一次命中：`display_text` 中的字节偏移与长度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchRange {
    pub start: usize,
    pub len: usize,
}

impl MatchRange {
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

/// 编译后的查询
///
/// 每次按键只编译一次，然后整棵树共享同一个实例。
/// 空字符串等同于“无查询”，因此 [`SearchQuery::parse`] 对它返回 `None`。
#[derive(Debug, Clone)]
pub struct SearchQuery {
    matcher: Option<Regex>,
}

impl SearchQuery {
    pub fn parse(query: Option<&str>) -> Option<SearchQuery> {
        let text = query.filter(|q| !q.is_empty())?;
        let matcher = match RegexBuilder::new(&regex::escape(text))
            .case_insensitive(true)
            .build()
        {
            Ok(re) => Some(re),
            Err(e) => {
                // 超长查询可能超出编译上限，按无命中处理
                tracing::warn!("查询无法编译，按无匹配处理: {}", e);
                None
            }
        };
        Some(SearchQuery { matcher })
    }

    /// 从左到右查找全部不重叠的命中
    pub fn find_all(&self, haystack: &str) -> Vec<MatchRange> {
        match &self.matcher {
            Some(re) => re
                .find_iter(haystack)
                .map(|m| MatchRange::new(m.start(), m.len()))
                .collect(),
            None => Vec::new(),
        }
    }
}

/// 带搜索状态的叶子值
///
/// `match_ranges` 只反映最近一次搜索调用的结果。
#[derive(Debug, Clone)]
pub struct SearchableValue {
    value: LeafValue,
    display_text: String,
    match_ranges: Vec<MatchRange>,
    /// 作为数组元素时的 1 起始序号
    ordinal: Option<usize>,
}

impl SearchableValue {
    pub fn new(value: LeafValue) -> Self {
        let display_text = value.display_text();
        Self {
            value,
            display_text,
            match_ranges: Vec::new(),
            ordinal: None,
        }
    }

    pub fn with_ordinal(mut self, ordinal: usize) -> Self {
        self.ordinal = Some(ordinal);
        self
    }

    pub fn value(&self) -> &LeafValue {
        &self.value
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    pub fn match_ranges(&self) -> &[MatchRange] {
        &self.match_ranges
    }

    pub fn ordinal(&self) -> Option<usize> {
        self.ordinal
    }

    /// 数组元素的合成标签，例如 "Item 3"；未设置序号时为 0
    pub fn item_label(&self) -> String {
        item_label(self.ordinal)
    }

    /// 按原始查询字符串匹配，返回是否至少命中一次
    pub fn is_searchable(&mut self, query: Option<&str>) -> bool {
        let query = SearchQuery::parse(query);
        self.search(query.as_ref())
    }

    /// 使用已编译查询匹配；无论结果如何都会先清空旧的命中
    pub fn search(&mut self, query: Option<&SearchQuery>) -> bool {
        self.match_ranges.clear();
        let Some(query) = query else {
            return false;
        };
        self.match_ranges = query.find_all(&self.display_text);
        !self.match_ranges.is_empty()
    }
}

pub(crate) fn item_label(ordinal: Option<usize>) -> String {
    format!(
        "{} {}",
        crate::vm::bridge::ITEM_LABEL_PREFIX,
        ordinal.unwrap_or(0)
    )
}
