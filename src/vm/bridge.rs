//! VM桥接层：渲染层读取的行数据与展示常量
//!
//! 渲染层只通过这里的类型读取模型，不直接接触树节点。

use serde::Serialize;

use crate::model::searchable::{MatchRange, SearchableValue};
use crate::model::tree::{JsonNode, NodeKind};

// === 常量定义（消除魔法值） ===
pub const DEFAULT_SECTION_TITLE: &str = "Section";
pub const ITEM_LABEL_PREFIX: &str = "Item";
pub const KEY_SUFFIX: &str = " :";
pub const TAP_TO_VIEW_MORE: &str = "Tap to view more";
pub const NO_RESULTS_TEXT: &str = "No results";

/// 一行的值部分
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowValue {
    Leaf {
        kind: NodeKind,
        text: String,
        ranges: Vec<MatchRange>,
    },
    /// 可下钻的复合值
    Composite { kind: NodeKind, child_count: usize },
}

impl RowValue {
    pub fn from_node(node: &JsonNode) -> Self {
        match node {
            JsonNode::Leaf(value) => Self::from_leaf(value),
            composite => RowValue::Composite {
                kind: composite.kind(),
                child_count: composite.child_count(),
            },
        }
    }

    pub fn from_leaf(value: &SearchableValue) -> Self {
        RowValue::Leaf {
            kind: value.value().kind(),
            text: value.display_text().to_string(),
            ranges: value.match_ranges().to_vec(),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, RowValue::Composite { .. })
    }
}

/// 渲染层的一行：有内容的条目，或“无结果”占位
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "row", rename_all = "snake_case")]
pub enum RowData {
    NoResults,
    Item {
        key: String,
        key_ranges: Vec<MatchRange>,
        value: RowValue,
    },
}

impl RowData {
    pub fn key(&self) -> Option<&str> {
        match self {
            RowData::Item { key, .. } => Some(key),
            RowData::NoResults => None,
        }
    }

    pub fn value(&self) -> Option<&RowValue> {
        match self {
            RowData::Item { value, .. } => Some(value),
            RowData::NoResults => None,
        }
    }
}

/// 用 `open`/`close` 包裹命中片段；越界或落在字符中间的区间原样跳过
pub fn highlight(text: &str, ranges: &[MatchRange], open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len() + ranges.len() * (open.len() + close.len()));
    let mut cursor = 0;
    for range in ranges {
        if range.start < cursor {
            continue;
        }
        let (Some(before), Some(hit)) = (text.get(cursor..range.start), text.get(range.range()))
        else {
            continue;
        };
        out.push_str(before);
        out.push_str(open);
        out.push_str(hit);
        out.push_str(close);
        cursor = range.start + range.len;
    }
    out.push_str(text.get(cursor..).unwrap_or_default());
    out
}

/// 单元格显示的值文本
///
/// 叶子一律显示规范文本（null 也显示为 "null"），
/// 这样命中区间在输入过程中始终指向同一个字符串。
pub fn value_text(value: &RowValue) -> &str {
    match value {
        RowValue::Leaf { text, .. } => text.as_str(),
        RowValue::Composite { .. } => TAP_TO_VIEW_MORE,
    }
}

/// 带高亮的单元格文本；无命中时与 [`value_text`] 相同
pub fn render_value(value: &RowValue, open: &str, close: &str) -> String {
    match value {
        RowValue::Leaf { text, ranges, .. } => highlight(text, ranges, open, close),
        composite => value_text(composite).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::searchable::LeafValue;
    use serde_json::json;

    #[test]
    fn test_highlight_wraps_each_range() {
        let ranges = [MatchRange::new(4, 1), MatchRange::new(7, 1)];
        assert_eq!(highlight("Hello World", &ranges, "[", "]"), "Hell[o] W[o]rld");
        assert_eq!(highlight("Hello", &[], "[", "]"), "Hello");
    }

    #[test]
    fn test_highlight_skips_invalid_ranges() {
        let ranges = [MatchRange::new(1, 1), MatchRange::new(40, 2)];
        assert_eq!(highlight("名字", &ranges, "[", "]"), "名字");
    }

    #[test]
    fn test_value_text_placeholders() {
        let composite = RowValue::Composite {
            kind: NodeKind::Object,
            child_count: 2,
        };
        assert_eq!(value_text(&composite), TAP_TO_VIEW_MORE);
        assert_eq!(render_value(&composite, "[", "]"), TAP_TO_VIEW_MORE);
    }

    #[test]
    fn test_null_text_is_stable_while_typing() {
        let mut leaf = SearchableValue::new(LeafValue::Null);
        let idle = RowValue::from_leaf(&leaf);
        assert_eq!(value_text(&idle), "null");
        assert_eq!(render_value(&idle, "[", "]"), "null");

        assert!(leaf.is_searchable(Some("nul")));
        let typing = RowValue::from_leaf(&leaf);
        assert_eq!(value_text(&typing), "null", "高亮前后的文本应一致");
        assert_eq!(render_value(&typing, "[", "]"), "[nul]l");

        assert!(!leaf.is_searchable(Some("nulx")));
        assert_eq!(render_value(&RowValue::from_leaf(&leaf), "[", "]"), "null");
    }

    #[test]
    fn test_row_data_serializes_for_renderer() {
        let row = RowData::Item {
            key: "name".into(),
            key_ranges: vec![MatchRange::new(0, 2)],
            value: RowValue::Composite {
                kind: NodeKind::Array,
                child_count: 3,
            },
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(
            value,
            json!({
                "row": "item",
                "key": "name",
                "key_ranges": [{"start": 0, "len": 2}],
                "value": {"type": "composite", "kind": "array", "child_count": 3}
            })
        );
        assert_eq!(serde_json::to_value(RowData::NoResults).unwrap(), json!({"row": "no_results"}));
    }
}
