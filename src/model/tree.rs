//! JSON 树：由 serde_json::Value 一次性构建的可搜索树（对象/数组/叶子）

use serde::Serialize;
use serde_json::Value;

use crate::model::json_array::ArrayNode;
use crate::model::json_object::ObjectNode;
use crate::model::searchable::{LeafValue, SearchQuery, SearchableValue};

/// JSON 节点类型（与 UI 展示解耦）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

/// 树中的一个节点
#[derive(Debug, Clone)]
pub enum JsonNode {
    Object(ObjectNode),
    Array(ArrayNode),
    Leaf(SearchableValue),
}

/// 从父节点到子节点的一步，索引指向未过滤的 `entries`/`elements`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep {
    Entry(usize),
    Element(usize),
}

/// 把原始 JSON 值递归构建为树
///
/// 对象条目按键排序，数组保持文档顺序。`section_label` 只对复合节点生效；
/// 叶子的序号由 [`ArrayNode`] 在构建元素时赋予。
pub fn build_tree(raw: Value, section_label: Option<usize>) -> JsonNode {
    match raw {
        Value::Object(map) => JsonNode::Object(ObjectNode::from_map(map, section_label)),
        Value::Array(items) => JsonNode::Array(ArrayNode::from_values(items, section_label)),
        Value::String(s) => leaf(LeafValue::String(s)),
        Value::Number(n) => leaf(LeafValue::Number(n)),
        Value::Bool(b) => leaf(LeafValue::Bool(b)),
        Value::Null => leaf(LeafValue::Null),
    }
}

fn leaf(value: LeafValue) -> JsonNode {
    JsonNode::Leaf(SearchableValue::new(value))
}

impl JsonNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            JsonNode::Object(_) => NodeKind::Object,
            JsonNode::Array(_) => NodeKind::Array,
            JsonNode::Leaf(v) => v.value().kind(),
        }
    }

    pub fn is_composite(&self) -> bool {
        !matches!(self, JsonNode::Leaf(_))
    }

    /// 在父数组中的 1 起始位置
    pub fn section_label(&self) -> Option<usize> {
        match self {
            JsonNode::Object(o) => o.section_label(),
            JsonNode::Array(a) => a.section_label(),
            JsonNode::Leaf(v) => v.ordinal(),
        }
    }

    /// 子元素数量（对象字段数 / 数组长度），叶子为 0
    pub fn child_count(&self) -> usize {
        match self {
            JsonNode::Object(o) => o.len(),
            JsonNode::Array(a) => a.len(),
            JsonNode::Leaf(_) => 0,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            JsonNode::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayNode> {
        match self {
            JsonNode::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&SearchableValue> {
        match self {
            JsonNode::Leaf(v) => Some(v),
            _ => None,
        }
    }

    /// 复合节点返回过滤后是否仍有可见子项；叶子返回是否命中
    pub fn filter_by_search(&mut self, query: Option<&str>) -> bool {
        let query = SearchQuery::parse(query);
        self.apply_search(query.as_ref())
    }

    pub(crate) fn apply_search(&mut self, query: Option<&SearchQuery>) -> bool {
        match self {
            JsonNode::Object(o) => o.apply_search(query),
            JsonNode::Array(a) => a.apply_search(query),
            JsonNode::Leaf(v) => v.search(query),
        }
    }

    /// 叶子没有键，返回空
    pub fn get_all_keys(&self, include_sub_level: bool) -> Vec<String> {
        match self {
            JsonNode::Object(o) => o.get_all_keys(include_sub_level),
            JsonNode::Array(a) => a.get_all_keys(include_sub_level),
            JsonNode::Leaf(_) => Vec::new(),
        }
    }

    pub fn child(&self, step: PathStep) -> Option<&JsonNode> {
        match (self, step) {
            (JsonNode::Object(o), PathStep::Entry(i)) => o.entry(i).map(|e| e.value()),
            (JsonNode::Array(a), PathStep::Element(i)) => a.element(i),
            _ => None,
        }
    }

    pub fn child_mut(&mut self, step: PathStep) -> Option<&mut JsonNode> {
        match (self, step) {
            (JsonNode::Object(o), PathStep::Entry(i)) => o.entry_mut(i).map(|e| e.value_mut()),
            (JsonNode::Array(a), PathStep::Element(i)) => a.element_mut(i),
            _ => None,
        }
    }

    pub fn resolve(&self, path: &[PathStep]) -> Option<&JsonNode> {
        let mut node = self;
        for step in path {
            node = node.child(*step)?;
        }
        Some(node)
    }

    pub fn resolve_mut(&mut self, path: &[PathStep]) -> Option<&mut JsonNode> {
        let mut node = self;
        for step in path {
            node = node.child_mut(*step)?;
        }
        Some(node)
    }
}

/// 生成 RFC 9535 JSONPath（用于面包屑显示）
pub fn json_path(root: &JsonNode, path: &[PathStep]) -> Option<String> {
    let mut out = String::from("$");
    let mut node = root;
    for step in path {
        match (node, *step) {
            (JsonNode::Object(o), PathStep::Entry(i)) => {
                let key = o.entry(i)?.key();
                // JSONPath 字段含特殊字符时使用 bracket-notation
                if !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    out.push('.');
                    out.push_str(key);
                } else {
                    let escaped = key.replace('\\', "\\\\").replace('\'', "\\'");
                    out.push_str(&format!("['{}']", escaped));
                }
            }
            (JsonNode::Array(_), PathStep::Element(i)) => out.push_str(&format!("[{}]", i)),
            _ => return None,
        }
        node = node.child(*step)?;
    }
    Some(out)
}
