//! 数组节点：保持文档顺序的元素序列，支持混合类型过滤与序号标签

use serde_json::Value;

use crate::model::searchable::SearchQuery;
use crate::model::tree::{build_tree, JsonNode};

/// JSON 数组
///
/// 元素顺序即文档顺序，永不排序。每个元素都带有 1 起始的位置：
/// 复合元素记在 `section_label`，标量元素记在序号上。
#[derive(Debug, Clone)]
pub struct ArrayNode {
    elements: Vec<JsonNode>,
    display: Vec<usize>,
    section_label: Option<usize>,
}

impl ArrayNode {
    pub fn from_values(items: Vec<Value>, section_label: Option<usize>) -> Self {
        let elements: Vec<JsonNode> = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let position = index + 1;
                match build_tree(item, Some(position)) {
                    JsonNode::Leaf(value) => JsonNode::Leaf(value.with_ordinal(position)),
                    node => node,
                }
            })
            .collect();
        let display = (0..elements.len()).collect();
        Self {
            elements,
            display,
            section_label,
        }
    }

    pub fn elements(&self) -> &[JsonNode] {
        &self.elements
    }

    pub fn element(&self, index: usize) -> Option<&JsonNode> {
        self.elements.get(index)
    }

    pub(crate) fn element_mut(&mut self, index: usize) -> Option<&mut JsonNode> {
        self.elements.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn section_label(&self) -> Option<usize> {
        self.section_label
    }

    pub fn display(&self) -> impl Iterator<Item = &JsonNode> + '_ {
        self.display.iter().filter_map(|&i| self.elements.get(i))
    }

    pub fn display_len(&self) -> usize {
        self.display.len()
    }

    pub fn display_element(&self, row: usize) -> Option<&JsonNode> {
        self.display_index(row).and_then(|i| self.elements.get(i))
    }

    pub fn display_index(&self, row: usize) -> Option<usize> {
        self.display.get(row).copied()
    }

    pub fn filter_by_search(&mut self, query: Option<&str>) -> bool {
        let query = SearchQuery::parse(query);
        self.apply_search(query.as_ref())
    }

    /// 每次都从头重建 `display`，不与上一次查询做增量比较
    pub(crate) fn apply_search(&mut self, query: Option<&SearchQuery>) -> bool {
        self.display.clear();
        match query {
            Some(query) => {
                for (index, element) in self.elements.iter_mut().enumerate() {
                    if element.apply_search(Some(query)) {
                        self.display.push(index);
                    }
                }
            }
            None => {
                for element in &mut self.elements {
                    element.apply_search(None);
                }
                self.display.extend(0..self.elements.len());
            }
        }
        !self.display.is_empty()
    }

    /// 收集键名（忽略过滤状态）。标量元素生成 "Item n"，嵌套数组本身不生成标签
    pub fn get_all_keys(&self, include_sub_level: bool) -> Vec<String> {
        let mut keys = Vec::new();
        for element in &self.elements {
            match element {
                JsonNode::Object(object) => keys.extend(object.get_all_keys(include_sub_level)),
                JsonNode::Leaf(value) => keys.push(value.item_label()),
                JsonNode::Array(array) => keys.extend(array.get_all_keys(include_sub_level)),
            }
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::searchable::MatchRange;
    use serde_json::json;

    fn array(value: Value) -> ArrayNode {
        match value {
            Value::Array(items) => ArrayNode::from_values(items, None),
            other => panic!("不是数组: {}", other),
        }
    }

    fn display_texts(node: &ArrayNode) -> Vec<String> {
        node.display()
            .map(|e| match e {
                JsonNode::Leaf(v) => v.display_text().to_string(),
                other => format!("{:?}", other.kind()),
            })
            .collect()
    }

    #[test]
    fn test_ordinal_labels() {
        let node = array(json!(["a", "b", "c"]));
        assert_eq!(node.get_all_keys(true), vec!["Item 1", "Item 2", "Item 3"]);
    }

    #[test]
    fn test_nested_arrays_do_not_get_labels() {
        let node = array(json!([[true, false], {"k": 1}, "s"]));
        assert_eq!(node.get_all_keys(true), vec!["Item 1", "Item 2", "k", "Item 3"]);
    }

    #[test]
    fn test_mixed_kind_filtering() {
        let mut node = array(json!([
            "alpha",
            {"name": "beta"},
            ["gamma", "alphabet"],
            42,
            null
        ]));

        assert!(node.filter_by_search(Some("alpha")));
        assert_eq!(display_texts(&node), vec!["alpha", "Array"]);

        let nested = node.display_element(1).and_then(|e| e.as_array()).unwrap();
        assert_eq!(display_texts(nested), vec!["alphabet"]);
        let hit = nested.display_element(0).and_then(|e| e.as_leaf()).unwrap();
        assert_eq!(hit.match_ranges(), &[MatchRange::new(0, 5)]);

        assert!(node.filter_by_search(Some("beta")));
        assert_eq!(display_texts(&node), vec!["Object"]);

        assert!(node.filter_by_search(Some("NUL")));
        assert_eq!(display_texts(&node), vec!["null"]);
    }

    #[test]
    fn test_no_match_returns_false() {
        let mut node = array(json!([1, 2, {"a": "b"}]));
        assert!(!node.filter_by_search(Some("zzz")));
        assert_eq!(node.display_len(), 0);
        assert!(node.display_element(0).is_none());
    }

    #[test]
    fn test_reset_restores_all_elements_recursively() {
        let mut node = array(json!([{"a": "x", "b": "y"}, ["x", "y"], "y"]));
        node.filter_by_search(Some("x"));
        assert_eq!(node.display_len(), 2);

        assert!(node.filter_by_search(None));
        assert_eq!(node.display_len(), 3);
        assert!(node.filter_by_search(None), "重复重置结果应一致");
        assert_eq!(node.display_len(), 3);

        let object = node.element(0).and_then(|e| e.as_object()).unwrap();
        assert_eq!(object.display_len(), 2);
        let nested = node.element(1).and_then(|e| e.as_array()).unwrap();
        assert_eq!(nested.display_len(), 2);
        let leaf = nested.element(0).and_then(|e| e.as_leaf()).unwrap();
        assert!(leaf.match_ranges().is_empty());
    }

    #[test]
    fn test_display_keeps_document_order() {
        let mut node = array(json!(["c1", "b", "a1", "d1"]));
        node.filter_by_search(Some("1"));
        let indices: Vec<usize> = (0..node.display_len()).filter_map(|r| node.display_index(r)).collect();
        assert_eq!(indices, vec![0, 2, 3]);
    }

    #[test]
    fn test_empty_array() {
        let mut node = array(json!([]));
        assert!(!node.filter_by_search(None));
        assert!(!node.filter_by_search(Some("x")));
        assert!(node.get_all_keys(true).is_empty());
    }
}
