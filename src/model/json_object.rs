//! 对象节点：按键排序的条目序列与过滤投影

use serde_json::{Map, Value};

use crate::model::searchable::{LeafValue, SearchQuery, SearchableValue};
use crate::model::tree::{build_tree, JsonNode};

/// 对象中的一个键值对
#[derive(Debug, Clone)]
pub struct Entry {
    key: String,
    searchable_key: SearchableValue,
    value: JsonNode,
}

impl Entry {
    pub fn new(key: String, raw: Value) -> Self {
        let searchable_key = SearchableValue::new(LeafValue::String(key.clone()));
        Self {
            key,
            searchable_key,
            value: build_tree(raw, None),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn searchable_key(&self) -> &SearchableValue {
        &self.searchable_key
    }

    /// 仅当值为标量时存在
    pub fn searchable_value(&self) -> Option<&SearchableValue> {
        self.value.as_leaf()
    }

    pub fn value(&self) -> &JsonNode {
        &self.value
    }

    pub(crate) fn value_mut(&mut self) -> &mut JsonNode {
        &mut self.value
    }

    /// 键或值命中即满足。两侧都要执行，保证高亮状态与本次查询一致
    pub(crate) fn search_condition_meet(&mut self, query: Option<&SearchQuery>) -> bool {
        let key_meet = self.searchable_key.search(query);
        let value_meet = self.value.apply_search(query);
        key_meet || value_meet
    }
}

/// JSON 对象
///
/// `entries` 构建后不可变；`display` 保存当前可见条目在 `entries` 中的下标，
/// 始终是升序子序列。
#[derive(Debug, Clone)]
pub struct ObjectNode {
    entries: Vec<Entry>,
    display: Vec<usize>,
    section_label: Option<usize>,
}

impl ObjectNode {
    pub fn from_map(map: Map<String, Value>, section_label: Option<usize>) -> Self {
        let mut entries: Vec<Entry> = map.into_iter().map(|(k, v)| Entry::new(k, v)).collect();
        // 稳定排序，String 的 Ord 即字节序
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        let display = (0..entries.len()).collect();
        Self {
            entries,
            display,
            section_label,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub(crate) fn entry_mut(&mut self, index: usize) -> Option<&mut Entry> {
        self.entries.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn section_label(&self) -> Option<usize> {
        self.section_label
    }

    pub fn display(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.display.iter().filter_map(|&i| self.entries.get(i))
    }

    pub fn display_len(&self) -> usize {
        self.display.len()
    }

    /// 可见的第 `row` 个条目；越界返回 None
    pub fn display_entry(&self, row: usize) -> Option<&Entry> {
        self.display_index(row).and_then(|i| self.entries.get(i))
    }

    /// 可见行对应的 `entries` 下标
    pub fn display_index(&self, row: usize) -> Option<usize> {
        self.display.get(row).copied()
    }

    /// 按查询过滤，返回是否仍有可见条目；空查询等同于重置
    pub fn filter_by_search(&mut self, query: Option<&str>) -> bool {
        let query = SearchQuery::parse(query);
        self.apply_search(query.as_ref())
    }

    pub(crate) fn apply_search(&mut self, query: Option<&SearchQuery>) -> bool {
        match query {
            Some(query) => {
                self.display = self
                    .entries
                    .iter_mut()
                    .enumerate()
                    .filter_map(|(i, entry)| entry.search_condition_meet(Some(query)).then_some(i))
                    .collect();
            }
            None => {
                for entry in &mut self.entries {
                    entry.search_condition_meet(None);
                }
                self.display = (0..self.entries.len()).collect();
            }
        }
        !self.display.is_empty()
    }

    /// 收集键名（忽略过滤状态）。包含子层时，子节点的键排在本层键之前
    pub fn get_all_keys(&self, include_sub_level: bool) -> Vec<String> {
        let mut keys = Vec::new();
        if include_sub_level {
            for entry in &self.entries {
                match &entry.value {
                    JsonNode::Object(object) => keys.extend(object.get_all_keys(include_sub_level)),
                    JsonNode::Array(array) => keys.extend(array.get_all_keys(include_sub_level)),
                    JsonNode::Leaf(_) => {}
                }
            }
        }
        keys.extend(self.entries.iter().map(|e| e.key.clone()));
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::searchable::MatchRange;
    use serde_json::json;

    fn object(value: Value) -> ObjectNode {
        match value {
            Value::Object(map) => ObjectNode::from_map(map, None),
            other => panic!("不是对象: {}", other),
        }
    }

    fn display_keys(node: &ObjectNode) -> Vec<&str> {
        node.display().map(|e| e.key()).collect()
    }

    #[test]
    fn test_recursive_filter_propagation() {
        let mut node = object(json!({"x": {"y": "foo"}, "z": "bar"}));
        assert!(node.filter_by_search(Some("foo")));
        assert_eq!(display_keys(&node), vec!["x"]);

        let child = node.display_entry(0).and_then(|e| e.value().as_object()).unwrap();
        assert_eq!(display_keys(child), vec!["y"]);
        let value = child.display_entry(0).and_then(|e| e.searchable_value()).unwrap();
        assert_eq!(value.match_ranges(), &[MatchRange::new(0, 3)]);
    }

    #[test]
    fn test_no_match_returns_false_and_empties_display() {
        let mut node = object(json!({"x": {"y": "foo"}, "z": "bar"}));
        assert!(!node.filter_by_search(Some("zzz")));
        assert_eq!(node.display_len(), 0);
        assert!(node.display_entry(0).is_none());
    }

    #[test]
    fn test_key_match_keeps_entry() {
        let mut node = object(json!({"Name": 1, "age": 2}));
        assert!(node.filter_by_search(Some("name")));
        assert_eq!(display_keys(&node), vec!["Name"]);
        let entry = node.display_entry(0).unwrap();
        assert_eq!(entry.searchable_key().match_ranges(), &[MatchRange::new(0, 4)]);
        assert!(entry.searchable_value().unwrap().match_ranges().is_empty());
    }

    #[test]
    fn test_reset_is_idempotent_and_restores_order() {
        let mut node = object(json!({"b": "x", "a": "y", "c": "x"}));
        node.filter_by_search(Some("x"));
        assert_eq!(display_keys(&node), vec!["b", "c"]);

        assert!(node.filter_by_search(None));
        assert_eq!(display_keys(&node), vec!["a", "b", "c"]);
        assert!(node.filter_by_search(None));
        assert_eq!(display_keys(&node), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_query_resets_rather_than_matching_everything() {
        let mut node = object(json!({"a": "hit", "b": "miss"}));
        node.filter_by_search(Some("hit"));
        assert!(node.filter_by_search(Some("")));
        assert_eq!(node.display_len(), 2);
        for entry in node.entries() {
            assert!(entry.searchable_value().unwrap().match_ranges().is_empty());
        }
    }

    #[test]
    fn test_reset_clears_nested_state() {
        let mut node = object(json!({"outer": {"inner": "foo", "other": "bar"}}));
        node.filter_by_search(Some("foo"));
        let child = node.entry(0).and_then(|e| e.value().as_object()).unwrap();
        assert_eq!(child.display_len(), 1);

        node.filter_by_search(None);
        let child = node.entry(0).and_then(|e| e.value().as_object()).unwrap();
        assert_eq!(child.display_len(), 2, "重置应恢复子节点的完整显示");
        assert!(child.entries().iter().all(|e| e.searchable_key().match_ranges().is_empty()));
    }

    #[test]
    fn test_excluded_entries_do_not_keep_stale_ranges() {
        let mut node = object(json!({"a": "apple", "b": "banana"}));
        node.filter_by_search(Some("an"));
        assert_eq!(display_keys(&node), vec!["b"]);
        node.filter_by_search(Some("ppl"));
        assert_eq!(display_keys(&node), vec!["a"]);
        let banana = node.entry(1).and_then(|e| e.searchable_value()).unwrap();
        assert!(banana.match_ranges().is_empty());
    }

    #[test]
    fn test_display_is_ordered_subsequence() {
        let mut node = object(json!({"d": "q", "a": "q", "c": "-", "b": "q"}));
        node.filter_by_search(Some("q"));
        let indices: Vec<usize> = (0..node.display_len()).filter_map(|r| node.display_index(r)).collect();
        assert_eq!(indices, vec![0, 1, 3]);
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_get_all_keys_children_first() {
        let node = object(json!({
            "b": {"inner": 1},
            "a": ["x", "y"],
            "c": 3
        }));
        assert_eq!(
            node.get_all_keys(true),
            vec!["Item 1", "Item 2", "inner", "a", "b", "c"]
        );
        assert_eq!(node.get_all_keys(false), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_get_all_keys_ignores_filter() {
        let mut node = object(json!({"a": 1, "b": 2}));
        node.filter_by_search(Some("zzz"));
        assert_eq!(node.get_all_keys(false), vec!["a", "b"]);
    }
}
