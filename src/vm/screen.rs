//! 屏幕：导航栈中的一层，以及渲染层读取的分区/行投影

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::json_array::ArrayNode;
use crate::model::searchable::{item_label, MatchRange};
use crate::model::tree::{JsonNode, PathStep};
use crate::vm::bridge::{RowData, RowValue, DEFAULT_SECTION_TITLE, KEY_SUFFIX};

/// 导航栈中的一层
///
/// `path` 是从文档根出发的非拥有句柄，子屏幕与父屏幕共享同一棵树，
/// 在子屏幕上做的过滤在返回父屏幕后仍然可见。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    pub path: Vec<PathStep>,
    pub title: Option<String>,
    pub search_text: Option<String>,
}

impl Screen {
    pub fn root() -> Self {
        Self::default()
    }
}

/// 一次下钻的目标，`steps` 相对于当前屏幕的节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrillTarget {
    pub steps: Vec<PathStep>,
    pub title: String,
}

/// 序列化用的整屏快照
#[derive(Debug, Clone, Serialize)]
pub struct ScreenSnapshot {
    pub title: Option<String>,
    pub sections: Vec<SectionSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionSnapshot {
    pub title: Option<String>,
    pub rows: Vec<RowData>,
}

struct RowSource<'a> {
    key: String,
    key_ranges: &'a [MatchRange],
    value: &'a JsonNode,
    steps: Vec<PathStep>,
}

/// 单个屏幕节点的只读投影，所有下标访问都做越界检查
pub struct ScreenView<'a> {
    node: &'a JsonNode,
    title: Option<&'a str>,
}

impl<'a> ScreenView<'a> {
    pub fn new(node: &'a JsonNode, title: Option<&'a str>) -> Self {
        Self { node, title }
    }

    /// 数组首个可见元素为复合值时，每个可见元素单独成为一个分区
    fn sectioned_array(&self) -> Option<&'a ArrayNode> {
        let array = self.node.as_array()?;
        array
            .display_element(0)
            .filter(|first| first.is_composite())
            .map(|_| array)
    }

    pub fn section_count(&self) -> usize {
        self.sectioned_array().map_or(1, ArrayNode::display_len)
    }

    /// 空分区也报告 1 行，供渲染层显示“无结果”占位
    pub fn row_count(&self, section: usize) -> usize {
        let count = self
            .section_container(section)
            .map_or(0, |(node, _)| visible_rows(node));
        count.max(1)
    }

    fn section_container(&self, section: usize) -> Option<(&'a JsonNode, Vec<PathStep>)> {
        match self.sectioned_array() {
            Some(array) => {
                let index = array.display_index(section)?;
                Some((array.element(index)?, vec![PathStep::Element(index)]))
            }
            None if section == 0 => Some((self.node, Vec::new())),
            None => None,
        }
    }

    fn row_source(&self, section: usize, row: usize) -> Option<RowSource<'a>> {
        let (container, mut steps) = self.section_container(section)?;
        match container {
            JsonNode::Object(object) => {
                let index = object.display_index(row)?;
                let entry = object.entry(index)?;
                steps.push(PathStep::Entry(index));
                Some(RowSource {
                    key: entry.key().to_string(),
                    key_ranges: entry.searchable_key().match_ranges(),
                    value: entry.value(),
                    steps,
                })
            }
            JsonNode::Array(array) => {
                let index = array.display_index(row)?;
                let element = array.element(index)?;
                steps.push(PathStep::Element(index));
                Some(RowSource {
                    key: item_label(element.section_label()),
                    key_ranges: &[],
                    value: element,
                    steps,
                })
            }
            JsonNode::Leaf(value) if row == 0 => Some(RowSource {
                key: value.item_label(),
                key_ranges: &[],
                value: container,
                steps,
            }),
            JsonNode::Leaf(_) => None,
        }
    }

    pub fn row(&self, section: usize, row: usize) -> RowData {
        match self.row_source(section, row) {
            Some(source) => RowData::Item {
                key: source.key,
                key_ranges: source.key_ranges.to_vec(),
                value: RowValue::from_node(source.value),
            },
            None => RowData::NoResults,
        }
    }

    pub fn rows(&self, section: usize) -> Vec<RowData> {
        (0..self.row_count(section))
            .map(|row| self.row(section, row))
            .collect()
    }

    /// 只有数组屏幕有分区标题：复合元素为 "标题 n"，标量元素为标题本身
    pub fn section_title(&self, section: usize) -> Option<String> {
        let array = self.node.as_array()?;
        let element = array.display_element(section)?;
        let title = self.title.unwrap_or(DEFAULT_SECTION_TITLE);
        Some(match element {
            JsonNode::Leaf(_) => title.to_string(),
            composite => format!("{} {}", title, composite.section_label().unwrap_or(0)),
        })
    }

    /// 复合值所在行可下钻；标量行与占位行返回 None
    pub fn drill_target(&self, section: usize, row: usize) -> Option<DrillTarget> {
        let source = self.row_source(section, row)?;
        source.value.is_composite().then(|| DrillTarget {
            steps: source.steps,
            title: source.key,
        })
    }

    /// 当前层去重后的键名，用于计算键列宽度
    pub fn key_labels(&self) -> BTreeSet<String> {
        self.node.get_all_keys(false).into_iter().collect()
    }

    /// 最宽的 "key :" 字符数
    pub fn key_column_width(&self) -> usize {
        let suffix = KEY_SUFFIX.chars().count();
        self.key_labels()
            .iter()
            .map(|key| key.chars().count() + suffix)
            .max()
            .unwrap_or(0)
    }

    pub fn snapshot(&self) -> ScreenSnapshot {
        ScreenSnapshot {
            title: self.title.map(str::to_string),
            sections: (0..self.section_count())
                .map(|section| SectionSnapshot {
                    title: self.section_title(section),
                    rows: self.rows(section),
                })
                .collect(),
        }
    }
}

fn visible_rows(node: &JsonNode) -> usize {
    match node {
        JsonNode::Object(object) => object.display_len(),
        JsonNode::Array(array) => array.display_len(),
        JsonNode::Leaf(_) => 1,
    }
}
