//! AppState：文档加载、导航栈与搜索分发

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde_json::Value;
use thiserror::Error;

use crate::model::tree::{build_tree, json_path, JsonNode, NodeKind};
use crate::utils::fs::{parse_json_str, read_json_file};
use crate::vm::screen::{Screen, ScreenView};

#[derive(Debug, Default)]
pub struct AppState {
    pub source_path: Option<PathBuf>,
    root: Option<JsonNode>,
    /// 导航栈，栈底始终是根屏幕
    screens: Vec<Screen>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON解析失败: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("根节点必须是对象或数组，实际为 {0:?}")]
    UnsupportedRoot(NodeKind),
    #[error("导航错误: {0}")]
    Navigation(String),
    #[error("状态错误: {0}")]
    State(String),
}

impl AppState {
    /// 加载JSON文件并构建树
    pub fn load_file(&mut self, p: &Path) -> Result<(), AppError> {
        let dom = read_json_file(p)?;
        self.load_value(dom)?;
        self.source_path = Some(p.to_path_buf());
        Ok(())
    }

    /// 从文本加载；解析失败时不构建任何树，原文档保持不变
    pub fn load_str(&mut self, text: &str) -> Result<(), AppError> {
        let dom = parse_json_str(text)?;
        self.load_value(dom)?;
        self.source_path = None;
        Ok(())
    }

    pub fn load_value(&mut self, dom: Value) -> Result<(), AppError> {
        let start = Instant::now();
        let root = build_tree(dom, None);
        if !root.is_composite() {
            return Err(AppError::UnsupportedRoot(root.kind()));
        }
        tracing::info!(
            "文档树构建完成: {:?}，{} 个子项，耗时: {:.1}ms",
            root.kind(),
            root.child_count(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        self.root = Some(root);
        self.screens = vec![Screen::root()];
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.root.is_some()
    }

    pub fn root(&self) -> Option<&JsonNode> {
        self.root.as_ref()
    }

    /// 导航栈深度（根屏幕为 1，未加载为 0）
    pub fn depth(&self) -> usize {
        self.screens.len()
    }

    pub fn current_screen(&self) -> Option<&Screen> {
        self.screens.last()
    }

    pub fn current_node(&self) -> Result<&JsonNode, AppError> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| AppError::State("文档尚未加载".into()))?;
        let screen = self
            .screens
            .last()
            .ok_or_else(|| AppError::State("导航栈为空".into()))?;
        root.resolve(&screen.path)
            .ok_or_else(|| AppError::Navigation(format!("路径无法解析: {:?}", screen.path)))
    }

    /// 当前屏幕的渲染投影
    pub fn view(&self) -> Result<ScreenView<'_>, AppError> {
        let node = self.current_node()?;
        let title = self.current_screen().and_then(|s| s.title.as_deref());
        Ok(ScreenView::new(node, title))
    }

    /// 当前屏幕的 JSONPath 面包屑
    pub fn breadcrumb(&self) -> Result<String, AppError> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| AppError::State("文档尚未加载".into()))?;
        let path = self.current_screen().map(|s| s.path.as_slice()).unwrap_or_default();
        json_path(root, path)
            .ok_or_else(|| AppError::Navigation(format!("路径无法解析: {:?}", path)))
    }

    /// 对当前屏幕的节点应用搜索，返回是否仍有可见项
    pub fn search(&mut self, query: Option<&str>) -> Result<bool, AppError> {
        let root = self
            .root
            .as_mut()
            .ok_or_else(|| AppError::State("文档尚未加载".into()))?;
        let screen = self
            .screens
            .last_mut()
            .ok_or_else(|| AppError::State("导航栈为空".into()))?;
        screen.search_text = query.filter(|q| !q.is_empty()).map(str::to_string);

        let node = root
            .resolve_mut(&screen.path)
            .ok_or_else(|| AppError::Navigation(format!("路径无法解析: {:?}", screen.path)))?;
        let start = Instant::now();
        let visible = node.filter_by_search(query);
        tracing::debug!(
            "搜索过滤应用: {:?}，可见: {}，耗时: {:.1}ms",
            screen.search_text,
            visible,
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(visible)
    }

    /// 选中一行：值为复合节点时压入新屏幕并沿用当前搜索词，返回是否发生下钻
    pub fn select(&mut self, section: usize, row: usize) -> Result<bool, AppError> {
        let Some(target) = self.view()?.drill_target(section, row) else {
            tracing::debug!("选中行不可下钻: section={}, row={}", section, row);
            return Ok(false);
        };
        let current = self
            .screens
            .last()
            .ok_or_else(|| AppError::State("导航栈为空".into()))?;
        let mut path = current.path.clone();
        path.extend(target.steps);
        let search_text = current.search_text.clone();

        tracing::info!("下钻到: {}", target.title);
        self.screens.push(Screen {
            path,
            title: Some(target.title),
            search_text: search_text.clone(),
        });
        self.search(search_text.as_deref())?;
        Ok(true)
    }

    /// 返回上一屏；父屏幕不会重新过滤，子屏幕造成的状态变化保留可见
    pub fn back(&mut self) -> bool {
        if self.screens.len() <= 1 {
            tracing::warn!("已位于根屏幕，忽略返回操作");
            return false;
        }
        self.screens.pop();
        true
    }
}
