//! JSON 浏览核心库
//!
//! 把解析后的 JSON 文档构建为可下钻、可搜索的树，并在每次查询变化时
//! 重新计算过滤后的显示投影，供表格类界面渲染。

pub mod model;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use model::data_core::{AppState, AppError};
pub use model::json_array::ArrayNode;
pub use model::json_object::{Entry, ObjectNode};
pub use model::searchable::{LeafValue, MatchRange, SearchQuery, SearchableValue};
pub use model::tree::{build_tree, JsonNode, NodeKind, PathStep};
pub use vm::bridge::{RowData, RowValue};
pub use vm::screen::{Screen, ScreenView};
