//! 性能基准测试模块
//!
//! 用于测量解析、树构建与逐键过滤的耗时。过滤在每次按键时同步执行，
//! 大文档需要调用方自行做防抖。

use std::time::Instant;

use serde_json::{json, Map, Value};

use crate::model::tree::build_tree;
use crate::utils::fs::parse_json_str;

/// 基准套件的文档规模：(嵌套深度, 每层宽度)
pub const SUITE_CASES: [(usize, usize); 3] = [(3, 10), (4, 20), (5, 30)];

/// 套件对每个规模模拟输入的查询
pub const SUITE_QUERY: &str = "item_1";

/// 性能测试结果
#[derive(Debug)]
pub struct PerformanceResult {
    pub operation: String,
    pub duration_ms: u128,
    pub success: bool,
    pub details: String,
}

impl PerformanceResult {
    pub fn new(operation: &str, duration_ms: u128, success: bool, details: &str) -> Self {
        Self {
            operation: operation.to_string(),
            duration_ms,
            success,
            details: details.to_string(),
        }
    }
}

/// 叶子按下标轮换类型，覆盖字符串、数字、布尔、null 与标量数组
fn synthetic_value(index: usize) -> Value {
    match index % 5 {
        0 => json!(format!("text {}", index)),
        1 => json!(index),
        2 => json!(index % 2 == 0),
        3 => json!(["tag", index, null]),
        _ => Value::Null,
    }
}

/// 每层 `width` 个字段，每隔五个字段嵌套一个宽度减半的子对象
fn synthetic_branch(depth: usize, width: usize) -> Value {
    let mut fields = Map::new();
    for index in 0..width {
        let value = if depth > 0 && index % 5 == 4 {
            synthetic_branch(depth - 1, width / 2)
        } else {
            synthetic_value(index)
        };
        // 大小写混排的键，用于覆盖按字节排序
        let key = if index % 3 == 0 {
            format!("Field_{}", index)
        } else {
            format!("field_{}", index)
        };
        fields.insert(key, value);
    }
    Value::Object(fields)
}

/// 生成合成文档：`tree` 为嵌套对象，`records` 为 `width * 10` 个对象组成的数组
pub fn generate_large_json(depth: usize, width: usize) -> Value {
    let records: Vec<Value> = (0..width * 10)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("item_{}", i),
                "score": i * 2,
                "flags": [i % 3 == 0, null],
            })
        })
        .collect();

    json!({
        "meta": {"depth": depth, "width": width},
        "tree": synthetic_branch(depth, width),
        "records": records,
    })
}

/// 测量把文本解析为 `serde_json::Value` 的耗时
pub fn benchmark_parse(text: &str) -> PerformanceResult {
    let start = Instant::now();
    let parsed = parse_json_str(text);
    let elapsed = start.elapsed().as_millis();

    match parsed {
        Ok(_) => PerformanceResult::new("解析", elapsed, true, &format!("{} 字节", text.len())),
        Err(e) => PerformanceResult::new("解析", elapsed, false, &e.to_string()),
    }
}

/// 测试树构建性能
pub fn benchmark_tree_build(json_data: &Value) -> PerformanceResult {
    let start = Instant::now();
    let tree = build_tree(json_data.clone(), None);
    let duration = start.elapsed();

    PerformanceResult::new(
        "树构建",
        duration.as_millis(),
        tree.is_composite(),
        &format!("根节点 {} 个子项", tree.child_count()),
    )
}

/// 模拟逐键输入：依次以 query 的每个前缀过滤，最后重置
pub fn benchmark_filter(json_data: &Value, query: &str) -> Vec<PerformanceResult> {
    let mut tree = build_tree(json_data.clone(), None);
    let mut results = Vec::new();

    let prefixes = query.char_indices().map(|(i, c)| &query[..i + c.len_utf8()]);
    for prefix in prefixes {
        let start = Instant::now();
        let visible = tree.filter_by_search(Some(prefix));
        let elapsed = start.elapsed().as_millis();
        tracing::debug!("过滤 {:?} 用时 {}ms", prefix, elapsed);
        results.push(PerformanceResult::new(
            &format!("过滤: {}", prefix),
            elapsed,
            true,
            &format!("有可见项: {}", visible),
        ));
    }

    let start = Instant::now();
    let visible = tree.filter_by_search(None);
    results.push(PerformanceResult::new(
        "重置过滤",
        start.elapsed().as_millis(),
        visible,
        "恢复完整显示",
    ));

    results
}

/// 对单一规模依次执行解析、构建与逐键过滤
pub fn run_case(depth: usize, width: usize, query: &str) -> Vec<PerformanceResult> {
    let document = generate_large_json(depth, width);
    let mut results = Vec::new();
    match serde_json::to_string(&document) {
        Ok(text) => results.push(benchmark_parse(&text)),
        Err(e) => results.push(PerformanceResult::new("序列化", 0, false, &e.to_string())),
    }
    results.push(benchmark_tree_build(&document));
    results.extend(benchmark_filter(&document, query));
    results
}

/// 运行综合性能测试
pub fn run_performance_suite() -> Vec<PerformanceResult> {
    SUITE_CASES
        .iter()
        .flat_map(|&(depth, width)| {
            tracing::info!("测试规模：深度{}，宽度{}", depth, width);
            run_case(depth, width, SUITE_QUERY)
        })
        .collect()
}
