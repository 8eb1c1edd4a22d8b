//! 状态切片层
//!
//! 客户列表的分页/搜索/排序状态走 "意图 -> 纯归约 -> 信号" 的单向数据流：
//! 归约函数不做 IO，可在原生目标上直接测试；副作用（API 调用、成功后的
//! 重新加载）由包装 `RwSignal` 的 store 执行。

mod customer;

pub use customer::{CustomerIntent, CustomerState, CustomerStore, reduce};
