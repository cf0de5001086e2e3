//! 全局字符串驻留器 (String Interner)
//!
//! 将骨骼路径字符串转换为整数 Symbol。仅在构建期使用：
//! 片段导入与绑定阶段通过 Symbol 查找骨骼槽位，运行期热路径只使用稠密索引。

use std::sync::LazyLock;

use lasso::{Spur, ThreadedRodeo};

/// 全局字符串驻留器实例
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::new);

/// Symbol 类型别名
///
/// Symbol 是一个紧凑的整数标识符，可以高效地进行比较和哈希操作。
pub type Symbol = Spur;

/// 驻留一个字符串，返回其 Symbol
///
/// 如果字符串已存在于驻留池中，返回已有的 Symbol。
#[inline]
pub fn intern(s: &str) -> Symbol {
    INTERNER.get_or_intern(s)
}

/// 尝试获取已存在字符串的 Symbol
///
/// 如果字符串不存在于驻留池中，返回 None。
/// 这个方法不会分配新内存。
#[inline]
pub fn get(s: &str) -> Option<Symbol> {
    INTERNER.get(s)
}

/// 将 Symbol 解析回字符串
#[inline]
pub fn resolve(sym: Symbol) -> &'static str {
    INTERNER.resolve(&sym)
}
