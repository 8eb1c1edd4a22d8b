//! 时间类型模块
//!
//! `Timestamp` 是可序列化的毫秒时间戳，用于令牌过期时间的传输和持久化。
//! 前端通过注入的时钟获取当前时间，本类型只负责承载与比较。

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// 毫秒时间戳
///
/// 内部存储为 `i64`，表示自 Unix 纪元以来的毫秒数
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// 创建新的时间戳
    #[inline]
    pub const fn new(ms: i64) -> Self {
        Self(ms)
    }

    /// 获取毫秒值
    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// 获取秒值
    #[inline]
    pub const fn as_secs(&self) -> i64 {
        self.0 / 1000
    }

    /// 由秒值构造（JWT 的 `exp` 字段以秒计）
    #[inline]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs * 1000)
    }

    /// 判断是否已过期（不晚于给定的"现在"；恰好等于也算过期）
    #[inline]
    pub const fn is_past(&self, now: Timestamp) -> bool {
        self.0 <= now.0
    }

    /// 解析持久化的字符串形式
    pub fn parse(s: &str) -> Option<Self> {
        s.trim().parse::<i64>().ok().map(Self)
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Self(ms)
    }
}

impl From<Timestamp> for i64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl Add<i64> for Timestamp {
    type Output = Timestamp;

    fn add(self, millis: i64) -> Timestamp {
        Timestamp(self.0 + millis)
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = i64;

    fn sub(self, other: Timestamp) -> i64 {
        self.0 - other.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_and_expiry() {
        let now = Timestamp::new(10_000);
        assert!(Timestamp::new(9_999).is_past(now));
        assert!(Timestamp::new(10_000).is_past(now));
        assert!(!Timestamp::new(10_001).is_past(now));
    }

    #[test]
    fn parse_roundtrip() {
        let ts = Timestamp::new(1_700_000_000_000);
        assert_eq!(Timestamp::parse(&ts.to_string()), Some(ts));
        assert_eq!(Timestamp::parse("garbage"), None);
        assert_eq!(Timestamp::parse(" 42 "), Some(Timestamp::new(42)));
    }

    #[test]
    fn secs_conversion() {
        assert_eq!(Timestamp::from_secs(1).as_millis(), 1000);
        assert_eq!(Timestamp::new(2500).as_secs(), 2);
    }
}
