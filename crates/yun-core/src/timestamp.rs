//! 媒体时间戳.
//!
//! pts 为 time_base 单位下的整数计数, 换算时间须结合时间基.

use crate::rational::Rational;
use std::fmt;

/// "未定义" 时间戳的哨兵值
pub const NOPTS_VALUE: i64 = i64::MIN;

/// 带时间基的时间戳
///
/// 实际时间 (秒) = pts * time_base.num / time_base.den.
/// 音频解码器通常以 1/sample_rate 为时间基, pts 即采样点序号.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    /// 时间戳值, `NOPTS_VALUE` 表示未定义
    pub pts: i64,
    /// 时间基
    pub time_base: Rational,
}

impl Timestamp {
    pub const fn new(pts: i64, time_base: Rational) -> Self {
        Self { pts, time_base }
    }

    /// 未定义时间戳
    pub const fn none() -> Self {
        Self {
            pts: NOPTS_VALUE,
            time_base: Rational::UNDEFINED,
        }
    }

    /// pts 与时间基都有定义才算有效
    pub const fn is_valid(&self) -> bool {
        self.pts != NOPTS_VALUE && self.time_base.is_valid()
    }

    /// 换算成秒, 无效时间戳返回 `f64::NAN`
    pub fn to_seconds(&self) -> f64 {
        if !self.is_valid() {
            return f64::NAN;
        }
        self.pts as f64 * self.time_base.to_f64()
    }

    /// 重缩放到新时间基
    ///
    /// 全程整数交叉相乘, 不经过浮点:
    /// new_pts = pts * old_tb.num * new_tb.den / (old_tb.den * new_tb.num)
    pub fn rescale(&self, new_time_base: Rational) -> Self {
        if !self.is_valid() || !new_time_base.is_valid() {
            return Self::none();
        }
        let num = self.pts as i128 * i128::from(self.time_base.num) * i128::from(new_time_base.den);
        let den = i128::from(self.time_base.den) * i128::from(new_time_base.num);
        if den == 0 {
            return Self::none();
        }
        Self {
            pts: (num / den) as i64,
            time_base: new_time_base,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            write!(f, "NOPTS")
        } else {
            write!(f, "{:.6}s", self.to_seconds())
        }
    }
}
