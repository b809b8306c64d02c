//! 有理数, 主要充当时间基 (time_base).

use std::fmt;

/// 分子/分母形式的有理数
///
/// 音频流的时间基通常取 1/采样率, 例如 44100Hz 的流用 1/44100,
/// pts 就直接以采样点为单位计数.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    /// 分子
    pub num: i32,
    /// 分母
    pub den: i32,
}

impl Rational {
    /// 由分子与分母构造, 分母不应为 0
    pub const fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    /// 未定义值 (分母为 0)
    pub const UNDEFINED: Self = Self { num: 0, den: 0 };

    /// 毫秒时间基 (1/1000)
    pub const MILLI: Self = Self { num: 1, den: 1_000 };

    /// 分母非 0 即有效
    pub const fn is_valid(&self) -> bool {
        self.den != 0
    }

    /// 转成 f64, 分母为 0 时返回 `f64::NAN`
    pub fn to_f64(self) -> f64 {
        if self.den == 0 {
            return f64::NAN;
        }
        f64::from(self.num) / f64::from(self.den)
    }

    /// 约分, 同时把符号归到分子上
    pub fn reduce(self) -> Self {
        if self.den == 0 {
            return self;
        }
        let g = gcd(self.num.unsigned_abs(), self.den.unsigned_abs());
        if g == 0 {
            return self;
        }
        let g = g as i32;
        let sign = if self.den < 0 { -1 } else { 1 };
        Self {
            num: sign * self.num / g,
            den: sign * self.den / g,
        }
    }

    /// 倒数
    pub const fn invert(self) -> Self {
        Self {
            num: self.den,
            den: self.num,
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// 欧几里得最大公约数
fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}
