//! 音频采样格式.
//!
//! 枚举值同时刻画样本的数值类型与内存排布: 交错格式把各声道样本
//! 依次排进同一条缓冲 (LRLR...), 平面格式每个声道占一条独立缓冲.

use std::fmt;

/// 音频采样格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SampleFormat {
    /// 未指定
    None,
    /// 8 位无符号整数, 交错排布
    U8,
    /// 16 位有符号整数, 交错排布
    S16,
    /// 32 位有符号整数, 交错排布
    S32,
    /// 32 位浮点数, 交错排布
    F32,
    /// 8 位无符号整数, 平面排布
    U8p,
    /// 16 位有符号整数, 平面排布
    S16p,
    /// 32 位有符号整数, 平面排布
    S32p,
    /// 32 位浮点数, 平面排布
    F32p,
}

impl SampleFormat {
    /// 格式短名, 平面格式带 `p` 后缀
    pub const fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::U8 => "u8",
            Self::S16 => "s16",
            Self::S32 => "s32",
            Self::F32 => "flt",
            Self::U8p => "u8p",
            Self::S16p => "s16p",
            Self::S32p => "s32p",
            Self::F32p => "fltp",
        }
    }

    /// 单个样本占用的字节数
    pub const fn bytes_per_sample(&self) -> u32 {
        match self.to_interleaved() {
            Self::U8 => 1,
            Self::S16 => 2,
            Self::S32 | Self::F32 => 4,
            _ => 0,
        }
    }

    /// 平面格式每声道一条数据缓冲, 交错格式只有一条
    pub const fn is_planar(&self) -> bool {
        matches!(self, Self::U8p | Self::S16p | Self::S32p | Self::F32p)
    }

    /// 同数值类型的平面格式
    pub const fn to_planar(&self) -> Self {
        match self {
            Self::U8 => Self::U8p,
            Self::S16 => Self::S16p,
            Self::S32 => Self::S32p,
            Self::F32 => Self::F32p,
            other => *other,
        }
    }

    /// 同数值类型的交错格式
    pub const fn to_interleaved(&self) -> Self {
        match self {
            Self::U8p => Self::U8,
            Self::S16p => Self::S16,
            Self::S32p => Self::S32,
            Self::F32p => Self::F32,
            other => *other,
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
