//! 压缩数据包 (Packet).
//!
//! 解码器输入的最小单元: 容器层读出的一段压缩数据加上时间戳等
//! 元信息. 空包 (无数据) 约定为冲刷信号.

use bytes::Bytes;
use yun_core::Rational;

/// 一段压缩数据及其元信息
///
/// 对 WMA 来说一个 Packet 通常是一个超帧 (block_align 字节).
#[derive(Debug, Clone)]
pub struct Packet {
    /// 压缩数据
    pub data: Bytes,
    /// 显示时间戳 (PTS)
    pub pts: i64,
    /// 解码时间戳 (DTS)
    pub dts: i64,
    /// 数据包时长 (以 time_base 为单位)
    pub duration: i64,
    /// 时间基
    pub time_base: Rational,
    /// 所属流的索引
    pub stream_index: usize,
    /// 是否为关键帧
    pub is_keyframe: bool,
    /// 在容器中的字节偏移量 (-1 表示未知)
    pub pos: i64,
}

impl Packet {
    /// 空包, 充当冲刷信号
    pub fn empty() -> Self {
        Self {
            data: Bytes::new(),
            pts: yun_core::timestamp::NOPTS_VALUE,
            dts: yun_core::timestamp::NOPTS_VALUE,
            duration: 0,
            time_base: Rational::UNDEFINED,
            stream_index: 0,
            is_keyframe: false,
            pos: -1,
        }
    }

    /// 只带数据的包, 其余元信息取缺省值
    pub fn from_data(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            ..Self::empty()
        }
    }

    /// 数据大小 (字节)
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 不携带数据即视为冲刷包
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
