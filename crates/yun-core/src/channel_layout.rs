//! 音频声道布局.
//!
//! 布局由声道数加扬声器位掩码描述, 常用布局提供具名常量.

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// 扬声器位置掩码
    ///
    /// 位序与 WAVEFORMATEXTENSIBLE 的 dwChannelMask 一致.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChannelMask: u64 {
        /// 前左
        const FRONT_LEFT            = 1 << 0;
        /// 前右
        const FRONT_RIGHT           = 1 << 1;
        /// 前中
        const FRONT_CENTER          = 1 << 2;
        /// 低频效果 (LFE)
        const LOW_FREQUENCY         = 1 << 3;
        /// 后左
        const BACK_LEFT             = 1 << 4;
        /// 后右
        const BACK_RIGHT            = 1 << 5;
        /// 前中偏左
        const FRONT_LEFT_OF_CENTER  = 1 << 6;
        /// 前中偏右
        const FRONT_RIGHT_OF_CENTER = 1 << 7;
        /// 后中
        const BACK_CENTER           = 1 << 8;
        /// 侧左
        const SIDE_LEFT             = 1 << 9;
        /// 侧右
        const SIDE_RIGHT            = 1 << 10;
    }
}

/// 音频流的声道布局
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelLayout {
    /// 声道数
    pub channels: u32,
    /// 扬声器位掩码, 非标准布局可为空
    pub mask: ChannelMask,
}

impl ChannelLayout {
    /// 单声道
    pub const MONO: Self = Self {
        channels: 1,
        mask: ChannelMask::FRONT_CENTER,
    };

    /// 立体声
    pub const STEREO: Self = Self {
        channels: 2,
        mask: ChannelMask::FRONT_LEFT.union(ChannelMask::FRONT_RIGHT),
    };

    /// 5.1 环绕声
    pub const SURROUND_5_1: Self = Self {
        channels: 6,
        mask: ChannelMask::FRONT_LEFT
            .union(ChannelMask::FRONT_RIGHT)
            .union(ChannelMask::FRONT_CENTER)
            .union(ChannelMask::LOW_FREQUENCY)
            .union(ChannelMask::BACK_LEFT)
            .union(ChannelMask::BACK_RIGHT),
    };

    /// 按声道数取默认布局, 没有约定俗成布局的声道数掩码为空
    pub fn from_channels(channels: u32) -> Self {
        match channels {
            1 => Self::MONO,
            2 => Self::STEREO,
            6 => Self::SURROUND_5_1,
            n => Self {
                channels: n,
                mask: ChannelMask::empty(),
            },
        }
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::MONO => "mono",
            Self::STEREO => "stereo",
            Self::SURROUND_5_1 => "5.1",
            _ => return write!(f, "{}ch", self.channels),
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_channels_标准布局() {
        assert_eq!(ChannelLayout::from_channels(1), ChannelLayout::MONO);
        assert_eq!(ChannelLayout::from_channels(2), ChannelLayout::STEREO);
        assert_eq!(ChannelLayout::from_channels(6), ChannelLayout::SURROUND_5_1);
        let odd = ChannelLayout::from_channels(3);
        assert_eq!(odd.channels, 3);
        assert!(odd.mask.is_empty());
    }

    #[test]
    fn test_mask_bits_match_channel_count() {
        for layout in [
            ChannelLayout::MONO,
            ChannelLayout::STEREO,
            ChannelLayout::SURROUND_5_1,
        ] {
            assert_eq!(layout.mask.bits().count_ones(), layout.channels);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ChannelLayout::MONO.to_string(), "mono");
        assert_eq!(ChannelLayout::STEREO.to_string(), "stereo");
        assert_eq!(ChannelLayout::from_channels(4).to_string(), "4ch");
    }
}
