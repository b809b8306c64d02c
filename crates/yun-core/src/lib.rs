//! # yun-core
//!
//! Yun 音频解码框架核心库, 提供基础类型定义、错误处理和定点运算.
//!
//! 本 crate 对标 FFmpeg 的 libavutil, 为整个 Yun 框架提供底层基础设施.
//! 与通用多媒体框架不同, Yun 面向无 FPU 的定点解码场景, 因此额外提供
//! Q16.16 / Q16.48 定点运算核心 ([`fixed`]) 和无检查位读取缓存
//! ([`bitcache`]).

pub mod bitcache;
pub mod bitreader;
pub mod bitwriter;
pub mod channel_layout;
pub mod error;
pub mod fixed;
pub mod media_type;
pub mod rational;
pub mod sample_format;
pub mod timestamp;

// 重导出常用类型
pub use channel_layout::ChannelLayout;
pub use error::{YunError, YunResult};
pub use fixed::{Fixed32, Fixed64};
pub use media_type::MediaType;
pub use rational::Rational;
pub use sample_format::SampleFormat;
pub use timestamp::Timestamp;
