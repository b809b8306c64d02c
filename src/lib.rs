//! # Yun (韵)
//!
//! 纯 Rust 实现的定点音频解码框架, 对标 FFmpeg 的音频解码路径.
//!
//! Yun 面向无 FPU 的嵌入式与服务端转码场景, 全部解码器采用
//! Q16.16 / Q16.48 定点运算实现:
//! - **解码器**: WMA v1 / v2 (指数编码、噪声编码、可变块长 IMDCT)
//! - **定点核心**: 饱和乘除、平方根、三角函数、CORDIC 旋转、log2/exp2
//! - **位流工具**: 前向/无检查位读取、位写入
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use yun::codec::CodecId;
//!
//! let registry = yun::default_codec_registry();
//! let decoder = registry.create_decoder(CodecId::WmaV2).unwrap();
//! println!("解码器: {}", decoder.name());
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `yun-core` | 核心类型、定点运算与位流工具 |
//! | `yun-codec` | 解码器框架与 WMA 解码器 |

/// 核心类型与定点运算 (对标 libavutil)
pub use yun_core as core;

/// 解码器框架 (对标 libavcodec)
pub use yun_codec as codec;

/// 日志子系统 (tracing 订阅器 + 按日翻滚 + 历史压缩)
pub mod logging;

/// 获取 Yun 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// 创建已注册所有内置解码器的注册表
pub fn default_codec_registry() -> yun_codec::CodecRegistry {
    let mut registry = yun_codec::CodecRegistry::new();
    yun_codec::register_all(&mut registry);
    registry
}
