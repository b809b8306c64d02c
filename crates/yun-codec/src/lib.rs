//! # yun-codec
//!
//! Yun 音频解码框架编解码器库, 提供解码器框架与 Packet/Frame 抽象.
//!
//! 本 crate 对标 FFmpeg 的 libavcodec, 定义了解码器注册、解码流程的核心抽象.
//! 解码器全部采用定点运算实现, 不依赖 FPU.
//!
//! ## 支持的解码器
//!
//! - **WMA v1 / v2**: 定点变换音频解码 (指数编码、噪声编码、可变块长 IMDCT)
//!
//! ## 使用示例
//!
//! ```rust
//! use yun_codec::{CodecRegistry, CodecId};
//!
//! let mut reg = CodecRegistry::new();
//! yun_codec::register_all(&mut reg);
//!
//! // 按 CodecId 创建解码器实例
//! let decoder = reg.create_decoder(CodecId::WmaV2).unwrap();
//! assert_eq!(decoder.name(), "wmav2");
//! ```

pub mod codec_id;
pub mod codec_parameters;
pub mod decoder;
pub mod decoders;
pub mod frame;
pub mod packet;
pub mod registry;

// 重导出常用类型
pub use codec_id::CodecId;
pub use codec_parameters::{AudioCodecParams, CodecParameters, CodecParamsType};
pub use decoder::Decoder;
pub use frame::{AudioFrame, Frame};
pub use packet::Packet;
pub use registry::CodecRegistry;

/// 注册所有内置解码器
pub fn register_all(registry: &mut CodecRegistry) {
    decoders::register_all_decoders(registry);
}
