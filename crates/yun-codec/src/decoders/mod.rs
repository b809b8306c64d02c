//! 解码器实现模块.

pub mod wma;

use crate::codec_id::CodecId;
use crate::registry::CodecRegistry;

/// 注册所有内置解码器
pub fn register_all_decoders(registry: &mut CodecRegistry) {
    registry.register_decoder(CodecId::WmaV1, "wmav1", wma::WmaDecoder::create_v1);
    registry.register_decoder(CodecId::WmaV2, "wmav2", wma::WmaDecoder::create_v2);
}
