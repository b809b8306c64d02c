//! 编解码器注册表.
//!
//! 对标 FFmpeg 的编解码器注册机制, 支持动态查找和实例化解码器.

use std::collections::HashMap;

use yun_core::YunResult;

use crate::codec_id::CodecId;
use crate::decoder::Decoder;

/// 解码器工厂函数类型
pub type DecoderFactory = fn() -> YunResult<Box<dyn Decoder>>;

/// 编解码器注册表
///
/// 管理所有已注册的解码器, 支持按 CodecId 查找并创建实例.
pub struct CodecRegistry {
    /// 解码器工厂映射
    decoders: HashMap<CodecId, Vec<DecoderEntry>>,
}

/// 解码器注册条目
struct DecoderEntry {
    /// 解码器名称
    name: String,
    /// 工厂函数
    factory: DecoderFactory,
}

impl CodecRegistry {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// 注册一个解码器
    pub fn register_decoder(
        &mut self,
        codec_id: CodecId,
        name: impl Into<String>,
        factory: DecoderFactory,
    ) {
        self.decoders
            .entry(codec_id)
            .or_default()
            .push(DecoderEntry {
                name: name.into(),
                factory,
            });
    }

    /// 创建指定编解码器 ID 的解码器实例
    pub fn create_decoder(&self, codec_id: CodecId) -> YunResult<Box<dyn Decoder>> {
        let entries = self.decoders.get(&codec_id).ok_or_else(|| {
            yun_core::YunError::CodecNotFound(format!("未找到 {} 的解码器", codec_id))
        })?;
        // 使用第一个注册的解码器 (优先级最高)
        let entry = &entries[0];
        (entry.factory)()
    }

    /// 获取所有已注册的解码器名称
    pub fn list_decoders(&self) -> Vec<(CodecId, &str)> {
        let mut result = Vec::new();
        for (id, entries) in &self.decoders {
            for entry in entries {
                result.push((*id, entry.name.as_str()));
            }
        }
        result
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}
