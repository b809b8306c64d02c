//! 面向解码热路径的缓存式比特流读取器.
//!
//! 与 [`crate::bitreader::BitReader`] 不同, 本读取器的取位不逐次返回
//! `Result`: 缓存重填时越过缓冲区末尾的字节一律按 0 读出, 调用方在
//! 一段解码区域结束后通过 [`BitCache::overran`] / [`BitCache::bits_left`]
//! 检查逻辑越界. 这让 VLC 与系数循环内层保持无分支, 同时不触碰
//! 缓冲区之外的内存.

/// 缓存式比特流游标, 只读且单调前进
pub struct BitCache<'a> {
    buf: &'a [u8],
    size_in_bits: usize,
    index: usize,
}

/// 单次 peek/get 可取的最大位数.
///
/// 重填一次装入 32 位, 对齐损耗最多 7 位, 保证任意位置可取 25 位.
pub const MAX_CACHE_BITS: u32 = 25;

impl<'a> BitCache<'a> {
    /// 创建游标, `size_in_bits` 为逻辑流长度 (可短于缓冲区)
    pub fn new(buf: &'a [u8], size_in_bits: usize) -> Self {
        Self {
            buf,
            size_in_bits,
            index: 0,
        }
    }

    #[inline]
    fn load32(&self, byte_pos: usize) -> u32 {
        let mut v = 0u32;
        for k in 0..4 {
            let b = self.buf.get(byte_pos + k).copied().unwrap_or(0);
            v = (v << 8) | b as u32;
        }
        v
    }

    /// MSB 优先预读 `n` 位 (n ≤ 25), 不前进
    #[inline]
    pub fn peek(&self, n: u32) -> u32 {
        debug_assert!(n <= MAX_CACHE_BITS);
        if n == 0 {
            return 0;
        }
        let cache = self.load32(self.index >> 3) << (self.index & 7);
        cache >> (32 - n)
    }

    /// 前进 `n` 位
    #[inline]
    pub fn skip(&mut self, n: u32) {
        self.index += n as usize;
    }

    /// 读取 `n` 位 (n ≤ 25); `n == 0` 返回 0 且不前进
    #[inline]
    pub fn get(&mut self, n: u32) -> u32 {
        let v = self.peek(n);
        self.index += n as usize;
        v
    }

    /// 对齐到下一个字节边界
    pub fn align_to_byte(&mut self) {
        self.index = (self.index + 7) & !7;
    }

    /// 已读位数
    #[inline]
    pub fn bits_read(&self) -> usize {
        self.index
    }

    /// 剩余位数, 越界后为 0
    #[inline]
    pub fn bits_left(&self) -> usize {
        self.size_in_bits.saturating_sub(self.index)
    }

    /// 游标是否已越过逻辑流末尾
    #[inline]
    pub fn overran(&self) -> bool {
        self.index > self.size_in_bits
    }
}
