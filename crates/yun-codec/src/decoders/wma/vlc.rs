//! Canonical Huffman VLC 查表解码.
//!
//! 码本只存码长表, 码字按 DEFLATE 的 next_code 递推分配 (符号按下标
//! 顺序). 查表为多级结构: 一级表宽 `table_bits`, 超长码字落到二级/
//! 三级子表. 所有表项放在同一个 arena 向量里, 用下标衔接.

use std::collections::BTreeMap;

use yun_core::bitcache::BitCache;
use yun_core::{YunError, YunResult};

/// 单个表项: `consumed > 0` 为叶子 (消耗位数 + 符号),
/// `consumed < 0` 为子表 (子表位宽取负 + arena 偏移),
/// `consumed == 0` 为未分配码字.
type Entry = (i8, i16);

/// 多级 VLC 查找表
pub(super) struct Vlc {
    table_bits: u32,
    table: Vec<Entry>,
}

impl Vlc {
    /// 从码长表构建. 长度为 0 的符号不参与编码.
    pub(super) fn build(table_bits: u32, lengths: &[u8]) -> YunResult<Self> {
        let max_len = lengths.iter().copied().max().unwrap_or(0) as u32;
        if max_len == 0 {
            return Err(YunError::InvalidArgument("VLC 码长表为空".into()));
        }
        if max_len > 3 * table_bits {
            return Err(YunError::InvalidArgument(format!(
                "VLC 码长 {max_len} 超出 {table_bits} 位三级表上限"
            )));
        }

        // next_code 递推分配规范码
        let mut bl_count = vec![0u32; max_len as usize + 1];
        for &l in lengths {
            if l > 0 {
                bl_count[l as usize] += 1;
            }
        }
        let mut next_code = vec![0u32; max_len as usize + 1];
        let mut code = 0u32;
        for l in 1..=max_len as usize {
            code = (code + bl_count[l - 1]) << 1;
            next_code[l] = code;
        }
        let mut codes = Vec::with_capacity(lengths.len());
        for (sym, &l) in lengths.iter().enumerate() {
            if l == 0 {
                continue;
            }
            if next_code[l as usize] >> l != 0 {
                return Err(YunError::InvalidArgument("VLC 码长表超出 Kraft 界".into()));
            }
            codes.push((next_code[l as usize], l, sym));
            next_code[l as usize] += 1;
        }

        let mut table = Vec::new();
        build_level(&mut table, table_bits, &codes)?;
        Ok(Self { table_bits, table })
    }

    /// 读出一个符号. 命中未分配码字返回 `InvalidData`.
    pub(super) fn get(&self, gb: &mut BitCache<'_>) -> YunResult<usize> {
        let mut base = 0usize;
        let mut bits = self.table_bits;
        // 构建时已限定最多三级
        for _ in 0..3 {
            let idx = gb.peek(bits) as usize;
            let (consumed, payload) = self.table[base + idx];
            if consumed > 0 {
                gb.skip(consumed as u32);
                return Ok(payload as usize);
            }
            if consumed == 0 {
                return Err(YunError::InvalidData("VLC 码字未分配".into()));
            }
            gb.skip(bits);
            base = payload as usize;
            bits = (-consumed) as u32;
        }
        Err(YunError::InvalidData("VLC 码字超出表深度".into()))
    }
}

/// 递归构建一级表, 返回该表在 arena 中的起始下标
fn build_level(arena: &mut Vec<Entry>, bits: u32, codes: &[(u32, u8, usize)]) -> YunResult<usize> {
    let base = arena.len();
    arena.resize(base + (1 << bits), (0, 0));

    // 直接命中的短码: 复制到所有共享前缀的表项
    let mut long: BTreeMap<u32, Vec<(u32, u8, usize)>> = BTreeMap::new();
    for &(code, len, sym) in codes {
        let len = len as u32;
        if len <= bits {
            let shift = bits - len;
            let start = (code << shift) as usize;
            let sym = i16::try_from(sym)
                .map_err(|_| YunError::InvalidArgument("VLC 符号数超出 i16".into()))?;
            for slot in &mut arena[base + start..base + start + (1 << shift)] {
                *slot = (len as i8, sym);
            }
        } else {
            let prefix = code >> (len - bits);
            let rest = code & ((1 << (len - bits)) - 1);
            long.entry(prefix)
                .or_default()
                .push((rest, (len - bits) as u8, sym));
        }
    }

    // 超长码按前缀分组递归建子表
    for (prefix, group) in long {
        let sub_max = group.iter().map(|&(_, l, _)| l as u32).max().unwrap_or(1);
        let sub_bits = sub_max.min(bits);
        let sub_base = build_level(arena, sub_bits, &group)?;
        let offset = i16::try_from(sub_base)
            .map_err(|_| YunError::InvalidArgument("VLC 子表偏移超出 i16".into()))?;
        arena[base + prefix as usize] = (-(sub_bits as i8), offset);
    }
    Ok(base)
}
