//! MDCT 正弦窗与变块长拼接.
//!
//! 每个块尺寸预存半窗, 值按降序排列 (首项接近 1, 末项接近 0).
//! 变块长时当前块的两翼按相邻块中较短的一边取窗, 差额用 1/0 补齐,
//! 保证重叠区平方和为 1 的重构条件.

use yun_core::fixed::{FIXED_ONE, PI_F, mul32, sin32, to_fixed32};

/// 生成 `1 << n_bits` 点半窗: w[n-1-j] = sin((j + 1/2)·π/2n)
pub(super) fn build_sine_window(n_bits: u32) -> Vec<i32> {
    let n = 1usize << n_bits;
    let alpha = PI_F >> (n_bits + 1);
    let mut window = vec![0i32; n];
    for j in 0..n {
        window[n - 1 - j] = sin32(mul32(to_fixed32(j as i32) + 0x8000, alpha));
    }
    window
}

/// 按前后块长拼出本块的 2 × block_len 有效窗.
///
/// `cur`/`prev_tab`/`next_tab` 为各自尺寸的半窗表; 右半为下降沿,
/// 左半从中心向外回填上升沿.
pub(super) fn stitch_block_window(
    window: &mut [i32],
    block_len: usize,
    prev_block_len: usize,
    next_block_len: usize,
    cur: &[i32],
    prev_tab: &[i32],
    next_tab: &[i32],
) {
    debug_assert_eq!(window.len(), 2 * block_len);
    let half = block_len;

    // 右半
    if block_len <= next_block_len {
        window[half..half + block_len].copy_from_slice(&cur[..block_len]);
    } else {
        let n = block_len / 2 - next_block_len / 2;
        let mut p = half;
        window[p..p + n].fill(FIXED_ONE);
        p += n;
        window[p..p + next_block_len].copy_from_slice(&next_tab[..next_block_len]);
        p += next_block_len;
        window[p..p + n].fill(0);
    }

    // 左半
    if block_len <= prev_block_len {
        for i in 0..block_len {
            window[half - 1 - i] = cur[i];
        }
    } else {
        let n = block_len / 2 - prev_block_len / 2;
        let mut p = half;
        for _ in 0..n {
            p -= 1;
            window[p] = FIXED_ONE;
        }
        for &w in prev_tab.iter().take(prev_block_len) {
            p -= 1;
            window[p] = w;
        }
        for _ in 0..n {
            p -= 1;
            window[p] = 0;
        }
    }
}
