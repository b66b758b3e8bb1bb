// 盤面上の座標と訪問済みビット

use crate::constants::MAP_W;
use serde::{Deserialize, Serialize};

/// 盤面座標（x: 1..=6, y: 1..=14、0 と番兵も表現できる）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    #[inline]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// 1マス1ビットの集合（列ごとに u16）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldBits {
    cols: [u16; MAP_W],
}

impl FieldBits {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        (self.cols[x] >> y) & 1 != 0
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize) {
        self.cols[x] |= 1 << y;
    }

    #[inline]
    pub fn unset(&mut self, x: usize, y: usize) {
        self.cols[x] &= !(1 << y);
    }

    pub fn count(&self) -> usize {
        self.cols.iter().map(|c| c.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cols.iter().all(|&c| c == 0)
    }
}
