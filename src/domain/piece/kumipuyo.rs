// 組ぷよの色と位置

use crate::constants::{SPAWN_X, SPAWN_Y};
use crate::domain::field::PuyoColor;
use serde::{Deserialize, Serialize};

/// 軸ぷよと子ぷよの色
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Kumipuyo {
    pub axis: PuyoColor,
    pub child: PuyoColor,
}

impl Kumipuyo {
    pub fn new(axis: PuyoColor, child: PuyoColor) -> Self {
        Self { axis, child }
    }

    pub fn is_rep(&self) -> bool {
        self.axis == self.child
    }
}

/// 軸の座標と向き
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KumipuyoPos {
    pub x: usize,
    pub y: usize,
    pub r: usize,
}

impl Default for KumipuyoPos {
    fn default() -> Self {
        Self::initial()
    }
}

impl KumipuyoPos {
    pub const fn new(x: usize, y: usize, r: usize) -> Self {
        Self { x, y, r }
    }

    pub const fn initial() -> Self {
        Self::new(SPAWN_X, SPAWN_Y, 0)
    }

    #[inline]
    pub fn axis_x(&self) -> usize {
        self.x
    }

    #[inline]
    pub fn axis_y(&self) -> usize {
        self.y
    }

    #[inline]
    pub fn child_x(&self) -> usize {
        match self.r {
            1 => self.x + 1,
            3 => self.x - 1,
            _ => self.x,
        }
    }

    #[inline]
    pub fn child_y(&self) -> usize {
        match self.r {
            0 => self.y + 1,
            2 => self.y - 1,
            _ => self.y,
        }
    }
}
