// 置き場所（軸の列と向き）

use crate::constants::W;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// r: 0 子が上, 1 子が右, 2 子が下, 3 子が左
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Decision {
    pub x: usize,
    pub r: usize,
}

impl Decision {
    pub const fn new(x: usize, r: usize) -> Self {
        Self { x, r }
    }

    /// 範囲外ならエラー
    pub fn try_new(x: usize, r: usize) -> Result<Self> {
        let d = Self::new(x, r);
        if !d.is_valid() {
            return Err(anyhow!("不正な置き場所: {}", d));
        }
        Ok(d)
    }

    pub fn is_valid(&self) -> bool {
        if !(1..=W).contains(&self.x) {
            return false;
        }
        match self.r {
            0 | 2 => true,
            1 => self.x < W,
            3 => self.x > 1,
            _ => false,
        }
    }

    #[inline]
    pub fn axis_x(&self) -> usize {
        self.x
    }

    #[inline]
    pub fn child_x(&self) -> usize {
        match self.r {
            1 => self.x + 1,
            3 => self.x - 1,
            _ => self.x,
        }
    }

    /// 有効な 22 通り（x, r の順）
    pub fn all_valid() -> impl Iterator<Item = Decision> {
        (1..=W)
            .flat_map(|x| (0..4).map(move |r| Decision::new(x, r)))
            .filter(Decision::is_valid)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity() {
        assert!(Decision::new(1, 0).is_valid());
        assert!(Decision::new(1, 1).is_valid());
        assert!(!Decision::new(1, 3).is_valid());
        assert!(!Decision::new(6, 1).is_valid());
        assert!(Decision::new(6, 3).is_valid());
        assert!(!Decision::new(0, 0).is_valid());
        assert!(!Decision::new(7, 2).is_valid());
        assert!(!Decision::new(3, 4).is_valid());
    }

    #[test]
    fn try_new_rejects_invalid() {
        assert!(Decision::try_new(3, 1).is_ok());
        assert!(Decision::try_new(6, 1).is_err());
    }

    #[test]
    fn child_column() {
        assert_eq!(Decision::new(3, 0).child_x(), 3);
        assert_eq!(Decision::new(3, 1).child_x(), 4);
        assert_eq!(Decision::new(3, 2).child_x(), 3);
        assert_eq!(Decision::new(3, 3).child_x(), 2);
    }

    #[test]
    fn twenty_two_decisions() {
        let all: Vec<Decision> = Decision::all_valid().collect();
        assert_eq!(all.len(), 22);
        assert_eq!(all[0], Decision::new(1, 0));
        assert!(all.iter().all(Decision::is_valid));
    }
}
