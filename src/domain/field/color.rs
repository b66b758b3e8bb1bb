// ぷよの色（ドメイン層）

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// 盤面の1マスの値
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PuyoColor {
    #[default]
    Empty = 0,
    Ojama = 1,
    Wall = 2, // 番兵専用
    Red = 4,
    Blue = 5,
    Yellow = 6,
    Green = 7,
}

/// 色の種類数（used_colors 用の配列長）
pub const NUM_PUYO_COLORS: usize = 8;

impl PuyoColor {
    pub const NORMAL_COLORS: [PuyoColor; 4] = [
        PuyoColor::Red,
        PuyoColor::Blue,
        PuyoColor::Yellow,
        PuyoColor::Green,
    ];

    /// 4色のいずれか
    #[inline]
    pub fn is_normal(self) -> bool {
        (self as u8) >= (PuyoColor::Red as u8)
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// 文字から変換
    pub fn from_char(ch: char) -> Result<Self> {
        match ch {
            '.' | ' ' => Ok(PuyoColor::Empty),
            'O' => Ok(PuyoColor::Ojama),
            '#' => Ok(PuyoColor::Wall),
            'R' => Ok(PuyoColor::Red),
            'B' => Ok(PuyoColor::Blue),
            'Y' => Ok(PuyoColor::Yellow),
            'G' => Ok(PuyoColor::Green),
            _ => Err(anyhow!("不正な文字: {:?}", ch)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            PuyoColor::Empty => '.',
            PuyoColor::Ojama => 'O',
            PuyoColor::Wall => '#',
            PuyoColor::Red => 'R',
            PuyoColor::Blue => 'B',
            PuyoColor::Yellow => 'Y',
            PuyoColor::Green => 'G',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_roundtrip() {
        for c in [
            PuyoColor::Empty,
            PuyoColor::Ojama,
            PuyoColor::Wall,
            PuyoColor::Red,
            PuyoColor::Blue,
            PuyoColor::Yellow,
            PuyoColor::Green,
        ] {
            assert_eq!(PuyoColor::from_char(c.to_char()).unwrap(), c);
        }
        assert_eq!(PuyoColor::from_char(' ').unwrap(), PuyoColor::Empty);
    }

    #[test]
    fn from_char_invalid() {
        assert!(PuyoColor::from_char('X').is_err());
        assert!(PuyoColor::from_char('r').is_err());
    }

    #[test]
    fn normal_colors() {
        assert!(PuyoColor::Red.is_normal());
        assert!(PuyoColor::Green.is_normal());
        assert!(!PuyoColor::Ojama.is_normal());
        assert!(!PuyoColor::Wall.is_normal());
        assert!(!PuyoColor::Empty.is_normal());
    }
}
