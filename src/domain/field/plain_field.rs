// 番兵付きの素の盤面

use super::color::PuyoColor;
use crate::constants::{H_AIR, MAP_H, MAP_W, W};
use anyhow::{anyhow, Result};
use std::fmt;

/// 8x16 の格子。x=0,7 と y=0,15 は壁で、範囲チェックなしで隣を読める。
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PlainField {
    cells: [[PuyoColor; MAP_H]; MAP_W],
}

impl Default for PlainField {
    fn default() -> Self {
        Self::new()
    }
}

impl PlainField {
    pub fn new() -> Self {
        let mut cells = [[PuyoColor::Empty; MAP_H]; MAP_W];
        for y in 0..MAP_H {
            cells[0][y] = PuyoColor::Wall;
            cells[MAP_W - 1][y] = PuyoColor::Wall;
        }
        for col in cells.iter_mut() {
            col[0] = PuyoColor::Wall;
            col[MAP_H - 1] = PuyoColor::Wall;
        }
        Self { cells }
    }

    /// テキストから盤面を作る。6文字で1段、最後の段が1段目。
    pub fn from_text(text: &str) -> Result<Self> {
        let chars: Vec<char> = text.chars().filter(|&c| c != '\n' && c != '\r').collect();
        if chars.len() % W != 0 {
            return Err(anyhow!(
                "盤面テキストの長さが{}の倍数ではありません: {}",
                W,
                chars.len()
            ));
        }
        let rows = chars.len() / W;
        if rows > H_AIR {
            return Err(anyhow!("段数が多すぎます: {} (最大{})", rows, H_AIR));
        }

        let mut field = Self::new();
        for (i, row) in chars.chunks(W).enumerate() {
            let y = rows - i;
            for (j, &ch) in row.iter().enumerate() {
                let c = PuyoColor::from_char(ch)?;
                if c == PuyoColor::Wall {
                    return Err(anyhow!("壁は盤面内に置けません: ({}, {})", j + 1, y));
                }
                field.cells[j + 1][y] = c;
            }
        }
        Ok(field)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> PuyoColor {
        self.cells[x][y]
    }

    #[inline]
    pub fn is_empty(&self, x: usize, y: usize) -> bool {
        self.cells[x][y] == PuyoColor::Empty
    }

    /// 生の書き込み。高さキャッシュは持たないので呼び出し側の責任。番兵は書き換えられない。
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, c: PuyoColor) {
        assert!(
            (1..=W).contains(&x) && (1..=H_AIR).contains(&y),
            "番兵への書き込み: ({}, {})",
            x,
            y
        );
        self.cells[x][y] = c;
    }

    /// 何か置かれている最も高い段（全て空なら 0）
    pub fn top_row(&self) -> usize {
        (1..=W)
            .flat_map(|x| (1..=H_AIR).map(move |y| (x, y)))
            .filter(|&(x, y)| self.cells[x][y] != PuyoColor::Empty)
            .map(|(_, y)| y)
            .max()
            .unwrap_or(0)
    }

    /// 上から1段ずつ、'.' を空白として書き出す
    pub fn to_text(&self) -> String {
        let top = self.top_row();
        let mut rows = Vec::with_capacity(top);
        for y in (1..=top).rev() {
            let row: String = (1..=W).map(|x| self.cells[x][y].to_char()).collect();
            rows.push(row);
        }
        rows.join("\n")
    }
}

impl fmt::Debug for PlainField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..MAP_H).rev() {
            for x in 0..MAP_W {
                write!(f, "{}", self.cells[x][y].to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_is_wall() {
        let field = PlainField::new();
        for y in 0..MAP_H {
            assert_eq!(field.get(0, y), PuyoColor::Wall);
            assert_eq!(field.get(MAP_W - 1, y), PuyoColor::Wall);
        }
        for x in 0..MAP_W {
            assert_eq!(field.get(x, 0), PuyoColor::Wall);
            assert_eq!(field.get(x, MAP_H - 1), PuyoColor::Wall);
        }
        assert_eq!(field.get(1, 1), PuyoColor::Empty);
        assert_eq!(field.get(6, 14), PuyoColor::Empty);
    }

    #[test]
    fn from_text_bottom_row_is_one() {
        let field = PlainField::from_text("B.....\nRG...Y").unwrap();
        assert_eq!(field.get(1, 2), PuyoColor::Blue);
        assert_eq!(field.get(1, 1), PuyoColor::Red);
        assert_eq!(field.get(2, 1), PuyoColor::Green);
        assert_eq!(field.get(6, 1), PuyoColor::Yellow);
        assert_eq!(field.get(2, 2), PuyoColor::Empty);
    }

    #[test]
    fn from_text_without_newlines() {
        let a = PlainField::from_text("B.....RG...Y").unwrap();
        let b = PlainField::from_text("B.....\nRG...Y").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn from_text_accepts_space_as_empty() {
        let field = PlainField::from_text("R    O").unwrap();
        assert_eq!(field.get(2, 1), PuyoColor::Empty);
        assert_eq!(field.get(6, 1), PuyoColor::Ojama);
    }

    #[test]
    fn from_text_rejects_bad_input() {
        assert!(PlainField::from_text("RRRRR").is_err());
        assert!(PlainField::from_text("RRRRRX").is_err());
        let too_tall = "......\n".repeat(15);
        assert!(PlainField::from_text(&too_tall).is_err());
    }

    #[test]
    fn from_text_rejects_wall_cells() {
        assert!(PlainField::from_text("..#...").is_err());
        assert!(PlainField::from_text("#.....\nRRRRRR").is_err());
    }

    #[test]
    #[should_panic]
    fn set_on_border_panics() {
        let mut field = PlainField::new();
        field.set(0, 1, PuyoColor::Red);
    }

    #[test]
    #[should_panic]
    fn set_above_fourteenth_row_panics() {
        let mut field = PlainField::new();
        field.set(3, MAP_H - 1, PuyoColor::Red);
    }

    #[test]
    fn to_text_roundtrip() {
        let text = "..O...\nB.O...\nRGBYRO";
        let field = PlainField::from_text(text).unwrap();
        assert_eq!(field.to_text(), text);
        assert_eq!(PlainField::from_text(&field.to_text()).unwrap(), field);
    }

    #[test]
    fn empty_field_dumps_empty_string() {
        assert_eq!(PlainField::new().to_text(), "");
        assert_eq!(PlainField::from_text("").unwrap(), PlainField::new());
    }
}
