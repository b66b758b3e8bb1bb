// 高さキャッシュ付きの盤面（連鎖エンジンの本体データ）

use super::color::PuyoColor;
use super::plain_field::PlainField;
use super::position::{FieldBits, Position};
use crate::constants::{
    DEATH_X, DEATH_Y, FRAMES_GROUNDING, FRAMES_TO_DROP, FRAMES_TO_DROP_FAST,
    FRAMES_TO_MOVE_HORIZONTALLY, H, H_AIR, MAP_W, W,
};
use crate::domain::piece::{Decision, Kumipuyo};
use anyhow::Result;
use std::fmt;

/// 連結探索のバッファ容量（可視領域のマス数）
pub const SCAN_CAPACITY: usize = W * H;

/// 盤面 + 各列の高さ。heights[x] は x 列で最も高い非空マスの段。
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct CoreField {
    pub(crate) field: PlainField,
    pub(crate) heights: [usize; MAP_W],
}

impl CoreField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_plain(field: PlainField) -> Self {
        let mut cf = Self {
            field,
            heights: [0; MAP_W],
        };
        for x in 1..=W {
            cf.recalc_height_on(x);
        }
        cf
    }

    pub fn from_text(text: &str) -> Result<Self> {
        Ok(Self::from_plain(PlainField::from_text(text)?))
    }

    pub fn to_text(&self) -> String {
        self.field.to_text()
    }

    #[inline]
    pub fn plain(&self) -> &PlainField {
        &self.field
    }

    #[inline]
    pub fn color(&self, x: usize, y: usize) -> PuyoColor {
        self.field.get(x, y)
    }

    #[inline]
    pub fn is_empty(&self, x: usize, y: usize) -> bool {
        self.field.is_empty(x, y)
    }

    #[inline]
    pub fn height(&self, x: usize) -> usize {
        self.heights[x]
    }

    /// 生の書き込み。後で recalc_height_on を呼ぶこと。
    #[inline]
    pub fn set_raw(&mut self, x: usize, y: usize, c: PuyoColor) {
        self.field.set(x, y, c);
    }

    /// 書き込みと同時にその列の高さを再計算する
    pub fn set_puyo_and_height(&mut self, x: usize, y: usize, c: PuyoColor) {
        self.field.set(x, y, c);
        self.recalc_height_on(x);
    }

    pub fn recalc_height_on(&mut self, x: usize) {
        self.heights[x] = (1..=H_AIR)
            .rev()
            .find(|&y| !self.field.is_empty(x, y))
            .unwrap_or(0);
    }

    /// 窒息点が埋まっているか
    pub fn is_dead(&self) -> bool {
        !self.is_empty(DEATH_X, DEATH_Y)
    }

    /// 全消し状態か
    pub fn is_zenkeshi(&self) -> bool {
        (1..=W).all(|x| self.heights[x] == 0)
    }

    pub fn count_puyos(&self) -> usize {
        (1..=W)
            .map(|x| {
                (1..=self.heights[x])
                    .filter(|&y| !self.is_empty(x, y))
                    .count()
            })
            .sum()
    }

    pub fn count_color_puyos(&self) -> usize {
        (1..=W)
            .map(|x| {
                (1..=self.heights[x])
                    .filter(|&y| self.color(x, y).is_normal())
                    .count()
            })
            .sum()
    }

    /// (x, y) から同色で連結したマスを幅優先で集める。
    /// 13段目以上は連結しない。queue は呼び出し側のバッファで、返り値はその先頭部分。
    pub fn fill_same_color_positions<'a>(
        &self,
        x: usize,
        y: usize,
        c: PuyoColor,
        queue: &'a mut [Position],
        checked: &mut FieldBits,
    ) -> &'a [Position] {
        debug_assert!(!checked.get(x, y), "同じ起点を二度探索: ({}, {})", x, y);
        if y > H {
            return &queue[..0];
        }

        let mut head = 0;
        let mut tail = 0;
        queue[tail] = Position::new(x, y);
        tail += 1;
        checked.set(x, y);

        while head < tail {
            let p = queue[head];
            head += 1;

            let neighbors = [
                (p.x + 1, p.y),
                (p.x - 1, p.y),
                (p.x, p.y + 1),
                (p.x, p.y - 1),
            ];
            for (nx, ny) in neighbors {
                if ny > H || checked.get(nx, ny) || self.color(nx, ny) != c {
                    continue;
                }
                queue[tail] = Position::new(nx, ny);
                tail += 1;
                checked.set(nx, ny);
            }
        }

        &queue[..tail]
    }

    pub fn count_connected_puyos(&self, x: usize, y: usize) -> usize {
        let mut checked = FieldBits::new();
        self.count_connected_puyos_with(x, y, &mut checked)
    }

    /// 訪問済み集合を共有して数える
    pub fn count_connected_puyos_with(&self, x: usize, y: usize, checked: &mut FieldBits) -> usize {
        let mut queue = [Position::default(); SCAN_CAPACITY];
        let c = self.color(x, y);
        self.fill_same_color_positions(x, y, c, &mut queue, checked)
            .len()
    }

    /// 上下左右に同色があるか
    pub fn is_connected_puyo(&self, x: usize, y: usize) -> bool {
        let c = self.color(x, y);
        if y > H {
            return false;
        }
        self.color(x - 1, y) == c
            || self.color(x + 1, y) == c
            || self.color(x, y - 1) == c
            || (y + 1 <= H && self.color(x, y + 1) == c)
    }

    pub fn has_empty_neighbor(&self, x: usize, y: usize) -> bool {
        self.is_empty(x - 1, y)
            || self.is_empty(x + 1, y)
            || self.is_empty(x, y - 1)
            || self.is_empty(x, y + 1)
    }

    /// x 列に1個積む（14段目を超えるなら失敗）
    pub fn drop_puyo_on(&mut self, x: usize, c: PuyoColor) -> bool {
        self.drop_puyo_on_with_max_height(x, c, H_AIR)
    }

    pub fn drop_puyo_on_with_max_height(&mut self, x: usize, c: PuyoColor, max_height: usize) -> bool {
        debug_assert!(c != PuyoColor::Empty && c != PuyoColor::Wall);
        if self.heights[x] >= max_height {
            return false;
        }
        self.heights[x] += 1;
        let y = self.heights[x];
        self.field.set(x, y, c);
        true
    }

    /// x 列の一番上を取り除く
    pub fn remove_top_puyo_from(&mut self, x: usize) {
        if self.heights[x] == 0 {
            return;
        }
        let y = self.heights[x];
        self.field.set(x, y, PuyoColor::Empty);
        self.heights[x] -= 1;
    }

    /// 組ぷよを置く。下側のぷよから落とす。
    pub fn drop_kumipuyo(&mut self, decision: &Decision, kumipuyo: &Kumipuyo) -> bool {
        assert!(decision.is_valid(), "不正な Decision: {}", decision);
        let x1 = decision.axis_x();
        let x2 = decision.child_x();
        let (c1, c2) = if decision.r == 2 {
            (kumipuyo.child, kumipuyo.axis)
        } else {
            (kumipuyo.axis, kumipuyo.child)
        };

        if !self.drop_puyo_on_with_max_height(x1, c1, H_AIR - 1) {
            return false;
        }
        if !self.drop_puyo_on_with_max_height(x2, c2, H_AIR) {
            self.remove_top_puyo_from(x1);
            return false;
        }
        true
    }

    pub fn undo_kumipuyo(&mut self, decision: &Decision) {
        self.remove_top_puyo_from(decision.child_x());
        self.remove_top_puyo_from(decision.axis_x());
    }

    /// 置いたときの (軸, 子) の着地位置
    pub fn drop_position(&self, decision: &Decision) -> (Position, Position) {
        let ax = decision.axis_x();
        let cx = decision.child_x();
        match decision.r {
            0 => (
                Position::new(ax, self.heights[ax] + 1),
                Position::new(cx, self.heights[cx] + 2),
            ),
            2 => (
                Position::new(ax, self.heights[ax] + 2),
                Position::new(cx, self.heights[cx] + 1),
            ),
            _ => (
                Position::new(ax, self.heights[ax] + 1),
                Position::new(cx, self.heights[cx] + 1),
            ),
        }
    }

    /// 横置きで高さが違う（ちぎれる）か
    pub fn is_chigiri_decision(&self, decision: &Decision) -> bool {
        (decision.r == 1 || decision.r == 3)
            && self.heights[decision.axis_x()] != self.heights[decision.child_x()]
    }

    /// 出現から接地までのおおよそのフレーム数
    pub fn frames_to_drop_next(&self, decision: &Decision) -> u32 {
        let x1 = decision.axis_x();
        let x2 = decision.child_x();
        let mut frames = FRAMES_TO_MOVE_HORIZONTALLY[x1.abs_diff(3)];
        let drop_frames = |drop: i64| -> u32 {
            if drop > 0 {
                FRAMES_TO_DROP_FAST[drop as usize]
            } else {
                0
            }
        };

        if decision.r == 0 || decision.r == 2 {
            let mut drop = H as i64 - self.heights[x1] as i64;
            if decision.r == 2 {
                drop -= 1;
            }
            frames += drop_frames(drop) + FRAMES_GROUNDING;
        } else if self.heights[x1] == self.heights[x2] {
            let drop = H as i64 - self.heights[x1] as i64;
            frames += drop_frames(drop) + FRAMES_GROUNDING;
        } else {
            let lo = self.heights[x1].min(self.heights[x2]);
            let hi = self.heights[x1].max(self.heights[x2]);
            let drop = H as i64 - hi as i64;
            frames += drop_frames(drop)
                + FRAMES_GROUNDING
                + FRAMES_TO_DROP[hi - lo]
                + FRAMES_GROUNDING;
        }
        frames
    }

    /// 浮いているぷよを全て落とす
    pub fn force_drop(&mut self) {
        for x in 1..=W {
            let mut write_at = 1;
            for y in 1..=H_AIR {
                let c = self.field.get(x, y);
                if c == PuyoColor::Empty {
                    continue;
                }
                if write_at != y {
                    self.field.set(x, write_at, c);
                    self.field.set(x, y, PuyoColor::Empty);
                }
                write_at += 1;
            }
            self.heights[x] = write_at - 1;
        }
    }

    /// 壁と高さ付きの表示
    pub fn to_debug_string(&self) -> String {
        let mut s = format!("{:?}", self.field);
        let heights: Vec<String> = (1..=W).map(|x| self.heights[x].to_string()).collect();
        s.push_str(&format!("heights: [{}]", heights.join(", ")));
        s
    }
}

impl fmt::Debug for CoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_debug_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heights_from_text() {
        let cf = CoreField::from_text("..O...\nB.O...\nRGBYRO").unwrap();
        assert_eq!(cf.height(1), 2);
        assert_eq!(cf.height(2), 1);
        assert_eq!(cf.height(3), 3);
        assert_eq!(cf.height(6), 1);
        assert_eq!(cf.height(0), 0);
        assert_eq!(cf.count_puyos(), 9);
        assert_eq!(cf.count_color_puyos(), 6);
    }

    #[test]
    fn set_puyo_and_height_updates_cache() {
        let mut cf = CoreField::new();
        cf.set_puyo_and_height(2, 3, PuyoColor::Red);
        assert_eq!(cf.height(2), 3);
        cf.set_puyo_and_height(2, 3, PuyoColor::Empty);
        assert_eq!(cf.height(2), 0);
    }

    #[test]
    fn l_shaped_region_of_five() {
        let cf = CoreField::from_text(concat!("R.....\n", "R.....\n", "RRRB..")).unwrap();
        let mut queue = [Position::default(); SCAN_CAPACITY];
        let mut checked = FieldBits::new();
        let region = cf.fill_same_color_positions(1, 1, PuyoColor::Red, &mut queue, &mut checked);
        let mut got: Vec<Position> = region.to_vec();
        got.sort();
        let mut expected = vec![
            Position::new(1, 1),
            Position::new(1, 2),
            Position::new(1, 3),
            Position::new(2, 1),
            Position::new(3, 1),
        ];
        expected.sort();
        assert_eq!(got, expected);
        assert!(!checked.get(4, 1));
        assert_eq!(cf.count_connected_puyos(3, 1), 5);
        assert_eq!(cf.count_connected_puyos(4, 1), 1);
    }

    #[test]
    fn scan_ignores_thirteenth_row() {
        let mut cf = CoreField::new();
        for y in 10..=13 {
            cf.set_puyo_and_height(1, y, PuyoColor::Red);
        }
        for y in 1..10 {
            cf.set_puyo_and_height(1, y, PuyoColor::Ojama);
        }
        assert_eq!(cf.count_connected_puyos(1, 12), 3);
        let mut queue = [Position::default(); SCAN_CAPACITY];
        let mut checked = FieldBits::new();
        assert!(cf
            .fill_same_color_positions(1, 13, PuyoColor::Red, &mut queue, &mut checked)
            .is_empty());
    }

    #[test]
    fn is_connected_puyo_checks_neighbors() {
        let cf = CoreField::from_text("RR.B..").unwrap();
        assert!(cf.is_connected_puyo(1, 1));
        assert!(!cf.is_connected_puyo(4, 1));
        assert!(cf.has_empty_neighbor(4, 1));
    }

    #[test]
    fn drop_and_undo_kumipuyo() {
        let mut cf = CoreField::new();
        let pair = Kumipuyo::new(PuyoColor::Red, PuyoColor::Blue);
        assert!(cf.drop_kumipuyo(&Decision::new(3, 2), &pair));
        // 子が下
        assert_eq!(cf.color(3, 1), PuyoColor::Blue);
        assert_eq!(cf.color(3, 2), PuyoColor::Red);
        cf.undo_kumipuyo(&Decision::new(3, 2));
        assert!(cf.is_zenkeshi());

        assert!(cf.drop_kumipuyo(&Decision::new(4, 3), &pair));
        assert_eq!(cf.color(4, 1), PuyoColor::Red);
        assert_eq!(cf.color(3, 1), PuyoColor::Blue);
    }

    #[test]
    fn drop_kumipuyo_fails_on_full_column() {
        let mut cf = CoreField::new();
        for _ in 0..13 {
            cf.drop_puyo_on(1, PuyoColor::Ojama);
        }
        let before = cf.clone();
        let pair = Kumipuyo::new(PuyoColor::Red, PuyoColor::Blue);
        assert!(!cf.drop_kumipuyo(&Decision::new(1, 0), &pair));
        assert_eq!(cf, before);
    }

    #[test]
    fn drop_position_and_chigiri() {
        let cf = CoreField::from_text("O.....\nOO....").unwrap();
        let (axis, child) = cf.drop_position(&Decision::new(1, 1));
        assert_eq!(axis, Position::new(1, 3));
        assert_eq!(child, Position::new(2, 2));
        assert!(cf.is_chigiri_decision(&Decision::new(1, 1)));
        assert!(!cf.is_chigiri_decision(&Decision::new(3, 1)));
        assert!(!cf.is_chigiri_decision(&Decision::new(1, 0)));
    }

    #[test]
    fn frames_to_drop_next_is_longer_for_chigiri() {
        let cf = CoreField::from_text("O.....\nO.....\nO.....").unwrap();
        let straight = cf.frames_to_drop_next(&Decision::new(2, 1));
        let chigiri = cf.frames_to_drop_next(&Decision::new(1, 1));
        assert!(chigiri > straight);
        assert!(cf.frames_to_drop_next(&Decision::new(3, 0)) >= FRAMES_GROUNDING);
    }

    #[test]
    fn force_drop_settles_floating_puyos() {
        let mut cf = CoreField::new();
        cf.set_raw(2, 5, PuyoColor::Red);
        cf.set_raw(2, 2, PuyoColor::Blue);
        cf.recalc_height_on(2);
        cf.force_drop();
        assert_eq!(cf.color(2, 1), PuyoColor::Blue);
        assert_eq!(cf.color(2, 2), PuyoColor::Red);
        assert_eq!(cf.height(2), 2);
    }

    #[test]
    fn dead_when_death_cell_filled() {
        let mut cf = CoreField::new();
        assert!(!cf.is_dead());
        cf.set_puyo_and_height(DEATH_X, DEATH_Y, PuyoColor::Ojama);
        assert!(cf.is_dead());
    }
}
