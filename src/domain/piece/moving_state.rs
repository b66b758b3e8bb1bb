// 落下中の組ぷよの状態と1フレームの遷移

use super::kumipuyo::KumipuyoPos;
use crate::constants::{
    FRAMES_CONTINUOUS_ARROW_PROHIBITED, FRAMES_CONTINUOUS_TURN_PROHIBITED, FRAMES_FREE_FALL,
    FRAMES_GROUNDING_GRACE, FRAMES_QUICKTURN, MAX_GROUNDING_COUNT,
};
use crate::domain::control::{Key, KeySet};
use crate::domain::field::PlainField;

/// 操作中の組ぷよ。フレームごとの各種カウンタを持つ。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KumipuyoMovingState {
    pub pos: KumipuyoPos,
    pub rest_frames_turn_prohibited: u8,
    pub rest_frames_arrow_prohibited: u8,
    /// 0 より大きい間にもう一度回すとクイックターン
    pub rest_frames_to_accept_quick_turn: u8,
    pub rest_frames_for_free_fall: u8,
    /// 下が塞がっている連続フレーム数
    pub grounding_frames: u8,
    /// 接地した回数
    pub num_grounded: u8,
    pub grounded: bool,
}

impl Default for KumipuyoMovingState {
    fn default() -> Self {
        Self::initial()
    }
}

// 状態キーの各フィールド幅
const KEY_BITS: [u32; 9] = [4, 5, 2, 2, 2, 6, 6, 7, 5];

impl KumipuyoMovingState {
    pub const fn new(pos: KumipuyoPos) -> Self {
        Self {
            pos,
            rest_frames_turn_prohibited: 0,
            rest_frames_arrow_prohibited: 0,
            rest_frames_to_accept_quick_turn: 0,
            rest_frames_for_free_fall: FRAMES_FREE_FALL,
            grounding_frames: 0,
            num_grounded: 0,
            grounded: false,
        }
    }

    /// 出現直後
    pub const fn initial() -> Self {
        Self::new(KumipuyoPos::initial())
    }

    pub fn is_initial(&self) -> bool {
        *self == Self::initial()
    }

    /// 状態を一意に表す u64。nohash で使うので最後に奇数を掛けて上位ビットへ広げる。
    pub fn key(&self) -> u64 {
        let fields = [
            self.pos.x as u64,
            self.pos.y as u64,
            self.pos.r as u64,
            self.rest_frames_turn_prohibited as u64,
            self.rest_frames_arrow_prohibited as u64,
            self.rest_frames_to_accept_quick_turn as u64,
            self.rest_frames_for_free_fall as u64,
            self.grounding_frames as u64,
            self.num_grounded as u64,
        ];
        let mut packed = 0u64;
        let mut shift = 0;
        for (v, bits) in fields.iter().zip(KEY_BITS) {
            debug_assert!(*v < (1 << bits));
            packed |= v << shift;
            shift += bits;
        }
        packed |= (self.grounded as u64) << shift;
        packed.wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    #[inline]
    fn is_blocked_below(&self, field: &PlainField) -> bool {
        let p = &self.pos;
        !field.is_empty(p.axis_x(), p.axis_y() - 1) || !field.is_empty(p.child_x(), p.child_y() - 1)
    }

    /// 1フレーム進める。回転 → 自由落下 → 左右/下 → 接地判定 の順。
    pub fn move_kumipuyo(&mut self, field: &PlainField, keys: KeySet) {
        if self.grounded {
            return;
        }

        if self.rest_frames_to_accept_quick_turn > 0 {
            self.rest_frames_to_accept_quick_turn -= 1;
        }

        let mut needs_free_fall = true;
        if self.rest_frames_turn_prohibited > 0 {
            self.rest_frames_turn_prohibited -= 1;
        } else {
            self.move_by_turn_key(field, keys, &mut needs_free_fall);
        }

        if !keys.has_key(Key::Down) && needs_free_fall {
            self.move_by_free_fall(field);
        }

        if self.rest_frames_arrow_prohibited > 0 {
            self.rest_frames_arrow_prohibited -= 1;
        } else {
            self.move_by_arrow_key(field, keys);
        }

        if !self.grounded {
            self.update_grounding(field);
        }
    }

    /// keys を順に適用する
    pub fn replay<I: IntoIterator<Item = KeySet>>(&mut self, field: &PlainField, keys: I) {
        for ks in keys {
            self.move_kumipuyo(field, ks);
        }
    }

    fn move_by_turn_key(&mut self, field: &PlainField, keys: KeySet, needs_free_fall: &mut bool) {
        if keys.has_key(Key::RightTurn) {
            self.rest_frames_turn_prohibited = FRAMES_CONTINUOUS_TURN_PROHIBITED;
            self.turn_right(field, needs_free_fall);
        } else if keys.has_key(Key::LeftTurn) {
            self.rest_frames_turn_prohibited = FRAMES_CONTINUOUS_TURN_PROHIBITED;
            self.turn_left(field, needs_free_fall);
        }
    }

    fn turn_right(&mut self, field: &PlainField, needs_free_fall: &mut bool) {
        let (x, y) = (self.pos.x, self.pos.y);
        match self.pos.r {
            0 => {
                if field.is_empty(x + 1, y) {
                    self.rotate_to(1);
                } else if field.is_empty(x - 1, y) {
                    self.pos.x -= 1;
                    self.rotate_to(1);
                } else {
                    self.quick_turn_from_top(field, needs_free_fall);
                }
            }
            1 => self.turn_to_bottom(field, needs_free_fall),
            2 => {
                if field.is_empty(x - 1, y) {
                    self.rotate_to(3);
                } else if field.is_empty(x + 1, y) {
                    self.pos.x += 1;
                    self.rotate_to(3);
                } else {
                    self.quick_turn_from_bottom();
                }
            }
            3 => self.turn_to_top(field),
            r => unreachable!("不正な向き: {}", r),
        }
    }

    fn turn_left(&mut self, field: &PlainField, needs_free_fall: &mut bool) {
        let (x, y) = (self.pos.x, self.pos.y);
        match self.pos.r {
            0 => {
                if field.is_empty(x - 1, y) {
                    self.rotate_to(3);
                } else if field.is_empty(x + 1, y) {
                    self.pos.x += 1;
                    self.rotate_to(3);
                } else {
                    self.quick_turn_from_top(field, needs_free_fall);
                }
            }
            1 => self.turn_to_top(field),
            2 => {
                if field.is_empty(x + 1, y) {
                    self.rotate_to(1);
                } else if field.is_empty(x - 1, y) {
                    self.pos.x -= 1;
                    self.rotate_to(1);
                } else {
                    self.quick_turn_from_bottom();
                }
            }
            3 => self.turn_to_bottom(field, needs_free_fall),
            r => unreachable!("不正な向き: {}", r),
        }
    }

    #[inline]
    fn rotate_to(&mut self, r: usize) {
        self.pos.r = r;
        self.rest_frames_to_accept_quick_turn = 0;
    }

    /// 横向きから子を下へ。下が埋まっていれば1段持ち上げる（軸は14段目に行けない）。
    fn turn_to_bottom(&mut self, field: &PlainField, needs_free_fall: &mut bool) {
        let (x, y) = (self.pos.x, self.pos.y);
        if field.is_empty(x, y - 1) {
            self.pos.r = 2;
            return;
        }
        if y < 13 && field.is_empty(x, y + 1) {
            self.pos.r = 2;
            self.pos.y += 1;
            self.rest_frames_for_free_fall = FRAMES_FREE_FALL / 2;
            *needs_free_fall = false;
        }
    }

    /// 横向きから子を上へ
    fn turn_to_top(&mut self, field: &PlainField) {
        if field.is_empty(self.pos.x, self.pos.y + 1) {
            self.pos.r = 0;
        }
    }

    /// 左右が塞がった縦向き。1回目は受付を開くだけ、受付中の2回目で上下反転して1段上がる。
    fn quick_turn_from_top(&mut self, field: &PlainField, needs_free_fall: &mut bool) {
        if self.rest_frames_to_accept_quick_turn == 0 {
            self.rest_frames_to_accept_quick_turn = FRAMES_QUICKTURN;
            return;
        }
        self.rest_frames_to_accept_quick_turn = 0;
        let (x, y) = (self.pos.x, self.pos.y);
        if y < 13 && field.is_empty(x, y + 1) {
            self.pos.r = 2;
            self.pos.y += 1;
            self.rest_frames_for_free_fall = FRAMES_FREE_FALL / 2;
            *needs_free_fall = false;
        }
    }

    /// 子が下の状態からの反転（軸が子の位置に下がる）
    fn quick_turn_from_bottom(&mut self) {
        if self.rest_frames_to_accept_quick_turn == 0 {
            self.rest_frames_to_accept_quick_turn = FRAMES_QUICKTURN;
            return;
        }
        self.rest_frames_to_accept_quick_turn = 0;
        self.pos.r = 0;
        self.pos.y -= 1;
    }

    fn move_by_free_fall(&mut self, field: &PlainField) {
        if self.rest_frames_for_free_fall > 1 {
            self.rest_frames_for_free_fall -= 1;
            return;
        }
        self.rest_frames_for_free_fall = FRAMES_FREE_FALL;
        // 塞がっていれば何もしない（固定は接地判定に任せる）
        if !self.is_blocked_below(field) {
            self.pos.y -= 1;
        }
    }

    /// 左右は同時押しなら右優先で1つだけ受け付ける。下は左右と同時なら無視。
    fn move_by_arrow_key(&mut self, field: &PlainField, keys: KeySet) {
        let p = self.pos;
        if keys.has_key(Key::Right) {
            self.rest_frames_arrow_prohibited = FRAMES_CONTINUOUS_ARROW_PROHIBITED;
            if field.is_empty(p.axis_x() + 1, p.axis_y()) && field.is_empty(p.child_x() + 1, p.child_y()) {
                self.pos.x += 1;
            }
            return;
        }

        if keys.has_key(Key::Left) {
            self.rest_frames_arrow_prohibited = FRAMES_CONTINUOUS_ARROW_PROHIBITED;
            if field.is_empty(p.axis_x() - 1, p.axis_y()) && field.is_empty(p.child_x() - 1, p.child_y()) {
                self.pos.x -= 1;
            }
            return;
        }

        if keys.has_key(Key::Down) {
            if self.is_blocked_below(field) {
                self.grounded = true;
                return;
            }
            // 最初の1回は自由落下のカウンタを潰すだけ
            if self.rest_frames_for_free_fall > 0 {
                self.rest_frames_for_free_fall = 0;
                return;
            }
            self.pos.y -= 1;
        }
    }

    fn update_grounding(&mut self, field: &PlainField) {
        if !self.is_blocked_below(field) {
            self.grounding_frames = 0;
            return;
        }

        if self.grounding_frames == 0 {
            self.num_grounded += 1;
            if self.num_grounded >= MAX_GROUNDING_COUNT {
                self.grounded = true;
                return;
            }
        }
        self.grounding_frames += 1;
        if self.grounding_frames >= FRAMES_GROUNDING_GRACE {
            self.grounded = true;
        }
    }
}
