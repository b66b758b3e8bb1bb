// 1列ずつ貪欲に進める入力生成（失敗しても到達不能とは限らない）

use super::key::{Key, KeySet, KeySetSeq};
use crate::constants::H_AIR;
use crate::domain::field::PlainField;
use crate::domain::piece::{Decision, KumipuyoMovingState, KumipuyoPos};

/// 左右が塞がった縦向き
fn is_quickturn(field: &PlainField, pos: &KumipuyoPos) -> bool {
    debug_assert!(pos.r == 0 || pos.r == 2);
    !field.is_empty(pos.x - 1, pos.y) && !field.is_empty(pos.x + 1, pos.y)
}

/// 貪欲に組んだあと冗長な回転を除き、連打できない入力の間に空フレームを挟む
pub(crate) fn find_key_stroke_online(
    field: &PlainField,
    mks: &KumipuyoMovingState,
    decision: &Decision,
) -> KeySetSeq {
    let mut seq = find_key_stroke_online_internal(field, mks, decision);
    if seq.is_empty() {
        return seq;
    }
    remove_redundant_key_seq(&mks.pos, &mut seq);
    expand_button_distance(&seq)
}

/// 1フレーム1入力の列。到達できない判断をしたら空列。
pub(crate) fn find_key_stroke_online_internal(
    field: &PlainField,
    mks: &KumipuyoMovingState,
    decision: &Decision,
) -> KeySetSeq {
    let right_turn = KeySet::from(Key::RightTurn);
    let left_turn = KeySet::from(Key::LeftTurn);
    let mut ret = KeySetSeq::new();
    let mut current = mks.pos;

    loop {
        if current.x == decision.x && current.r == decision.r {
            break;
        }

        // いったん子を上に向ける
        match current.r {
            1 => {
                ret.push(left_turn);
                current.r = 0;
            }
            3 => {
                ret.push(right_turn);
                current.r = 0;
            }
            2 => {
                if is_quickturn(field, &current) {
                    ret.push(right_turn);
                    ret.push(right_turn);
                    current.y += 1;
                    if current.y >= H_AIR {
                        return KeySetSeq::new();
                    }
                } else if !field.is_empty(current.x - 1, current.y) {
                    ret.push(left_turn);
                    ret.push(left_turn);
                } else {
                    ret.push(right_turn);
                    ret.push(right_turn);
                }
                current.r = 0;
            }
            _ => {}
        }

        if current.x == decision.x {
            let (x, y) = (current.x, current.y);
            match decision.r {
                1 => {
                    if !field.is_empty(x + 1, y) {
                        if !field.is_empty(x + 1, y + 1) || field.is_empty(x, y - 1) {
                            return KeySetSeq::new();
                        }
                        // 壁蹴りを避けて逆回り
                        ret.push(left_turn);
                        ret.push(left_turn);
                        ret.push(left_turn);
                        if y == 13 && !field.is_empty(x, 12) {
                            return KeySetSeq::new();
                        }
                    } else {
                        ret.push(right_turn);
                    }
                }
                3 => {
                    if !field.is_empty(x - 1, y) {
                        if !field.is_empty(x - 1, y + 1) || field.is_empty(x, y - 1) {
                            return KeySetSeq::new();
                        }
                        ret.push(right_turn);
                        ret.push(right_turn);
                        ret.push(right_turn);
                        if y == 13 && !field.is_empty(x, 12) {
                            return KeySetSeq::new();
                        }
                    } else {
                        ret.push(left_turn);
                    }
                }
                2 => {
                    if !field.is_empty(x - 1, y) {
                        ret.push(right_turn);
                        ret.push(right_turn);
                    } else {
                        ret.push(left_turn);
                        ret.push(left_turn);
                    }
                    if y == 13 && !field.is_empty(x, 12) {
                        return KeySetSeq::new();
                    }
                }
                _ => {}
            }
            break;
        }

        if decision.x > current.x {
            if !step_right(field, &mut current, &mut ret) {
                return KeySetSeq::new();
            }
        } else if !step_left(field, &mut current, &mut ret) {
            return KeySetSeq::new();
        }
    }

    ret.push(KeySet::from(Key::Down));
    ret
}

/*
  右の段差を登る
    aBb
    .A@
    .@@.
*/
fn step_right(field: &PlainField, current: &mut KumipuyoPos, ret: &mut KeySetSeq) -> bool {
    if field.is_empty(current.x + 1, current.y) {
        ret.push(KeySet::from(Key::Right));
        current.x += 1;
        return true;
    }
    // 軸はこれ以上上がれない
    if current.y >= 13 {
        return false;
    }
    if !field.is_empty(current.x + 1, current.y + 1) {
        return false;
    }
    // 床蹴りかクイックターンで1段上がれる
    if field.is_empty(current.x, current.y - 1) && !is_quickturn(field, current) {
        return false;
    }
    ret.push(KeySet::from(Key::LeftTurn));
    ret.push(KeySet::from(Key::LeftTurn));
    current.y += 1;
    if current.y >= H_AIR {
        return false;
    }
    if field.is_empty(current.x - 1, current.y + 1) {
        ret.push(KeySet::from(Key::RightTurn));
        ret.push(KeySet::from(Key::Right));
    } else {
        // a が埋まっていれば壁蹴りで右に出るので右キーは不要
        ret.push(KeySet::from(Key::RightTurn));
    }
    ret.push(KeySet::from(Key::RightTurn));
    current.x += 1;
    true
}

/*
  左の段差を登る
    bBa
    @A.
    @@@.
*/
fn step_left(field: &PlainField, current: &mut KumipuyoPos, ret: &mut KeySetSeq) -> bool {
    if field.is_empty(current.x - 1, current.y) {
        ret.push(KeySet::from(Key::Left));
        current.x -= 1;
        return true;
    }
    if current.y >= 13 {
        return false;
    }
    if !field.is_empty(current.x - 1, current.y + 1) {
        return false;
    }
    if field.is_empty(current.x, current.y - 1) && !is_quickturn(field, current) {
        return false;
    }
    ret.push(KeySet::from(Key::RightTurn));
    ret.push(KeySet::from(Key::RightTurn));
    current.y += 1;
    if current.y >= H_AIR {
        return false;
    }
    if field.is_empty(current.x + 1, current.y) {
        ret.push(KeySet::from(Key::LeftTurn));
        ret.push(KeySet::from(Key::Left));
    } else {
        ret.push(KeySet::from(Key::LeftTurn));
    }
    ret.push(KeySet::from(Key::LeftTurn));
    current.x -= 1;
    true
}

/// 横向きから始めたときの「戻して回し直す」2手を消す
pub(crate) fn remove_redundant_key_seq(pos: &KumipuyoPos, seq: &mut KeySetSeq) {
    let (first, second) = match pos.r {
        1 => (Key::LeftTurn, Key::RightTurn),
        3 => (Key::RightTurn, Key::LeftTurn),
        _ => return,
    };
    if seq.len() >= 2 && seq[0] == KeySet::from(first) && seq[1] == KeySet::from(second) {
        seq.remove_front();
        seq.remove_front();
    }
}

/// 回転が続く所と方向キーが続く所に空フレームを挟む
pub(crate) fn expand_button_distance(seq: &KeySetSeq) -> KeySetSeq {
    let mut result = KeySetSeq::new();
    for (i, ks) in seq.iter().enumerate() {
        if i > 0 {
            let prev = seq[i - 1];
            if (prev.has_turn_key() && ks.has_turn_key())
                || (prev.has_arrow_key() && ks.has_arrow_key())
            {
                result.push(KeySet::new());
            }
        }
        result.push(*ks);
    }
    result
}
