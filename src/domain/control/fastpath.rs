// 出現直後専用の定型入力表（列の高さが低いときだけ使える）

use super::key::KeySetSeq;
use crate::domain::field::CoreField;
use crate::domain::piece::Decision;

/// 該当なしなら空列。呼び出し側で再生して検証すること。
pub(crate) fn find_key_stroke_fastpath(field: &CoreField, decision: &Decision) -> KeySetSeq {
    let h = |x: usize| field.height(x);
    let low = |xs: &[usize], limit: usize| xs.iter().all(|&x| h(x) <= limit);

    let literal = match (decision.x, decision.r) {
        (1, 0) if low(&[1, 2], 11) => "<,,<,v",
        (1, 1) if low(&[1, 2], 11) => "<A,,<,v",
        (1, 2) if h(1) <= 9 && low(&[2, 4], 11) => "<A,,<,vA,v",
        (1, 2) if low(&[1, 2, 4], 11) => "<A,,<,A,v",

        (2, 0) if h(2) <= 11 => "<,v",
        (2, 1) if low(&[2, 4], 11) => "<A,v",
        (2, 1) if h(2) <= 11 => "A,v",
        (2, 2) if h(2) <= 9 && h(4) <= 11 => "<A,v,vA,v",
        (2, 2) if low(&[2, 4], 11) => "<A,,A,v",
        (2, 3) if low(&[1, 2], 11) => "<B,v",

        (3, 0) => "v",
        (3, 1) if low(&[3, 4], 9) => "vA,v",
        (3, 1) if h(4) <= 11 => "A,v",
        (3, 2) if low(&[3, 4], 6) => "vA,v,vA,v",
        (3, 2) if h(4) <= 11 => "A,,A,v",
        (3, 2) if h(2) <= 11 => "B,,B,v",
        (3, 3) if low(&[2, 3], 9) => "vB,v",
        (3, 3) if h(2) <= 11 => "B,v",

        (4, 0) if h(4) <= 11 => ">,v",
        (4, 1) if low(&[4, 5], 11) => ">A,v",
        (4, 2) if h(4) <= 9 && h(5) <= 11 => ">A,v,vA,v",
        (4, 2) if low(&[4, 5], 11) => ">A,,A,v",
        (4, 3) if low(&[2, 4], 11) => ">B,v",

        (5, 0) if low(&[4, 5], 11) => ">,,>,v",
        (5, 1) if low(&[4, 5, 6], 11) => ">A,,>,v",
        (5, 2) if h(5) <= 9 && low(&[4, 6], 11) => ">A,,>,vA,v",
        (5, 2) if low(&[4, 5, 6], 11) => ">A,,>,A,v",
        (5, 3) if low(&[2, 4, 5], 11) => ">B,,>,v",

        (6, 0) if low(&[4, 5, 6], 11) => ">,,>,,>,v",
        (6, 2) if low(&[2, 4, 5, 6], 11) => ">B,,>,,>,B,v",
        (6, 3) if low(&[2, 4, 5, 6], 11) => ">B,,>,,>,v",

        _ => return KeySetSeq::new(),
    };

    KeySetSeq::from_literal(literal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_has_entry_for_every_decision() {
        let field = CoreField::new();
        for d in Decision::all_valid() {
            let seq = find_key_stroke_fastpath(&field, &d);
            assert!(!seq.is_empty(), "{}", d);
        }
    }

    #[test]
    fn high_columns_disable_entries() {
        let field = CoreField::from_text(&"O.....\n".repeat(12)).unwrap();
        assert!(find_key_stroke_fastpath(&field, &Decision::new(1, 0)).is_empty());
        assert_eq!(
            find_key_stroke_fastpath(&field, &Decision::new(3, 0)).to_string(),
            "v"
        );
    }

    #[test]
    fn lower_variant_chosen_by_height() {
        let field = CoreField::from_text(&"O.....\n".repeat(11)).unwrap();
        assert_eq!(
            find_key_stroke_fastpath(&field, &Decision::new(1, 2)).to_string(),
            "<A,,<,A,v"
        );
    }
}
