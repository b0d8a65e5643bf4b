use crate::classify::classify;
use crate::extract::{extract, ExtractError};
use crate::model::{PairSides, QuestionPair, QuestionRecord, ResolutionOutcome, SkipReason, Side};

/// Decide which side of a duplicate pair survives.
///
/// The side with the lower tier value wins; equal tiers keep the left side.
/// Pairs whose identifiers cannot both be extracted, or that name the same
/// question twice, are skipped with a reason.
pub fn resolve(pair: &QuestionPair) -> Result<ResolutionOutcome, SkipReason> {
    let (left, right) = records(pair)?;

    if left.identifier == right.identifier {
        return Err(SkipReason::SameIdentifier {
            identifier: left.identifier,
        });
    }

    let left_tier = classify(&left.source_text);
    let right_tier = classify(&right.source_text);

    let outcome = if left_tier <= right_tier {
        ResolutionOutcome {
            row: pair.row,
            selected_id: left.identifier,
            rejected_id: right.identifier,
            selected_priority: left_tier,
            rejected_priority: right_tier,
            chosen: Side::Left,
        }
    } else {
        ResolutionOutcome {
            row: pair.row,
            selected_id: right.identifier,
            rejected_id: left.identifier,
            selected_priority: right_tier,
            rejected_priority: left_tier,
            chosen: Side::Right,
        }
    };
    Ok(outcome)
}

fn records(pair: &QuestionPair) -> Result<(QuestionRecord, QuestionRecord), SkipReason> {
    match (extract(&pair.left), extract(&pair.right)) {
        (Ok(l), Ok(r)) => Ok((
            QuestionRecord {
                identifier: l,
                source_text: pair.left.clone(),
            },
            QuestionRecord {
                identifier: r,
                source_text: pair.right.clone(),
            },
        )),
        (l, r) => Err(skip_reason(l.err(), r.err())),
    }
}

/// A missing marker outranks a malformed one: the reason names every side
/// that lacked the marker, or failing that every malformed side.
fn skip_reason(left: Option<ExtractError>, right: Option<ExtractError>) -> SkipReason {
    let not_found = |e: &Option<ExtractError>| matches!(e, Some(ExtractError::NotFound));
    let sides = |l: bool, r: bool| match (l, r) {
        (true, true) => PairSides::Both,
        (true, false) => PairSides::Left,
        _ => PairSides::Right,
    };

    if not_found(&left) || not_found(&right) {
        SkipReason::IdentifierNotFound {
            sides: sides(not_found(&left), not_found(&right)),
        }
    } else {
        SkipReason::MalformedIdentifier {
            sides: sides(left.is_some(), right.is_some()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PriorityTier;

    const A: &str = "507f1f77bcf86cd799439011";
    const B: &str = "507f191e810c19729de860ea";

    fn pair(left: &str, right: &str) -> QuestionPair {
        QuestionPair::new(1, left, right)
    }

    #[test]
    fn advanced_beats_ncert() {
        let p = pair(
            &format!("JEE Advanced 2018 ... Question ID: {A}"),
            &format!("NCERT ... Question ID: {B}"),
        );
        let o = resolve(&p).unwrap();
        assert_eq!(o.selected_id, A);
        assert_eq!(o.rejected_id, B);
        assert_eq!(o.selected_priority, PriorityTier::JeeAdvanced);
        assert_eq!(o.rejected_priority, PriorityTier::Ncert);
        assert_eq!(o.chosen, Side::Left);
    }

    #[test]
    fn right_side_can_win() {
        let p = pair(
            &format!("plain text Question ID: {A}"),
            &format!("JEE Main 2022 Question ID: {B}"),
        );
        let o = resolve(&p).unwrap();
        assert_eq!(o.selected_id, B);
        assert_eq!(o.selected_priority, PriorityTier::JeeMains);
        assert_eq!(o.rejected_priority, PriorityTier::Other);
        assert_eq!(o.chosen, Side::Right);
        assert_eq!(o.left_id(), A);
        assert_eq!(o.right_id(), B);
    }

    #[test]
    fn tie_keeps_left() {
        let p = pair(
            &format!("NCERT 11 Question ID: {B}"),
            &format!("NCERT 12 Question ID: {A}"),
        );
        for _ in 0..10 {
            let o = resolve(&p).unwrap();
            assert_eq!(o.chosen, Side::Left);
            assert_eq!(o.selected_id, B);
        }
    }

    #[test]
    fn missing_id_on_one_side() {
        let p = pair(&format!("JEE Advanced Question ID: {A}"), "NCERT no id here");
        assert_eq!(
            resolve(&p),
            Err(SkipReason::IdentifierNotFound {
                sides: PairSides::Right
            })
        );
    }

    #[test]
    fn malformed_on_both_sides() {
        let p = pair("Question ID: abc123", "Question ID: 507f1f77bcf86cd7994390111");
        assert_eq!(
            resolve(&p),
            Err(SkipReason::MalformedIdentifier {
                sides: PairSides::Both
            })
        );
    }

    #[test]
    fn not_found_outranks_malformed() {
        let p = pair("", "Question ID: abc");
        assert_eq!(
            resolve(&p),
            Err(SkipReason::IdentifierNotFound {
                sides: PairSides::Left
            })
        );
    }

    #[test]
    fn same_identifier_is_degenerate() {
        let p = pair(
            &format!("JEE Advanced Question ID: {A}"),
            &format!("NCERT Question ID: {}", A.to_uppercase()),
        );
        assert_eq!(
            resolve(&p),
            Err(SkipReason::SameIdentifier {
                identifier: A.into()
            })
        );
    }
}
