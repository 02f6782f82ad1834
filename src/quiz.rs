use crate::error::{JourneyError, Result};

// Percentage score for a quiz. Unanswered (None) and out-of-range selections
// count as incorrect. Rounds half up with integer math, so 1/3 is 33, 2/3 is
// 67 and 1/8 is 13.
pub fn score(selections: &[Option<usize>], answer_key: &[usize]) -> Result<u8> {
    if answer_key.is_empty() {
        return Err(JourneyError::validation("Quiz has no questions"));
    }
    if selections.len() != answer_key.len() {
        return Err(JourneyError::validation(format!(
            "Expected {} answers, got {}",
            answer_key.len(),
            selections.len()
        )));
    }

    let correct = selections
        .iter()
        .zip(answer_key)
        .filter(|(selected, key)| **selected == Some(**key))
        .count();

    Ok(round_half_up_percent(correct, answer_key.len()))
}

pub(crate) fn round_half_up_percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let pct = (200 * part + whole) / (2 * whole);
    pct.min(100) as u8
}

// Parse "1,2,-" into selections; "-" or "_" marks an unanswered question
pub fn parse_answers(input: &str) -> Result<Vec<Option<usize>>> {
    input
        .split(',')
        .map(str::trim)
        .map(|part| match part {
            "-" | "_" | "" => Ok(None),
            n => n.parse::<usize>().map(Some).map_err(|_| {
                JourneyError::validation(format!(
                    "Invalid answer '{}'. Use option numbers like 0,1,2 or - for unanswered",
                    n
                ))
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod score_tests {
        use super::*;

        #[test]
        fn all_correct_is_100() {
            assert_eq!(score(&[Some(1), Some(2)], &[1, 2]).unwrap(), 100);
        }

        #[test]
        fn none_correct_is_0() {
            assert_eq!(score(&[Some(0), Some(0)], &[1, 2]).unwrap(), 0);
        }

        #[test]
        fn one_of_three_rounds_down_to_33() {
            assert_eq!(score(&[Some(0), Some(9), Some(9)], &[0, 1, 2]).unwrap(), 33);
        }

        #[test]
        fn two_of_three_rounds_up_to_67() {
            assert_eq!(score(&[Some(0), Some(1), Some(9)], &[0, 1, 2]).unwrap(), 67);
        }

        #[test]
        fn exact_half_rounds_up() {
            // 1/8 = 12.5%
            let key = [0; 8];
            let mut answers = vec![Some(1); 8];
            answers[0] = Some(0);
            assert_eq!(score(&answers, &key).unwrap(), 13);
        }

        #[test]
        fn half_correct_is_50() {
            assert_eq!(score(&[Some(1), Some(0)], &[1, 2]).unwrap(), 50);
        }

        #[test]
        fn unanswered_counts_as_incorrect() {
            assert_eq!(score(&[Some(1), None], &[1, 2]).unwrap(), 50);
            assert_eq!(score(&[None, None], &[1, 2]).unwrap(), 0);
        }

        #[test]
        fn length_mismatch_is_rejected() {
            let err = score(&[Some(1)], &[1, 2]).unwrap_err();
            assert!(matches!(err, JourneyError::Validation(_)));
            assert_eq!(err.to_string(), "Expected 2 answers, got 1");

            assert!(score(&[Some(1), Some(2), Some(3)], &[1, 2]).is_err());
        }

        #[test]
        fn empty_key_is_rejected() {
            assert!(matches!(score(&[], &[]), Err(JourneyError::Validation(_))));
        }

        #[test]
        fn scoring_is_deterministic() {
            let answers = [Some(1), Some(0), Some(2)];
            let key = [1, 1, 2];
            let first = score(&answers, &key).unwrap();
            let second = score(&answers, &key).unwrap();
            assert_eq!(first, second);
            assert_eq!(first, 67);
        }
    }

    mod rounding_tests {
        use super::*;

        #[test]
        fn zero_whole_is_zero() {
            assert_eq!(round_half_up_percent(0, 0), 0);
        }

        #[test]
        fn boundaries() {
            assert_eq!(round_half_up_percent(1, 3), 33);
            assert_eq!(round_half_up_percent(2, 3), 67);
            assert_eq!(round_half_up_percent(1, 200), 1); // 0.5%
            assert_eq!(round_half_up_percent(1, 201), 0); // 0.497%
            assert_eq!(round_half_up_percent(5, 5), 100);
        }
    }

    mod parse_answers_tests {
        use super::*;

        #[test]
        fn parses_indices() {
            assert_eq!(parse_answers("1,2").unwrap(), vec![Some(1), Some(2)]);
        }

        #[test]
        fn tolerates_spaces_and_unanswered() {
            assert_eq!(
                parse_answers(" 0 , - ,_,3").unwrap(),
                vec![Some(0), None, None, Some(3)]
            );
        }

        #[test]
        fn rejects_garbage() {
            let err = parse_answers("1,b").unwrap_err();
            assert!(err.to_string().contains("Invalid answer 'b'"));
        }

        #[test]
        fn rejects_negative() {
            assert!(parse_answers("-1").is_err());
        }
    }
}
