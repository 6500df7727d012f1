//! Decoding contract return values
//!
//! `get_poll_state` returns a struct, which arrives as a symbol-keyed map,
//! though older deployments returned a `(question, options, votes)` tuple.
//! The `votes` field itself has been seen in several encodings, so it is
//! classified into a [`VoteTally`] before being laid out in option order.

use stellar_xdr::curr::{ScMap, ScVal, ScVec};

use super::{ContractError, ContractResult, PollState};
use crate::xdr::{map_get, scval_to_string, scval_to_u32};

/// The encodings a vote tally can arrive in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteTally {
    /// Map keyed by option index: `{0: 3, 1: 2}`
    Map(Vec<(u32, u32)>),
    /// Vector of `[index, count]` pairs
    Pairs(Vec<(u32, u32)>),
    /// Map keyed by stringified index: `{"0": 3, "1": 2}`
    Keyed(Vec<(String, u32)>),
    /// Plain vector of counts in option order
    Dense(Vec<u32>),
    /// Anything else; every option reads as zero
    Unknown,
}

impl VoteTally {
    /// Classify a raw `votes` value
    pub fn classify(value: &ScVal) -> Self {
        match value {
            ScVal::Map(Some(ScMap(entries))) => {
                let keyed_by_text = entries
                    .iter()
                    .any(|e| matches!(e.key, ScVal::String(_) | ScVal::Symbol(_)));

                if keyed_by_text {
                    VoteTally::Keyed(
                        entries
                            .iter()
                            .filter_map(|e| Some((scval_to_string(&e.key)?, scval_to_u32(&e.val)?)))
                            .collect(),
                    )
                } else {
                    VoteTally::Map(
                        entries
                            .iter()
                            .filter_map(|e| Some((scval_to_u32(&e.key)?, scval_to_u32(&e.val)?)))
                            .collect(),
                    )
                }
            }
            ScVal::Map(None) => VoteTally::Map(Vec::new()),
            ScVal::Vec(Some(ScVec(items))) => {
                if items.iter().all(is_pair) {
                    VoteTally::Pairs(items.iter().filter_map(as_pair).collect())
                } else if items.iter().all(|i| scval_to_u32(i).is_some()) {
                    VoteTally::Dense(items.iter().filter_map(scval_to_u32).collect())
                } else {
                    VoteTally::Unknown
                }
            }
            ScVal::Vec(None) => VoteTally::Dense(Vec::new()),
            _ => VoteTally::Unknown,
        }
    }

    /// Count for one option index, zero when absent
    pub fn count(&self, index: u32) -> u32 {
        match self {
            VoteTally::Map(entries) | VoteTally::Pairs(entries) => entries
                .iter()
                .find(|(k, _)| *k == index)
                .map(|(_, v)| *v)
                .unwrap_or(0),
            VoteTally::Keyed(entries) => entries
                .iter()
                .find(|(k, _)| k.trim().parse::<u32>().ok() == Some(index))
                .map(|(_, v)| *v)
                .unwrap_or(0),
            VoteTally::Dense(counts) => counts.get(index as usize).copied().unwrap_or(0),
            VoteTally::Unknown => 0,
        }
    }

    /// Lay the tally out as one count per option
    pub fn densify(&self, option_count: usize) -> Vec<u32> {
        (0..option_count)
            .map(|i| u32::try_from(i).map(|i| self.count(i)).unwrap_or(0))
            .collect()
    }
}

fn is_pair(value: &ScVal) -> bool {
    matches!(value, ScVal::Vec(Some(ScVec(pair))) if pair.len() == 2)
}

fn as_pair(value: &ScVal) -> Option<(u32, u32)> {
    match value {
        ScVal::Vec(Some(ScVec(pair))) if pair.len() == 2 => {
            Some((scval_to_u32(&pair[0])?, scval_to_u32(&pair[1])?))
        }
        _ => None,
    }
}

/// Decode a `get_poll_state` return value
pub fn decode_poll_state(value: &ScVal) -> ContractResult<PollState> {
    let (question, options, votes) = match value {
        ScVal::Map(Some(map)) => (
            map_get(map, "question"),
            map_get(map, "options"),
            map_get(map, "votes"),
        ),
        ScVal::Vec(Some(ScVec(fields))) if fields.len() == 3 => {
            (fields.first(), fields.get(1), fields.get(2))
        }
        other => {
            return Err(ContractError::Decode(format!(
                "poll state has unexpected shape {}",
                other.name()
            )))
        }
    };

    let question = question
        .and_then(scval_to_string)
        .ok_or_else(|| ContractError::Decode("missing question".to_string()))?;

    let options = match options {
        Some(ScVal::Vec(Some(ScVec(items)))) => items
            .iter()
            .map(|item| {
                scval_to_string(item)
                    .ok_or_else(|| ContractError::Decode("option is not a string".to_string()))
            })
            .collect::<ContractResult<Vec<_>>>()?,
        Some(ScVal::Vec(None)) | None => Vec::new(),
        Some(other) => {
            return Err(ContractError::Decode(format!(
                "options has unexpected shape {}",
                other.name()
            )))
        }
    };

    let tally = votes.map(VoteTally::classify).unwrap_or(VoteTally::Unknown);
    tracing::debug!(?tally, "Decoded raw vote tally");

    let votes = tally.densify(options.len());

    Ok(PollState {
        question,
        options,
        votes,
    })
}

/// Decode a `get_voter_choice` return value; `None` means no stored choice
pub fn decode_voter_choice(value: &ScVal) -> Option<u32> {
    match value {
        ScVal::Void => None,
        other => scval_to_u32(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xdr::{string_to_scval, string_vec_to_scval};
    use stellar_xdr::curr::{ScMapEntry, ScSymbol};

    fn sym(name: &str) -> ScVal {
        ScVal::Symbol(ScSymbol(name.try_into().unwrap()))
    }

    fn map(entries: Vec<(ScVal, ScVal)>) -> ScVal {
        ScVal::Map(Some(ScMap(
            entries
                .into_iter()
                .map(|(key, val)| ScMapEntry { key, val })
                .collect::<Vec<_>>()
                .try_into()
                .unwrap(),
        )))
    }

    fn vec_of(items: Vec<ScVal>) -> ScVal {
        ScVal::Vec(Some(ScVec(items.try_into().unwrap())))
    }

    fn options(names: &[&str]) -> ScVal {
        string_vec_to_scval(&names.iter().map(|s| s.to_string()).collect::<Vec<_>>()).unwrap()
    }

    fn poll_struct(votes: ScVal) -> ScVal {
        map(vec![
            (sym("options"), options(&["Red", "Green", "Blue"])),
            (sym("question"), string_to_scval("Favorite color?").unwrap()),
            (sym("votes"), votes),
        ])
    }

    #[test]
    fn test_struct_with_index_map() {
        let votes = map(vec![
            (ScVal::U32(0), ScVal::U32(3)),
            (ScVal::U32(2), ScVal::U32(1)),
        ]);

        let state = decode_poll_state(&poll_struct(votes)).unwrap();
        assert_eq!(state.question, "Favorite color?");
        assert_eq!(state.options, vec!["Red", "Green", "Blue"]);
        assert_eq!(state.votes, vec![3, 0, 1]);
    }

    #[test]
    fn test_pairs_tally() {
        let votes = vec_of(vec![
            vec_of(vec![ScVal::U32(1), ScVal::U32(4)]),
            vec_of(vec![ScVal::U64(0), ScVal::U64(2)]),
        ]);

        assert!(matches!(VoteTally::classify(&votes), VoteTally::Pairs(_)));
        let state = decode_poll_state(&poll_struct(votes)).unwrap();
        assert_eq!(state.votes, vec![2, 4, 0]);
    }

    #[test]
    fn test_keyed_tally() {
        let votes = map(vec![
            (string_to_scval("0").unwrap(), ScVal::U32(5)),
            (sym("2"), ScVal::U32(6)),
        ]);

        assert!(matches!(VoteTally::classify(&votes), VoteTally::Keyed(_)));
        let state = decode_poll_state(&poll_struct(votes)).unwrap();
        assert_eq!(state.votes, vec![5, 0, 6]);
    }

    #[test]
    fn test_unknown_tally_is_zero() {
        let state = decode_poll_state(&poll_struct(ScVal::Bool(true))).unwrap();
        assert_eq!(state.votes, vec![0, 0, 0]);
    }

    #[test]
    fn test_votes_always_match_options() {
        let tallies = vec![
            map(vec![(ScVal::U32(9), ScVal::U32(1))]),
            vec_of(vec![vec_of(vec![ScVal::U32(1), ScVal::U32(1)])]),
            map(vec![(sym("1"), ScVal::U32(1))]),
            vec_of(vec![ScVal::U32(1), ScVal::U32(2), ScVal::U32(3), ScVal::U32(4)]),
            ScVal::Map(None),
            ScVal::Void,
        ];

        for votes in tallies {
            let state = decode_poll_state(&poll_struct(votes)).unwrap();
            assert_eq!(state.votes.len(), state.options.len());
        }
    }

    #[test]
    fn test_tuple_form() {
        let value = vec_of(vec![
            string_to_scval("Q?").unwrap(),
            options(&["A", "B"]),
            map(vec![(ScVal::U32(1), ScVal::U32(7))]),
        ]);

        let state = decode_poll_state(&value).unwrap();
        assert_eq!(state.question, "Q?");
        assert_eq!(state.votes, vec![0, 7]);
    }

    #[test]
    fn test_bad_shape() {
        assert!(matches!(
            decode_poll_state(&ScVal::U32(1)),
            Err(ContractError::Decode(_))
        ));
        assert!(matches!(
            decode_poll_state(&map(vec![(sym("options"), options(&["A"]))])),
            Err(ContractError::Decode(_))
        ));
    }

    #[test]
    fn test_voter_choice() {
        assert_eq!(decode_voter_choice(&ScVal::Void), None);
        assert_eq!(decode_voter_choice(&ScVal::U32(2)), Some(2));
        assert_eq!(decode_voter_choice(&ScVal::I32(-1)), None);
    }
}
