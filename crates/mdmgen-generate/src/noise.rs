//! Noise injection for propagated attribute values.
//!
//! Both injectors leave their input untouched with probability
//! `unchanged_probability` and draw every random decision from the caller's
//! random source.

use rand::{Rng, RngCore};

use crate::errors::GenerationError;

/// Default `unchanged_probability` for [`typo`].
pub const DEFAULT_TYPO_UNCHANGED: f64 = 0.5;
/// Default `unchanged_probability` for [`mess_up_email`].
pub const DEFAULT_EMAIL_UNCHANGED: f64 = 0.9;

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];
const SOFT_CONSONANTS: &[char] = &['b', 'd', 'g', 'j', 'z', 'v'];
const HARD_CONSONANTS: &[char] = &['p', 't', 'k', 'q', 'c'];
const OTHER_CONSONANTS: &[char] = &['f', 'h', 'm', 'l', 'n', 'r', 's', 'w', 'x', 'y'];

/// Group of letters that a typo may swap between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneticClass {
    Vowel,
    SoftConsonant,
    HardConsonant,
    OtherConsonant,
}

impl PhoneticClass {
    /// Classify a character, ignoring case. Characters outside every group
    /// (digits, punctuation, `@`) fall into [`PhoneticClass::OtherConsonant`].
    pub fn of(letter: char) -> Self {
        let lower = letter.to_ascii_lowercase();
        if VOWELS.contains(&lower) {
            Self::Vowel
        } else if SOFT_CONSONANTS.contains(&lower) {
            Self::SoftConsonant
        } else if HARD_CONSONANTS.contains(&lower) {
            Self::HardConsonant
        } else {
            Self::OtherConsonant
        }
    }

    pub fn letters(self) -> &'static [char] {
        match self {
            Self::Vowel => VOWELS,
            Self::SoftConsonant => SOFT_CONSONANTS,
            Self::HardConsonant => HARD_CONSONANTS,
            Self::OtherConsonant => OTHER_CONSONANTS,
        }
    }
}

/// Replace one random character of `word` with a different letter of the
/// same phonetic class, preserving case.
///
/// Returns `word` unchanged with probability `unchanged_probability`.
pub fn typo(
    word: &str,
    unchanged_probability: f64,
    rng: &mut dyn RngCore,
) -> Result<String, GenerationError> {
    if word.is_empty() {
        return Err(GenerationError::EmptyInput);
    }
    if rng.random::<f64>() < unchanged_probability {
        return Ok(word.to_string());
    }

    let mut letters: Vec<char> = word.chars().collect();
    let index = rng.random_range(0..letters.len());
    let original = letters[index];
    let lower = original.to_ascii_lowercase();
    let class = PhoneticClass::of(original).letters();

    let replacement = loop {
        let candidate = class[rng.random_range(0..class.len())];
        if candidate != lower {
            break candidate;
        }
    };

    letters[index] = if original.is_uppercase() {
        replacement.to_ascii_uppercase()
    } else {
        replacement
    };
    Ok(letters.into_iter().collect())
}

/// Replace every `@` in `email` with `_at_`.
///
/// The mutation happens when a uniform draw exceeds `unchanged_probability`.
pub fn mess_up_email(email: &str, unchanged_probability: f64, rng: &mut dyn RngCore) -> String {
    if rng.random::<f64>() > unchanged_probability {
        email.replace('@', "_at_")
    } else {
        email.to_string()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn differing_positions(a: &str, b: &str) -> Vec<(usize, char, char)> {
        a.chars()
            .zip(b.chars())
            .enumerate()
            .filter(|(_, (x, y))| x != y)
            .map(|(idx, (x, y))| (idx, x, y))
            .collect()
    }

    #[test]
    fn typo_forced_changes_exactly_one_position_within_class() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..500 {
            let result = typo("cat", 0.0, &mut rng).expect("typo");
            assert_eq!(result.chars().count(), 3);
            let diffs = differing_positions("cat", &result);
            assert_eq!(diffs.len(), 1, "expected one change in {result}");
            let (_, original, replacement) = diffs[0];
            assert_eq!(PhoneticClass::of(original), PhoneticClass::of(replacement));
            match original {
                'c' | 't' => assert!(HARD_CONSONANTS.contains(&replacement)),
                'a' => assert!(VOWELS.contains(&replacement)),
                other => panic!("unexpected original {other}"),
            }
        }
    }

    #[test]
    fn typo_never_changes_when_unchanged_probability_is_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            assert_eq!(typo("Maria", 1.0, &mut rng).expect("typo"), "Maria");
        }
    }

    #[test]
    fn typo_preserves_case_of_replaced_letter() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let result = typo("A", 0.0, &mut rng).expect("typo");
            let letter = result.chars().next().expect("one char");
            assert!(letter.is_ascii_uppercase(), "{letter} lost its case");
            assert_ne!(letter, 'A');
            assert_eq!(PhoneticClass::of(letter), PhoneticClass::Vowel);
        }
    }

    #[test]
    fn typo_mutation_rate_tracks_unchanged_probability() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let trials = 4000;
        let mutated = (0..trials)
            .filter(|_| typo("b", 0.75, &mut rng).expect("typo") != "b")
            .count();
        let rate = mutated as f64 / trials as f64;
        assert!((0.2..0.3).contains(&rate), "mutation rate {rate}");
    }

    #[test]
    fn typo_maps_unclassified_characters_to_other_consonants() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let result = typo("@", 0.0, &mut rng).expect("typo");
        let letter = result.chars().next().expect("one char");
        assert!(OTHER_CONSONANTS.contains(&letter));
    }

    #[test]
    fn typo_rejects_empty_input() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            typo("", 0.0, &mut rng),
            Err(GenerationError::EmptyInput)
        ));
    }

    #[test]
    fn mess_up_email_keeps_input_when_unchanged_probability_is_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..200 {
            assert_eq!(
                mess_up_email("jane@example.com", 1.0, &mut rng),
                "jane@example.com"
            );
        }
    }

    #[test]
    fn mess_up_email_replaces_every_at_sign() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        assert_eq!(
            mess_up_email("a@b@c.org", 0.0, &mut rng),
            "a_at_b_at_c.org"
        );
    }
}
