//! Big Five score vectors and the scoring collaborator.

use rand::Rng;
use serde::Serialize;
use std::fmt;

use crate::errors::{SessionError, SessionResult};

/// The five OCEAN traits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BigFiveTrait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl BigFiveTrait {
    pub const ALL: [BigFiveTrait; 5] = [
        BigFiveTrait::Openness,
        BigFiveTrait::Conscientiousness,
        BigFiveTrait::Extraversion,
        BigFiveTrait::Agreeableness,
        BigFiveTrait::Neuroticism,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BigFiveTrait::Openness => "Openness",
            BigFiveTrait::Conscientiousness => "Conscientiousness",
            BigFiveTrait::Extraversion => "Extraversion",
            BigFiveTrait::Agreeableness => "Agreeableness",
            BigFiveTrait::Neuroticism => "Neuroticism",
        }
    }
}

impl fmt::Display for BigFiveTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One score per trait, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScoreVector {
    openness: f64,
    conscientiousness: f64,
    extraversion: f64,
    agreeableness: f64,
    neuroticism: f64,
}

impl ScoreVector {
    pub fn new(
        openness: f64,
        conscientiousness: f64,
        extraversion: f64,
        agreeableness: f64,
        neuroticism: f64,
    ) -> SessionResult<Self> {
        let scores = Self {
            openness,
            conscientiousness,
            extraversion,
            agreeableness,
            neuroticism,
        };
        for (name, value) in scores.iter() {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(SessionError::Scoring(format!(
                    "{} score {} is outside [0, 1]",
                    name, value
                )));
            }
        }
        Ok(scores)
    }

    /// All scores zero; the state before any analysis
    pub fn zeroed() -> Self {
        Self::default()
    }

    pub fn get(&self, name: BigFiveTrait) -> f64 {
        match name {
            BigFiveTrait::Openness => self.openness,
            BigFiveTrait::Conscientiousness => self.conscientiousness,
            BigFiveTrait::Extraversion => self.extraversion,
            BigFiveTrait::Agreeableness => self.agreeableness,
            BigFiveTrait::Neuroticism => self.neuroticism,
        }
    }

    /// Score as a whole percentage, rounded
    pub fn percent(&self, name: BigFiveTrait) -> u8 {
        (self.get(name) * 100.0).round() as u8
    }

    /// Trait/score pairs in OCEAN order
    pub fn iter(&self) -> impl Iterator<Item = (BigFiveTrait, f64)> + '_ {
        BigFiveTrait::ALL
            .into_iter()
            .map(move |t| (t, self.get(t)))
    }
}

/// Derives a score vector from a user's writing
pub trait Scorer: Send + Sync {
    fn score(&self, text: &str) -> SessionResult<ScoreVector>;
}

/// Stand-in scorer that ignores the text and draws uniform scores
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomScorer;

impl Scorer for RandomScorer {
    fn score(&self, _text: &str) -> SessionResult<ScoreVector> {
        let mut rng = rand::thread_rng();
        ScoreVector::new(
            rng.gen_range(0.0..=1.0),
            rng.gen_range(0.0..=1.0),
            rng.gen_range(0.0..=1.0),
            rng.gen_range(0.0..=1.0),
            rng.gen_range(0.0..=1.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_scores_in_range() {
        let scorer = RandomScorer;
        for _ in 0..200 {
            let scores = scorer.score("some writing").unwrap();
            let values: Vec<_> = scores.iter().collect();
            assert_eq!(values.len(), 5);
            for (_, value) in values {
                assert!((0.0..=1.0).contains(&value));
            }
        }
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(ScoreVector::new(0.1, 0.2, 1.2, 0.4, 0.5).is_err());
        assert!(ScoreVector::new(-0.01, 0.2, 0.3, 0.4, 0.5).is_err());
        assert!(ScoreVector::new(f64::NAN, 0.2, 0.3, 0.4, 0.5).is_err());
        assert!(ScoreVector::new(0.0, 1.0, 0.3, 0.4, 0.5).is_ok());
    }

    #[test]
    fn test_percent_rounds() {
        let scores = ScoreVector::new(0.125, 0.994, 0.0, 0.5, 0.336).unwrap();
        assert_eq!(scores.percent(BigFiveTrait::Openness), 13);
        assert_eq!(scores.percent(BigFiveTrait::Conscientiousness), 99);
        assert_eq!(scores.percent(BigFiveTrait::Extraversion), 0);
        assert_eq!(scores.percent(BigFiveTrait::Neuroticism), 34);
    }

    #[test]
    fn test_zeroed_has_all_traits() {
        let scores = ScoreVector::zeroed();
        assert!(scores.iter().all(|(_, v)| v == 0.0));
        assert_eq!(scores.iter().count(), 5);
    }
}
