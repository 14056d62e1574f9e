//! Difficulty distribution against the configured targets.

use serde::{Deserialize, Serialize};

use super::config::DifficultyConfig;
use super::coverage::round1;
use crate::dsl::{Difficulty, Paper, Question};
use crate::issue::{IssueCode, ValidationIssue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DifficultyHistogram {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
    pub unknown: usize,
}

/// Share of classified questions per level, 0-100, one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DifficultyPercentages {
    pub easy: f64,
    pub medium: f64,
    pub hard: f64,
}

impl DifficultyHistogram {
    pub fn add(&mut self, level: Difficulty) {
        match level {
            Difficulty::Easy => self.easy += 1,
            Difficulty::Medium => self.medium += 1,
            Difficulty::Hard => self.hard += 1,
            Difficulty::Unknown => self.unknown += 1,
        }
    }

    pub fn classified(&self) -> usize {
        self.easy + self.medium + self.hard
    }

    pub fn percentages(&self) -> Option<DifficultyPercentages> {
        let total = self.classified();
        if total == 0 {
            return None;
        }
        let pct = |n: usize| round1(n as f64 / total as f64 * 100.0);
        Some(DifficultyPercentages {
            easy: pct(self.easy),
            medium: pct(self.medium),
            hard: pct(self.hard),
        })
    }
}

impl DifficultyPercentages {
    pub fn get(&self, level: Difficulty) -> f64 {
        match level {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
            Difficulty::Unknown => 0.0,
        }
    }
}

/// Keyword guess for a question with no declared difficulty. Hard keywords
/// win over medium, medium over easy.
pub fn infer(text: &str, config: &DifficultyConfig) -> Difficulty {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    let mentions = |keywords: &[String]| {
        keywords
            .iter()
            .any(|k| words.iter().any(|w| w == &k.to_lowercase()))
    };

    if mentions(&config.hard_keywords) {
        Difficulty::Hard
    } else if mentions(&config.medium_keywords) {
        Difficulty::Medium
    } else if mentions(&config.easy_keywords) {
        Difficulty::Easy
    } else {
        Difficulty::Unknown
    }
}

/// Level counted for a question: the declared one, or the inferred one when
/// undeclared and inference is enabled. Sub-question text counts toward the
/// inference.
pub fn effective_level(question: &Question, config: &DifficultyConfig) -> Difficulty {
    match question.difficulty {
        Difficulty::Unknown if config.infer_from_text => infer(&question.full_text(), config),
        level => level,
    }
}

pub fn histogram(paper: &Paper, config: &DifficultyConfig) -> DifficultyHistogram {
    let mut hist = DifficultyHistogram::default();
    for q in &paper.questions {
        hist.add(effective_level(q, config));
    }
    hist
}

/// One warning per level whose share is further than the tolerance from its
/// target. Nothing to say when no question is classified.
pub fn check(hist: &DifficultyHistogram, config: &DifficultyConfig) -> Vec<ValidationIssue> {
    let Some(pct) = hist.percentages() else {
        return Vec::new();
    };

    let tolerance = config.tolerance * 100.0;
    [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
        .into_iter()
        .filter_map(|level| {
            let target = config.target(level)? * 100.0;
            let actual = pct.get(level);
            // Rounding noise must not flip a result sitting on the boundary.
            ((actual - target).abs() > tolerance + 1e-9).then(|| {
                ValidationIssue::warning(
                    IssueCode::DifficultyImbalance,
                    format!(
                        "difficulty imbalance: {} questions are {actual:.1}%, target {target:.0}% ± {tolerance:.0}%",
                        level.name().to_lowercase()
                    ),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{paper, question};
    use assert_approx_eq::assert_approx_eq;

    fn leveled(number: u32, level: Difficulty) -> Question {
        let mut q = question(number, 5);
        q.difficulty = level;
        q
    }

    #[test]
    fn balanced_paper_passes() {
        let questions = vec![
            leveled(1, Difficulty::Easy),
            leveled(2, Difficulty::Easy),
            leveled(3, Difficulty::Easy),
            leveled(4, Difficulty::Medium),
            leveled(5, Difficulty::Medium),
            leveled(6, Difficulty::Medium),
            leveled(7, Difficulty::Medium),
            leveled(8, Difficulty::Medium),
            leveled(9, Difficulty::Hard),
            leveled(10, Difficulty::Hard),
        ];
        let config = DifficultyConfig::default();
        let hist = histogram(&paper(50, questions), &config);
        assert_eq!(hist.classified(), 10);
        assert!(check(&hist, &config).is_empty());
    }

    #[test]
    fn all_hard_warns_per_level() {
        let questions = (1..=4).map(|n| leveled(n, Difficulty::Hard)).collect();
        let config = DifficultyConfig::default();
        let hist = histogram(&paper(20, questions), &config);
        let issues = check(&hist, &config);
        assert_eq!(issues.len(), 3);
        assert!(issues[2].message.starts_with("difficulty imbalance: hard questions are 100.0%"));
    }

    #[test]
    fn percentages_over_classified_only() {
        let hist = DifficultyHistogram {
            easy: 1,
            medium: 2,
            hard: 0,
            unknown: 5,
        };
        let pct = hist.percentages().unwrap();
        assert_approx_eq!(pct.easy, 33.3, 1e-9);
        assert_approx_eq!(pct.medium, 66.7, 1e-9);
        assert_approx_eq!(pct.hard, 0.0, 1e-9);
    }

    #[test]
    fn nothing_classified_skips_rule() {
        let config = DifficultyConfig {
            infer_from_text: false,
            ..DifficultyConfig::default()
        };
        let hist = histogram(&paper(5, vec![question(1, 5)]), &config);
        assert_eq!(hist.unknown, 1);
        assert!(check(&hist, &config).is_empty());
    }

    #[test]
    fn infer_prefers_hard_keywords() {
        let config = DifficultyConfig::default();
        assert_eq!(infer("Define and design a parser.", &config), Difficulty::Hard);
        assert_eq!(infer("Explain LR parsing.", &config), Difficulty::Medium);
        assert_eq!(infer("List the phases.", &config), Difficulty::Easy);
        assert_eq!(infer("What is a token?", &config), Difficulty::Unknown);
    }

    #[test]
    fn infer_matches_whole_words_only() {
        let config = DifficultyConfig::default();
        assert_eq!(infer("Listen carefully.", &config), Difficulty::Unknown);
    }

    #[test]
    fn inference_reads_subquestion_text() {
        let config = DifficultyConfig::default();
        let mut q = leveled(1, Difficulty::Unknown);
        q.text = "Answer both parts.".to_string();
        let mut sub = leveled(1, Difficulty::Unknown);
        sub.text = "Design a lexer for C.".to_string();
        q.subquestions.push(sub);
        assert_eq!(effective_level(&q, &config), Difficulty::Hard);
    }

    #[test]
    fn declared_level_is_never_overridden() {
        let config = DifficultyConfig::default();
        let mut q = leveled(1, Difficulty::Easy);
        q.text = "Design a compiler.".to_string();
        assert_eq!(effective_level(&q, &config), Difficulty::Easy);
    }
}
