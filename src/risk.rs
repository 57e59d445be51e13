//! Investor risk-profile questionnaire
//!
//! Three multiple-choice questions, each answer scored 1 to 3. The total
//! selects a profile and its model bond/stock split.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A question with its answers, ordered by score starting at 1
#[derive(Debug, Clone, Copy)]
pub struct Question {
    pub text: &'static str,
    pub options: [&'static str; 3],
}

pub const QUESTIONS: [Question; 3] = [
    Question {
        text: "What is your main financial goal?",
        options: [
            "Preserve my capital (Safety)",
            "Grow steadily over time (Balanced)",
            "Maximize growth aggressively (Growth)",
        ],
    },
    Question {
        text: "When do you need to access your money?",
        options: ["Less than 3 years", "3 to 10 years", "10+ years"],
    },
    Question {
        text: "How would you react if your portfolio lost 20% in a month?",
        options: [
            "Sell everything immediately",
            "Hold and wait for recovery",
            "Buy more at lower prices",
        ],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskProfile {
    Conservative,
    Balanced,
    Aggressive,
}

impl RiskProfile {
    /// Profile for a questionnaire total
    pub fn from_total(total: u8) -> Self {
        match total {
            0..=4 => RiskProfile::Conservative,
            5..=7 => RiskProfile::Balanced,
            _ => RiskProfile::Aggressive,
        }
    }

    /// `(bonds %, stocks %)`
    pub fn allocation(&self) -> (u8, u8) {
        match self {
            RiskProfile::Conservative => (80, 20),
            RiskProfile::Balanced => (50, 50),
            RiskProfile::Aggressive => (10, 90),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RiskProfile::Conservative => "You prefer safety and stability over high returns.",
            RiskProfile::Balanced => "You want a balance between growth and safety.",
            RiskProfile::Aggressive => "You are willing to accept volatility for maximum growth.",
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskProfile::Conservative => write!(f, "Low Risk (Conservative)"),
            RiskProfile::Balanced => write!(f, "Medium Risk (Balanced)"),
            RiskProfile::Aggressive => write!(f, "High Risk (Aggressive)"),
        }
    }
}

/// Scored questionnaire
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub total: u8,
    pub profile: RiskProfile,
    pub bonds_pct: u8,
    pub stocks_pct: u8,
}

/// Scores one answer (1 to 3) per question
pub fn assess_risk(answers: &[u8]) -> Result<RiskAssessment> {
    if answers.len() != QUESTIONS.len() {
        return Err(ForecastError::InvalidInput(format!(
            "expected {} answers, got {}",
            QUESTIONS.len(),
            answers.len()
        )));
    }
    if let Some(bad) = answers.iter().find(|a| !(1..=3).contains(*a)) {
        return Err(ForecastError::InvalidInput(format!(
            "answer scores must be 1, 2 or 3, got {}",
            bad
        )));
    }

    let total: u8 = answers.iter().sum();
    let profile = RiskProfile::from_total(total);
    let (bonds_pct, stocks_pct) = profile.allocation();

    Ok(RiskAssessment {
        total,
        profile,
        bonds_pct,
        stocks_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_thresholds() {
        assert_eq!(assess_risk(&[1, 1, 1]).unwrap().profile, RiskProfile::Conservative);
        assert_eq!(assess_risk(&[2, 1, 1]).unwrap().profile, RiskProfile::Conservative);
        assert_eq!(assess_risk(&[2, 2, 1]).unwrap().profile, RiskProfile::Balanced);
        assert_eq!(assess_risk(&[3, 3, 1]).unwrap().profile, RiskProfile::Balanced);
        assert_eq!(assess_risk(&[3, 3, 2]).unwrap().profile, RiskProfile::Aggressive);
    }

    #[test]
    fn test_allocation() {
        let assessment = assess_risk(&[3, 3, 3]).unwrap();
        assert_eq!(assessment.total, 9);
        assert_eq!((assessment.bonds_pct, assessment.stocks_pct), (10, 90));
        assert_eq!(assessment.profile.to_string(), "High Risk (Aggressive)");
    }

    #[test]
    fn test_invalid_answers() {
        assert!(assess_risk(&[1, 2]).is_err());
        assert!(assess_risk(&[1, 2, 3, 1]).is_err());
        assert!(assess_risk(&[0, 2, 3]).is_err());
        assert!(assess_risk(&[1, 4, 3]).is_err());
    }
}
