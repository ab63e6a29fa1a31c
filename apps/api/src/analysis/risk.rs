use crate::analysis::models::Level;

/// Re-derives a qualitative risk label from an authenticity score.
///
/// score >= 80 → low, 60..80 → medium, < 60 → high.
/// Independent of the `risk_assessment` the model emits; the two can disagree.
pub fn risk_level(authenticity_score: u8) -> Level {
    match authenticity_score {
        80.. => Level::Low,
        60..=79 => Level::Medium,
        _ => Level::High,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_bands() {
        assert_eq!(risk_level(85), Level::Low);
        assert_eq!(risk_level(70), Level::Medium);
        assert_eq!(risk_level(40), Level::High);
    }

    #[test]
    fn test_risk_level_boundaries() {
        assert_eq!(risk_level(80), Level::Low);
        assert_eq!(risk_level(79), Level::Medium);
        assert_eq!(risk_level(60), Level::Medium);
        assert_eq!(risk_level(59), Level::High);
        assert_eq!(risk_level(0), Level::High);
        assert_eq!(risk_level(100), Level::Low);
    }

    #[test]
    fn test_risk_level_labels() {
        assert_eq!(risk_level(85).as_str(), "low");
        assert_eq!(risk_level(60).as_str(), "medium");
    }
}
