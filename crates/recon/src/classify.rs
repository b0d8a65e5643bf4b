use crate::model::PriorityTier;

/// Keyword rules in evaluation order. The first rule with a matching keyword
/// decides the tier, so "ncert ... jee advanced" is JEE Advanced. Text that
/// matches no rule is [`PriorityTier::Other`].
pub const TIER_RULES: &[(PriorityTier, &[&str])] = &[
    (PriorityTier::JeeAdvanced, &["jee advanced", "jee adv", "advanced"]),
    (PriorityTier::JeeMains, &["jee main", "jee mains", "mains"]),
    (PriorityTier::Ncert, &["ncert"]),
];

/// Classify a question text into its priority tier. Case-insensitive; empty
/// text is `Other`.
pub fn classify(text: &str) -> PriorityTier {
    let lowered = text.to_lowercase();
    TIER_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(tier, _)| *tier)
        .unwrap_or(PriorityTier::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_order_is_fixed() {
        let order: Vec<PriorityTier> = TIER_RULES.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            order,
            vec![PriorityTier::JeeAdvanced, PriorityTier::JeeMains, PriorityTier::Ncert]
        );
    }

    #[test]
    fn each_tier() {
        assert_eq!(classify("JEE Advanced 2021 Paper 2"), PriorityTier::JeeAdvanced);
        assert_eq!(classify("jee adv mock"), PriorityTier::JeeAdvanced);
        assert_eq!(classify("JEE Main 2020 (Jan shift)"), PriorityTier::JeeMains);
        assert_eq!(classify("Previous year MAINS"), PriorityTier::JeeMains);
        assert_eq!(classify("NCERT Class 11 Ex 3.2"), PriorityTier::Ncert);
        assert_eq!(classify("A ball is thrown upward"), PriorityTier::Other);
    }

    #[test]
    fn empty_is_other() {
        assert_eq!(classify(""), PriorityTier::Other);
    }

    #[test]
    fn advanced_beats_ncert() {
        assert_eq!(
            classify("NCERT based, asked in JEE Advanced"),
            PriorityTier::JeeAdvanced
        );
    }

    #[test]
    fn mains_beats_ncert() {
        assert_eq!(classify("ncert ... jee mains 2019"), PriorityTier::JeeMains);
    }

    #[test]
    fn bare_advanced_keyword_counts() {
        // "advanced" alone is a JEE Advanced signal even without "jee".
        assert_eq!(classify("Advanced level problem"), PriorityTier::JeeAdvanced);
    }

    #[test]
    fn casing_does_not_matter() {
        for text in ["Jee Advanced", "jee MAIN", "Ncert", "plain"] {
            assert_eq!(classify(text), classify(&text.to_uppercase()));
        }
    }
}
