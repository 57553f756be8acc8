use tracing::info;

/// Placeholder narrative generator standing in for an external reasoning
/// call. Picks one of three canned paragraphs from the priority named in
/// the prompt; a configured API key is accepted but not yet used.
pub struct InsightNarrator {
    #[allow(dead_code)]
    api_key: Option<String>,
}

impl InsightNarrator {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }

    // TODO: replace with a real completion call once a provider is wired up
    pub fn generate(&self, prompt: &str) -> String {
        info!("Generating insight narrative (placeholder)");

        if prompt.contains("Priority: HIGH") {
            "High sales velocity detected. Stock levels critically low. Immediate reorder recommended to prevent stockout."
                .to_string()
        } else if prompt.contains("Priority: MEDIUM") {
            "Moderate sales pattern observed. Stock approaching minimum threshold. Plan reorder within this week."
                .to_string()
        } else {
            "Stable inventory levels. Sales velocity is consistent. Current stock adequate for 2+ weeks."
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrative_selection() {
        let narrator = InsightNarrator::new(None);

        let high = narrator.generate("Days until stockout: 2\nPriority: HIGH\n\nProvide a brief insight");
        assert!(high.contains("critically low"));

        let medium = narrator.generate("Days until stockout: 5\nPriority: MEDIUM\n\nProvide a brief insight");
        assert!(medium.contains("Plan reorder"));

        let low = narrator.generate("Days until stockout: 47\nPriority: LOW\n\nProvide a brief insight");
        assert!(low.contains("Stable inventory"));
    }
}
