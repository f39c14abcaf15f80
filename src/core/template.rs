//! Example document for trying out the analysis.

/// A meeting transcript with enough signal for the service to find risks.
pub const TEMPLATE_CONTENT: &str = r#"Example Template: Business Meeting Transcript

Meeting Transcript
Company: PT. RISKSIGHT AI
Date: June 12, 2024
Participants:
- Reza (CEO)
- Lita (CTO)
- Dimas (CFO)
- Maya (Product Lead)

Agenda:
- Financial Condition
- Market Competition
- Technology Infrastructure Readiness
- HR and Product Development

Discussion:

Reza:
"We only have about 4 months of runway left if we don't get additional funding. We need to find new investors quickly or look for other monetization strategies."

Dimas:
"Yes, our cash flow has declined since Q1. And operational costs have increased with the recent hiring."

Lita:
"There is a potential bottleneck in the development team. We're short on people for several key features."

Maya:
"A competitor from Singapore just launched a similar product with advanced analytics features. They're starting to take our market share in the retail sector."

Reza:
"We also need to think about how to ensure our backend system can handle if user growth doubles."

Additional Notes:
- No legal framework yet for local data compliance regulations.
- High dependency on one senior engineer for all deployments.

Use a document like this so the AI can optimally identify potential business risks."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_is_long_enough_to_analyze() {
        // The service rejects documents under 50 characters.
        assert!(TEMPLATE_CONTENT.trim().chars().count() > 50);
        assert!(TEMPLATE_CONTENT.contains("Meeting Transcript"));
    }
}
