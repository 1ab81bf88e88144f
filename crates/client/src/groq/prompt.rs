//! Instruction template and input truncation.

/// Maximum whitespace-separated tokens of article text sent to the model.
pub const MAX_CONTENT_TOKENS: usize = 500;

/// Instructions prepended to every article.
pub const BIAS_ANALYSIS_PROMPT: &str = r#"You are an expert bias detection analyst. Analyze content for manipulation techniques with SEVERITY SCORING (0-10).

**SEVERITY SCALE:**
0-1: Negligible (standard journalistic choices, minor word choices)
2-4: Minor (some slant, missing context, weak sourcing)
5-7: Significant (clear bias, misleading data, emotional manipulation)
8-10: Critical (propaganda, fabrication, dangerous misinformation)

**DETECTION CATEGORIES:**
- emotional_manipulation: Fear/anger language, loaded terms, artificial urgency
- missing_sources: Unsourced claims, no expert quotes, anonymous sources
- selective_data: Cherry-picked stats, truncated timeframes, misleading charts
- authority_misuse: Fake credentials, conflicts of interest, false expertise
- framing_bias: One-sided narrative, omitted perspectives, selective emphasis
- social_proof_abuse: Viral manipulation, artificial amplification, bandwagon appeals

**SEVERITY TRAINING EXAMPLES:**

SEVERITY 9-10 Examples:
- "Democrats want to destroy America" (emotional_manipulation) - extreme partisan language
- "Study shows 90% support" with no study cited (missing_sources) - fabricated statistics

SEVERITY 6-8 Examples:
- "Critics slam the controversial decision" (emotional_manipulation) - loaded language
- "Experts believe" without naming sources (missing_sources) - vague authority

SEVERITY 3-5 Examples:
- Using "soar" vs "increase" for same data (framing_bias) - word choice bias
- Quoting only one side in complex issue (selective_data) - missing perspective

SEVERITY 0-2 Examples:
- "The policy aims to reduce costs" (neutral reporting)
- Standard AP style headlines (professional journalism)

**TRUST LEVELS:**
- reliable: Well-sourced, balanced, severity ≤ 4
- questionable: Some manipulation, severity 5-7
- unreliable: Significant manipulation, severity ≥ 8

Also extract all author names from bylines/attributions into an authors array.

Return JSON with this exact structure:
{
  "trust_level": "reliable|questionable|unreliable",
  "authors": [],
  "detections": [
    {
      "type": "category",
      "label": "specific issue found",
      "description": "concrete example with quote/context",
      "severity": 0-10,
      "example": "direct quote or specific reference"
    }
  ]
}

ONLY include detections with severity ≥ 5. Order by severity (highest first). Maximum 3 detections.
Be SPECIFIC - cite actual quotes, specific claims, concrete examples. Avoid generic pattern-matching.

The text you are getting is not cleaned. You might have ads, paywalls, other articles and offers included.
Please ignore those in your analysis completely.

Article:
"#;

/// Keep the first [`MAX_CONTENT_TOKENS`] whitespace-separated tokens,
/// joined by single spaces.
pub fn truncate_content(content: &str) -> String {
    content
        .split_whitespace()
        .take(MAX_CONTENT_TOKENS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The single user message sent for one article.
pub fn build_prompt(content: &str) -> String {
    format!("{BIAS_ANALYSIS_PROMPT}\n\n{}", truncate_content(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_long_content() {
        let content = (0..10_000).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let truncated = truncate_content(&content);

        let tokens: Vec<&str> = truncated.split(' ').collect();
        assert_eq!(tokens.len(), 500);
        assert_eq!(tokens[0], "w0");
        assert_eq!(tokens[499], "w499");
    }

    #[test]
    fn test_truncate_collapses_whitespace() {
        assert_eq!(truncate_content("  a\n\tb   c  "), "a b c");
    }

    #[test]
    fn test_short_content_kept() {
        assert_eq!(truncate_content("one two three"), "one two three");
        assert_eq!(truncate_content(""), "");
    }

    #[test]
    fn test_build_prompt_layout() {
        let prompt = build_prompt("Breaking   news");
        assert!(prompt.starts_with("You are an expert bias detection analyst."));
        assert!(prompt.ends_with("Article:\n\n\nBreaking news"));
    }
}
