//! Instruction prompts for contract review.
//!
//! Two review lenses are available and exactly one is compiled in:
//!
//! * [`PromptVariant::ConstructionReview`] — contractor-protection review
//!   benchmarked against construction-industry norms (default build).
//! * [`PromptVariant::GeneralReview`] — general legal risk review, enabled
//!   with the `general-review` Cargo feature.
//!
//! The variant decides the system prompt, the user preamble, the prompt-text
//! budget, the required-field schema and which metadata is attached to the
//! result. [`PromptVariant::ACTIVE`] is the one the pipeline uses.

use crate::schema::{SchemaDescriptor, CONSTRUCTION_SCHEMA, GENERAL_SCHEMA};

/// System prompt for the construction-industry review.
pub const CONSTRUCTION_SYSTEM_PROMPT: &str = r#"You are a construction industry expert who analyzes contracts to protect contractors' business interests. Focus on INDUSTRY STANDARDS and CONTRACTOR PROTECTION, not just legal language.

Return a JSON object with these exact keys:

- contractor_protection_score: Number 1-100 (how well this contract protects the contractor's business)
- overall_risk: "Low", "Medium", or "High"
- contract_type: Type of construction contract detected
- risk_breakdown: Object with payment_risk, liability_risk, scope_risk, timeline_risk (each "Low", "Medium", or "High")
- critical_findings: Array of 3-5 objects with {category, risk_level, finding, impact, action}
- field_team_alerts: Array of 3-5 specific alerts for field teams/foremen
- industry_benchmarks: Object comparing this contract to construction industry standards
- recommendations: Array of 3-5 specific actions to improve contractor protection

FOCUS ON CONSTRUCTION-SPECIFIC ISSUES:
- Payment terms (pay-when-paid vs pay-if-paid, retention, progress payments)
- Change order procedures and markup allowances
- Indemnification overreach common in construction
- Lien waiver timing and conditions
- Material escalation provisions
- Liquidated damages and penalty clauses
- Insurance requirements vs industry norms
- Subcontractor flow-down provisions
- Safety compliance requirements
- Completion timeline reasonableness

Compare everything to CONSTRUCTION INDUSTRY STANDARDS:
- Standard payment terms (Net 30 is industry norm)
- Typical retention percentages (5-10%)
- Standard change order markups (10-20%)
- Common insurance requirements
- Industry-standard liquidated damages rates

Always prioritize the CONTRACTOR'S BUSINESS PROTECTION over pure legal analysis."#;

/// Preamble placed before the contract text in the construction user message.
pub const CONSTRUCTION_USER_PREAMBLE: &str =
    "Analyze this construction contract focusing on industry standards and contractor protection:";

/// System prompt for the general legal review.
pub const GENERAL_SYSTEM_PROMPT: &str = r#"You are an experienced contract attorney who reviews agreements for business owners. Identify the terms that create legal or financial exposure and explain them in plain language.

Return a JSON object with these exact keys:

- overall_risk: "Low", "Medium", or "High"
- risk_score: Number 1-100 (higher means more risk to the party receiving this review)
- contract_type: Type of contract detected
- payment_terms: One or two sentences summarising payment obligations and timing
- liability: One or two sentences summarising liability, indemnification and caps
- termination: One or two sentences summarising termination rights and notice periods
- insurance: One or two sentences summarising insurance requirements ("Not specified" if absent)
- key_risks: Array of 3-5 short strings, each a specific risky clause and why it matters
- recommendations: Array of 3-5 short strings, each a concrete change to request

Be specific: quote or paraphrase the clause you are evaluating. Do not invent terms that are not in the text."#;

/// Preamble placed before the contract text in the general user message.
pub const GENERAL_USER_PREAMBLE: &str = "Analyze this contract and identify its key risks:";

/// Prompt-text budget for the general review, in characters.
pub const GENERAL_MAX_PROMPT_CHARS: usize = 20_000;

/// Which review lens the build uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptVariant {
    ConstructionReview,
    GeneralReview,
}

impl PromptVariant {
    /// The variant compiled into this build.
    #[cfg(not(feature = "general-review"))]
    pub const ACTIVE: PromptVariant = PromptVariant::ConstructionReview;

    /// The variant compiled into this build.
    #[cfg(feature = "general-review")]
    pub const ACTIVE: PromptVariant = PromptVariant::GeneralReview;

    pub fn system_prompt(self) -> &'static str {
        match self {
            PromptVariant::ConstructionReview => CONSTRUCTION_SYSTEM_PROMPT,
            PromptVariant::GeneralReview => GENERAL_SYSTEM_PROMPT,
        }
    }

    pub fn user_preamble(self) -> &'static str {
        match self {
            PromptVariant::ConstructionReview => CONSTRUCTION_USER_PREAMBLE,
            PromptVariant::GeneralReview => GENERAL_USER_PREAMBLE,
        }
    }

    /// Character budget for the contract text inside the user message.
    /// `None` sends the whole validated text.
    pub fn max_prompt_chars(self) -> Option<usize> {
        match self {
            PromptVariant::ConstructionReview => None,
            PromptVariant::GeneralReview => Some(GENERAL_MAX_PROMPT_CHARS),
        }
    }

    /// Required-field contract for the model output.
    pub fn schema(self) -> &'static SchemaDescriptor {
        match self {
            PromptVariant::ConstructionReview => &CONSTRUCTION_SCHEMA,
            PromptVariant::GeneralReview => &GENERAL_SCHEMA,
        }
    }

    /// Whether the result carries the original `text_length`.
    pub fn records_text_length(self) -> bool {
        matches!(self, PromptVariant::GeneralReview)
    }

    /// Service name reported by the liveness probe.
    pub fn service_name(self) -> &'static str {
        match self {
            PromptVariant::ConstructionReview => "Construction Contract Analyzer API",
            PromptVariant::GeneralReview => "Contract Analyzer API",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompts_name_every_required_field() {
        for variant in [PromptVariant::ConstructionReview, PromptVariant::GeneralReview] {
            let prompt = variant.system_prompt();
            for name in variant.schema().field_names() {
                assert!(
                    prompt.contains(name),
                    "{variant:?} prompt does not mention '{name}'"
                );
            }
        }
    }

    #[test]
    fn only_general_review_truncates() {
        assert_eq!(PromptVariant::ConstructionReview.max_prompt_chars(), None);
        assert_eq!(
            PromptVariant::GeneralReview.max_prompt_chars(),
            Some(20_000)
        );
    }

    #[test]
    fn prompts_request_json() {
        assert!(CONSTRUCTION_SYSTEM_PROMPT.contains("JSON object"));
        assert!(GENERAL_SYSTEM_PROMPT.contains("JSON object"));
    }
}
