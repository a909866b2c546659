use super::types::{ChatPrompt, LetterRequest};
use crate::constants::LETTER_SYSTEM_ROLE;

/// Instruction for the text generation service
pub fn build_prompt(request: &LetterRequest) -> ChatPrompt {
    let factors = request
        .factor_lines()
        .iter()
        .map(|line| format!("- {}", line))
        .collect::<Vec<_>>()
        .join("\n");

    let user = format!(
        "Write a professional underwriting decision letter with the following details:

Applicant: {name}
Policy Number: {policy}
Decision: {decision}

Top factors influencing the decision:
{factors}

The letter should:
1. Start with a professional greeting
2. State the decision clearly
3. If they were approved, explain the main positive factors that influenced the decision in a congratulatory way
4. If they were rejected, explain the main negative factors that influenced the decision in an understanding way
5. Provide constructive feedback and next steps
6. End with a professional closing

Keep the tone professional but empathetic.",
        name = request.applicant_name,
        policy = request.policy_number,
        decision = request.decision,
        factors = factors,
    );

    ChatPrompt {
        system: LETTER_SYSTEM_ROLE.to_string(),
        user,
    }
}
