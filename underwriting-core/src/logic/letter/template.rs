use super::types::{Decision, LetterRequest};

pub const REJECTED_NEXT_STEPS: &str = "If you would like to discuss this decision or explore options for improving your application, please don't hesitate to contact our office.";
pub const APPROVED_NEXT_STEPS: &str = "We look forward to providing you with excellent service.";

/// Deterministic letter used whenever generation fails. Infallible.
pub fn fallback_letter(request: &LetterRequest) -> String {
    let next_steps = match request.decision {
        Decision::Rejected => REJECTED_NEXT_STEPS,
        Decision::Approved => APPROVED_NEXT_STEPS,
    };

    let mut factors = String::new();
    for line in request.factor_lines() {
        factors.push_str("- ");
        factors.push_str(&line);
        factors.push('\n');
    }

    format!(
        "Dear {name},

Re: Policy Number {policy}

We are writing to inform you about the status of your insurance policy application. After careful review, your application has been {decision}.

The key factors that influenced this decision include:
{factors}
{next_steps}

Sincerely,
Your Insurance Team
",
        name = request.applicant_name,
        policy = request.policy_number,
        decision = request.decision.as_str().to_lowercase(),
        factors = factors,
        next_steps = next_steps,
    )
}
