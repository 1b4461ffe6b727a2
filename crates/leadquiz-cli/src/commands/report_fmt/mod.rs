use leadquiz_core::domain::{AssessmentResult, EligibilityStatus};

pub(crate) fn status_label(status: EligibilityStatus) -> &'static str {
    match status {
        EligibilityStatus::High => "HIGH",
        EligibilityStatus::Moderate => "MODERATE",
        EligibilityStatus::Low => "LOW",
    }
}

pub(crate) fn render_report(result: &AssessmentResult, user_name: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(name) = user_name {
        out.push_str(&format!("Report for {name}\n\n"));
    }

    let eligibility = &result.eligibility;
    out.push_str(&format!(
        "[{}] {}\n",
        status_label(eligibility.status),
        eligibility.title
    ));
    out.push_str(&format!("{}\n", eligibility.description));
    if !eligibility.key_factors.is_empty() {
        out.push_str("\nKey factors:\n");
        for factor in &eligibility.key_factors {
            out.push_str(&format!("  - {factor}\n"));
        }
    }

    let ability = &result.ability;
    out.push_str("\nOur recommendation:\n");
    out.push_str(&format!("  \"{}\"\n", ability.recommendation));
    out.push_str("\nKey analysis:\n");
    out.push_str(&format!("  Academics: {}\n", ability.academic_analysis));
    out.push_str(&format!("  Language: {}\n", ability.language_analysis));
    out.push_str(&format!("  Finances: {}\n", ability.financial_analysis));
    out.push_str(&format!("\nAbility score: {}/100\n", ability.score));
    out
}
