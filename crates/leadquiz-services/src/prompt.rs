use leadquiz_core::domain::UserAnswer;

/// Prompt sent to the assessment model for one user.
pub fn build_prompt(answers: &[UserAnswer], user_name: &str) -> String {
    let profile = answers
        .iter()
        .map(|answer| {
            format!(
                "Question: {}\nAnswer: {}",
                answer.question_text, answer.selected_option.label
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are an expert academic consultant for international students wishing to study in Germany.
The user's name is \"{user_name}\".

Analyze the following user profile based on their answers to {count} key questions.

Determine two main things:
1. Eligibility: Can they legally and academically get admission? (Consider HZB rules and Language).
2. Ability: Can they afford it and succeed?

CRITICAL INSTRUCTION:
- Address the user directly as \"{user_name}\".
- Write the 'title', 'description', 'recommendation' and analysis fields directly to the user.
- Make it sound very personal, encouraging, yet realistic.
- KEEP THE CONTENT CONCISE AND BRIEF. Short paragraphs. Focus on the bottom line.

User Profile Data:
{profile}

Provide a strictly formatted JSON response.
",
        count = answers.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::build_prompt;
    use leadquiz_core::domain::QuizSession;

    #[test]
    fn prompt_addresses_user_and_lists_answers() {
        let mut session = QuizSession::new();
        session.answer("master").unwrap();
        session.answer("average").unwrap();

        let prompt = build_prompt(session.answers(), "Anjali");
        assert!(prompt.contains("The user's name is \"Anjali\"."));
        assert!(prompt.contains("answers to 2 key questions"));
        assert!(prompt.contains(
            "Question: What is your highest academic qualification?\nAnswer: Master’s Degree\n\n\
             Question: What is your approximate Grade/GPA?\nAnswer: Average (60-75% / GPA 2.5+)"
        ));
        assert!(prompt.ends_with("Provide a strictly formatted JSON response.\n"));
    }
}
