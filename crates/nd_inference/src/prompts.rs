use nd_core::Prompt;

/// Builds the three analyzer prompts over the day's combined article text.
pub fn summary(big_text: &str) -> Prompt {
    Prompt::new(
        "You are an analyst specializing in Korean IT trends.",
        format!(
            "Below is a collection of AI-related article texts gathered today.\n\
             Based on these, generate a single-sentence summary representing today's major AI/IT trend.\n\n\
             Requirements:\n\
             - 1 sentence in English\n\
             - Clear and concise\n\n\
             Article text:\n{}\n",
            big_text
        ),
    )
}

pub fn keywords(big_text: &str) -> Prompt {
    Prompt::new(
        "You are an analyst specializing in Korean IT trend keywords.",
        format!(
            "Below is a collection of AI-related article texts gathered today.\n\
             Extract 5 keywords that represent today's AI/IT trends.\n\n\
             Requirements:\n\
             - 5 keywords in English\n\
             - Return only a comma-separated string\n\n\
             Article text:\n{}\n",
            big_text
        ),
    )
}

pub fn insight(big_text: &str) -> Prompt {
    Prompt::new(
        "You are an expert analyst of Korean AI/IT news insights.",
        format!(
            "Below is a collection of AI-related article texts gathered today.\n\
             Analyze the content and generate a 'Daily AI Insight' summarizing today's overall AI/IT trend.\n\n\
             Requirements:\n\
             - Written in English\n\
             - 5-8 full sentences\n\
             - Provide a logical and natural summary of the daily trend\n\n\
             Article text:\n{}\n",
            big_text
        ),
    )
}
