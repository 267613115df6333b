//! Prompt text sent to the LLM.

use crate::platforms::Platform;

fn platform_guideline(platform: Platform) -> &'static str {
    match platform {
        Platform::LinkedIn => {
            "Write in a professional tone suitable for LinkedIn. Content should be insightful, \
             detailed (up to 1300 characters), and include 2-3 relevant hashtags. Format with \
             clear paragraphs and bullet points when applicable."
        }
        Platform::Twitter => {
            "Create concise content for Twitter/X under 280 characters. Use engaging language, \
             1-2 relevant hashtags, and a conversational tone. Consider adding a question or \
             call to action when appropriate."
        }
        Platform::Bluesky => {
            "Write for Bluesky with a community-focused approach under 300 characters. Use a \
             slightly more casual tone than Twitter while maintaining professionalism. Include \
             1-2 relevant hashtags."
        }
        Platform::Threads => {
            "Create content for Threads with a visual-first mindset. Write in a casual, \
             conversational tone. Content should be engaging and easy to read, with short \
             paragraphs and an authentic voice."
        }
    }
}

fn refinement_guideline(platform: Platform) -> &'static str {
    match platform {
        Platform::LinkedIn => "LinkedIn - Professional tone, up to 1300 characters, 2-3 hashtags",
        Platform::Twitter => "Twitter/X - Conversational tone, under 280 characters, 1-2 hashtags",
        Platform::Bluesky => "Bluesky - Community-focused, under 300 characters, 1-2 hashtags",
        Platform::Threads => "Threads - Casual tone, engaging format, short paragraphs",
    }
}

/// Guideline for a content type. Lookup ignores case and treats spaces as
/// underscores; unknown types get a generic guideline.
#[must_use]
pub fn content_type_guideline(content_type: &str) -> String {
    let key = content_type.trim().to_lowercase().replace(' ', "_");
    let known = match key.as_str() {
        "news_summary" => {
            "Summarize recent developments with factual accuracy. Include key points, \
             implications, and proper citations."
        }
        "trend_analysis" => {
            "Analyze current trends, providing insights into patterns, potential future \
             developments, and implications for professionals or consumers."
        }
        "deep_dive" => {
            "Provide comprehensive, in-depth analysis with multiple perspectives, detailed \
             explanations, and actionable insights. Include background context and expert \
             viewpoints."
        }
        "tip" => {
            "Provide actionable, practical advice that readers can implement. Be specific and \
             include examples where helpful."
        }
        "opinion" => "Offer an informed perspective on current developments, backed by facts and analysis.",
        "analysis" => "Provide thoughtful analysis and insights on the topic.",
        "guide" => "Create a helpful guide with step-by-step information.",
        "comparison" => "Compare different aspects, options, or approaches related to the topic.",
        "case_study" => "Present a detailed case study with analysis and lessons learned.",
        "tutorial" => "Create educational content that teaches something specific.",
        "review" => "Provide a comprehensive review with pros, cons, and recommendations.",
        _ => return format!("Create informative, engaging {content_type} content."),
    };
    known.to_string()
}

#[must_use]
pub fn generation_system_prompt(content_type: &str, platform: Platform) -> String {
    format!(
        "You are an expert social media content creator. Your task is to create ready-to-post \
content for social media platforms.

CONTENT TYPE: {content}

PLATFORM GUIDELINES: {platform}

CRITICAL: Respond ONLY with the final social media post content. Do not include:
- Your thinking process
- Explanations of your approach
- Meta-commentary about the content
- Step-by-step reasoning

Your response should be:
1. Ready to copy and paste directly to social media
2. Well-researched with accurate, up-to-date information
3. Engaging and valuable to the target audience
4. Properly formatted for the specified platform
5. Include citations only if they fit naturally in the post format

Provide ONLY the final social media post content - nothing else.",
        content = content_type_guideline(content_type),
        platform = platform_guideline(platform),
    )
}

#[must_use]
pub fn generation_user_prompt(topic: &str, content_type: &str, platform: Platform) -> String {
    format!(
        "Create a {content_type} post about \"{topic}\" for {platform}.

Requirements:
- Research current information about {topic}
- Include practical insights valuable to the audience
- Use platform-appropriate formatting and tone
- Make it engaging to encourage interaction

IMPORTANT: Provide ONLY the final social media post text - no explanations, no reasoning \
process, just the post content that's ready to publish."
    )
}

#[must_use]
pub fn refinement_system_prompt(platform: Platform) -> String {
    format!(
        "You are an expert social media content refiner. Your task is to improve existing social \
media content based on specific user requests.

PLATFORM: {}

CRITICAL INSTRUCTIONS:
- Refine the content according to the user's specific request
- Maintain the platform's character limits and formatting requirements
- Keep the core message and key information intact
- Respond ONLY with the refined social media post content
- Do not include explanations, reasoning, or meta-commentary
- The output should be ready to copy-paste to social media

Your refined content should be an improved version that addresses the user's specific \
refinement request while staying true to the original message.",
        refinement_guideline(platform)
    )
}

#[must_use]
pub fn refinement_user_prompt(original: &str, request: &str, platform: Platform) -> String {
    format!(
        "ORIGINAL CONTENT:
{original}

REFINEMENT REQUEST:
{request}

PLATFORM: {platform}

Please refine the original content according to the refinement request. Provide ONLY the \
improved social media post content - nothing else."
    )
}
