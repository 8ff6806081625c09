// Prompt for course enrichment. Placeholders are filled in a single pass, so a
// value that itself looks like a placeholder is never substituted again.

use std::sync::OnceLock;

use regex::{Captures, Regex};

pub const COURSE_PROMPT_TEMPLATE: &str = r#"Based on this resume:

{resume_text}

I need 3 specific training courses available online that would help this person qualify for a {job_title} position.

For each course, provide:
1. Course name
2. Provider (website/platform)
3. Brief description of what skills it will teach
4. URL if available
5. Why it's relevant for this specific job

Format as a JSON list with course_name, provider, description, url, and relevance fields."#;

pub fn course_prompt(job_title: &str, resume_text: &str) -> String {
    placeholder_re()
        .replace_all(COURSE_PROMPT_TEMPLATE, |caps: &Captures| match &caps[1] {
            "job_title" => job_title,
            _ => resume_text,
        })
        .into_owned()
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{(job_title|resume_text)\}").expect("valid regex"))
}
