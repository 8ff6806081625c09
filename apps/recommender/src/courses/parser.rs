//! Turns the generated text into course records.
//!
//! The structured path looks for a JSON list anywhere in the text. When there is
//! none, or it does not parse, the text is segmented heuristically: enumerated
//! lines ("1.", "Course 2:", ...) open a new section and `Key: value` lines inside
//! a section fill in the record fields.

use super::models::CourseRecord;

pub const MAX_COURSES: usize = 3;

const SECTION_MARKERS: [&str; 6] = ["1.", "2.", "3.", "Course 1:", "Course 2:", "Course 3:"];

/// Field triggers in priority order. The first trigger found in a line wins.
const TRIGGERS: [(&[&str], Field); 5] = [
    (&["course", "name"], Field::CourseName),
    (&["provider"], Field::Provider),
    (&["description"], Field::Description),
    (&["url", "http"], Field::Url),
    (&["relevan"], Field::Relevance),
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    CourseName,
    Provider,
    Description,
    Url,
    Relevance,
}

/// Structured parse with heuristic fallback. Never returns more than [`MAX_COURSES`].
pub fn parse_course_response(text: &str) -> Vec<CourseRecord> {
    let mut courses = parse_json_courses(text).unwrap_or_else(|| parse_unstructured(text));
    courses.truncate(MAX_COURSES);
    courses
}

/// The span from the first `[` to the last `]`, inclusive.
pub fn json_list_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

fn parse_json_courses(text: &str) -> Option<Vec<CourseRecord>> {
    let span = json_list_span(text)?;
    serde_json::from_str(span).ok()
}

enum Segment {
    Closed,
    Open(String),
}

/// Splits text into enumerated sections. Lines before the first marker are dropped.
pub fn split_sections(text: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut state = Segment::Closed;

    for line in text.split('\n') {
        state = match (state, opens_section(line)) {
            (Segment::Closed, false) => Segment::Closed,
            (Segment::Closed, true) => Segment::Open(line.to_string()),
            (Segment::Open(done), true) => {
                sections.push(done);
                Segment::Open(line.to_string())
            }
            (Segment::Open(mut section), false) => {
                section.push('\n');
                section.push_str(line);
                Segment::Open(section)
            }
        };
    }

    if let Segment::Open(last) = state {
        sections.push(last);
    }
    sections
}

fn opens_section(line: &str) -> bool {
    let line = line.trim();
    SECTION_MARKERS.iter().any(|marker| line.starts_with(marker))
}

/// Heuristic extraction for responses without a usable JSON list.
pub fn parse_unstructured(text: &str) -> Vec<CourseRecord> {
    split_sections(text)
        .into_iter()
        .take(MAX_COURSES)
        .map(|section| section_to_record(&section))
        .collect()
}

fn section_to_record(section: &str) -> CourseRecord {
    let mut record = CourseRecord {
        course_name: "Unknown Course".to_string(),
        provider: "Unknown Provider".to_string(),
        description: section.to_string(),
        url: String::new(),
        relevance: String::new(),
    };

    for line in section.split('\n') {
        let line = line.trim();
        let Some(field) = classify(line) else {
            continue;
        };
        if let Some((_, value)) = line.split_once(':') {
            let value = value.trim().to_string();
            match field {
                Field::CourseName => record.course_name = value,
                Field::Provider => record.provider = value,
                Field::Description => record.description = value,
                Field::Url => record.url = value,
                Field::Relevance => record.relevance = value,
            }
        }
    }
    record
}

fn classify(line: &str) -> Option<Field> {
    let lower = line.to_lowercase();
    TRIGGERS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, field)| *field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerated_sections_pick_up_providers() {
        let courses =
            parse_course_response("1. Course A\nProvider: Udemy\n2. Course B\nProvider: edX");
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].provider, "Udemy");
        assert_eq!(courses[1].provider, "edX");
        // "1. Course A" has no colon, so the default name stays.
        assert_eq!(courses[0].course_name, "Unknown Course");
    }

    #[test]
    fn test_fallback_caps_at_three_sections() {
        let text = "1. A\n2. B\n3. C\nCourse 1: D\nCourse 2: E";
        assert_eq!(split_sections(text).len(), 5);
        assert_eq!(parse_course_response(text).len(), MAX_COURSES);
    }

    #[test]
    fn test_json_list_embedded_in_prose() {
        let text = r#"Here are courses: [{"course_name":"X","provider":"Y","description":"Z","url":"https://x.example","relevance":"High"}] Thanks"#;
        let courses = parse_course_response(text);
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].course_name, "X");
        assert_eq!(courses[0].url, "https://x.example");
    }

    #[test]
    fn test_json_list_inside_markdown_fence() {
        let text = "```json\n[{\"course_name\": \"A\"}, {\"course_name\": \"B\"}, {\"course_name\": \"C\"}, {\"course_name\": \"D\"}]\n```";
        let courses = parse_course_response(text);
        assert_eq!(courses.len(), 3);
        assert_eq!(courses[2].course_name, "C");
    }

    #[test]
    fn test_malformed_json_falls_back_to_sections() {
        let text = "1. Course name: Rust Fundamentals\nProvider: Udemy\n[not json]";
        let courses = parse_course_response(text);
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].course_name, "Rust Fundamentals");
        assert_eq!(courses[0].provider, "Udemy");
    }

    #[test]
    fn test_provider_containing_course_is_read_as_course_name() {
        // "Coursera" contains "course", which outranks the provider trigger.
        let record = section_to_record("1. X\nProvider: Coursera");
        assert_eq!(record.course_name, "Coursera");
        assert_eq!(record.provider, "Unknown Provider");
    }

    #[test]
    fn test_reversed_brackets_have_no_span() {
        assert_eq!(json_list_span("] before ["), None);
        assert_eq!(json_list_span("no brackets"), None);
        assert_eq!(json_list_span("a [1] b [2] c"), Some("[1] b [2]"));
    }

    #[test]
    fn test_text_before_first_marker_is_dropped() {
        let sections = split_sections("Sure! Here you go:\n\n1. First\ndetails\n2. Second");
        assert_eq!(sections, vec!["1. First\ndetails".to_string(), "2. Second".to_string()]);
    }

    #[test]
    fn test_no_markers_yields_no_courses() {
        assert!(parse_course_response("I cannot help with that.").is_empty());
    }

    #[test]
    fn test_indented_markers_open_sections() {
        let sections = split_sections("   Course 1: Data Viz\n   Course 2: Statistics");
        assert_eq!(sections.len(), 2);
    }

    #[test]
    fn test_all_fields_extracted_and_description_defaults_to_section() {
        let section = "1. Course Name: Terraform Up & Running\nProvider: Pluralsight\nURL: https://example.com/tf\nRelevance: infra as code";
        let record = section_to_record(section);
        assert_eq!(record.course_name, "Terraform Up & Running");
        assert_eq!(record.provider, "Pluralsight");
        assert_eq!(record.url, "https://example.com/tf");
        assert_eq!(record.relevance, "infra as code");
        assert_eq!(record.description, section);
    }

    #[test]
    fn test_first_matching_trigger_wins() {
        // Mentions "course", so it is read as the course name, not the description.
        let record = section_to_record("1. X\nDescription: a course on SQL");
        assert_eq!(record.course_name, "a course on SQL");
        assert!(record.description.starts_with("1. X"));

        // "url" outranks "relevan".
        let record = section_to_record("1. X\nRelevant url: https://example.com");
        assert_eq!(record.url, "https://example.com");
        assert_eq!(record.relevance, "");
    }
}
