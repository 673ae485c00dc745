use super::types::Section;

pub const DEFAULT_SECTION_MARKERS: [&str; 3] = ["#", "##", "###"];

const INTRODUCTION_HEADER: &str = "Introduction";

/// Split `text` into sections delimited by header lines.
///
/// A line is a header when its trimmed form starts with any of `markers`. Text before the
/// first header is attributed to an `"Introduction"` section. Sections with blank bodies are
/// dropped, so consecutive headers keep only the last one.
#[must_use]
pub fn split_sections<S: AsRef<str>>(text: &str, markers: &[S]) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current = String::new();
    let mut header = INTRODUCTION_HEADER.to_owned();

    for line in text.split('\n') {
        let trimmed = line.trim();
        if markers.iter().any(|m| trimmed.starts_with(m.as_ref())) {
            flush(&mut sections, &current, &header);
            current.clear();
            trimmed.clone_into(&mut header);
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }

    flush(&mut sections, &current, &header);
    sections
}

fn flush(sections: &mut Vec<Section>, body: &str, header: &str) {
    let content = body.trim();
    if !content.is_empty() {
        sections.push(Section {
            content: content.to_owned(),
            header: header.to_owned(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_headed_sections() {
        let sections = split_sections("# A\nfoo\n# B\nbar\n", &["#"]);
        assert_eq!(
            sections,
            vec![
                Section {
                    content: "foo".into(),
                    header: "# A".into(),
                },
                Section {
                    content: "bar".into(),
                    header: "# B".into(),
                },
            ]
        );
    }

    #[test]
    fn preamble_goes_to_introduction() {
        let sections = split_sections("intro text\n## Usage\nrun it", &DEFAULT_SECTION_MARKERS);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].header, "Introduction");
        assert_eq!(sections[0].content, "intro text");
        assert_eq!(sections[1].header, "## Usage");
        assert_eq!(sections[1].content, "run it");
    }

    #[test]
    fn empty_text_has_no_sections() {
        assert!(split_sections("", &DEFAULT_SECTION_MARKERS).is_empty());
    }

    #[test]
    fn header_without_body_is_dropped() {
        let sections = split_sections("# Empty\n\n   \n# Full\nbody", &["#"]);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].header, "# Full");
    }

    #[test]
    fn indented_header_is_detected_and_trimmed() {
        let sections = split_sections("   ### Deep  \ncontent", &DEFAULT_SECTION_MARKERS);
        assert_eq!(sections[0].header, "### Deep");
    }

    #[test]
    fn body_keeps_inner_lines() {
        let sections = split_sections("# H\nline one\n\nline two\n", &["#"]);
        assert_eq!(sections[0].content, "line one\n\nline two");
    }

    #[test]
    fn custom_markers() {
        let sections = split_sections("Chapter 1\nalpha\nChapter 2\nbeta", &["Chapter"]);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].header, "Chapter 2");
        assert_eq!(sections[1].content, "beta");
    }

    #[test]
    fn no_markers_means_single_section() {
        let markers: [&str; 0] = [];
        let sections = split_sections("# not a header here\ntext", &markers);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].header, "Introduction");
    }

    #[test]
    fn owned_markers_are_accepted() {
        let markers = vec!["==".to_owned()];
        let sections = split_sections("== Title\nbody", &markers);
        assert_eq!(sections[0].header, "== Title");
    }
}
