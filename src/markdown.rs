// ABOUTME: Markdown deck loader for deckpilot
// ABOUTME: Splits a markdown document into slides, reveal fragments and presenter notes

use crate::errors::{DeckError, Result};
use crate::slide::{Deck, DeckInfo, Slide};
use log::{debug, info};
use std::fs;
use std::path::Path;

const REVEAL_BREAK: &str = ". . .";
const NOTES_MARKER: &str = "???";
const SLIDE_BREAK: &str = "---";
const BARE_DIRECTIVE: &str = "<!-- bare -->";
const ANIMATE_LIST_DIRECTIVE: &str = "<!-- animate-list -->";

/// Options controlling how markdown becomes slides
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Reveal top-level list items one at a time on every slide
    pub animate_list_items: bool,
}

/// Load a deck from a markdown file
pub fn load_deck(markdown_path: &Path, options: &LoadOptions) -> Result<Deck> {
    info!("Loading deck from markdown: {:?}", markdown_path);

    if !markdown_path.exists() {
        return Err(DeckError::PathNotFoundError(markdown_path.to_path_buf()));
    }

    let markdown_content = fs::read_to_string(markdown_path).map_err(DeckError::FileReadError)?;
    parse_deck(&markdown_content, options)
}

/// Build a deck from markdown text
pub fn parse_deck(markdown: &str, options: &LoadOptions) -> Result<Deck> {
    let (info, content) = parse_frontmatter(markdown);

    let slides: Vec<Slide> = split_slides(&content)
        .into_iter()
        .filter_map(|lines| build_slide(&lines, options))
        .collect();

    info!(
        "Parsed {} slides with {} reveal steps",
        slides.len(),
        slides.iter().map(Slide::reveal_steps).sum::<usize>()
    );

    Deck::register_with_info(info, slides)
}

/// Parse frontmatter in the format: % Title\n% Author\n% Date
fn parse_frontmatter(content: &str) -> (DeckInfo, String) {
    let lines: Vec<&str> = content.lines().collect();
    let mut info = DeckInfo::default();

    let header_len = lines
        .iter()
        .take(3)
        .take_while(|line| line.starts_with("% "))
        .count();

    if header_len == 0 {
        return (info, content.to_string());
    }

    let mut fields = lines[..header_len]
        .iter()
        .map(|line| line.trim_start_matches("% ").trim().to_string());
    if let Some(title) = fields.next() {
        info.title = title;
    }
    if let Some(author) = fields.next() {
        info.author = author;
    }
    if let Some(date) = fields.next() {
        info.date = date;
    }

    // Skip optional blank lines after the frontmatter
    let mut start_idx = header_len;
    while start_idx < lines.len() && lines[start_idx].trim().is_empty() {
        start_idx += 1;
    }

    (info, lines[start_idx..].join("\n"))
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// Level-1 heading: "# Text" or just "#", not "##"
fn is_slide_heading(line: &str) -> bool {
    let trimmed = line.trim_end();
    trimmed == "#" || trimmed.starts_with("# ")
}

/// Top-level list item at column zero
fn is_list_item(line: &str) -> bool {
    if line.starts_with("- ") || line.starts_with("* ") || line.starts_with("+ ") {
        return true;
    }

    let digits = line.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && {
        let rest = &line[digits..];
        rest.starts_with(". ") || rest.starts_with(") ")
    }
}

/// Split content into per-slide line groups at headings and `---` rules
fn split_slides(content: &str) -> Vec<Vec<&str>> {
    let mut slides: Vec<Vec<&str>> = vec![Vec::new()];
    let mut in_fence = false;

    for line in content.lines() {
        if is_fence(line) {
            in_fence = !in_fence;
        }

        // `is_fence` already flipped the state for an opening fence line
        let structural = !in_fence && !is_fence(line);
        let current_has_content = slides
            .last()
            .map(|lines| lines.iter().any(|l| !l.trim().is_empty()))
            .unwrap_or(false);

        if structural && line.trim() == SLIDE_BREAK {
            if current_has_content {
                slides.push(Vec::new());
            }
            continue;
        }

        if structural && is_slide_heading(line) && current_has_content {
            slides.push(Vec::new());
        }

        if let Some(current) = slides.last_mut() {
            current.push(line);
        }
    }

    slides
}

/// A run of lines after the slide body, in document order
enum Part {
    /// Appears at its own reveal step
    Fragment(Vec<String>),
    /// Visible at every step
    Pinned(Vec<String>),
}

#[derive(Default)]
struct SlideDraft {
    body: Vec<String>,
    parts: Vec<Part>,
    notes: Vec<String>,
    in_notes: bool,
    /// The last fragment is an animated list item that later lines may continue
    in_list_run: bool,
    bare: bool,
}

impl SlideDraft {
    fn push(&mut self, line: &str) {
        let target = if self.in_notes {
            &mut self.notes
        } else {
            match self.parts.last_mut() {
                Some(Part::Fragment(lines)) | Some(Part::Pinned(lines)) => lines,
                None => &mut self.body,
            }
        };
        target.push(line.to_string());
    }

    fn start_fragment(&mut self, first: String, list_item: bool) {
        self.parts.push(Part::Fragment(vec![first]));
        self.in_list_run = list_item;
    }

    /// Unindented, non-list text after an animated list is not part of it
    fn ends_list_run(&self, line: &str) -> bool {
        self.in_list_run
            && !line.trim().is_empty()
            && !line.starts_with(char::is_whitespace)
            && !is_list_item(line)
    }

    fn is_empty(&self) -> bool {
        let blank = |lines: &Vec<String>| lines.iter().all(|l| l.trim().is_empty());
        blank(&self.body)
            && self.parts.iter().all(|part| match part {
                Part::Fragment(lines) | Part::Pinned(lines) => blank(lines),
            })
            && blank(&self.notes)
    }
}

fn build_slide(lines: &[&str], options: &LoadOptions) -> Option<Slide> {
    let animate = options.animate_list_items
        || lines.iter().any(|line| line.trim() == ANIMATE_LIST_DIRECTIVE);

    let mut draft = SlideDraft::default();
    let mut in_fence = false;

    for &line in lines {
        if is_fence(line) {
            in_fence = !in_fence;
            draft.push(line);
            continue;
        }

        if in_fence || draft.in_notes {
            draft.push(line);
            continue;
        }

        match line.trim() {
            NOTES_MARKER => draft.in_notes = true,
            REVEAL_BREAK => draft.start_fragment(String::new(), false),
            BARE_DIRECTIVE => draft.bare = true,
            ANIMATE_LIST_DIRECTIVE => {}
            _ if animate && is_list_item(line) => draft.start_fragment(line.to_string(), true),
            _ if animate && draft.ends_list_run(line) => {
                draft.parts.push(Part::Pinned(vec![String::new(), line.to_string()]));
                draft.in_list_run = false;
            }
            _ => draft.push(line),
        }
    }

    if draft.is_empty() {
        return None;
    }

    let join = |lines: &[String]| lines.join("\n").trim_end().to_string();
    let notes = join(draft.notes.as_slice());

    let mut slide = Slide::new(join(draft.body.as_slice()).trim().to_string()).bare(draft.bare);
    for part in &draft.parts {
        slide = match part {
            // A reveal break with nothing after it adds no step
            Part::Fragment(lines) if lines.iter().all(|l| l.trim().is_empty()) => slide,
            Part::Fragment(lines) => slide.fragment(join(lines.as_slice())),
            Part::Pinned(lines) => slide.pinned(join(lines.as_slice())),
        };
    }

    debug!(
        "Slide draft with {} fragments, notes: {}",
        slide.reveal_steps(),
        !notes.trim().is_empty()
    );

    if !notes.trim().is_empty() {
        slide = slide.with_notes(notes.trim().to_string());
    }

    Some(slide)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontmatter_is_optional() {
        let (info, content) = parse_frontmatter("# Hello");
        assert_eq!(info.title, "Presentation");
        assert_eq!(content, "# Hello");

        let (info, content) = parse_frontmatter("% Talk\n% Ada\n% 2024-01-01\n\n# Hello");
        assert_eq!(info.title, "Talk");
        assert_eq!(info.author, "Ada");
        assert_eq!(info.date, "2024-01-01");
        assert_eq!(content, "# Hello");
    }

    #[test]
    fn test_list_item_detection() {
        assert!(is_list_item("- item"));
        assert!(is_list_item("12. item"));
        assert!(!is_list_item("  - nested"));
        assert!(!is_list_item("-not a list"));
        assert!(!is_list_item("2024 was a year"));
    }

    #[test]
    fn test_separators_inside_code_fences_are_literal() {
        let markdown = "# Code\n\n```\n# not a heading\n---\n. . .\n```\n";
        let deck = parse_deck(markdown, &LoadOptions::default()).unwrap();
        assert_eq!(deck.len(), 1);
        let slide = deck.get(0).unwrap();
        assert_eq!(slide.reveal_steps(), 0);
        assert!(slide.body().contains("# not a heading"));
        assert!(slide.body().contains("---"));
    }

    #[test]
    fn test_text_after_animated_list_stays_visible() {
        let markdown = "# Points\n<!-- animate-list -->\nIntro\n\n- one\n  more on one\n- two\n\nClosing remark\n";
        let deck = parse_deck(markdown, &LoadOptions::default()).unwrap();
        let slide = deck.get(0).unwrap();

        assert_eq!(slide.reveal_steps(), 2);
        assert_eq!(slide.fragments()[0], "- one\n  more on one");
        assert_eq!(
            crate::html::visible_markdown(slide, 0),
            "# Points\nIntro\n\nClosing remark"
        );
        assert_eq!(
            crate::html::visible_markdown(slide, 2),
            "# Points\nIntro\n- one\n  more on one\n- two\n\nClosing remark"
        );
    }

    #[test]
    fn test_blank_reveal_break_adds_no_step() {
        let deck = parse_deck("# A\ntext\n. . .\n\n# B\n. . .\n???\nnotes\n", &LoadOptions::default()).unwrap();
        assert_eq!(deck.get(0).unwrap().reveal_steps(), 0);
        assert_eq!(deck.get(1).unwrap().reveal_steps(), 0);
        assert_eq!(deck.get(1).unwrap().notes(), Some("notes"));
        assert_eq!(deck.total_steps(), 1);
    }

    #[test]
    fn test_leading_rule_does_not_create_empty_slide() {
        let deck = parse_deck("---\n# A\n---\n---\n# B\n", &LoadOptions::default()).unwrap();
        assert_eq!(deck.len(), 2);
    }
}
