//! Flattens a chapter / sect1 / sect2 tree into ordered [`Section`]s.

use crate::markup::{Element, ROOT_TAG};
use crate::models::Section;
use std::borrow::Cow;
use tracing::{debug, warn};

/// Tags treated as top-level chapters
pub const CHAPTER_TAGS: [&str; 2] = ["chapter", "preface"];
pub const SECT1_TAG: &str = "sect1";
pub const SECT2_TAG: &str = "sect2";

/// Every tag whose direct `title` is a heading
const HEADING_PARENTS: [&str; 5] = ["chapter", "preface", SECT1_TAG, SECT2_TAG, ROOT_TAG];

/// Walk the tree and emit one section per leaf, plus the "preface" text a
/// parent holds before (and the remainder after) its subsections.
///
/// Order: chapter preface, then per sect1 (sect1 preface, each sect2, sect1
/// remainder), then chapter remainder. Cross references are resolved to
/// their `linkend` first. A tree without `chapter`/`preface` tags is treated
/// as one implicit chapter.
///
/// Parents are partitioned by locating each child's text inside the parent's
/// remaining text; a child whose text cannot be found leaves the whole
/// remainder as its preface and logs a warning.
///
/// A section never carries a `sect2` heading without a `sect1` heading: under
/// an untitled `sect1`, a `sect2` title is reported at the `sect1` level.
#[derive(Debug, Clone)]
pub struct SectionExtractor {
    document: String,
    keep_titles: bool,
}

impl SectionExtractor {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            keep_titles: true,
        }
    }

    /// Whether heading titles stay in the section text. Default `true`.
    pub fn keep_titles(mut self, keep: bool) -> Self {
        self.keep_titles = keep;
        self
    }

    pub fn extract(&self, tree: &Element) -> Vec<Section> {
        let tree = if tree.find_first("xref").is_some() {
            let mut resolved = tree.clone();
            resolved.resolve_xrefs();
            Cow::Owned(resolved)
        } else {
            Cow::Borrowed(tree)
        };

        let mut chapters = tree.find_all(&CHAPTER_TAGS);
        if chapters.is_empty() {
            chapters.push(&*tree);
        }

        let mut sections = Vec::new();
        for chapter in chapters {
            self.extract_chapter(chapter, &mut sections);
        }

        debug!(
            document = %self.document,
            sections = sections.len(),
            keep_titles = self.keep_titles,
            "extracted sections"
        );
        sections
    }

    fn text_of(&self, element: &Element) -> String {
        if self.keep_titles {
            element.text()
        } else {
            element.text_without_titles(&HEADING_PARENTS)
        }
    }

    fn extract_chapter(&self, chapter: &Element, sections: &mut Vec<Section>) {
        let document = self.document.as_str();
        let chapter_title = chapter.direct_child_title();
        let mut chapter_rest = self.text_of(chapter);

        for sect1 in chapter.find_all(&[SECT1_TAG]) {
            let sect1_title = sect1.direct_child_title();
            let sect1_text = self.text_of(sect1);

            let (preface, rest) = split_around(chapter_rest, &sect1_text, &sect1_title);
            chapter_rest = rest;
            if has_content(&preface) {
                sections.push(Section::new(document, &chapter_title, "", "", preface));
            }

            let mut sect1_rest = sect1_text;
            for sect2 in sect1.find_all(&[SECT2_TAG]) {
                let sect2_title = sect2.direct_child_title();
                let sect2_text = self.text_of(sect2);

                let (preface, rest) = split_around(sect1_rest, &sect2_text, &sect2_title);
                sect1_rest = rest;
                if has_content(&preface) {
                    sections.push(Section::new(document, &chapter_title, &sect1_title, "", preface));
                }

                // an untitled sect1 leaves no level to nest under, so the
                // sect2 heading takes its place in the lineage
                let section = if sect1_title.is_empty() {
                    Section::new(document, &chapter_title, sect2_title, "", sect2_text)
                } else {
                    Section::new(document, &chapter_title, &sect1_title, sect2_title, sect2_text)
                };
                sections.push(section);
            }

            if has_content(&sect1_rest) {
                sections.push(Section::new(document, &chapter_title, sect1_title, "", sect1_rest));
            }
        }

        if has_content(&chapter_rest) {
            sections.push(Section::new(document, chapter_title, "", "", chapter_rest));
        }
    }
}

/// [`SectionExtractor`] with titles kept in the section text
pub fn extract_sections(tree: &Element, document_name: &str) -> Vec<Section> {
    SectionExtractor::new(document_name).extract(tree)
}

/// Split `parent` at the first occurrence of `child` into the text before it
/// and the text after it; the child text itself belongs to neither.
fn split_around(parent: String, child: &str, child_title: &str) -> (String, String) {
    if child.is_empty() {
        return (String::new(), parent);
    }

    match parent.find(child) {
        Some(at) => {
            let rest = parent[at + child.len()..].to_string();
            let mut preface = parent;
            preface.truncate(at);
            (preface, rest)
        }
        None => {
            warn!(
                title = child_title,
                child_chars = child.len(),
                "subsection text not found in parent; keeping parent text as preface"
            );
            (parent, String::new())
        }
    }
}

fn has_content(text: &str) -> bool {
    !text.trim().is_empty()
}
