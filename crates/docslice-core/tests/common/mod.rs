#![allow(dead_code)]

use docslice_core::{Result, TokenCounter};

/// One token per whitespace-separated word, roughly how BPE counts prose
pub struct WordCounter;

impl TokenCounter for WordCounter {
    fn model(&self) -> &str {
        "words"
    }

    fn count(&self, text: &str) -> Result<usize> {
        Ok(text.split_whitespace().count())
    }
}

/// One token per character
pub struct CharCounter;

impl TokenCounter for CharCounter {
    fn model(&self) -> &str {
        "chars"
    }

    fn count(&self, text: &str) -> Result<usize> {
        Ok(text.chars().count())
    }
}

pub fn manual() -> String {
    let para = |topic: &str| {
        format!(
            "<para>The {topic} command changes the database. It takes a lock on the target; \
             concurrent sessions wait (or fail, with NOWAIT) until it is released. \
             See <xref linkend=\"sql-{topic}\"> for the full syntax.</para>\n"
        )
    };

    let mut doc = String::from("<book>\n<title>Reference</title>\n");
    for chapter in ["Definition", "Manipulation"] {
        doc.push_str(&format!("<chapter id=\"{chapter}\">\n<title>Data {chapter}</title>\n"));
        doc.push_str(&para("overview"));
        for sect1 in ["alter", "create"] {
            doc.push_str(&format!("<sect1><title>{sect1} commands</title>\n"));
            doc.push_str(&para(sect1));
            for sect2 in ["table", "index"] {
                doc.push_str(&format!("<sect2><title>{sect1} {sect2}</title>\n"));
                doc.push_str(&para(&format!("{sect1}-{sect2}")).repeat(3));
                doc.push_str("</sect2>\n");
            }
            doc.push_str("<para>Closing notes for this section.</para>\n</sect1>\n");
        }
        doc.push_str("</chapter>\n");
    }
    doc.push_str("</book>\n");
    doc
}
