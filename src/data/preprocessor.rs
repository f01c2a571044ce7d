// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Normalises review text before tokenisation. Corpus rows and
// crawled pages both carry artefacts that would otherwise leak
// into the vocabulary:
//   - Non-breaking spaces (U+00A0) from web markup
//   - Zero-width spaces (U+200B) from copy-pasting
//   - Tabs and newlines (reviews are single TSV fields)
//   - Control characters from broken encodings
//   - Runs of consecutive spaces
//
// Cleaning steps (applied in order):
//   1. Replace whitespace variants and control chars with a space
//   2. Collapse runs of spaces into one
//   3. Trim leading/trailing whitespace
//
// Reference: Rust Book §8 (Strings in Rust)

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean a raw review string for downstream tokenisation.
    /// Takes a &str and returns an owned String.
    pub fn clean(&self, text: &str) -> String {
        // Map problematic characters to a plain space.
        // A review is a single field, so newlines flatten too.
        let normalised: String = text
            .chars()
            .map(|c| match c {
                '\t' | '\n' | '\r' => ' ',
                '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
                c if c.is_control() => ' ',
                c => c,
            })
            .collect();

        // Collapse runs of spaces into a single space
        let mut out        = String::with_capacity(normalised.len());
        let mut last_space = false;

        for c in normalised.chars() {
            if c == ' ' {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }

        out.trim().to_string()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_multiple_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("great   soundtrack"), "great soundtrack");
    }

    #[test]
    fn test_flattens_newlines_and_tabs() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("part one\npart\ttwo"), "part one part two");
    }

    #[test]
    fn test_removes_control_chars() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("odd\x01byte"), "odd byte");
    }

    #[test]
    fn test_trims_edges() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("  solid film  "), "solid film");
    }

    #[test]
    fn test_empty_string() {
        let p = Preprocessor::new();
        assert_eq!(p.clean(""), "");
    }
}
