// File: src/core/tokenizer.rs
use std::str::CharIndices;

/// Lazily splits text into lowercase runs of letters and digits.
/// Everything else separates tokens. A clone continues from the same position;
/// call `tokenize` again to start over.
#[derive(Clone)]
pub struct Tokens<'a> {
    text: &'a str,
    chars: CharIndices<'a>,
}

pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens {
        text,
        chars: text.char_indices(),
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let start = loop {
            let (idx, c) = self.chars.next()?;
            if c.is_alphanumeric() {
                break idx;
            }
        };

        let mut end = self.text.len();
        for (idx, c) in self.chars.by_ref() {
            if !c.is_alphanumeric() {
                end = idx;
                break;
            }
        }

        Some(self.text[start..end].to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_punctuation_and_whitespace() {
        let tokens: Vec<String> = tokenize("Cook the Spaghetti, al dente.  Reserve 1 cup!").collect();
        assert_eq!(
            tokens,
            vec!["cook", "the", "spaghetti", "al", "dente", "reserve", "1", "cup"]
        );
    }

    #[test]
    fn empty_and_separator_only_text_yield_nothing() {
        assert_eq!(tokenize("").count(), 0);
        assert_eq!(tokenize(" ,.;-- \n\t").count(), 0);
    }

    #[test]
    fn restarting_yields_the_same_sequence() {
        let text = "Add zucchini and serve";
        let first: Vec<String> = tokenize(text).collect();
        let second: Vec<String> = tokenize(text).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn keeps_non_ascii_letters_together() {
        let tokens: Vec<String> = tokenize("Crème brûlée: flambé").collect();
        assert_eq!(tokens, vec!["crème", "brûlée", "flambé"]);
    }
}
