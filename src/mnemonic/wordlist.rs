//! Module containing the embedded BIP-0039 word lists.

use crate::mnemonic::Language;
use std::sync::OnceLock;

/// The number of words in a list, as defined in BIP-0039.
pub const WORD_COUNT: usize = 2048;

/// A parsed, sorted word list.
pub struct Wordlist(Vec<&'static str>);

impl Wordlist {
    /// Parses a list of newline-separated words.
    fn parse(words: &'static str) -> Self {
        let words = words.lines().map(str::trim).collect::<Vec<_>>();

        debug_assert_eq!(words.len(), WORD_COUNT);
        debug_assert!(words
            .iter()
            .all(|word| word.chars().all(|c| c.is_ascii_lowercase())));
        debug_assert!(words.windows(2).all(|pair| pair[0] < pair[1]));

        Self(words)
    }

    /// Searches the word list for the specified word returning its index in
    /// the list, or `None` if the word does not belong to the list.
    pub fn search(&self, word: &str) -> Option<usize> {
        self.0.binary_search(&word).ok()
    }

    /// Returns the word for the specified index.
    ///
    /// # Panics
    ///
    /// This method panics if the index is not less than [`WORD_COUNT`].
    pub fn word(&self, index: usize) -> &'static str {
        assert!(index < WORD_COUNT, "invalid word index");
        self.0[index]
    }
}

/// Retrieves the word list for the specified language.
pub fn for_language(language: Language) -> &'static Wordlist {
    match language {
        Language::English => {
            static ENGLISH: OnceLock<Wordlist> = OnceLock::new();
            ENGLISH.get_or_init(|| Wordlist::parse(include_str!("wordlist/english.txt")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_english() {
        let wordlist = for_language(Language::English);
        assert_eq!(wordlist.word(0), "abandon");
        assert_eq!(wordlist.word(WORD_COUNT - 1), "zoo");
        assert_eq!(wordlist.search("junk"), Some(970));
        assert_eq!(wordlist.search("klingon"), None);
    }
}
