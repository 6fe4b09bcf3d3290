//! Mnemonic language for selecting word lists.

use crate::{
    error::{Error, Result},
    mnemonic::wordlist::{self, Wordlist},
};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// The mnemonic language used to select the word list.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Language {
    #[default]
    English,
}

impl Language {
    /// Splits an NFKD normalized mnemonic phrase into its words, returning the
    /// detected language.
    pub fn split(phrase: &str) -> (Self, Vec<&str>) {
        (Language::English, phrase.split_whitespace().collect())
    }

    /// Returns the language's word list.
    pub fn wordlist(self) -> &'static Wordlist {
        wordlist::for_language(self)
    }

    /// Returns the separator used to join words of a phrase.
    pub fn separator(self) -> char {
        ' '
    }

    /// Returns the human readable language name.
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            _ => Err(Error::UnsupportedLanguage(s.to_owned())),
        }
    }
}
