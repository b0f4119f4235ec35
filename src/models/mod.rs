pub mod phrase;

pub use phrase::{NewPhrase, Phrase, PhraseFields};
