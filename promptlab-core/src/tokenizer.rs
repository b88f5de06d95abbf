//! Word and sentence tokenization shared by the metrics

/// Characters that end a sentence when followed by whitespace or end of text.
const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Closing quotes and brackets that may sit between a terminator and the
/// following whitespace.
const SENTENCE_CLOSERS: [char; 7] = ['"', '\'', ')', ']', '\u{201D}', '\u{2019}', '\u{00BB}'];

/// Split text into lower-cased word tokens.
///
/// Splits on whitespace and strips every leading/trailing character that is
/// not alphanumeric, so `"Bonjour,"` and `"bonjour"` produce the same token.
/// Tokens that consist only of punctuation are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| !word.is_empty())
        .map(String::from)
        .collect()
}

/// Split text into trimmed sentences.
///
/// A run of `.`, `!` or `?` is a boundary only when it is followed by
/// whitespace or the end of the text, so `"3.14"` and `"e.g.x"` stay whole.
/// Closing quotes or brackets right after the run stay with the sentence
/// they close: `He said "Hi." Then left.` is two sentences.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if !SENTENCE_TERMINATORS.contains(&c) {
            current.push(c);
            continue;
        }

        let mut run = String::from(c);
        while let Some(&next) = chars.peek() {
            if !SENTENCE_TERMINATORS.contains(&next) {
                break;
            }
            run.push(next);
            chars.next();
        }

        let mut closers = String::new();
        while let Some(&next) = chars.peek() {
            if !SENTENCE_CLOSERS.contains(&next) {
                break;
            }
            closers.push(next);
            chars.next();
        }

        let at_boundary = chars.peek().map_or(true, |next| next.is_whitespace());
        if at_boundary {
            current.push_str(&closers);
            push_sentence(&mut sentences, &current);
            current.clear();
        } else {
            current.push_str(&run);
            current.push_str(&closers);
        }
    }

    push_sentence(&mut sentences, &current);
    sentences
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_strips_punctuation() {
        assert_eq!(
            tokenize("Bonjour, passez une EXCELLENTE journée!"),
            vec!["bonjour", "passez", "une", "excellente", "journée"]
        );
    }

    #[test]
    fn test_tokenize_keeps_inner_punctuation() {
        assert_eq!(tokenize("Don't stop (3.14)"), vec!["don't", "stop", "3.14"]);
    }

    #[test]
    fn test_tokenize_drops_punctuation_only_tokens() {
        assert_eq!(tokenize("wait -- what ..."), vec!["wait", "what"]);
    }

    #[test]
    fn test_tokenize_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
    }

    #[test]
    fn test_split_sentences_basic() {
        assert_eq!(
            split_sentences("Hello world. How are you? Fine!"),
            vec!["Hello world", "How are you", "Fine"]
        );
    }

    #[test]
    fn test_split_sentences_collapses_terminator_runs() {
        assert_eq!(
            split_sentences("Really?! Yes... Okay"),
            vec!["Really", "Yes", "Okay"]
        );
    }

    #[test]
    fn test_split_sentences_ignores_inner_terminators() {
        assert_eq!(
            split_sentences("Pi is 3.14 roughly. Version v1.2.3 shipped."),
            vec!["Pi is 3.14 roughly", "Version v1.2.3 shipped"]
        );
    }

    #[test]
    fn test_split_sentences_discards_empty_sentences() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("  ... !!  ").is_empty());
        assert_eq!(split_sentences(". Leading dot"), vec!["Leading dot"]);
    }

    #[test]
    fn test_split_sentences_terminator_before_newline() {
        assert_eq!(split_sentences("One.\nTwo.\n"), vec!["One", "Two"]);
    }

    #[test]
    fn test_split_sentences_terminator_inside_quotes() {
        assert_eq!(
            split_sentences("He said \"Hi.\" Then left."),
            vec!["He said \"Hi\"", "Then left"]
        );
        assert_eq!(split_sentences("(See above.) Next."), vec!["(See above)", "Next"]);
        assert_eq!(split_sentences("Quote \"a.\"b end."), vec!["Quote \"a.\"b end"]);
    }
}
