/// Instruction prefix the paraphrase models were trained with.
pub const PARAPHRASE_PREFIX: &str = "paraphrase: ";

/// Inputs with fewer whitespace-separated words than this are echoed back.
pub const MIN_PARAPHRASE_WORDS: usize = 10;

pub const SHORT_TEXT_NOTE: &str = "text is too short";

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn is_too_short(text: &str) -> bool {
    word_count(text) < MIN_PARAPHRASE_WORDS
}

pub fn generate_paraphrase_prompt(text: &str) -> String {
    format!("{}{}", PARAPHRASE_PREFIX, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", 0)]
    #[case("   \t\n ", 0)]
    #[case("one", 1)]
    #[case("  leading and\ttrailing\nspace  ", 4)]
    #[case("non\u{00a0}breaking", 2)]
    fn counts_whitespace_delimited_words(#[case] text: &str, #[case] expected: usize) {
        assert_eq!(word_count(text), expected);
    }

    #[rstest]
    #[case("one two three four five six seven eight nine", true)]
    #[case("one two three four five six seven eight nine ten", false)]
    #[case("one two three four five six seven eight nine ten eleven", false)]
    #[case("one  two\tthree\nfour five six seven eight nine", true)]
    fn threshold_is_strictly_less_than_ten(#[case] text: &str, #[case] short: bool) {
        assert_eq!(is_too_short(text), short);
    }

    #[test]
    fn prompt_keeps_text_verbatim_after_prefix() {
        assert_eq!(
            generate_paraphrase_prompt("  Keep  spacing "),
            "paraphrase:   Keep  spacing "
        );
    }
}
