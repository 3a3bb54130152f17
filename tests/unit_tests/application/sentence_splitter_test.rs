use docquiz::application::services::split_sentences;

#[test]
fn given_two_sentences_when_splitting_then_returns_both_in_order() {
    let sentences = split_sentences("Alice went to Paris. The Eiffel Tower is tall.");

    assert_eq!(
        sentences,
        vec!["Alice went to Paris.", "The Eiffel Tower is tall."]
    );
}

#[test]
fn given_mixed_terminators_when_splitting_then_each_closes_a_sentence() {
    let sentences = split_sentences("Wait! Is it true? Yes. It is.");

    assert_eq!(sentences, vec!["Wait!", "Is it true?", "Yes.", "It is."]);
}

#[test]
fn given_text_without_terminal_punctuation_when_splitting_then_returns_single_sentence() {
    let sentences = split_sentences("  no punctuation at all here  ");

    assert_eq!(sentences, vec!["no punctuation at all here"]);
}

#[test]
fn given_punctuation_not_followed_by_whitespace_when_splitting_then_does_not_split() {
    let sentences = split_sentences("Pi is 3.14 roughly. See e.g.the table.");

    assert_eq!(sentences, vec!["Pi is 3.14 roughly.", "See e.g.the table."]);
}

#[test]
fn given_newlines_between_sentences_when_splitting_then_trims_each_sentence() {
    let sentences = split_sentences("First line.\n\n   Second line!\tThird");

    assert_eq!(sentences, vec!["First line.", "Second line!", "Third"]);
}

#[test]
fn given_blank_text_when_splitting_then_returns_nothing() {
    assert!(split_sentences("").is_empty());
    assert!(split_sentences("   \n\t ").is_empty());
}

#[test]
fn given_any_text_when_splitting_then_no_sentence_is_empty_or_padded() {
    let text = "One. . Two!  ? Three";

    for sentence in split_sentences(text) {
        assert!(!sentence.is_empty());
        assert_eq!(sentence, sentence.trim());
    }
}
