use crate::parsers::text::{self, CleanOptions};
use crate::results::{ProductRef, Review};

#[cfg(test)]
mod basic_tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        assert_eq!(text::clean(""), "");
        assert_eq!(text::clean("   \n\t  "), "");
    }

    #[test]
    fn test_full_pipeline() {
        let input = "I don't like it!! :) 5 stars \u{1F600}";
        assert_eq!(text::clean(input), "like stars");
    }

    #[test]
    fn test_media_placeholder_removed() {
        let input = "The media could not be loaded.\n Lovely material, perfect stitching";
        assert_eq!(text::clean(input), "lovely material perfect stitching");
    }

    #[test]
    fn test_non_ascii_letters_survive() {
        assert_eq!(text::clean("Très belle robe"), "très belle robe");
        assert_eq!(text::clean("बहुत अच्छा"), "बहुत अच्छा");
    }

    #[test]
    fn test_all_steps_disabled_is_identity() {
        let options = CleanOptions {
            lowercase: false,
            expand_contractions: false,
            strip_emoticons: false,
            strip_punctuation: false,
            strip_digits: false,
            strip_emojis: false,
            strip_media_placeholder: false,
            remove_stopwords: false,
            normalize_whitespace: false,
        };
        let input = "Don't  STOP :) 10/10";
        assert_eq!(text::clean_with_options(input, &options), input);
    }

    #[test]
    fn test_keep_stopwords() {
        let options = CleanOptions {
            remove_stopwords: false,
            ..CleanOptions::default()
        };
        assert_eq!(
            text::clean_with_options("It's NOT what I ordered!", &options),
            "it is not what i ordered"
        );
    }
}

#[cfg(test)]
mod step_tests {
    use super::*;

    #[test]
    fn test_expand_contractions() {
        assert_eq!(text::expand_contractions("don't"), "do not");
        assert_eq!(text::expand_contractions("we're here"), "we are here");
        assert_eq!(text::expand_contractions("won't fit"), "will not fit");
        assert_eq!(text::expand_contractions("can't"), "cannot");
        assert_eq!(text::expand_contractions("i\u{2019}ve tried"), "i have tried");
        assert_eq!(text::expand_contractions("plain words"), "plain words");
    }

    #[test]
    fn test_strip_emoticons() {
        assert_eq!(
            text::normalize_whitespace(&text::strip_emoticons("good :-) bad :( ok <3")),
            "good bad ok"
        );
    }

    #[test]
    fn test_strip_punctuation_and_digits() {
        assert_eq!(text::strip_punctuation("size: m, fits!"), "size m fits");
        assert_eq!(text::strip_digits("size 42 fits"), "size  fits");
        assert_eq!(text::strip_digits("½ size Ⅻ"), "½ size Ⅻ");
    }

    #[test]
    fn test_strip_emojis() {
        assert_eq!(
            text::strip_emojis("love it \u{2764}\u{FE0F}\u{1F44D}\u{1F3FD}"),
            "love it "
        );
        assert_eq!(text::strip_emojis("no emoji"), "no emoji");
    }

    #[test]
    fn test_remove_stopwords() {
        assert_eq!(
            text::remove_stopwords("this is the best dress i have"),
            "best dress"
        );
    }
}

#[cfg(test)]
mod review_tests {
    use super::*;

    #[test]
    fn test_clean_review_touches_only_text_fields() {
        let review = Review {
            title: Some("LOVED it!!".to_string()),
            rating: Some(5.0),
            body: None,
            size: Some("Size: XL".to_string()),
            product_ref: ProductRef::new("B0A"),
        };
        let cleaned = text::clean_review(&review, &CleanOptions::default());

        assert_eq!(cleaned.title.as_deref(), Some("loved"));
        assert_eq!(cleaned.body, None);
        assert_eq!(cleaned.rating, Some(5.0));
        assert_eq!(cleaned.size.as_deref(), Some("Size: XL"));
        assert_eq!(cleaned.product_ref, review.product_ref);
    }
}
