use crate::results::Review;
use regex::Regex;
use std::sync::LazyLock;

/// Placeholder text the marketplace leaves in reviews whose video failed to load
const MEDIA_PLACEHOLDER: &str = "the media could not be loaded";

/// Configuration options for review text cleaning
#[derive(Debug, Clone, Copy)]
pub struct CleanOptions {
    /// Convert text to lower case
    pub lowercase: bool,
    /// Expand contractions such as "don't" into "do not"
    pub expand_contractions: bool,
    /// Remove text emoticons such as ":-)"
    pub strip_emoticons: bool,
    /// Remove ASCII punctuation
    pub strip_punctuation: bool,
    /// Remove ASCII digits
    pub strip_digits: bool,
    /// Remove pictographic emoji
    pub strip_emojis: bool,
    /// Remove the "media could not be loaded" placeholder
    pub strip_media_placeholder: bool,
    /// Remove English stop words
    pub remove_stopwords: bool,
    /// Collapse runs of whitespace into single spaces
    pub normalize_whitespace: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            lowercase: true,
            expand_contractions: true,
            strip_emoticons: true,
            strip_punctuation: true,
            strip_digits: true,
            strip_emojis: true,
            strip_media_placeholder: true,
            remove_stopwords: true,
            normalize_whitespace: true,
        }
    }
}

/// Cleans review text for analysis with default options
pub fn clean(text: &str) -> String {
    clean_with_options(text, &CleanOptions::default())
}

/// Cleans review text with specific options
pub fn clean_with_options(text: &str, options: &CleanOptions) -> String {
    // Handle empty input
    if text.trim().is_empty() {
        return String::new();
    }

    let mut result = text.to_string();

    if options.lowercase {
        result = result.to_lowercase();
    }
    if options.expand_contractions {
        result = expand_contractions(&result);
    }
    // Emoticons are made of punctuation, so they go before it
    if options.strip_emoticons {
        result = strip_emoticons(&result);
    }
    if options.strip_punctuation {
        result = strip_punctuation(&result);
    }
    if options.strip_digits {
        result = strip_digits(&result);
    }
    if options.strip_emojis {
        result = strip_emojis(&result);
    }
    // The placeholder is mostly stop words; it must go first
    if options.strip_media_placeholder {
        result = result.replace(MEDIA_PLACEHOLDER, " ");
    }
    if options.remove_stopwords {
        result = remove_stopwords(&result);
    }
    if options.normalize_whitespace {
        result = normalize_whitespace(&result);
    }

    result
}

/// Returns a copy of the review with its title and body cleaned.
///
/// Missing fields stay missing.
pub fn clean_review(review: &Review, options: &CleanOptions) -> Review {
    Review {
        title: review
            .title
            .as_deref()
            .map(|t| clean_with_options(t, options)),
        body: review
            .body
            .as_deref()
            .map(|b| clean_with_options(b, options)),
        ..review.clone()
    }
}

//
// Individual cleaning steps
//

static IRREGULAR_CONTRACTIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(won't|can't|shan't|ain't|let's|y'all)\b").expect("valid contraction regex")
});

static CONTRACTION_SUFFIXES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w)(n't|'re|'ll|'ve|'m|'d|'s)\b").expect("valid contraction regex")
});

static EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        "[",
        "\u{1F600}-\u{1F64F}", // emoticons
        "\u{1F300}-\u{1F5FF}", // symbols & pictographs
        "\u{1F680}-\u{1F6FF}", // transport & map symbols
        "\u{1F700}-\u{1F77F}", // alchemical symbols
        "\u{1F780}-\u{1F7FF}", // geometric shapes extended
        "\u{1F800}-\u{1F8FF}", // supplemental arrows-c
        "\u{1F900}-\u{1F9FF}", // supplemental symbols and pictographs
        "\u{1FA00}-\u{1FA6F}", // chess symbols
        "\u{1FA70}-\u{1FAFF}", // symbols and pictographs extended-a
        "\u{2702}-\u{27B0}",   // dingbats
        "\u{24C2}\u{1F170}-\u{1F251}", // enclosed characters
        "\u{FE0F}\u{200D}",    // variation selector, zero-width joiner
        "]+"
    ))
    .expect("valid emoji regex")
});

/// Longest first so ":-)" is not left as "-" after ":)"
const EMOTICONS: &[&str] = &[
    ":'-(", ":'(", ":-)", ":-]", ":-3", ":->", "8-)", ":o)", ":-}", ":-(", ":-d", ":-p",
    ":-/", ";-)", ":)", ":]", ":3", ":>", ":}", ":(", ":d", ":p", ":/", ";)", ":|", "<3",
];

/// NLTK's English stop word list
const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
    "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

/// Expands English contractions; curly apostrophes are treated as straight ones
pub fn expand_contractions(text: &str) -> String {
    let text = text.replace('\u{2019}', "'");

    let text = IRREGULAR_CONTRACTIONS.replace_all(&text, |caps: &regex::Captures| {
        match &caps[1] {
            "won't" => "will not",
            "can't" => "cannot",
            "shan't" => "shall not",
            "ain't" => "am not",
            "let's" => "let us",
            _ => "you all",
        }
        .to_string()
    });

    CONTRACTION_SUFFIXES
        .replace_all(&text, |caps: &regex::Captures| {
            let expansion = match &caps[2] {
                "n't" => "not",
                "'re" => "are",
                "'ll" => "will",
                "'ve" => "have",
                "'m" => "am",
                "'d" => "would",
                _ => "is",
            };
            format!("{} {}", &caps[1], expansion)
        })
        .into_owned()
}

pub fn strip_emoticons(text: &str) -> String {
    EMOTICONS
        .iter()
        .fold(text.to_string(), |acc, emoticon| acc.replace(emoticon, " "))
}

pub fn strip_punctuation(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}

pub fn strip_digits(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_digit()).collect()
}

pub fn strip_emojis(text: &str) -> String {
    EMOJI.replace_all(text, "").into_owned()
}

pub fn remove_stopwords(text: &str) -> String {
    text.split_whitespace()
        .filter(|word| !STOPWORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapses all whitespace runs into a single space
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
