//! Text normalisation, synonym expansion and tokenisation shared by the
//! TF-IDF engine and the keyword fallback.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MARKUP: Regex = Regex::new(r"[#*_`\[\]()]").unwrap();
    static ref URL: Regex = Regex::new(r"https?://\S+").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    /// Two or more word characters, the usual bag-of-words token shape.
    static ref TOKEN: Regex = Regex::new(r"\b\w\w+\b").unwrap();
    static ref ENGLISH_STOP_SET: HashSet<&'static str> =
        ENGLISH_STOP_WORDS.iter().copied().collect();
}

/// Domain vocabulary groups. Any term of a group found in the text pulls the
/// whole group in, so "pretooluse" and "hooks" land on the same features.
pub const SYNONYM_GROUPS: &[(&[&str], &[&str])] = &[
    (
        &["hooks", "hook"],
        &["lifecycle events", "lifecycle callbacks", "event handlers", "pretooluse", "posttooluse"],
    ),
    (
        &["skills", "skill"],
        &["slash commands", "custom commands", "skill.md"],
    ),
    (
        &["subagent", "subagents"],
        &["child agent", "child agents", "agent delegation", "spawned agent"],
    ),
    (
        &["mcp", "model context protocol"],
        &["mcp server", "mcp tool", "fastmcp", "external tools"],
    ),
    (
        &["permissions"],
        &["access control", "allowedtools", "allow list", "deny list", "sandbox"],
    ),
    (
        &["ide integration"],
        &["vs code", "vscode", "jetbrains", "cursor ide"],
    ),
    (
        &["agent teams"],
        &["multi-agent", "parallel sessions", "orchestration"],
    ),
    (
        &["claude.md"],
        &["project context", "project memory", "project instructions"],
    ),
    (
        &["cli"],
        &["command line", "terminal", "flags", "arguments"],
    ),
    (
        &["token"],
        &["context window", "token usage", "token limit", "compact"],
    ),
];

/// English function words dropped before n-gram construction.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "almost", "alone", "along",
    "already", "also", "although", "always", "am", "among", "an", "and", "another", "any",
    "anyhow", "anyone", "anything", "anyway", "anywhere", "are", "around", "as", "at", "be",
    "became", "because", "become", "becomes", "been", "before", "being", "below", "beside",
    "besides", "between", "beyond", "both", "but", "by", "can", "cannot", "could", "did", "do",
    "does", "doing", "done", "down", "during", "each", "either", "else", "elsewhere", "enough",
    "etc", "even", "ever", "every", "everyone", "everything", "everywhere", "few", "for",
    "former", "formerly", "from", "further", "had", "has", "have", "having", "he", "hence",
    "her", "here", "hers", "herself", "him", "himself", "his", "how", "however", "i", "ie",
    "if", "in", "indeed", "into", "is", "it", "its", "itself", "just", "last", "latter",
    "least", "less", "made", "many", "may", "me", "meanwhile", "might", "mine", "more",
    "moreover", "most", "mostly", "much", "must", "my", "myself", "namely", "neither",
    "never", "nevertheless", "next", "no", "nobody", "none", "nor", "not", "nothing", "now",
    "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or", "other",
    "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per", "perhaps",
    "please", "rather", "re", "same", "several", "she", "should", "since", "so", "some",
    "somehow", "someone", "something", "sometime", "sometimes", "somewhere", "still", "such",
    "than", "that", "the", "their", "theirs", "them", "themselves", "then", "thence", "there",
    "thereafter", "thereby", "therefore", "therein", "these", "they", "this", "those",
    "though", "through", "throughout", "thus", "to", "together", "too", "toward", "towards",
    "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were", "what",
    "whatever", "when", "whence", "whenever", "where", "whereas", "whether", "which", "while",
    "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
    "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// Smaller list used by the keyword-overlap fallback. It also drops
/// announcement filler ("new", "now", "also").
pub const FALLBACK_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "is", "are", "was", "were", "be", "been", "have", "has", "had", "do",
    "does", "did", "will", "would", "could", "should", "may", "might", "can", "shall", "to",
    "of", "in", "for", "on", "with", "at", "by", "from", "as", "into", "about", "like",
    "through", "after", "over", "between", "out", "up", "down", "this", "that", "these",
    "those", "it", "its", "and", "but", "or", "nor", "not", "no", "so", "if", "then", "than",
    "too", "very", "just", "new", "also", "now",
];

/// Lowercase, strip markdown punctuation and URLs, collapse whitespace.
pub fn normalize(text: &str) -> String {
    let lower = text.to_lowercase();
    let without_markup = MARKUP.replace_all(&lower, " ");
    let without_urls = URL.replace_all(&without_markup, " ");
    WHITESPACE
        .replace_all(&without_urls, " ")
        .trim()
        .to_string()
}

/// Append every synonym group that the text touches.
///
/// Text that touches no group comes back unchanged.
pub fn expand_with_synonyms(text: &str) -> String {
    let lower = text.to_lowercase();
    let mut extras: Vec<&str> = Vec::new();

    for (terms, synonyms) in SYNONYM_GROUPS {
        let touched = terms
            .iter()
            .chain(synonyms.iter())
            .any(|term| lower.contains(term));
        if touched {
            for term in terms.iter().chain(synonyms.iter()) {
                if !extras.contains(term) {
                    extras.push(*term);
                }
            }
        }
    }

    if extras.is_empty() {
        text.to_string()
    } else {
        format!("{} {}", text, extras.join(" "))
    }
}

/// Normalise then expand; the form both sides of a comparison go through.
pub fn prepare(text: &str) -> String {
    expand_with_synonyms(&normalize(text))
}

/// Word tokens of length >= 2 with English stop words removed.
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .filter(|token| !ENGLISH_STOP_SET.contains(token.as_str()))
        .collect()
}

/// Whitespace-split words of the normalised text minus fallback stop words.
pub fn meaningful_words(text: &str) -> HashSet<String> {
    normalize(text)
        .split_whitespace()
        .filter(|word| !FALLBACK_STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}
