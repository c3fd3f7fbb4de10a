//! Tokenizer — turns free text into canonical, de-duplicated, order-preserving tokens.
//!
//! Pipeline per raw run: lower-case → trim trailing sentence punctuation → fold
//! synonyms → drop short tokens and stopwords → keep first occurrence only.
//! Canonical forms are single tokens, so re-tokenizing canonical output is a no-op.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

/// A token starts with a letter and continues with letters, digits or `+ . # / -`.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9+.#/\-]+").unwrap());

/// Characters stripped from the end of a raw run (`Spark.` → `spark`).
const TRAILING_PUNCTUATION: &[char] = &['.', '/', '-'];

/// Minimum token length after folding.
const MIN_TOKEN_LEN: usize = 2;

/// Alias → canonical form. Canonical values are never keys themselves.
const SYNONYMS: &[(&str, &str)] = &[
    ("ms365", "microsoft-365"),
    ("m365", "microsoft-365"),
    ("office365", "microsoft-365"),
    ("powerbi", "power-bi"),
    ("postgres", "postgresql"),
    ("postgre", "postgresql"),
    ("py", "python"),
    ("js", "javascript"),
    ("nodejs", "node.js"),
    ("node", "node.js"),
    ("ci/cd", "ci-cd"),
    ("machine-learning", "ml"),
    ("natural-language-processing", "nlp"),
    ("k8s", "kubernetes"),
    ("golang", "go"),
    ("reactjs", "react"),
    ("react.js", "react"),
];

/// Connectives plus generic JD boilerplate that never names a skill.
const STOPWORDS: &[&str] = &[
    "and", "or", "for", "with", "to", "of", "in", "on", "at", "by", "as", "the", "an", "is",
    "are", "be", "you", "we", "our", "your", "will", "this", "that", "from", "about", "etc", "ie",
    "eg", "within", "across", "using", "use", "hands-on", "experience", "experiences", "year",
    "years", "plus", "prior", "work", "working", "ability", "strong", "excellent",
    "good", "familiar", "familiarity", "understanding", "knowledge", "proven", "track", "record",
    "must", "have", "nice", "need", "needed", "required", "preferred", "responsibilities",
    "requirements", "qualification", "qualifications", "skills", "skill", "competencies", "role",
    "position", "candidate", "cv", "resume", "job", "description",
];

static SYNONYM_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| SYNONYMS.iter().copied().collect());

static STOPWORD_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STOPWORDS.iter().copied().collect());

/// Normalizes a single raw token: lower-case, trailing punctuation trimmed, synonyms folded.
///
/// Does not apply the length or stopword filters; callers matching a requirement
/// against candidate tokens use this to bring both sides into the same form.
pub fn normalize_token(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    let trimmed = lower.trim_end_matches(TRAILING_PUNCTUATION);
    SYNONYM_MAP
        .get(trimmed)
        .map(|canonical| canonical.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Returns true if the (already normalized) token survives the length and stopword filters.
pub fn is_meaningful(token: &str) -> bool {
    token.len() >= MIN_TOKEN_LEN && !STOPWORD_SET.contains(token)
}

/// Tokenizes free text into distinct canonical tokens, in first-occurrence order.
///
/// Empty or unparseable text yields an empty vector.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    TOKEN_RE
        .find_iter(text)
        .map(|m| normalize_token(m.as_str()))
        .filter(|token| is_meaningful(token))
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

/// Renders tokens back to text. `tokenize(&join_tokens(&t)) == t` for canonical `t`.
pub fn join_tokens(tokens: &[String]) -> String {
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_preserves_order() {
        let tokens = tokenize("Airflow then Spark then Databricks");
        assert_eq!(tokens, vec!["airflow", "then", "spark", "databricks"]);
    }

    #[test]
    fn test_tokenize_removes_later_duplicates() {
        let tokens = tokenize("Rust rust RUST Kafka rust");
        assert_eq!(tokens, vec!["rust", "kafka"]);
    }

    #[test]
    fn test_tokenize_folds_synonyms() {
        let tokens = tokenize("Postgres, NodeJS and k8s");
        assert_eq!(tokens, vec!["postgresql", "node.js", "kubernetes"]);
    }

    #[test]
    fn test_tokenize_folded_aliases_collapse_to_one_token() {
        let tokens = tokenize("postgres postgre postgresql");
        assert_eq!(tokens, vec!["postgresql"]);
    }

    #[test]
    fn test_tokenize_keeps_symbol_tokens() {
        let tokens = tokenize("C++ and C# on .NET with CI/CD");
        assert_eq!(tokens, vec!["c++", "c#", "net", "ci-cd"]);
    }

    #[test]
    fn test_tokenize_trims_sentence_punctuation() {
        let tokens = tokenize("Migrated jobs to Spark. Then Databricks.");
        assert!(tokens.contains(&"spark".to_string()));
        assert!(tokens.contains(&"databricks".to_string()));
    }

    #[test]
    fn test_tokenize_drops_stopwords_and_short_tokens() {
        let tokens = tokenize("You must have strong experience with a Go codebase");
        assert_eq!(tokens, vec!["go", "codebase"]);
    }

    #[test]
    fn test_tokenize_empty_text_is_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \n\t 42 % ").is_empty());
    }

    #[test]
    fn test_tokenize_is_deterministic() {
        let text = "Senior Data Engineer: Airflow, Spark, dbt, Power BI, PowerBI";
        assert_eq!(tokenize(text), tokenize(text));
    }

    #[test]
    fn test_tokenize_is_idempotent_on_canonical_tokens() {
        let text = "Built ETL in Airflow. Node, JS, M365, Postgres, CI/CD, machine-learning, C++.";
        let tokens = tokenize(text);
        assert_eq!(tokenize(&join_tokens(&tokens)), tokens);
    }

    #[test]
    fn test_normalize_token_folds_without_filtering() {
        assert_eq!(normalize_token("  PY "), "python");
        assert_eq!(normalize_token("PMP"), "pmp");
        assert_eq!(normalize_token("the"), "the");
    }

    #[test]
    fn test_synonym_targets_are_not_aliases() {
        for (_, canonical) in SYNONYMS {
            assert!(
                !SYNONYM_MAP.contains_key(canonical),
                "canonical form '{canonical}' must not be folded again"
            );
        }
    }
}
