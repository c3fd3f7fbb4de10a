// Text layer: canonical tokens and CV bullet lines.
// Everything here is pure and deterministic; no embedding calls.

pub mod bullets;
pub mod tokenizer;

pub use bullets::{extract_bullets, is_quantified};
pub use tokenizer::{join_tokens, normalize_token, tokenize};
