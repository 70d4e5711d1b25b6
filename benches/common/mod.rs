//! Shared corpus generation for the deduplication benchmarks.

#![allow(dead_code)]

use corpus_dedup::Document;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const VOCABULARY: &[&str] = &[
    "le", "la", "les", "de", "des", "du", "et", "en", "un", "une", "pour", "dans", "sur", "par",
    "président", "ministre", "assemblée", "séance", "députés", "gouvernement", "réforme", "loi",
    "budget", "commission", "amendement", "article", "vote", "projet", "région", "conseil",
    "santé", "éducation", "emploi", "sécurité", "justice", "agriculture", "transport", "énergie",
    "question", "réponse", "débat", "session", "nation", "pays", "citoyens", "collectivités",
];

/// One text of `words` tokens drawn from a small parliamentary vocabulary.
pub fn speech(rng: &mut ChaCha8Rng, words: usize) -> String {
    (0..words)
        .map(|_| *VOCABULARY.choose(rng).unwrap_or(&"le"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `size` documents where roughly `dup_ratio` of them are light edits of an
/// earlier document.
pub fn corpus(size: usize, dup_ratio: f64, seed: u64) -> Vec<Document> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut docs: Vec<Document> = Vec::with_capacity(size);

    for i in 0..size {
        let text = if !docs.is_empty() && rng.gen_bool(dup_ratio) {
            let source = &docs[rng.gen_range(0..docs.len())].text;
            let mut words: Vec<&str> = source.split(' ').collect();
            let at = rng.gen_range(0..words.len());
            words[at] = "modifié";
            words.join(" ")
        } else {
            let words = rng.gen_range(80..200);
            speech(&mut rng, words)
        };
        docs.push(Document::new(format!("doc-{i}"), text));
    }
    docs
}
