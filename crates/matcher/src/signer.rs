//! Text to signature, shared by the sequential and concurrent controllers.

use std::borrow::Cow;

use canonical::{apply_cleanup, CanonicalizeConfig};
use perceptual::{build_signature, extract_shingles, PerceptualConfig, Signature};

use crate::types::DedupConfig;

/// Validated signing settings of one run.
#[derive(Debug, Clone)]
pub(crate) struct Signer {
    perceptual: PerceptualConfig,
    cleanup: Option<CanonicalizeConfig>,
    min_text_length: usize,
}

impl Signer {
    /// `cfg` must already be validated.
    pub(crate) fn new(cfg: &DedupConfig) -> Self {
        Self {
            perceptual: cfg.perceptual_config(),
            cleanup: cfg.cleanup.clone(),
            min_text_length: cfg.min_text_length,
        }
    }

    /// `None` when the (cleaned) text has fewer than `min_text_length`
    /// characters. A text with no complete shingle gets the sentinel.
    pub(crate) fn sign(&self, text: &str) -> Option<Signature> {
        let text: Cow<str> = match &self.cleanup {
            Some(cleanup) => Cow::Owned(apply_cleanup(text, cleanup)),
            None => Cow::Borrowed(text),
        };
        if text.chars().count() < self.min_text_length {
            return None;
        }
        let shingles = extract_shingles(&text, self.perceptual.shingle_size);
        Some(build_signature(&shingles, &self.perceptual))
    }
}
