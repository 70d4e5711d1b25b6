use std::borrow::Cow;

use unicode_categories::UnicodeCategories;
use unicode_normalization::UnicodeNormalization;

use crate::annotations::strip_annotations;
use crate::config::CanonicalizeConfig;
use crate::error::CanonicalError;
use crate::whitespace::collapse_whitespace;

/// Main entry point. Validates `cfg`, then cleans `input`.
pub fn canonicalize_text(input: &str, cfg: &CanonicalizeConfig) -> Result<String, CanonicalError> {
    cfg.validate()?;
    Ok(apply_cleanup(input, cfg))
}

/// Clean `input` with an already validated configuration.
///
/// Steps run in a fixed order: NFKC normalization, annotation removal,
/// punctuation stripping, whitespace collapsing. The result may be empty;
/// deciding what an empty document means is the caller's business.
pub fn apply_cleanup(input: &str, cfg: &CanonicalizeConfig) -> String {
    // Normalization first, as it can affect character boundaries.
    let normalized: Cow<str> = if cfg.normalize_unicode {
        Cow::Owned(input.nfkc().collect::<String>())
    } else {
        Cow::Borrowed(input)
    };

    let stripped: Cow<str> = if cfg.strip_annotations {
        Cow::Owned(strip_annotations(&normalized))
    } else {
        normalized
    };

    let delimited: Cow<str> = if cfg.strip_punctuation {
        Cow::Owned(
            stripped
                .chars()
                .map(|ch| if ch.is_punctuation() { ' ' } else { ch })
                .collect(),
        )
    } else {
        stripped
    };

    collapse_whitespace(&delimited)
}
