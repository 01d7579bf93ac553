//! Masking engine for issue-tracker exports
//!
//! Sensitive values are found by where they sit (object key, changelog
//! discriminant) and by what they look like (emails, URLs), then replaced
//! with synthetic values of the same general shape.

pub mod generator;
pub mod masker;
pub mod patterns;
pub mod rules;

use std::path::Path;

pub use generator::{SyntheticGenerator, Vocabulary, VocabularyError};
pub use masker::{MaskOutcome, MaskReport, Masker, MaskingConfig};
pub use patterns::{PatternSet, ScrubCounts};
pub use rules::{CompanionFill, CompanionRule, DescriptionPlaceholder, RuleKind, RuleTable};

/// Mask a JSON file into `output`
pub fn mask_json_file(input: &Path, output: &Path, masker: &mut Masker) -> nave_core::Result<MaskReport> {
    let document = nave_core::read_json(input)?;
    let outcome = masker.mask_document(document);
    nave_core::write_json(output, &outcome.document)?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        replaced = outcome.report.total(),
        "Masked file saved"
    );
    Ok(outcome.report)
}
