use crate::document::MappingDocument;
use crate::vlq::{decode_segment, VlqError};

/// The original position a [`PositionMapping`] points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalPosition {
    /// The source identifier, as listed in the document's `sources`.
    pub source: String,
    /// Line in the original source, 1-based.
    pub line: u32,
    /// Column in the original source, 1-based.
    pub column: u32,
}

/// A single decoded mapping from a generated position to its original position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionMapping {
    /// Line in the generated file, 1-based.
    pub generated_line: u32,
    /// Column in the generated file, 1-based.
    pub generated_column: u32,
    /// `None` for segments that only carry a generated position.
    pub original: Option<OriginalPosition>,
}

/// An Error that can happen when parsing the `mappings` of a [`MappingDocument`].
#[derive(Debug, thiserror::Error)]
#[error("malformed segment on generated line {line}")]
pub struct MappingsError {
    /// The generated line the segment belongs to, 1-based.
    pub line: u32,
    #[source]
    pub source: VlqError,
}

/// Converts a running 0-based value into the stored 1-based representation.
fn one_based(value: i64) -> u32 {
    u32::try_from(value.saturating_add(1)).unwrap_or(0)
}

/// Parses all the mappings of `doc`, in the order they are encountered.
///
/// The generated column is relative to the previous segment of the same
/// line, while source index, original line and original column are relative
/// to the previous segment of the whole document. Segments that refer to an
/// unknown source are kept as generated-only mappings and do not update the
/// running original state.
pub fn parse_mappings(doc: &MappingDocument) -> Result<Vec<PositionMapping>, MappingsError> {
    let _span = tracing::trace_span!("parsing mappings", sources = doc.sources.len()).entered();

    let mut mappings = Vec::new();

    let mut prev_source: i64 = 0;
    let mut prev_original_line: i64 = 0;
    let mut prev_original_column: i64 = 0;

    for (line_idx, group) in doc.mappings.split(';').enumerate() {
        let generated_line = one_based(line_idx as i64);
        let mut generated_column: i64 = 0;

        for segment in group.split(',').filter(|s| !s.is_empty()) {
            let decoded = decode_segment(segment).map_err(|source| MappingsError {
                line: generated_line,
                source,
            })?;
            let Some(&column_delta) = decoded.first() else {
                continue;
            };
            generated_column += column_delta;

            let mut original = None;
            if decoded.len() >= 4 {
                let source_idx = prev_source + decoded[1];
                let original_line = prev_original_line + decoded[2];
                let original_column = prev_original_column + decoded[3];

                if let Some(source) = doc.source(source_idx) {
                    original = Some(OriginalPosition {
                        source: source.to_owned(),
                        line: one_based(original_line),
                        column: one_based(original_column),
                    });

                    prev_source = source_idx;
                    prev_original_line = original_line;
                    prev_original_column = original_column;
                } else {
                    tracing::trace!(
                        line = generated_line,
                        source_idx,
                        "segment refers to unknown source"
                    );
                }
            }

            mappings.push(PositionMapping {
                generated_line,
                generated_column: one_based(generated_column),
                original,
            });
        }
    }

    Ok(mappings)
}
