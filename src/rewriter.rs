//! # Document Rewriter Module
//!
//! Ricostruisce il testo del documento in un'unica passata, sostituendo ogni
//! riferimento ottimizzato tramite il suo span originale.
//!
//! ## Regole:
//! - Il testo fuori dagli span viene copiato byte per byte
//! - Riferimento ottimizzato → `data:image/jpeg;base64,<payload>` con la stessa quote
//! - Riferimento fallito → span originale copiato identico
//! - Ogni riferimento viene sostituito esattamente una volta, nell'ordine di scansione
//!
//! Gli span arrivano dal testo originale: nessuna riscansione del testo modificato,
//! quindi nessuno spostamento di offset tra una sostituzione e l'altra.

use crate::locator::ImageReference;
use crate::transcoder::OptimizationResult;
use anyhow::Result;

/// Output of a rewrite pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenDocument {
    pub text: String,
    /// References replaced with optimized data
    pub substituted: usize,
    /// References copied through unchanged
    pub kept: usize,
}

impl RewrittenDocument {
    /// Total references visited; equals the number located
    pub fn references(&self) -> usize {
        self.substituted + self.kept
    }
}

/// Splices results into `original` keyed by each reference's span.
///
/// References must come in locate order. Out-of-order or overlapping spans
/// are rejected instead of producing a corrupted document.
pub fn rewrite<'a, I>(original: &str, results: I) -> Result<RewrittenDocument>
where
    I: IntoIterator<Item = (ImageReference<'a>, OptimizationResult)>,
{
    let mut text = String::with_capacity(original.len());
    let mut cursor = 0;
    let mut substituted = 0;
    let mut kept = 0;

    for (reference, result) in results {
        let span = reference.span.clone();
        if span.start < cursor || span.end > original.len() || span.start > span.end {
            return Err(anyhow::anyhow!(
                "Reference #{} span {:?} overlaps or precedes offset {}",
                reference.index,
                span,
                cursor
            ));
        }

        text.push_str(&original[cursor..span.start]);
        match result {
            OptimizationResult::Optimized(optimized) => {
                text.push_str(&reference.reconstruct(optimized.subtype(), &optimized.payload));
                substituted += 1;
            }
            OptimizationResult::KeepOriginal { .. } => {
                text.push_str(&original[span.clone()]);
                kept += 1;
            }
        }
        cursor = span.end;
    }

    text.push_str(&original[cursor..]);

    Ok(RewrittenDocument {
        text,
        substituted,
        kept,
    })
}
