//! # Embedded-Image Locator Module
//!
//! Scansione pura del testo di un documento alla ricerca di immagini inline.
//!
//! ## Pattern riconosciuto
//! Un valore quotato della forma `data:image/<subtype>;base64,<payload>`:
//! - `<subtype>`: una o più lettere ASCII (`png`, `jpeg`, `gif`, ...)
//! - `<payload>`: la sequenza massimale di caratteri diversi dalla quote di apertura
//! - la quote (singola o doppia) deve chiudere con lo stesso carattere
//!
//! Vale per qualunque letterale quotato: `src="..."` in HTML, `url('...')` in CSS,
//! `href="..."` in SVG.
//!
//! ## Cosa NON viene riconosciuto (e resta intatto)
//! - Data URI non base64 (`data:image/svg+xml;utf8,...`)
//! - URL esterni
//! - Letterali non chiusi o con payload vuoto
//!
//! ## Garanzie
//! - Sequenza lazy, finita, non riavviabile
//! - Ordine da sinistra a destra, riferimenti mai sovrapposti
//! - Nessun side effect

use once_cell::sync::Lazy;
use regex::{CaptureMatches, Captures, Regex};
use std::ops::Range;

static DATA_URI_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#""data:image/(?P<dq_subtype>[A-Za-z]+);base64,(?P<dq_payload>[^"]+)""#,
        "|",
        r#"'data:image/(?P<sq_subtype>[A-Za-z]+);base64,(?P<sq_payload>[^']+)'"#,
    ))
    .expect("data URI pattern is valid")
});

/// Quote character wrapping a located literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Double,
    Single,
}

impl Quote {
    pub fn as_char(self) -> char {
        match self {
            Quote::Double => '"',
            Quote::Single => '\'',
        }
    }
}

/// One inline image found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference<'a> {
    /// Position in locate order, starting at 0
    pub index: usize,
    /// Byte span of the whole literal, quotes included
    pub span: Range<usize>,
    pub quote: Quote,
    /// Exact original text of `span`
    pub matched: &'a str,
    /// Declared MIME subtype, e.g. `png`
    pub subtype: &'a str,
    /// Encoded payload between `base64,` and the closing quote
    pub payload: &'a str,
}

impl ImageReference<'_> {
    /// Rebuilds the literal around a new subtype/payload, keeping the quote style
    pub fn reconstruct(&self, subtype: &str, payload: &str) -> String {
        let quote = self.quote.as_char();
        format!("{quote}data:image/{subtype};base64,{payload}{quote}")
    }
}

/// Lazy iterator over the image references of a text
pub struct ImageReferences<'a> {
    captures: CaptureMatches<'static, 'a>,
    next_index: usize,
}

impl<'a> Iterator for ImageReferences<'a> {
    type Item = ImageReference<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let caps = self.captures.next()?;
        let reference = to_reference(&caps, self.next_index);
        self.next_index += 1;
        Some(reference)
    }
}

fn to_reference<'a>(caps: &Captures<'a>, index: usize) -> ImageReference<'a> {
    let whole = caps.get(0).expect("group 0 always participates");

    // Exactly one alternative matched
    let (quote, subtype, payload) = match (caps.name("dq_subtype"), caps.name("dq_payload")) {
        (Some(subtype), Some(payload)) => (Quote::Double, subtype, payload),
        _ => (
            Quote::Single,
            caps.name("sq_subtype").expect("single-quoted alternative matched"),
            caps.name("sq_payload").expect("single-quoted alternative matched"),
        ),
    };

    ImageReference {
        index,
        span: whole.range(),
        quote,
        matched: whole.as_str(),
        subtype: subtype.as_str(),
        payload: payload.as_str(),
    }
}

/// Scans `text` for inline base64 images
pub fn locate(text: &str) -> ImageReferences<'_> {
    ImageReferences {
        captures: DATA_URI_LITERAL.captures_iter(text),
        next_index: 0,
    }
}
