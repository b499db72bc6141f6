//! Lista de citas con sentimiento.

use serde_json::Value;
use tracing::warn;

use crate::models::{lenient_text, Quote};

/// Tipa los registros conservando el orden de origen. No se deduplica: una frase
/// repetida es legítima. El sentimiento se copia tal cual, sin clasificar. Los campos
/// nulos o ausentes quedan vacíos; sólo se descartan registros que no son objetos.
pub fn build_quote_list(records: Vec<Value>) -> Vec<Quote> {
    records
        .iter()
        .enumerate()
        .filter_map(|(idx, record)| match record {
            Value::Object(fields) => Some(Quote {
                quote: lenient_text(fields.get("quote")),
                speaker: lenient_text(fields.get("speaker")),
                target: lenient_text(fields.get("target")),
                sentiment: lenient_text(fields.get("sentiment")),
            }),
            other => {
                warn!("Descartando cita #{idx}: no es un objeto ({other})");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn source_order_is_preserved() {
        let quotes = build_quote_list(vec![
            json!({"quote": "a", "speaker": "X", "target": "Y", "sentiment": "positive"}),
            json!({"quote": "b", "speaker": "Y", "target": "X", "sentiment": "negative"}),
        ]);
        let texts: Vec<&str> = quotes.iter().map(|q| q.quote.as_str()).collect();
        assert_eq!(texts, ["a", "b"]);
    }

    #[test]
    fn repeated_quotes_are_kept() {
        let record = json!({"quote": "Nevermore", "speaker": "Raven", "target": "Narrator", "sentiment": "negative"});
        let quotes = build_quote_list(vec![record.clone(), record]);
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0], quotes[1]);
    }

    #[test]
    fn unknown_sentiment_passes_through_verbatim() {
        let quotes = build_quote_list(vec![json!({"quote": "Hm.", "sentiment": "Ambivalent"})]);
        assert_eq!(quotes[0].sentiment, "Ambivalent");
        assert_eq!(quotes[0].speaker, "");
    }

    #[test]
    fn non_object_records_are_skipped() {
        let quotes = build_quote_list(vec![json!("just text"), json!({"quote": "Hi"})]);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].quote, "Hi");
    }

    #[test]
    fn null_fields_keep_the_quote() {
        let quotes = build_quote_list(vec![json!({
            "quote": "Hi", "speaker": "Alice", "target": null, "sentiment": null
        })]);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].quote, "Hi");
        assert_eq!(quotes[0].target, "");
        assert_eq!(quotes[0].sentiment, "");
    }
}
