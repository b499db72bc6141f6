//! Aislamiento del payload JSON dentro de la respuesta libre del modelo.
//!
//! Los modelos suelen envolver el JSON en un bloque markdown con valla. Sólo se
//! reconoce un bloque que abre con la valla seguida de la etiqueta `json` y un salto
//! de línea, y que cierra con la primera valla desnuda que aparezca después.

use regex::Regex;
use std::sync::LazyLock;

static JSON_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```json\n([\s\S]*?)```").expect("regex de valla json inválida")
});

/// Devuelve el contenido del primer bloque ```` ```json ```` si existe.
pub fn extract_fenced(raw: &str) -> Option<&str> {
    JSON_FENCE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Contenido del primer bloque con valla o, si no hay ninguno, la entrada sin cambios.
pub fn extract_payload(raw: &str) -> &str {
    extract_fenced(raw).unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_json_fence() {
        let raw = "```json\n[{\"quote\":\"Hi\"}]\n```";
        assert_eq!(extract_fenced(raw), Some("[{\"quote\":\"Hi\"}]\n"));
        assert_eq!(extract_payload(raw).trim(), "[{\"quote\":\"Hi\"}]");
    }

    #[test]
    fn surrounding_prose_is_dropped() {
        let raw = "Sure! Here is the data:\n```json\n{\"characters\": []}\n```\nHope it helps.";
        assert_eq!(extract_payload(raw), "{\"characters\": []}\n");
    }

    #[test]
    fn first_closing_fence_ends_the_block() {
        let raw = "```json\n[1]\n```\ntext\n```json\n[2]\n```";
        assert_eq!(extract_payload(raw), "[1]\n");
    }

    #[test]
    fn input_without_fence_is_returned_unchanged() {
        let raw = "{\"characters\": []}";
        assert_eq!(extract_fenced(raw), None);
        assert_eq!(extract_payload(raw), raw);
    }

    #[test]
    fn untagged_or_unterminated_fences_are_not_matched() {
        assert_eq!(extract_fenced("```\n[1]\n```"), None);
        assert_eq!(extract_fenced("``` json\n[1]\n```"), None);
        assert_eq!(extract_fenced("```json\n[1]\n"), None);
    }

    #[test]
    fn extraction_is_idempotent() {
        let raw = "intro\n```json\n{\"a\": 1}\n```";
        let once = extract_payload(raw);
        assert_eq!(extract_payload(once), once);
        let plain = "no fence here";
        assert_eq!(extract_payload(extract_payload(plain)), plain);
    }
}
