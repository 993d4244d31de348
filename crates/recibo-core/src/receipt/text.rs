//! OCR text normalization.

/// Normalize raw OCR text while keeping its line layout.
///
/// Any Unicode whitespace (tabs, non-breaking and thin spaces included)
/// becomes a plain space, runs of it collapse into one, every line is trimmed and leading/trailing blank lines are
/// dropped. Interior line breaks (including blank lines) are kept, since the
/// bank strategies locate fields by line position.
pub fn normalize(raw: &str) -> String {
    let lines: Vec<String> = raw.split('\n').map(normalize_line).collect();

    let first = lines.iter().position(|l| !l.is_empty());
    let last = lines.iter().rposition(|l| !l.is_empty());

    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

fn normalize_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut pending_space = false;

    for c in line.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }

    out
}

/// Lowercase and strip Spanish diacritics, for keyword detection.
pub fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_collapses_spaces() {
        assert_eq!(normalize("Importe\t\t$  1.234,56  "), "Importe $ 1.234,56");
        assert_eq!(normalize("a\u{00a0}\u{00a0}b"), "a b");
        assert_eq!(normalize("\u{202f}Santander\u{2009}"), "Santander");
        assert_eq!(normalize("\u{3000}Importe\u{2009}\u{2009}$ 10,00"), "Importe $ 10,00");
    }

    #[test]
    fn test_normalized_lines_are_trimmed() {
        let raw = "\u{202f}Santander\u{2009}\nTransferencia realizada\n\u{3000}Importe\n$ 1.234,56";
        let text = normalize(raw);
        assert!(text.lines().all(|l| l == l.trim()));
        assert_eq!(text, "Santander\nTransferencia realizada\nImporte\n$ 1.234,56");
    }

    #[test]
    fn test_normalize_keeps_lines() {
        let raw = "\n\n  Comprobante  \r\n\nImporte\n   $ 10,00\n\n";
        assert_eq!(normalize(raw), "Comprobante\n\nImporte\n$ 10,00");
    }

    #[test]
    fn test_normalize_idempotent() {
        let samples = [
            "  Fecha y hora \t\n 04/07/2025   14:33hs \n\n\n",
            "\t\n",
            "CBU/CVU destino\n0000003100072077739741",
            "",
            "\u{202f}Fecha\u{2009}\n\u{3000}04/07/2025\u{00a0}",
        ];
        for raw in samples {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_normalize_blank_input() {
        assert_eq!(normalize("  \n \t \n"), "");
    }

    #[test]
    fn test_fold() {
        assert_eq!(fold("Número de OPERACIÓN"), "numero de operacion");
        assert_eq!(fold("Ualá"), "uala");
    }
}
