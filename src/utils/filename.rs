/// Filename helpers for uploads and exports
use std::sync::OnceLock;

use chrono::NaiveDateTime;
use deunicode::deunicode;
use regex::Regex;

fn non_alnum() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"))
}

fn unsafe_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("valid regex"))
}

/// URL-style slug: transliterated to ASCII, lowercase, words joined by `-`
pub fn slugify(text: &str) -> String {
    let lower = deunicode(text).to_lowercase();
    non_alnum()
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Reduces a client-supplied filename to a safe basename.
///
/// Returns an empty string when nothing usable is left.
pub fn secure_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let joined = deunicode(base)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    unsafe_chars()
        .replace_all(&joined, "")
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Whether the filename carries an extension in `allowed` (case-insensitive)
pub fn has_extension(filename: &str, allowed: &[&str]) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// `<slug(base)>-editado-<YYYYmmdd-HHMMSS>.docx`
pub fn export_file_name(original_filename: &str, at: NaiveDateTime) -> String {
    let base = match original_filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => original_filename,
    };
    let mut slug = slugify(base);
    if slug.is_empty() {
        slug = "documento".to_string();
    }
    format!("{}-editado-{}.docx", slug, at.format("%Y%m%d-%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Relatório Anual 2025"), "relatorio-anual-2025");
        assert_eq!(slugify("  --Ação & Reação--  "), "acao-reacao");
        assert_eq!(slugify("Привет Мир"), "privet-mir");
        let slug = slugify("日本");
        assert!(!slug.is_empty());
        assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c == '-'));
    }

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("../../etc/passwd"), "passwd");
        assert_eq!(secure_filename(r"C:\docs\Meu Contrato.docx"), "Meu_Contrato.docx");
        assert_eq!(secure_filename("Certidão de Óbito.docx"), "Certidao_de_Obito.docx");
        assert_eq!(secure_filename("Отчет.docx"), "Otchet.docx");
        assert_eq!(secure_filename("..."), "");
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension("a.docx", &["docx"]));
        assert!(has_extension("A.DOCX", &["docx"]));
        assert!(!has_extension("a.doc", &["docx"]));
        assert!(!has_extension("docx", &["docx"]));
    }

    #[test]
    fn test_export_file_name() {
        let at = NaiveDate::from_ymd_opt(2025, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap();
        assert_eq!(
            export_file_name("Proposta Comercial.docx", at),
            "proposta-comercial-editado-20250309-140507.docx"
        );
        assert_eq!(
            export_file_name("documento.docx", at),
            "documento-editado-20250309-140507.docx"
        );
        assert_eq!(export_file_name("!!!.docx", at), "documento-editado-20250309-140507.docx");
        assert_eq!(
            export_file_name("Сводка.docx", at),
            "svodka-editado-20250309-140507.docx"
        );
    }
}
