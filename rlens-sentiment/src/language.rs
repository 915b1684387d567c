//! Language catalog, label localization and heuristic language detection

use crate::translation::TranslationError;
use crate::types::SentimentLabel;
use async_trait::async_trait;

/// Language every text is translated into before scoring
pub const PIVOT_LANGUAGE: &str = "en";

/// Supported languages (ISO 639-1 code, native display name)
pub const SUPPORTED_LANGUAGES: [(&str, &str); 20] = [
    ("en", "English"),
    ("es", "Español"),
    ("fr", "Français"),
    ("de", "Deutsch"),
    ("it", "Italiano"),
    ("pt", "Português"),
    ("ru", "Русский"),
    ("ja", "日本語"),
    ("ko", "한국어"),
    ("zh", "中文"),
    ("ar", "العربية"),
    ("hi", "हिन्दी"),
    ("nl", "Nederlands"),
    ("sv", "Svenska"),
    ("da", "Dansk"),
    ("no", "Norsk"),
    ("fi", "Suomi"),
    ("pl", "Polski"),
    ("tr", "Türkçe"),
    ("th", "ไทย"),
];

const RTL_LANGUAGES: [&str; 4] = ["ar", "he", "fa", "ur"];

/// Primary subtag of a language tag, lowercased ("pt-BR" → "pt")
pub fn primary_subtag(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

pub fn is_supported(code: &str) -> bool {
    let code = primary_subtag(code);
    SUPPORTED_LANGUAGES.iter().any(|(c, _)| *c == code)
}

pub fn display_name(code: &str) -> Option<&'static str> {
    let code = primary_subtag(code);
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Right-to-left script languages
pub fn is_rtl(code: &str) -> bool {
    RTL_LANGUAGES.contains(&primary_subtag(code).as_str())
}

/// Sentiment label in the given language (English when not localized)
pub fn localize_label(label: SentimentLabel, lang: &str) -> &'static str {
    use SentimentLabel::*;
    match (primary_subtag(lang).as_str(), label) {
        ("es", Positive) => "Positivo",
        ("es", Negative) => "Negativo",
        ("es", Neutral) => "Neutral",
        ("fr", Positive) => "Positif",
        ("fr", Negative) => "Négatif",
        ("fr", Neutral) => "Neutre",
        ("de", Positive) => "Positiv",
        ("de", Negative) => "Negativ",
        ("de", Neutral) => "Neutral",
        ("hi", Positive) => "सकारात्मक",
        ("hi", Negative) => "नकारात्मक",
        ("hi", Neutral) => "तटस्थ",
        ("it", Positive) => "Positivo",
        ("it", Negative) => "Negativo",
        ("it", Neutral) => "Neutrale",
        ("pt", Positive) => "Positivo",
        ("pt", Negative) => "Negativo",
        ("pt", Neutral) => "Neutro",
        ("ru", Positive) => "Положительный",
        ("ru", Negative) => "Отрицательный",
        ("ru", Neutral) => "Нейтральный",
        ("ja", Positive) => "ポジティブ",
        ("ja", Negative) => "ネガティブ",
        ("ja", Neutral) => "ニュートラル",
        ("ko", Positive) => "긍정적",
        ("ko", Negative) => "부정적",
        ("ko", Neutral) => "중립적",
        ("zh", Positive) => "积极",
        ("zh", Negative) => "消极",
        ("zh", Neutral) => "中性",
        ("ar", Positive) => "إيجابي",
        ("ar", Negative) => "سلبي",
        ("ar", Neutral) => "محايد",
        (_, Positive) => "Positive",
        (_, Negative) => "Negative",
        (_, Neutral) => "Neutral",
    }
}

// ============================================================================
// Detection
// ============================================================================

/// Language detection collaborator
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// ISO 639-1 code of `text`
    ///
    /// Implementations should answer the pivot language for short or
    /// ambiguous text rather than guess.
    async fn detect_language(&self, text: &str) -> Result<String, TranslationError>;
}

/// Minimum stopword hits before a Latin-script guess is trusted
const MIN_STOPWORD_HITS: usize = 2;

/// Distinctive function words per Latin-script language
const STOPWORD_PROFILES: [(&str, &[&str]); 13] = [
    (
        "en",
        &[
            "the", "and", "is", "was", "were", "with", "this", "that", "very", "food", "it",
            "of", "to", "but", "we", "they", "are", "our",
        ],
    ),
    (
        "es",
        &[
            "el", "la", "los", "las", "es", "muy", "pero", "con", "una", "y", "que", "comida",
            "servicio", "fue", "estaba", "del", "por", "para",
        ],
    ),
    (
        "fr",
        &[
            "le", "les", "est", "très", "mais", "avec", "et", "des", "nous", "était", "pas",
            "du", "pour", "repas", "c'est",
        ],
    ),
    (
        "de",
        &[
            "der", "die", "das", "und", "ist", "sehr", "aber", "mit", "nicht", "war", "ein",
            "eine", "essen", "wir", "zu",
        ],
    ),
    (
        "it",
        &[
            "il", "è", "molto", "ma", "di", "che", "era", "cibo", "non", "gli", "della", "buono",
            "servizio",
        ],
    ),
    (
        "pt",
        &[
            "o", "os", "é", "muito", "mas", "com", "não", "foi", "do", "da", "um", "atendimento",
            "estava",
        ],
    ),
    (
        "nl",
        &[
            "het", "een", "niet", "zeer", "maar", "met", "eten", "wij", "heel", "lekker", "erg",
            "ook",
        ],
    ),
    (
        "sv",
        &["och", "är", "inte", "mycket", "också", "jag", "väldigt", "gott"],
    ),
    // Danish and Norwegian share most function words; only the telling ones are listed
    (
        "da",
        &["meget", "maden", "rigtig", "lækker", "tjeneren", "hyggeligt"],
    ),
    (
        "no",
        &["veldig", "maten", "kjempegod", "servitøren", "nydelig", "koselig"],
    ),
    (
        "fi",
        &["ja", "on", "oli", "ei", "hyvä", "erittäin", "mutta", "ruoka", "se", "että"],
    ),
    (
        "pl",
        &["i", "jest", "bardzo", "ale", "nie", "było", "jedzenie", "się", "na"],
    ),
    (
        "tr",
        &["ve", "bir", "çok", "ama", "ile", "değil", "yemek", "bu", "için", "güzel"],
    ),
];

/// Script and stopword heuristic detector
///
/// Non-Latin scripts decide the language directly. Latin text is matched
/// against small stopword profiles; too few hits or a tie answers the pivot
/// language.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicDetector;

#[derive(Debug, Default)]
struct ScriptCounts {
    latin: usize,
    cyrillic: usize,
    arabic: usize,
    hebrew: usize,
    devanagari: usize,
    thai: usize,
    hangul: usize,
    kana: usize,
    han: usize,
}

impl ScriptCounts {
    fn tally(text: &str) -> Self {
        let mut counts = Self::default();
        for c in text.chars().filter(|c| c.is_alphabetic()) {
            match c as u32 {
                0x0400..=0x04FF => counts.cyrillic += 1,
                0x0590..=0x05FF => counts.hebrew += 1,
                0x0600..=0x06FF | 0x0750..=0x077F => counts.arabic += 1,
                0x0900..=0x097F => counts.devanagari += 1,
                0x0E00..=0x0E7F => counts.thai += 1,
                0x1100..=0x11FF | 0xAC00..=0xD7AF => counts.hangul += 1,
                0x3040..=0x30FF => counts.kana += 1,
                0x4E00..=0x9FFF => counts.han += 1,
                _ if c.is_ascii_alphabetic() || ('\u{00C0}'..='\u{024F}').contains(&c) => {
                    counts.latin += 1
                }
                _ => {}
            }
        }
        counts
    }

    /// Language implied by the dominant non-Latin script, if any
    fn dominant_script_language(&self) -> Option<&'static str> {
        // Kana marks Japanese even when Han characters outnumber it
        let cjk = if self.kana > 0 {
            ("ja", self.kana + self.han)
        } else {
            ("zh", self.han)
        };
        let candidates = [
            ("ru", self.cyrillic),
            ("ar", self.arabic),
            ("he", self.hebrew),
            ("hi", self.devanagari),
            ("th", self.thai),
            ("ko", self.hangul),
            cjk,
        ];

        candidates
            .into_iter()
            .filter(|(_, count)| *count > self.latin)
            .max_by_key(|(_, count)| *count)
            .map(|(lang, _)| lang)
    }
}

impl HeuristicDetector {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous detection used by the async trait implementation
    pub fn detect(&self, text: &str) -> &'static str {
        let counts = ScriptCounts::tally(text);
        if let Some(lang) = counts.dominant_script_language() {
            return lang;
        }

        let tokens = crate::adapters::word_tokens(text);
        let mut best = (PIVOT_LANGUAGE, 0usize);
        let mut tied = false;
        for (lang, profile) in STOPWORD_PROFILES {
            let hits = tokens
                .iter()
                .filter(|t| profile.contains(&t.as_str()))
                .count();
            if hits > best.1 {
                best = (lang, hits);
                tied = false;
            } else if hits == best.1 && hits > 0 {
                tied = true;
            }
        }

        if tied || best.1 < MIN_STOPWORD_HITS {
            PIVOT_LANGUAGE
        } else {
            best.0
        }
    }
}

#[async_trait]
impl LanguageDetector for HeuristicDetector {
    async fn detect_language(&self, text: &str) -> Result<String, TranslationError> {
        Ok(self.detect(text).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog() {
        assert_eq!(SUPPORTED_LANGUAGES.len(), 20);
        assert!(is_supported("pt-BR"));
        assert!(!is_supported("he"));
        assert_eq!(display_name("de"), Some("Deutsch"));
        assert_eq!(display_name("xx"), None);
    }

    #[test]
    fn test_rtl() {
        for code in ["ar", "he", "fa", "ur", "AR"] {
            assert!(is_rtl(code), "{}", code);
        }
        assert!(!is_rtl("en"));
    }

    #[test]
    fn test_localize_label() {
        assert_eq!(localize_label(SentimentLabel::Negative, "fr"), "Négatif");
        assert_eq!(localize_label(SentimentLabel::Neutral, "it"), "Neutrale");
        assert_eq!(localize_label(SentimentLabel::Positive, "zh"), "积极");
        assert_eq!(localize_label(SentimentLabel::Positive, "nl"), "Positive");
    }

    #[test]
    fn test_detect_latin_languages() {
        let detector = HeuristicDetector::new();
        assert_eq!(
            detector.detect("La comida estaba muy buena pero el servicio fue lento"),
            "es"
        );
        assert_eq!(
            detector.detect("Le repas était très bon mais le service est lent"),
            "fr"
        );
        assert_eq!(
            detector.detect("Das Essen war sehr gut aber der Service ist langsam"),
            "de"
        );
        assert_eq!(
            detector.detect("The food was great and the staff were friendly"),
            "en"
        );
    }

    #[test]
    fn test_detect_scandinavian_languages() {
        let detector = HeuristicDetector::new();
        assert_eq!(
            detector.detect("Maden var rigtig lækker og meget billig"),
            "da"
        );
        assert_eq!(
            detector.detect("Maten var veldig god og servitøren var nydelig"),
            "no"
        );
        assert_eq!(
            detector.detect("Maten var väldigt gott och inte dyr"),
            "sv"
        );
    }

    #[test]
    fn test_detect_scripts() {
        let detector = HeuristicDetector::new();
        assert_eq!(detector.detect("Еда была очень вкусной"), "ru");
        assert_eq!(detector.detect("料理はとても美味しかったです"), "ja");
        assert_eq!(detector.detect("菜很好吃"), "zh");
        assert_eq!(detector.detect("음식이 정말 맛있었어요"), "ko");
        assert_eq!(detector.detect("الطعام كان رائعا"), "ar");
    }

    #[test]
    fn test_short_text_defaults_to_pivot() {
        let detector = HeuristicDetector::new();
        assert_eq!(detector.detect("Bueno"), "en");
        assert_eq!(detector.detect("ok"), "en");
        assert_eq!(detector.detect(""), "en");
    }
}
