//! Localization module
//!
//! Languages accepted by the Pixabay `lang` parameter and the display
//! strings of the sentinel results.

/// Languages supported by the Pixabay API
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("cs", "Čeština"),
    ("da", "Dansk"),
    ("de", "Deutsch"),
    ("en", "English"),
    ("es", "Español"),
    ("fr", "Français"),
    ("id", "Indonesia"),
    ("it", "Italiano"),
    ("hu", "Magyar"),
    ("nl", "Nederlands"),
    ("no", "Norsk"),
    ("pl", "Polski"),
    ("pt", "Português"),
    ("ro", "Română"),
    ("sk", "Slovenčina"),
    ("fi", "Suomi"),
    ("sv", "Svenska"),
    ("tr", "Türkçe"),
    ("vi", "Việt"),
    ("th", "ไทย"),
    ("bg", "Български"),
    ("ru", "Русский"),
    ("el", "Ελληνική"),
    ("ja", "日本語"),
    ("ko", "한국어"),
    ("zh", "中文"),
];

/// Check whether a language code is accepted by the API
pub fn is_supported(code: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|(c, _)| *c == code)
}

/// Display name shared by every sentinel
pub const PROVIDER_NAME: &str = "Pixabay";

/// Descriptions shown for the three sentinel results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentinelTexts {
    pub loading: &'static str,
    pub error: &'static str,
    pub nothing_found: &'static str,
}

const ENGLISH: SentinelTexts = SentinelTexts {
    loading: "Loading images from Pixabay, please wait...",
    error: "Oops, an error occurred while searching.",
    nothing_found: "Oops, I didn't find what you are looking for.",
};

const SPANISH: SentinelTexts = SentinelTexts {
    loading: "Cargando imágenes de Pixabay, espera por favor...",
    error: "Vaya, se ha producido un error durante la búsqueda.",
    nothing_found: "Vaya, no he encontrado lo que buscas.",
};

/// Sentinel texts for a language, English when there is no translation
pub fn sentinel_texts(code: &str) -> SentinelTexts {
    let base_code = code.split('-').next().unwrap_or(code);

    match base_code {
        "es" => SPANISH,
        _ => ENGLISH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_languages() {
        assert!(is_supported("en"));
        assert!(is_supported("es"));
        assert!(!is_supported("all"));
        assert!(!is_supported(""));
    }

    #[test]
    fn test_sentinel_texts_fallback() {
        assert_eq!(sentinel_texts("es"), SPANISH);
        assert_eq!(sentinel_texts("es-MX"), SPANISH);
        assert_eq!(sentinel_texts("de"), ENGLISH);
    }
}
