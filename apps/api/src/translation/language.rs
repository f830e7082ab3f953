//! Supported languages and the per-language data the pipeline needs:
//! display names, calendar month names and the user-facing failure hint.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Target languages a résumé can be translated into. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[serde(alias = "en")]
    English,
    #[serde(alias = "az")]
    Azerbaijani,
    #[serde(alias = "ru")]
    Russian,
    #[serde(alias = "tr")]
    Turkish,
    #[serde(alias = "de")]
    German,
    #[serde(alias = "fr")]
    French,
    #[serde(alias = "es")]
    Spanish,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::English,
        Language::Azerbaijani,
        Language::Russian,
        Language::Turkish,
        Language::German,
        Language::French,
        Language::Spanish,
    ];

    /// The language month names fall back to when a document mixes calendars.
    pub const UNIVERSAL: Language = Language::English;

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Azerbaijani => "az",
            Language::Russian => "ru",
            Language::Turkish => "tr",
            Language::German => "de",
            Language::French => "fr",
            Language::Spanish => "es",
        }
    }

    /// English name of the language, as used in prompts.
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Azerbaijani => "Azerbaijani",
            Language::Russian => "Russian",
            Language::Turkish => "Turkish",
            Language::German => "German",
            Language::French => "French",
            Language::Spanish => "Spanish",
        }
    }

    /// Month names, January first.
    pub fn month_names(self) -> &'static [&'static str; 12] {
        match self {
            Language::English => &[
                "January", "February", "March", "April", "May", "June", "July", "August",
                "September", "October", "November", "December",
            ],
            Language::Azerbaijani => &[
                "Yanvar", "Fevral", "Mart", "Aprel", "May", "İyun", "İyul", "Avqust",
                "Sentyabr", "Oktyabr", "Noyabr", "Dekabr",
            ],
            Language::Russian => &[
                "Январь", "Февраль", "Март", "Апрель", "Май", "Июнь", "Июль", "Август",
                "Сентябрь", "Октябрь", "Ноябрь", "Декабрь",
            ],
            Language::Turkish => &[
                "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos",
                "Eylül", "Ekim", "Kasım", "Aralık",
            ],
            Language::German => &[
                "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August",
                "September", "Oktober", "November", "Dezember",
            ],
            Language::French => &[
                "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août",
                "septembre", "octobre", "novembre", "décembre",
            ],
            Language::Spanish => &[
                "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto",
                "septiembre", "octubre", "noviembre", "diciembre",
            ],
        }
    }

    /// Short, non-technical message shown to the user when translation gives up.
    pub fn failure_hint(self) -> &'static str {
        match self {
            Language::English => {
                "We couldn't translate your résumé right now. Please try again in a few minutes."
            }
            Language::Azerbaijani => {
                "Hazırda CV-nizi tərcümə etmək mümkün olmadı. Bir neçə dəqiqədən sonra yenidən cəhd edin."
            }
            Language::Russian => {
                "Сейчас не удалось перевести ваше резюме. Пожалуйста, повторите попытку через несколько минут."
            }
            Language::Turkish => {
                "Özgeçmişiniz şu anda çevrilemedi. Lütfen birkaç dakika sonra tekrar deneyin."
            }
            Language::German => {
                "Ihr Lebenslauf konnte gerade nicht übersetzt werden. Bitte versuchen Sie es in einigen Minuten erneut."
            }
            Language::French => {
                "Nous n'avons pas pu traduire votre CV pour le moment. Veuillez réessayer dans quelques minutes."
            }
            Language::Spanish => {
                "No pudimos traducir tu currículum en este momento. Inténtalo de nuevo en unos minutos."
            }
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name().to_lowercase())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == needle || lang.name().to_lowercase() == needle)
            .ok_or_else(|| format!("unsupported language '{s}'"))
    }
}

/// Source language of a document: either named by the caller or left to the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SourceLanguage {
    #[default]
    Auto,
    Known(Language),
}

impl SourceLanguage {
    /// How the source is described to the generator.
    pub fn prompt_label(self) -> String {
        match self {
            SourceLanguage::Auto => "the original language (detect it automatically)".to_string(),
            SourceLanguage::Known(lang) => lang.name().to_string(),
        }
    }
}

impl TryFrom<String> for SourceLanguage {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() || value.trim().eq_ignore_ascii_case("auto") {
            return Ok(SourceLanguage::Auto);
        }
        value.parse().map(SourceLanguage::Known)
    }
}

impl From<SourceLanguage> for String {
    fn from(value: SourceLanguage) -> Self {
        value.to_string()
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLanguage::Auto => f.write_str("auto"),
            SourceLanguage::Known(lang) => write!(f, "{lang}"),
        }
    }
}
