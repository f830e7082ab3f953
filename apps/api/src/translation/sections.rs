//! Section labels — canonical résumé section keys, their default display titles per
//! language, and the reconciliation of defaults, generator output and user overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::translation::content::ContentNode;
use crate::translation::language::Language;

/// Reserved document key holding the section label set.
pub const SECTION_NAMES_KEY: &str = "sectionNames";

/// Reserved document key holding labels the user typed in themselves.
pub const CUSTOM_SECTION_NAMES_KEY: &str = "customSectionNames";

/// Canonical résumé sections. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    PersonalInfo,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Languages,
    VolunteerExperience,
    Publications,
    HonorsAwards,
    Courses,
    TestScores,
}

impl SectionKey {
    pub const ALL: [SectionKey; 13] = [
        SectionKey::PersonalInfo,
        SectionKey::Summary,
        SectionKey::Experience,
        SectionKey::Education,
        SectionKey::Skills,
        SectionKey::Projects,
        SectionKey::Certifications,
        SectionKey::Languages,
        SectionKey::VolunteerExperience,
        SectionKey::Publications,
        SectionKey::HonorsAwards,
        SectionKey::Courses,
        SectionKey::TestScores,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::PersonalInfo => "personalInfo",
            SectionKey::Summary => "summary",
            SectionKey::Experience => "experience",
            SectionKey::Education => "education",
            SectionKey::Skills => "skills",
            SectionKey::Projects => "projects",
            SectionKey::Certifications => "certifications",
            SectionKey::Languages => "languages",
            SectionKey::VolunteerExperience => "volunteerExperience",
            SectionKey::Publications => "publications",
            SectionKey::HonorsAwards => "honorsAwards",
            SectionKey::Courses => "courses",
            SectionKey::TestScores => "testScores",
        }
    }

    pub fn from_key(key: &str) -> Option<SectionKey> {
        SectionKey::ALL.into_iter().find(|k| k.as_str() == key)
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Built-in display title for this section in `lang`.
    pub fn default_label(self, lang: Language) -> &'static str {
        default_labels(lang)[self.index()]
    }
}

// Indexed by `SectionKey` declaration order.
fn default_labels(lang: Language) -> &'static [&'static str; 13] {
    match lang {
        Language::English => &[
            "Personal Information",
            "Summary",
            "Experience",
            "Education",
            "Skills",
            "Projects",
            "Certifications",
            "Languages",
            "Volunteer Experience",
            "Publications",
            "Honors & Awards",
            "Courses",
            "Test Scores",
        ],
        Language::Azerbaijani => &[
            "Şəxsi məlumatlar",
            "Xülasə",
            "İş təcrübəsi",
            "Təhsil",
            "Bacarıqlar",
            "Layihələr",
            "Sertifikatlar",
            "Dillər",
            "Könüllü fəaliyyət",
            "Nəşrlər",
            "Mükafatlar və təltiflər",
            "Kurslar",
            "Test nəticələri",
        ],
        Language::Russian => &[
            "Личная информация",
            "О себе",
            "Опыт работы",
            "Образование",
            "Навыки",
            "Проекты",
            "Сертификаты",
            "Языки",
            "Волонтерский опыт",
            "Публикации",
            "Награды и достижения",
            "Курсы",
            "Результаты тестов",
        ],
        Language::Turkish => &[
            "Kişisel Bilgiler",
            "Özet",
            "İş Deneyimi",
            "Eğitim",
            "Yetenekler",
            "Projeler",
            "Sertifikalar",
            "Diller",
            "Gönüllü Deneyim",
            "Yayınlar",
            "Onur ve Ödüller",
            "Kurslar",
            "Test Puanları",
        ],
        Language::German => &[
            "Persönliche Daten",
            "Zusammenfassung",
            "Berufserfahrung",
            "Ausbildung",
            "Kenntnisse",
            "Projekte",
            "Zertifikate",
            "Sprachen",
            "Ehrenamtliche Tätigkeit",
            "Publikationen",
            "Auszeichnungen",
            "Kurse",
            "Testergebnisse",
        ],
        Language::French => &[
            "Informations personnelles",
            "Résumé",
            "Expérience professionnelle",
            "Formation",
            "Compétences",
            "Projets",
            "Certifications",
            "Langues",
            "Bénévolat",
            "Publications",
            "Distinctions et prix",
            "Cours",
            "Résultats de tests",
        ],
        Language::Spanish => &[
            "Información personal",
            "Resumen",
            "Experiencia",
            "Educación",
            "Habilidades",
            "Proyectos",
            "Certificaciones",
            "Idiomas",
            "Voluntariado",
            "Publicaciones",
            "Honores y premios",
            "Cursos",
            "Puntuaciones de exámenes",
        ],
    }
}

/// Display label per section key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionNameSet(BTreeMap<SectionKey, String>);

impl SectionNameSet {
    /// Every section key with its built-in label for `lang`.
    pub fn defaults(lang: Language) -> Self {
        SectionNameSet(
            SectionKey::ALL
                .into_iter()
                .map(|key| (key, key.default_label(lang).to_string()))
                .collect(),
        )
    }

    /// Reads labels from a map node. Unknown keys, non-scalar values and blank
    /// labels are skipped.
    pub fn from_node(node: &ContentNode) -> Self {
        let ContentNode::Map(entries) = node else {
            return SectionNameSet::default();
        };

        let mut labels = BTreeMap::new();
        for (key, value) in entries {
            let Some(section) = SectionKey::from_key(key) else {
                debug!("Ignoring unknown section label key '{key}'");
                continue;
            };
            match value.as_scalar().map(str::trim) {
                Some(label) if !label.is_empty() => {
                    labels.insert(section, label.to_string());
                }
                _ => {}
            }
        }
        SectionNameSet(labels)
    }

    pub fn get(&self, key: SectionKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Layers `other` on top of `self`; keys present in `other` win.
    pub fn overlay(mut self, other: SectionNameSet) -> Self {
        self.0.extend(other.0);
        self
    }

    pub fn to_node(&self) -> ContentNode {
        ContentNode::Map(
            self.0
                .iter()
                .map(|(key, label)| (key.as_str().to_string(), ContentNode::scalar(label)))
                .collect(),
        )
    }
}

/// Final label set. Precedence, later wins: built-in defaults for `target`,
/// labels the generator returned, labels the user set on the original document.
pub fn reconcile_section_names(
    target: Language,
    generated: Option<&ContentNode>,
    overrides: Option<&ContentNode>,
) -> SectionNameSet {
    let generated = generated.map(SectionNameSet::from_node).unwrap_or_default();
    let overrides = overrides.map(SectionNameSet::from_node).unwrap_or_default();

    debug!(
        "Reconciling section labels: {} generated, {} overrides",
        generated.len(),
        overrides.len()
    );

    SectionNameSet::defaults(target)
        .overlay(generated)
        .overlay(overrides)
}
