use serde::{Deserialize, Serialize};

/// Exam category. Declaration order is the fixed taxonomy order used for
/// every listing and report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "IRM")]
    Irm,
    #[serde(rename = "SCANNER")]
    Scanner,
    #[serde(rename = "RADIOGRAPHIE")]
    Radiographie,
    #[serde(rename = "MAMMOGRAPHIE")]
    Mammographie,
    #[serde(rename = "ECHOGRAPHIE")]
    Echographie,
    #[serde(rename = "CONE BEAM")]
    ConeBeam,
    #[serde(rename = "DENTAIRE")]
    Dentaire,
    /// Label failed validation: the bot most likely misheard the caller.
    #[serde(rename = "INTITULES INCOHERENTS", alias = "INCOHERENT_LABELS", alias = "INTITULES INCOMPRIS")]
    Incoherent,
    #[serde(rename = "AUTRE", alias = "OTHER")]
    Other,
    /// No exam label at all.
    #[serde(rename = "INCONNU", alias = "UNKNOWN")]
    Unknown,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Irm,
        Category::Scanner,
        Category::Radiographie,
        Category::Mammographie,
        Category::Echographie,
        Category::ConeBeam,
        Category::Dentaire,
        Category::Incoherent,
        Category::Other,
        Category::Unknown,
    ];

    /// Report label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Irm => "IRM",
            Category::Scanner => "SCANNER",
            Category::Radiographie => "RADIOGRAPHIE",
            Category::Mammographie => "MAMMOGRAPHIE",
            Category::Echographie => "ECHOGRAPHIE",
            Category::ConeBeam => "CONE BEAM",
            Category::Dentaire => "DENTAIRE",
            Category::Incoherent => "INTITULES INCOHERENTS",
            Category::Other => "AUTRE",
            Category::Unknown => "INCONNU",
        }
    }

    /// Parse a report label. Accepts the English names and the legacy
    /// "INTITULES INCOMPRIS" label of the first report generation.
    pub fn from_label(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase().replace('_', " ");
        match upper.as_str() {
            "IRM" => Some(Category::Irm),
            "SCANNER" => Some(Category::Scanner),
            "RADIOGRAPHIE" => Some(Category::Radiographie),
            "MAMMOGRAPHIE" => Some(Category::Mammographie),
            "ECHOGRAPHIE" => Some(Category::Echographie),
            "CONE BEAM" | "CONEBEAM" => Some(Category::ConeBeam),
            "DENTAIRE" => Some(Category::Dentaire),
            "INTITULES INCOHERENTS" | "INTITULES INCOMPRIS" | "INCOHERENT LABELS" => {
                Some(Category::Incoherent)
            }
            "AUTRE" | "OTHER" => Some(Category::Other),
            "INCONNU" | "UNKNOWN" => Some(Category::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered (category, keywords) table. The first category with a keyword
/// hit wins, so order breaks ties ("coroscanner" lands in SCANNER).
#[derive(Debug, Clone)]
pub struct CategoryTable {
    entries: Vec<(Category, Vec<String>)>,
}

impl CategoryTable {
    pub fn new(entries: Vec<(Category, Vec<String>)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(cat, kws)| (cat, kws.into_iter().map(|k| k.to_lowercase()).collect()))
            .collect();
        Self { entries }
    }

    /// First matching category for an already lower-cased label.
    pub fn lookup(&self, lower: &str) -> Option<Category> {
        self.entries
            .iter()
            .find(|(_, kws)| kws.iter().any(|k| lower.contains(k.as_str())))
            .map(|(cat, _)| *cat)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        let table: [(Category, &[&str]); 7] = [
            (Category::Irm, &["irm", "imagerie par résonance magnétique"]),
            (
                Category::Scanner,
                &["scanner", "tdm", "tomodensitométrie", "ct", "coroscanner", "angioscanner"],
            ),
            (Category::Radiographie, &["radio", "radiographie", "rx", "téléradiographie"]),
            (Category::Mammographie, &["mammographie", "mammo"]),
            (
                Category::Echographie,
                &["échographie", "echographie", "écho", "echo", "doppler"],
            ),
            (Category::ConeBeam, &["cone beam", "conebeam"]),
            (
                Category::Dentaire,
                &["dentaire", "panoramique dentaire", "orthopantomogramme"],
            ),
        ];
        Self::new(
            table
                .iter()
                .map(|(cat, kws)| (*cat, kws.iter().map(|k| k.to_string()).collect()))
                .collect(),
        )
    }
}
