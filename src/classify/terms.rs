//! Built-in vocabularies.
//!
//! These are the defaults handed to [`super::Classifier`]; tests and config
//! can substitute their own lists. All entries are lower-case because
//! matching runs against the lower-cased label.

/// Exam modalities. Also the "modality" half of the two-list policy.
pub const MODALITY_TERMS: &[&str] = &[
    "irm", "scanner", "tdm", "cone beam", "conebeam", "radio", "radiographie", "echographie",
    "échographie", "doppler", "mammographie", "mammo", "eos", "ostéodensitométrie",
    "densitométrie", "arthroscanner", "angioscanner", "coroscanner", "dentascanner",
];

/// Anatomical and medical vocabulary extracted from the reference exam catalogue.
pub const ANATOMY_TERMS: &[&str] = &[
    "abdo", "abdo-pelvienne", "abdomen", "abdominal", "abdominale", "abdomino",
    "abdomino-pelvien", "abdomino-pelvienne", "abdomino-rénale", "achille", "acide",
    "acromiale", "acromio", "acromio-claviculaire", "adducteurs", "aisselle", "anal",
    "angio-irm", "anus", "aorte", "aortique", "artériel", "artérielle", "artérioveineux",
    "artères", "arthrographie", "articulaire", "articulation", "articulations", "atm",
    "auditifs", "avant-bras", "axillaire", "bassin", "biceps", "biliaire", "biliaires",
    "biopsie", "brachial", "bras", "bébé", "cai", "calcaneum", "calcanéums", "calcique",
    "canal", "cancer", "cardiaque", "cardiologie", "carotide", "carotides", "cavum",
    "cervical", "cervicale", "cervicales", "cervico", "cervico-dorsal",
    "cervico-dorso-lombaire", "cervico-encéphalique", "cervico-lombaire",
    "cervico-thoracique", "cheville", "chevilles", "chirurgie", "cholangiographie",
    "cholesteatome", "cimentoplastie", "claviculaire", "clavicule", "coccygienne", "coccyx",
    "cochléaire", "coeur", "col", "colon", "colonne", "coloscanner", "coloscopie",
    "conduits", "coronaires", "costal", "costale", "cou", "coude", "coudes", "creux",
    "croissance", "cryothérapie", "crâne", "crânienne", "cubitus", "cuisse", "cystographie",
    "cytoponction", "cérébral", "cérébrale", "côtes", "dacryoscanner", "datation",
    "dentaire", "dentaires", "dents", "diffusion", "disque", "doigt", "dorsal", "dorsale",
    "dorsaux", "dorso", "dorso-lombaire", "dorsolombaire", "dos", "duodénal", "dynamique",
    "déféco-irm", "défécographie", "dépistage", "ecg", "echocardiographie", "effort",
    "electrocardiogramme", "electromyogramme", "encéphale", "encéphalique", "endométriose",
    "endométrioses", "endovaginale", "entero", "entero-irm", "entier", "entéro-scanner",
    "epaule", "estomac", "face", "facial", "faciale", "femme", "ferrique", "fesse",
    "fessier", "fessiers", "fessière", "fibroscan", "fistule", "fistulographie", "foie",
    "fontanelles", "foraminale", "fosse", "fossettes", "frontale", "fullspine", "féminin",
    "fémur", "galactographie", "ganglion", "gastro", "gastrographine", "genou", "genoux",
    "glande", "glandes", "glutéale", "goniométrie", "gonométrie", "gorge", "greffon", "gril",
    "grill", "gros", "grossesse", "grêle", "gémellaire", "hanche", "hanches",
    "hemochromatose", "holorachis", "homme", "huber", "humerus", "humérus", "hyaluronique",
    "hydrosolubles", "hypophysaire", "hypophyse", "hysterosonographie", "hystérographie",
    "hystérosalpingographie", "hémi-squelette", "hépatique", "hépatobiliaire", "iliaque",
    "iliaques", "implant", "implantation", "implants", "impulsionnelle", "infertilité",
    "infiltration", "inférieur", "inférieurs", "inguinal", "inguinale", "injection",
    "internes", "intestin", "intra", "intra-articulaire", "intraveineuse", "irmpelvien",
    "ischio", "ischio-jambiers", "isocinétisme", "ivg", "jambe", "joue", "kiné", "kyste",
    "l4", "l5", "lacrymales", "laser", "lavement", "ligamentaire", "lipome", "lombaire",
    "lombaires", "lèvre", "machoire", "macrobiopsie", "main", "mains", "mamelon",
    "mammaire", "mandibulaire", "mandibulaires", "mapa", "masculin", "massif", "maxillaire",
    "membre", "membres", "menton", "mesure", "moelle", "molles", "mollet", "monitorage",
    "morphologique", "mou", "mous", "moyen", "moyenne", "muscle", "muscles", "musculaire",
    "myocardique", "médiastinale", "médullaire", "nerfs", "nez", "nuque", "obstétrique",
    "occipitale", "oculaire", "oesogastroduodénal", "oil", "omoplate", "ongles",
    "ophtalmologie", "opn", "orbites", "oreille", "orl", "orteil", "orteils",
    "orthodontique", "orthopantomogramme", "os", "osophagien", "osseuse", "osseux",
    "osthéopathie", "ostéo-articulaire", "ovaires", "ovarienne", "ovulation",
    "oxygénothérapie", "pancréas", "pancréatique", "pangonogramme", "pangonométrie",
    "panoramique", "paramètres", "parathyroïde", "pariétale", "paroi", "parotide",
    "parotidienne", "parties", "peau", "pelvi", "pelvien", "pelvienne", "pelvimétrie",
    "pelvis", "penis", "pharyngo", "pharyngographie", "pharyngé", "pharynx", "pied", "pieds",
    "plaquettes", "plasma", "plexus", "pneumo", "pneumothorax", "podologique", "podométrie",
    "poignet", "poignets", "poitrine", "ponction", "postural", "postérieure", "pouce",
    "poumons", "pression", "profil", "propres", "prostate", "prostatique", "prp",
    "prélévement", "préparation", "pubienne", "pulmonaire", "pylore", "pédiatrique", "pénis",
    "périnéale", "péroné", "rachidiens", "rachis", "radiculographie", "rate", "rectum",
    "rein", "reins", "releveur", "renal", "rhino", "rhumatologique", "riche", "rochers",
    "région", "rénal", "rénale", "rénales", "réno", "rétrograde", "rééducation",
    "saccoradiculographie", "sacro", "sacro-coccygienens", "sacrum", "sacré", "salivaires",
    "scoliose", "score", "scrotal", "scrotale", "scrotum", "sein", "seins", "semaines",
    "sialographie", "sinus", "sinusien", "sous-maxillaire", "spirométrie", "squelette",
    "statique", "sternum", "stress", "stérilet", "stéréotaxique", "supra", "supra-aortiques",
    "supro", "supérieur", "supérieurs", "surcharge", "surrenales", "surrenalien",
    "surrénales", "sus", "système", "sénologique", "sésamoïdes", "talon", "tap", "tavi",
    "telécrâne", "temporal", "temporo", "temporo-mandibulaire", "temporo-mandibulaires",
    "tendineux", "tendinopathie", "tendon", "test", "testiculaire", "testicules",
    "thoracique", "thoraco", "thoraco-abdominal", "thoraco-abdomino-pelvien",
    "thoraco-pelvienne", "thorax", "thyroïde", "thyroïdien", "thyroïdienne", "tibia", "tissu",
    "tissus", "togd", "totale", "totalité", "tractions", "trans", "transcatheter",
    "transcrânien", "transfontanellaire", "transit", "trapèze", "triceps", "trimestre",
    "trituration", "trochanter", "trompes", "tronc", "troncs", "tsa", "tuméfaction", "télé",
    "télécrane", "télécrâne", "télérachis", "téléradiographie", "tête", "uiv", "urinaire",
    "urinaires", "urographie", "uroscanner", "utérus", "vaisseaux", "valgus", "valve",
    "varus", "vdmi", "veineux", "ventre", "verge", "vertébral", "vertébrale", "vesico",
    "vessie", "virtuelle", "visage", "voies", "végétations", "vésicale", "vésiculaire",
    "vésicule", "yeux", "âge", "élastographie", "élastométrie", "épaule", "épaules",
    "épidurale", "épreuve", "étude",
];

/// Conversational fragments that marked a label as misheard in the first
/// generation of the classifier.
pub const INCOMPREHENSIBLE_PATTERNS: &[&str] = &[
    r"ma mère",
    r"ma femme",
    r"mon mari",
    r"mon père",
    r"un.*pour",
    r"je veux",
    r"j'ai besoin",
    r"\d+\s*ans",
    r"bonjour",
    r"consultation",
];

/// Booking boilerplate stripped before counting significant words.
/// Longest phrases first so "rendez-vous pour" goes before "rendez-vous".
pub const BOILERPLATE_PHRASES: &[&str] = &[
    "prendre un rendez-vous",
    "prendre rendez-vous",
    "un rendez-vous de",
    "un rendez-vous pour",
    "rendez-vous pour",
    "rendez-vous de",
    "rendez-vous",
    "rdv pour",
    "rdv de",
    "rdv",
];

pub const STOP_WORDS: &[&str] = &[
    "un", "une", "le", "la", "les", "l'", "de", "du", "des", "pour", "avec", "et", "au", "aux",
    "en", "sur", "a", "à",
];

/// Every term the canonical validator accepts: modalities then anatomy.
pub fn medical_terms() -> Vec<String> {
    MODALITY_TERMS
        .iter()
        .chain(ANATOMY_TERMS.iter())
        .map(|t| t.to_string())
        .collect()
}
