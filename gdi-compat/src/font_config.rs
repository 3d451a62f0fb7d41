//! Font discovery configuration.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Which fonts a drawing surface can use.
///
/// Turned into a font database by [`FontConfig::resolve`]. Surfaces built
/// without an explicit configuration use [`FontConfig::default`], which scans
/// the system fonts the first time text is drawn or measured.
#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Font files held in memory.
    pub custom_fonts: Vec<CustomFont>,
    /// Concrete families backing the generic families.
    pub generic_families: GenericFamilyMap,
    /// Whether to load system fonts (default: true).
    pub load_system_fonts: bool,
    /// Additional directories to scan for font files.
    pub font_dirs: Vec<PathBuf>,
    /// Whether glyph outlines are hinted to the pixel grid (default: false).
    pub hinting_enabled: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            custom_fonts: Vec::new(),
            generic_families: GenericFamilyMap::defaults(),
            load_system_fonts: true,
            font_dirs: Vec::new(),
            hinting_enabled: false,
        }
    }
}

/// Raw font file data. Arc-wrapped so configurations clone cheaply.
#[derive(Clone, Debug)]
pub struct CustomFont {
    pub data: Arc<Vec<u8>>,
}

impl CustomFont {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: Arc::new(data),
        }
    }
}

/// Preference lists for the generic families, first installed entry wins.
#[derive(Clone, Debug, Default)]
pub struct GenericFamilyMap {
    pub sans_serif: Vec<String>,
    pub serif: Vec<String>,
    pub monospace: Vec<String>,
}

impl GenericFamilyMap {
    /// The classic desktop faces, followed by their metric-compatible
    /// Liberation and DejaVu substitutes.
    pub fn defaults() -> Self {
        Self {
            sans_serif: vec![
                "Microsoft Sans Serif".into(),
                "Arial".into(),
                "Liberation Sans".into(),
                "DejaVu Sans".into(),
            ],
            serif: vec![
                "Times New Roman".into(),
                "Liberation Serif".into(),
                "DejaVu Serif".into(),
            ],
            monospace: vec![
                "Courier New".into(),
                "Liberation Mono".into(),
                "DejaVu Sans Mono".into(),
            ],
        }
    }
}

impl FontConfig {
    /// Build the font database. Scanning system fonts is slow, so resolve
    /// once and share the result between surfaces.
    pub fn resolve(&self) -> ResolvedFontConfig {
        ResolvedFontConfig::new(self)
    }
}

/// A [`FontConfig`] resolved into a font database.
///
/// Cloning copies the in-memory database without touching the filesystem.
#[derive(Clone)]
pub struct ResolvedFontConfig {
    pub(crate) fontdb: fontdb::Database,
    pub(crate) hinting_enabled: bool,
}

impl ResolvedFontConfig {
    pub fn new(config: &FontConfig) -> Self {
        Self {
            fontdb: font_config_to_fontdb(config),
            hinting_enabled: config.hinting_enabled,
        }
    }

    /// Installed family names, sorted and deduplicated.
    pub fn family_names(&self) -> Vec<String> {
        self.fontdb
            .faces()
            .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Whether a family is installed, ignoring case.
    pub fn has_family(&self, name: &str) -> bool {
        self.fontdb.faces().any(|face| {
            face.families
                .iter()
                .any(|(family, _)| family.eq_ignore_ascii_case(name))
        })
    }
}

impl std::fmt::Debug for ResolvedFontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFontConfig")
            .field("faces", &self.fontdb.len())
            .field("hinting_enabled", &self.hinting_enabled)
            .finish()
    }
}

/// Convert a [`FontConfig`] into a [`fontdb::Database`].
pub fn font_config_to_fontdb(config: &FontConfig) -> fontdb::Database {
    let mut db = fontdb::Database::new();

    if config.load_system_fonts {
        db.load_system_fonts();
    }
    for dir in &config.font_dirs {
        db.load_fonts_dir(dir);
    }
    for font in &config.custom_fonts {
        db.load_font_data(Vec::from(font.data.as_slice()));
    }

    apply_generic_families(&mut db, &config.generic_families);
    log::debug!(target: "gdi", "font database with {} faces", db.len());
    db
}

fn apply_generic_families(db: &mut fontdb::Database, families: &GenericFamilyMap) {
    let available: BTreeSet<String> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(fam, _lang)| fam.clone()))
        .collect();
    let first_installed =
        |list: &[String]| list.iter().find(|family| available.contains(*family)).cloned();

    if let Some(family) = first_installed(&families.sans_serif) {
        db.set_sans_serif_family(family);
    }
    if let Some(family) = first_installed(&families.serif) {
        db.set_serif_family(family);
    }
    if let Some(family) = first_installed(&families.monospace) {
        db.set_monospace_family(family);
    }
}
