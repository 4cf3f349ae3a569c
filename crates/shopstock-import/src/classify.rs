//! Filename-based image discovery and classification.
//!
//! Filenames are the only reliable signal available for associating loose
//! image files with catalog products; there is no manifest. Every image file
//! under the discovery root is classified into exactly one of
//! hero / common / color bucket / unrelated. Unrelated files are dropped
//! silently.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::sort::sort_image_files;

/// Image file extensions considered by the walker and classifier.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Filename characters treated as token separators.
const SEPARATORS: [char; 4] = ['-', '_', ' ', '.'];

/// `main_main` token bounded by start/separator and not followed by a letter.
static HERO_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[-_ .])main_main(?:[^a-z]|$)").expect("hero token regex is valid")
});

/// `common` token with the same boundary rule as the hero token.
static COMMON_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[-_ .])common(?:[^a-z]|$)").expect("common token regex is valid")
});

/// Lookup tables driving per-product filename matching.
///
/// Injected into the classifier rather than read from process-wide state so
/// the classifier stays pure and testable with synthetic tables. The
/// defaults cover the iPhone 16 family, the only catalog slice whose image
/// tree predates the prefix naming convention.
#[derive(Debug, Clone, Copy)]
pub struct ClassifierConfig {
    /// Known product public ID → filename prefix.
    pub prefix_overrides: &'static [(&'static str, &'static str)],
    /// Title phrase → filename prefix, most specific phrase first.
    pub title_prefixes: &'static [(&'static str, &'static str)],
    /// Public ID of the designated base-model product that gets the
    /// token-scan fallback.
    pub base_model_public_id: &'static str,
    /// Lowercased substring a directory name must contain for the
    /// token-scan fallback to apply.
    pub base_model_directory_hint: &'static str,
    /// Ordered filename token → canonical color name table; first matching
    /// token wins.
    pub color_tokens: &'static [(&'static str, &'static str)],
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            prefix_overrides: &[
                ("IPH16", "iph16"),
                ("IPH16-PLUS", "iph16plus"),
                ("IPH16-PRO", "iph16pro"),
                ("IPH16-PRO-MAX", "iph16promax"),
            ],
            title_prefixes: &[
                ("pro max", "iph16promax"),
                ("pro", "iph16pro"),
                ("plus", "iph16plus"),
                ("iphone 16", "iph16"),
            ],
            base_model_public_id: "IPH16",
            base_model_directory_hint: "iphone 16",
            color_tokens: &[
                ("ultramarine", "Ultramarine"),
                ("teal", "Teal"),
                ("pink", "Pink"),
                ("white", "White"),
                ("black", "Black"),
                ("midnight", "Black"),
            ],
        }
    }
}

/// How filenames are matched against one product, resolved once before the
/// per-file loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameStrategy {
    /// Files must start with `{prefix}` plus a separator.
    Prefixed { prefix: String },
    /// Base-model special case: prefix matching plus an ordered color-token
    /// scan for files inside directories matching `directory_hint`.
    BaseModel {
        prefix: String,
        directory_hint: String,
    },
}

impl NameStrategy {
    fn prefix(&self) -> &str {
        match self {
            NameStrategy::Prefixed { prefix } | NameStrategy::BaseModel { prefix, .. } => prefix,
        }
    }

    fn is_base_model(&self) -> bool {
        matches!(self, NameStrategy::BaseModel { .. })
    }
}

/// Resolves the filename-matching strategy for one product.
///
/// Prefix precedence: explicit public-ID override, then the first matching
/// title phrase, then the lowercased public ID itself.
#[must_use]
pub fn resolve_strategy(
    config: &ClassifierConfig,
    public_id: &str,
    title: Option<&str>,
) -> NameStrategy {
    let prefix = lookup_prefix(config, public_id, title);
    if public_id == config.base_model_public_id {
        NameStrategy::BaseModel {
            prefix,
            directory_hint: config.base_model_directory_hint.to_string(),
        }
    } else {
        NameStrategy::Prefixed { prefix }
    }
}

fn lookup_prefix(config: &ClassifierConfig, public_id: &str, title: Option<&str>) -> String {
    if let Some((_, prefix)) = config
        .prefix_overrides
        .iter()
        .find(|(id, _)| *id == public_id)
    {
        return (*prefix).to_string();
    }

    if let Some(title) = title {
        let title_lower = title.to_lowercase();
        if let Some((_, prefix)) = config
            .title_prefixes
            .iter()
            .find(|(phrase, _)| title_lower.contains(phrase))
        {
            return (*prefix).to_string();
        }
    }

    public_id.to_lowercase()
}

/// Per-product image discovery result. Rebuilt fresh on every run; never
/// persisted.
#[derive(Debug, Clone, Default)]
pub struct DiscoveredImageSet {
    /// At most one hero image; the first `main_main` match wins.
    pub hero: Option<PathBuf>,
    /// Non-color-specific images, in sorter order.
    pub common: Vec<PathBuf>,
    /// Color name → image files, each bucket in sorter order.
    pub by_color: BTreeMap<String, Vec<PathBuf>>,
}

impl DiscoveredImageSet {
    /// Color names discovered purely from filenames.
    #[must_use]
    pub fn discovered_colors(&self) -> Vec<String> {
        self.by_color.keys().cloned().collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hero.is_none() && self.common.is_empty() && self.by_color.is_empty()
    }
}

/// Accumulator for classification results; `finalize` applies bucket sorting.
#[derive(Default)]
struct ImageSetBuilder {
    hero: Option<PathBuf>,
    common: Vec<PathBuf>,
    by_color: BTreeMap<String, Vec<PathBuf>>,
}

impl ImageSetBuilder {
    fn set_hero(&mut self, path: &Path) {
        if self.hero.is_none() {
            self.hero = Some(path.to_path_buf());
        }
    }

    fn add_common(&mut self, path: &Path) {
        self.common.push(path.to_path_buf());
    }

    fn add_to_color(&mut self, color: String, path: &Path) {
        self.by_color.entry(color).or_default().push(path.to_path_buf());
    }

    fn finalize(mut self) -> DiscoveredImageSet {
        sort_image_files(&mut self.common);
        for files in self.by_color.values_mut() {
            sort_image_files(files);
        }
        DiscoveredImageSet {
            hero: self.hero,
            common: self.common,
            by_color: self.by_color,
        }
    }
}

/// Classifies every image file in `paths` (relative to the discovery root)
/// for the product described by `strategy`.
///
/// Files matching no rule are unrelated to this product and dropped without
/// a warning.
#[must_use]
pub fn classify_images(
    config: &ClassifierConfig,
    strategy: &NameStrategy,
    paths: &[PathBuf],
) -> DiscoveredImageSet {
    let mut builder = ImageSetBuilder::default();

    for path in paths {
        if !has_image_extension(path) {
            continue;
        }
        let Some(stem) = file_stem_lower(path) else {
            continue;
        };
        let dir_lower = path
            .parent()
            .map(|p| p.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let prefix = strategy.prefix();
        let prefixed = starts_with_prefix(&stem, prefix);
        let in_hint_dir = match strategy {
            NameStrategy::BaseModel { directory_hint, .. } => dir_lower.contains(directory_hint),
            NameStrategy::Prefixed { .. } => false,
        };

        // Hero: a main_main file is never considered for any other bucket,
        // and only the first match is kept.
        if HERO_TOKEN_RE.is_match(&stem) {
            if prefixed || in_hint_dir {
                builder.set_hero(path);
            }
            continue;
        }

        if COMMON_TOKEN_RE.is_match(&stem) && (prefixed || (in_hint_dir && is_bare_base_model(&stem)))
        {
            builder.add_common(path);
            continue;
        }

        if prefixed {
            if let Some(color) = extract_prefixed_color(&stem, prefix) {
                let color = canonical_color(config, strategy, &color);
                builder.add_to_color(color, path);
            }
            continue;
        }

        if strategy.is_base_model() && in_hint_dir && is_bare_base_model(&stem) {
            let rel_lower = path.to_string_lossy().to_lowercase();
            if let Some(color) = scan_color_tokens(config, &rel_lower) {
                builder.add_to_color(color, path);
            }
        }
        // Anything else is unrelated to this product: silent drop.
    }

    builder.finalize()
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn file_stem_lower(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().to_lowercase())
}

/// `{prefix}` followed by a separator; a bare `{prefix}.jpg` does not match.
fn starts_with_prefix(stem: &str, prefix: &str) -> bool {
    stem.strip_prefix(prefix)
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| SEPARATORS.contains(&c))
}

/// True when the (lowercased) filename names the bare base model rather
/// than a pro/plus sibling, e.g. `iphone 16 teal 1` but not
/// `iphone 16 pro black`.
fn is_bare_base_model(stem: &str) -> bool {
    let compact: String = stem.chars().filter(|c| !SEPARATORS.contains(c)).collect();
    compact.find("iphone16").is_some_and(|idx| {
        let rest = &compact[idx + "iphone16".len()..];
        !rest.starts_with("pro") && !rest.starts_with("plus")
    })
}

/// Extracts a candidate color name from a prefix-matched stem: strip the
/// prefix, a trailing `main` token, and a trailing digit run, then
/// title-case what remains. Returns `None` when nothing remains.
fn extract_prefixed_color(stem: &str, prefix: &str) -> Option<String> {
    let rest = stem.strip_prefix(prefix)?;
    let mut rest = rest.trim_matches(|c| SEPARATORS.contains(&c));

    // Strip a trailing "main" token only when a separator precedes it (or
    // nothing is left at all); a color genuinely ending in "main" survives.
    if rest == "main" {
        rest = "";
    } else if let Some(stripped) = rest.strip_suffix("main") {
        let trimmed = stripped.trim_end_matches(|c| SEPARATORS.contains(&c));
        if trimmed.len() < stripped.len() {
            rest = trimmed;
        }
    }

    let rest = rest.trim_end_matches(|c: char| c.is_ascii_digit());
    let rest = rest.trim_matches(|c| SEPARATORS.contains(&c));

    let words = rest
        .split(|c| SEPARATORS.contains(&c))
        .filter(|w| !w.is_empty())
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ");

    if words.is_empty() {
        None
    } else {
        Some(words)
    }
}

/// First matching token in the ordered token table wins.
fn scan_color_tokens(config: &ClassifierConfig, rel_path_lower: &str) -> Option<String> {
    config
        .color_tokens
        .iter()
        .find(|(token, _)| rel_path_lower.contains(token))
        .map(|(_, color)| (*color).to_string())
}

/// Maps an extracted color to its canonical name for the base-model
/// product (e.g. Midnight → Black). Other products keep the extracted name.
fn canonical_color(config: &ClassifierConfig, strategy: &NameStrategy, color: &str) -> String {
    if strategy.is_base_model() {
        let lower = color.to_lowercase();
        if let Some((_, canonical)) = config.color_tokens.iter().find(|(token, _)| *token == lower)
        {
            return (*canonical).to_string();
        }
    }
    color.to_string()
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
