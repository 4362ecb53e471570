//! The file resolver: resolved parts -> concrete output file descriptors.

use crate::config::Configuration;

use super::types::{FileDescriptor, FileFormat, ResolvedPart, ResolvedParts};

/// Categories rendered for context only; their printable geometry (if any)
/// ships inside a sibling category's artifact. Fixed by design, not derived
/// from the manifest.
pub const DISPLAY_ONLY_CATEGORIES: &[&str] = &["fans", "hotends"];

/// The one category eligible for the multi-colour transformation.
pub const HEX_CATEGORY: &str = "cowlings";
/// Replacement directory for transformed cowling files.
const HEX_DIR: &str = "Cowlings [Hexagon multi-colour]";
/// Filename marker prepended to transformed cowling files.
const HEX_PREFIX: &str = "Hex ";

/// The parts that appear in the download list: everything resolved except
/// visual-only variants and the display-only categories.
pub fn printable_parts(parts: &ResolvedParts) -> impl Iterator<Item = &ResolvedPart> {
    parts
        .iter()
        .filter(|p| !p.variant.visual_only)
        .filter(|p| !DISPLAY_ONLY_CATEGORIES.contains(&p.category.as_str()))
}

/// Map the resolved part set to output file descriptors.
///
/// Renderable-derived files come first, then download-only files, in the
/// same stable order as resolution. Paths appearing in both groups are
/// emitted twice; the packaging collaborator sees the duplicate.
///
/// Path derivation: an explicit `file` override is used verbatim, otherwise
/// the render-asset reference has its extension swapped for `.stl`. When
/// the hex toggle is on, files in the cowling category are then rewritten
/// (prefixed filename, `.3mf` extension, relocated directory) strictly
/// after derivation, so toggling the flag off restores the original paths
/// exactly.
pub fn resolve_files(parts: &ResolvedParts, config: &Configuration) -> Vec<FileDescriptor> {
    let mut files = Vec::new();
    for part in printable_parts(parts) {
        let Some(path) = output_path(part) else {
            continue;
        };
        let cosmetic = part.category == HEX_CATEGORY;
        let (path, format) = if cosmetic && config.hex_multicolour {
            (hex_transform(&path), FileFormat::ThreeMf)
        } else {
            (path, FileFormat::Stl)
        };
        files.push(FileDescriptor {
            name: filename_stem(&path).to_string(),
            path,
            format,
            cosmetic,
        });
    }
    files
}

fn output_path(part: &ResolvedPart) -> Option<String> {
    if let Some(file) = &part.variant.file {
        return Some(file.clone());
    }
    part.variant
        .asset
        .as_ref()
        .map(|asset| format!("{}.{}", strip_extension(asset), FileFormat::Stl.extension()))
}

/// Rewrite a derived path for the multi-colour cowling set:
/// `Cowlings/Name [variant].stl` -> `Cowlings [Hexagon multi-colour]/Hex Name [variant].3mf`
fn hex_transform(path: &str) -> String {
    let filename = path.rsplit_once('/').map(|(_, f)| f).unwrap_or(path);
    format!(
        "{}/{}{}.{}",
        HEX_DIR,
        HEX_PREFIX,
        strip_extension(filename),
        FileFormat::ThreeMf.extension()
    )
}

fn strip_extension(path: &str) -> &str {
    path.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(path)
}

fn filename_stem(path: &str) -> &str {
    let filename = path.rsplit_once('/').map(|(_, f)| f).unwrap_or(path);
    strip_extension(filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::manifest::default_manifest;
    use crate::resolver::parts::resolve_parts;

    #[test]
    fn test_paths_derive_from_assets() {
        let manifest = default_manifest();
        let config = Configuration::defaults(&manifest);
        let parts = resolve_parts(&manifest, &config);
        let files = resolve_files(&parts, &config);

        let cowling = files.iter().find(|f| f.cosmetic).expect("Expected a cowling file");
        assert_eq!(cowling.path, "Cowlings/Xol Standard [compact].stl");
        assert_eq!(cowling.name, "Xol Standard [compact]");
        assert_eq!(cowling.format, FileFormat::Stl);
    }

    #[test]
    fn test_explicit_override_is_used_verbatim() {
        let manifest = default_manifest();
        let mut config = Configuration::defaults(&manifest);
        config.select(&manifest, "filament_cutter", "crossbow").unwrap();
        // The crossbow conflicts with nothing in the default configuration.
        let parts = resolve_parts(&manifest, &config);
        let files = resolve_files(&parts, &config);

        assert!(
            files.iter().any(|f| f.path == "Cutters/Crossbow Body [printable].stl"),
            "Override path should pass through untouched: {:?}",
            files.iter().map(|f| &f.path).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_display_only_categories_and_visual_parts_are_excluded() {
        let manifest = default_manifest();
        let mut config = Configuration::defaults(&manifest);
        config.select(&manifest, "filament_cutter", "crossbow").unwrap();
        let parts = resolve_parts(&manifest, &config);
        let files = resolve_files(&parts, &config);

        assert!(!files.iter().any(|f| f.path.starts_with("Fans/")));
        assert!(!files.iter().any(|f| f.path.starts_with("Hotends/")));
        // The blade pin renders but never downloads.
        assert!(!files.iter().any(|f| f.path.contains("Crossbow Pin")));
        // The lever still downloads.
        assert!(files.iter().any(|f| f.path == "Cutters/Crossbow Lever.stl"));
    }

    #[test]
    fn test_hex_transform_rewrites_only_cowlings() {
        let manifest = default_manifest();
        let mut config = Configuration::defaults(&manifest);
        config.hex_multicolour = true;
        let parts = resolve_parts(&manifest, &config);
        let files = resolve_files(&parts, &config);

        let cowling = files.iter().find(|f| f.cosmetic).unwrap();
        assert_eq!(
            cowling.path,
            "Cowlings [Hexagon multi-colour]/Hex Xol Standard [compact].3mf"
        );
        assert_eq!(cowling.name, "Hex Xol Standard [compact]");
        assert_eq!(cowling.format, FileFormat::ThreeMf);

        for file in files.iter().filter(|f| !f.cosmetic) {
            assert_eq!(file.format, FileFormat::Stl);
            assert!(!file.path.starts_with(HEX_DIR));
            assert!(!file.name.starts_with(HEX_PREFIX));
        }
    }

    #[test]
    fn test_hex_toggle_round_trips() {
        let manifest = default_manifest();
        let mut config = Configuration::defaults(&manifest);
        let parts = resolve_parts(&manifest, &config);
        let before: Vec<String> = resolve_files(&parts, &config)
            .into_iter()
            .map(|f| f.path)
            .collect();

        config.hex_multicolour = true;
        let _transformed = resolve_files(&resolve_parts(&manifest, &config), &config);

        config.hex_multicolour = false;
        let after: Vec<String> = resolve_files(&resolve_parts(&manifest, &config), &config)
            .into_iter()
            .map(|f| f.path)
            .collect();
        assert_eq!(before, after, "Toggling hex off must restore original paths");
    }

    #[test]
    fn test_renderable_files_come_before_download_only() {
        let manifest = default_manifest();
        let mut config = Configuration::defaults(&manifest);
        config.accent_parts = true;
        let parts = resolve_parts(&manifest, &config);
        let files = resolve_files(&parts, &config);

        let comb_pos = files.iter().position(|f| f.name == "Wire Comb").unwrap();
        let badge_pos = files.iter().position(|f| f.name == "Hex Badge").unwrap();
        let cowling_pos = files.iter().position(|f| f.cosmetic).unwrap();
        assert!(cowling_pos < badge_pos);
        assert!(cowling_pos < comb_pos);
    }
}
