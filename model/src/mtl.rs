use std::path::{Path, PathBuf};

/// Texture maps named by a material library.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MaterialMaps {
    /// `map_Kd`
    pub diffuse: Option<PathBuf>,
    /// `map_Bump`
    pub normal: Option<PathBuf>,
}

impl MaterialMaps {
    pub fn is_empty(&self) -> bool {
        self.diffuse.is_none() && self.normal.is_none()
    }

    /// Keeps maps already set, fills the rest from `other`.
    pub fn merge(&mut self, other: MaterialMaps) {
        if self.diffuse.is_none() {
            self.diffuse = other.diffuse;
        }
        if self.normal.is_none() {
            self.normal = other.normal;
        }
    }
}

/// Extracts the first diffuse and normal map of an `.mtl` file. Map paths are
/// resolved against `base_dir`. The file name is the last token of the
/// statement, so options such as `-bm 1.0` are skipped.
pub fn parse_material_maps(text: &str, base_dir: &Path) -> MaterialMaps {
    let mut maps = MaterialMaps::default();
    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        let slot = match tokens.next() {
            Some("map_Kd") => &mut maps.diffuse,
            Some("map_Bump") | Some("map_bump") | Some("bump") => &mut maps.normal,
            _ => continue,
        };
        if slot.is_some() {
            continue;
        }
        if let Some(file) = tokens.last() {
            *slot = Some(base_dir.join(file));
        }
        if maps.diffuse.is_some() && maps.normal.is_some() {
            break;
        }
    }
    maps
}
