use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::SplitWhitespace;

use glam::{Vec2, Vec3};
use tracing::{debug, warn};

use crate::error::{ElementKind, ObjError};
use crate::mtl::{parse_material_maps, MaterialMaps};
use crate::tangent::{compute_tangents, TangentReport};
use crate::{Face, IndexedMesh, MeshBuilder, Vertex};

/// What to do with faces of more than three vertices.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PolygonPolicy {
    /// Split into the fan `(0, i, i + 1)`.
    Fan,
    /// Fail with [`ObjError::UnsupportedPolygon`].
    Reject,
}

impl Default for PolygonPolicy {
    fn default() -> Self {
        PolygonPolicy::Fan
    }
}

#[derive(Debug, Clone)]
pub struct ObjOptions {
    pub polygons: PolygonPolicy,
    /// Negate every `vn` as it is read.
    pub flip_normals: bool,
    /// Run [`compute_tangents`] once the file is read.
    pub tangents: bool,
}

impl Default for ObjOptions {
    fn default() -> Self {
        Self {
            polygons: PolygonPolicy::default(),
            flip_normals: false,
            tangents: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObjModel {
    pub mesh: IndexedMesh,
    /// `mtllib` file names in file order.
    pub material_libs: Vec<String>,
    /// `usemtl` names in first-use order.
    pub materials: Vec<String>,
    /// `None` when tangents were not requested.
    pub tangents: Option<TangentReport>,
}

/// An [`ObjModel`] read from disk together with its texture maps.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub model: ObjModel,
    pub maps: MaterialMaps,
}

/// Parses `lines` with [`ObjOptions::default`].
pub fn parse<I, S>(lines: I) -> Result<IndexedMesh, ObjError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ObjParser::default().parse_lines(lines).map(|model| model.mesh)
}

/// Reads the `.obj` file at `path` and the material libraries it names.
///
/// Libraries are looked up next to the `.obj` file. One that cannot be read is
/// logged and skipped.
pub fn load_obj<P: AsRef<Path>>(path: P, options: &ObjOptions) -> Result<LoadedModel, ObjError> {
    let path = path.as_ref();
    let is_obj = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("obj"));
    if !is_obj {
        return Err(ObjError::NotObjFile(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let model = ObjParser::new(options.clone()).parse_reader(BufReader::new(file))?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let mut maps = MaterialMaps::default();
    for lib in model.material_libs.iter() {
        let lib_path = base_dir.join(lib);
        match std::fs::read_to_string(&lib_path) {
            Ok(text) => maps.merge(parse_material_maps(&text, base_dir)),
            Err(err) => warn!(%err, path = %lib_path.display(), "failed to read material library"),
        }
    }
    if maps.normal.is_none() && !model.material_libs.is_empty() {
        debug!(path = %path.display(), "no normal map found");
    }

    Ok(LoadedModel { model, maps })
}

#[derive(Debug, Default, Clone)]
pub struct ObjParser {
    options: ObjOptions,
}

impl ObjParser {
    pub fn new(options: ObjOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ObjOptions {
        &self.options
    }

    pub fn parse_str(&self, text: &str) -> Result<ObjModel, ObjError> {
        self.parse_lines(text.lines())
    }

    pub fn parse_lines<I, S>(&self, lines: I) -> Result<ObjModel, ObjError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = ParseState::new(&self.options);
        for (i, line) in lines.into_iter().enumerate() {
            state.record(i + 1, line.as_ref())?;
        }
        Ok(state.finish())
    }

    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<ObjModel, ObjError> {
        let mut state = ParseState::new(&self.options);
        for (i, line) in reader.lines().enumerate() {
            state.record(i + 1, &line?)?;
        }
        Ok(state.finish())
    }
}

struct ParseState<'a> {
    options: &'a ObjOptions,
    positions: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
    normals: Vec<Vec3>,
    builder: MeshBuilder,
    material_libs: Vec<String>,
    materials: Vec<String>,
    corners: Vec<u32>,
}

impl<'a> ParseState<'a> {
    fn new(options: &'a ObjOptions) -> Self {
        Self {
            options,
            positions: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            builder: MeshBuilder::new(),
            material_libs: Vec::new(),
            materials: Vec::new(),
            corners: Vec::new(),
        }
    }

    fn record(&mut self, line: usize, text: &str) -> Result<(), ObjError> {
        let mut tokens = text.split_whitespace();
        let keyword = match tokens.next() {
            Some(keyword) if !keyword.starts_with('#') => keyword,
            _ => return Ok(()),
        };

        match keyword {
            "v" => {
                let [x, y, z] = floats::<3>(line, "v", tokens)?;
                self.positions.push(Vec3::new(x, y, z));
            }
            "vt" => {
                let [u, v] = floats::<2>(line, "vt", tokens)?;
                self.tex_coords.push(Vec2::new(u, v));
            }
            "vn" => {
                let [x, y, z] = floats::<3>(line, "vn", tokens)?;
                let normal = Vec3::new(x, y, z);
                self.normals.push(if self.options.flip_normals { -normal } else { normal });
            }
            "f" => self.face(line, tokens)?,
            "mtllib" => self.material_libs.extend(tokens.map(str::to_owned)),
            "usemtl" => {
                if let Some(name) = tokens.next() {
                    if !self.materials.iter().any(|m| m == name) {
                        self.materials.push(name.to_owned());
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn face(&mut self, line: usize, tokens: SplitWhitespace<'_>) -> Result<(), ObjError> {
        self.corners.clear();
        for token in tokens {
            let vertex = self.resolve(line, token)?;
            let index = self.builder.insert_vertex(vertex);
            self.corners.push(index);
        }

        let count = self.corners.len();
        if count < 3 {
            return Err(ObjError::malformed(
                line,
                format!("face needs at least 3 vertices, got {}", count),
            ));
        }
        if count > 3 && self.options.polygons == PolygonPolicy::Reject {
            return Err(ObjError::UnsupportedPolygon { line, vertices: count });
        }

        for i in 1..count - 1 {
            let face = Face::new(self.corners[0], self.corners[i], self.corners[i + 1]);
            self.builder
                .push_face(face)
                .map_err(|err| ObjError::malformed(line, err.to_string()))?;
        }
        Ok(())
    }

    /// Turns one `p/t/n` token into a vertex.
    fn resolve(&self, line: usize, token: &str) -> Result<Vertex, ObjError> {
        let mut parts = token.split('/');
        let mut next = || -> Result<usize, ObjError> {
            let part = parts.next().ok_or_else(|| {
                ObjError::malformed(line, format!("face vertex {:?} is not of the form p/t/n", token))
            })?;
            match part.parse::<usize>() {
                Ok(index) if index >= 1 => Ok(index - 1),
                _ => Err(ObjError::malformed(
                    line,
                    format!("face vertex {:?} has invalid index {:?}", token, part),
                )),
            }
        };
        let (p, t, n) = (next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(ObjError::malformed(
                line,
                format!("face vertex {:?} is not of the form p/t/n", token),
            ));
        }

        Ok(Vertex::new(
            lookup(&self.positions, p, line, ElementKind::Position)?,
            lookup(&self.tex_coords, t, line, ElementKind::TexCoord)?,
            lookup(&self.normals, n, line, ElementKind::Normal)?,
        ))
    }

    fn finish(self) -> ObjModel {
        let mut mesh = self.builder.build();
        let tangents = if self.options.tangents {
            Some(compute_tangents(&mut mesh.vertices, &mesh.faces))
        } else {
            None
        };

        debug!(
            positions = self.positions.len(),
            tex_coords = self.tex_coords.len(),
            normals = self.normals.len(),
            vertices = mesh.vertices().len(),
            faces = mesh.faces().len(),
            "parsed obj"
        );

        ObjModel {
            mesh,
            material_libs: self.material_libs,
            materials: self.materials,
            tangents,
        }
    }
}

fn lookup<T: Copy>(list: &[T], index: usize, line: usize, kind: ElementKind) -> Result<T, ObjError> {
    list.get(index).copied().ok_or(ObjError::IndexOutOfRange {
        line,
        kind,
        index: index + 1,
        available: list.len(),
    })
}

/// Reads the first `N` numbers of a record. One optional extra component
/// (the `w` of `v` and `vt`) is accepted and ignored.
fn floats<const N: usize>(line: usize, keyword: &str, tokens: SplitWhitespace<'_>) -> Result<[f32; N], ObjError> {
    let mut values = [0.0; N];
    let mut count = 0;
    for token in tokens {
        let value = token
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ObjError::malformed(line, format!("{:?} is not a finite number", token)))?;
        if count < N {
            values[count] = value;
        }
        count += 1;
    }
    if count < N || count > N + 1 {
        return Err(ObjError::malformed(
            line,
            format!("`{}` takes {} or {} numbers, got {}", keyword, N, N + 1, count),
        ));
    }
    Ok(values)
}
