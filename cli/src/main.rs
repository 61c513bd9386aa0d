mod scene;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use model::{load_obj, IndexedMesh, ObjOptions, PolygonPolicy, UvSphere};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rasterizer::{DrawStats, FillMode, Framebuffer, Rasterizer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use scene::LabScene;

#[derive(Debug, Parser)]
#[command(name = "rasterize", version, about = "Software triangle rasterizer and OBJ mesh tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, global = true, default_value_t = 320)]
    width: u32,

    #[arg(long, global = true, default_value_t = 320)]
    height: u32,

    /// Draw triangle outlines instead of filling them.
    #[arg(long, global = true)]
    wireframe: bool,

    /// Output image. `.ppm` is written as plain P3, any other extension goes through `image`.
    #[arg(short, long, global = true)]
    out: Option<PathBuf>,

    /// More logging, repeat for trace output. `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// The lab scene: a red diagonal and three triangles.
    Demo,
    /// Random triangles, rendered in parallel bands.
    Random {
        #[arg(long, default_value_t = 200)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Load an .obj model and report its mesh statistics.
    Obj {
        path: PathBuf,
        /// Fail on faces with more than three vertices.
        #[arg(long)]
        reject_polygons: bool,
        /// Negate normals while loading.
        #[arg(long)]
        flip_normals: bool,
        /// Skip tangent generation.
        #[arg(long)]
        no_tangents: bool,
    },
    /// Generate a UV sphere and report its mesh statistics.
    Sphere {
        #[arg(long, default_value_t = 1.0)]
        radius: f32,
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
        sectors: u32,
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
        stacks: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    let mode = if cli.wireframe {
        FillMode::Wireframe
    } else {
        FillMode::Fill
    };
    let rasterizer = Rasterizer::new(mode);
    let mut fb = Framebuffer::new(cli.width, cli.height);

    let out = match &cli.command {
        Command::Demo => {
            let scene = LabScene::new();
            let (p0, p1, color) = scene.line;
            let mut stats = rasterizer.draw_line(&mut fb, p0, p1, color);
            for (triangle, color) in scene.triangles.iter() {
                stats += rasterizer.draw_triangle(&mut fb, triangle, *color);
            }
            log_stats(stats);
            Some(cli.out.clone().unwrap_or_else(|| PathBuf::from("demo.ppm")))
        }
        Command::Random { count, seed } => {
            let mut rng = StdRng::seed_from_u64(*seed);
            let batch = scene::random_triangles(&mut rng, *count, cli.width, cli.height);
            rasterizer.render_par(&mut fb, &batch);
            Some(cli.out.clone().unwrap_or_else(|| PathBuf::from("random.ppm")))
        }
        Command::Obj {
            path,
            reject_polygons,
            flip_normals,
            no_tangents,
        } => {
            let options = ObjOptions {
                polygons: if *reject_polygons {
                    PolygonPolicy::Reject
                } else {
                    PolygonPolicy::Fan
                },
                flip_normals: *flip_normals,
                tangents: !*no_tangents,
            };
            let loaded = load_obj(path, &options).with_context(|| format!("failed to load {}", path.display()))?;
            let model = &loaded.model;
            info!(
                vertices = model.mesh.vertices().len(),
                faces = model.mesh.faces().len(),
                materials = model.materials.len(),
                "loaded {}",
                path.display()
            );
            if let Some(report) = &model.tangents {
                if !report.is_complete() {
                    warn!(skipped = report.skipped.len(), "some faces have no usable tangent");
                }
            }
            if let Some(diffuse) = &loaded.maps.diffuse {
                info!(path = %diffuse.display(), "diffuse map");
            }
            if let Some(normal) = &loaded.maps.normal {
                info!(path = %normal.display(), "normal map");
            }
            render_mesh(&rasterizer, &mut fb, &model.mesh);
            cli.out.clone()
        }
        Command::Sphere {
            radius,
            sectors,
            stacks,
        } => {
            let sphere = UvSphere {
                radius: *radius,
                sectors: *sectors,
                stacks: *stacks,
            };
            anyhow::ensure!(sphere.is_valid(), "sphere radius must be finite and positive, got {}", radius);
            let mesh = sphere.build();
            info!(
                vertices = mesh.vertices().len(),
                faces = mesh.faces().len(),
                "generated sphere"
            );
            render_mesh(&rasterizer, &mut fb, &mesh);
            cli.out.clone()
        }
    };

    if let Some(out) = out {
        save(&fb, &out)?;
        info!(path = %out.display(), "wrote image");
    }
    Ok(())
}

fn render_mesh(rasterizer: &Rasterizer, fb: &mut Framebuffer, mesh: &IndexedMesh) {
    let shade = rasterizer.polygon_mode() == FillMode::Fill;
    let batch = scene::mesh_triangles(mesh, fb.width(), fb.height(), shade);
    rasterizer.render_par(fb, &batch);
}

fn log_stats(stats: DrawStats) {
    info!(
        painted = stats.painted,
        clipped = stats.clipped,
        culled_rows = stats.culled_rows,
        "drew scene"
    );
}

fn save(fb: &Framebuffer, path: &Path) -> Result<()> {
    let is_ppm = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("ppm"));
    if is_ppm {
        let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        rasterizer::ppm::write_ppm(fb, &mut writer)
            .and_then(|_| writer.flush())
            .with_context(|| format!("failed to write {}", path.display()))?;
    } else {
        let image = image::RgbImage::from_raw(fb.width(), fb.height(), fb.to_rgb_bytes())
            .context("framebuffer size does not match its pixel data")?;
        image
            .save(path)
            .with_context(|| format!("failed to save {}", path.display()))?;
    }
    Ok(())
}
