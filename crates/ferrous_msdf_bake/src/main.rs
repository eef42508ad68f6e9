//! `ferrous_msdf_bake <job.toml> [-v]`
//!
//! Bakes every `[[sprite]]` slot of a job file into one MSDF atlas PNG and
//! writes a `<output>.toml` sidecar with the field kind and per-slot uv
//! rectangles and fill colours.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use serde::{Deserialize, Serialize};

use ferrous_msdf::{FieldKind, MsdfConfig, SpriteAtlas, SpriteCell, SpriteSlot};

fn default_cell_size() -> u32 {
    64
}

#[derive(Debug, Deserialize)]
struct BakeJob {
    /// PNG path, relative to the job file.
    output: PathBuf,
    #[serde(default = "default_cell_size")]
    cell_size: u32,
    #[serde(default)]
    msdf: MsdfConfig,
    #[serde(default)]
    sprite: Vec<SpriteSlot>,
}

#[derive(Debug, Serialize)]
struct AtlasManifest<'a> {
    image: String,
    kind: FieldKind,
    range: f64,
    cell_size: u32,
    sprite: &'a [SpriteCell],
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { log::LevelFilter::Trace } else { log::LevelFilter::Info };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{:<5} {}] {}", record.level(), record.target(), message))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .context("logger already initialised")?;
    Ok(())
}

fn load_job(path: &Path) -> Result<BakeJob> {
    let source = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let job: BakeJob = toml::from_str(&source).with_context(|| format!("parsing {}", path.display()))?;
    if job.cell_size == 0 {
        bail!("cell_size must be positive");
    }
    if job.msdf.range <= 0.0 {
        bail!("msdf.range must be positive, got {}", job.msdf.range);
    }
    Ok(job)
}

fn write_png(path: &Path, atlas: &SpriteAtlas) -> Result<()> {
    let img = &atlas.image;
    let saved = match img.channels {
        4 => image::RgbaImage::from_raw(img.width, img.height, img.pixels.clone())
            .context("atlas buffer does not match its size")?
            .save(path),
        1 => image::GrayImage::from_raw(img.width, img.height, img.pixels.clone())
            .context("atlas buffer does not match its size")?
            .save(path),
        n => bail!("cannot encode a {n}-channel atlas"),
    };
    saved.with_context(|| format!("writing {}", path.display()))
}

fn run(job_path: &Path) -> Result<()> {
    let job = load_job(job_path)?;
    let base = job_path.parent().unwrap_or(Path::new("."));
    let output = base.join(&job.output);

    log::info!(
        "baking {} sprite slots ({:?}, range {}px, {}px cells)",
        job.sprite.len(),
        job.msdf.kind,
        job.msdf.range,
        job.cell_size
    );
    let atlas = SpriteAtlas::build(&job.sprite, &job.msdf, job.cell_size).context("baking sprite atlas")?;
    write_png(&output, &atlas)?;

    let manifest = AtlasManifest {
        image: job.output.display().to_string(),
        kind: atlas.kind,
        range: job.msdf.range,
        cell_size: atlas.cell_size,
        sprite: &atlas.cells,
    };
    let manifest_path = output.with_extension("toml");
    let text = toml::to_string_pretty(&manifest).context("serialising atlas manifest")?;
    std::fs::write(&manifest_path, text).with_context(|| format!("writing {}", manifest_path.display()))?;

    log::info!(
        "wrote {}x{} atlas to {}",
        atlas.image.width,
        atlas.image.height,
        output.display()
    );
    Ok(())
}

fn main() -> Result<()> {
    let mut job = None;
    let mut verbose = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            _ if job.is_none() => job = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument {arg:?}"),
        }
    }
    let Some(job) = job else {
        bail!("usage: ferrous_msdf_bake <job.toml> [-v]");
    };
    init_logging(verbose)?;
    run(&job)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_parses_with_defaults() {
        let job: BakeJob = toml::from_str(
            r#"
            output = "ui.png"

            [msdf]
            range = 4.0

            [[sprite]]
            name = "ring"
            fill = [0.2, 0.4, 1.0, 1.0]

            [[sprite.path]]
            anchors = [{ position = [0.0, 0.0] }, { position = [16.0, 0.0] }, { position = [16.0, 16.0] }, { position = [0.0, 16.0] }]

            [[sprite.path]]
            subtract = true
            anchors = [{ position = [4.0, 4.0] }, { position = [12.0, 4.0] }, { position = [12.0, 12.0] }, { position = [4.0, 12.0] }]
            "#,
        )
        .unwrap();
        assert_eq!(job.cell_size, 64);
        assert_eq!(job.msdf.range, 4.0);
        assert_eq!(job.msdf.kind, FieldKind::MultiChannel);
        assert_eq!(job.sprite.len(), 1);
        assert_eq!(job.sprite[0].paths.len(), 2);
        assert!(job.sprite[0].paths[1].subtract);
    }

    #[test]
    fn manifest_lists_cells() {
        let cells = vec![SpriteCell {
            name: "ring".into(),
            uv: [0.0, 0.0, 1.0, 1.0],
            fill: [1.0, 1.0, 1.0, 1.0],
        }];
        let manifest = AtlasManifest {
            image: "ui.png".into(),
            kind: FieldKind::MultiChannel,
            range: 1.5,
            cell_size: 64,
            sprite: &cells,
        };
        let text = toml::to_string_pretty(&manifest).unwrap();
        assert!(text.contains("kind = \"multi_channel\""));
        assert!(text.contains("[[sprite]]"));
    }
}
