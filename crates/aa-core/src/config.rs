use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::coverage::DEFAULT_TABLE_PATH;
use crate::error::CoreError;
use crate::palette::MAX_PALETTE_SIZE;

/// Configuration complète d'un rendu.
///
/// Built once from defaults, then a TOML file, then CLI flags; read-only
/// afterwards.
///
/// # Example
/// ```
/// use aa_core::config::Config;
/// let config = Config::default();
/// assert_eq!(config.width, 128);
/// assert_eq!(config.palette_size, 4);
/// ```
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    // === Entrée ===
    /// Image source (absolute, or relative to the working directory).
    pub input: PathBuf,
    /// Output width in glyphs.
    pub width: u32,
    /// Terminal cell aspect correction applied to the derived height.
    pub aspect_ratio: f32,

    // === Palette ===
    /// Number of glyphs picked from the coverage table.
    pub palette_size: usize,
    /// Explicit palette, sparse first. Bypasses the coverage table.
    pub palette_chars: Option<String>,
    /// Coverage table file.
    pub coverage_table: PathBuf,
    /// Reverse the palette (for light backgrounds).
    pub invert: bool,

    // === Sorties ===
    /// Plain-text output file.
    pub output: PathBuf,
    /// Write the plain frame to `output`.
    pub file_output: bool,
    /// Echo frames to the terminal.
    pub terminal: bool,
    /// Truecolor glyphs on the terminal. `false` = grayscale pipeline.
    pub color: bool,
    /// Redraw only changed lines. `false` = full redraw each frame.
    pub incremental: bool,
    /// Advisory info logging.
    pub verbose: bool,

    // === Animation ===
    /// Rotations per second. 0 = single upright render.
    pub rotate_speed: f32,
    /// Frames per second of the rotation sequence.
    pub frame_rate: u32,
    /// Full turns played before the final upright frame.
    pub rotations: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("img/madeline.png"),
            width: 128,
            aspect_ratio: 0.45,
            palette_size: 4,
            palette_chars: None,
            coverage_table: PathBuf::from(DEFAULT_TABLE_PATH),
            invert: false,
            output: PathBuf::from("output/output.txt"),
            file_output: true,
            terminal: false,
            color: true,
            incremental: true,
            verbose: false,
            rotate_speed: 0.0,
            frame_rate: 30,
            rotations: 1,
        }
    }
}

impl Config {
    /// Check value ranges.
    ///
    /// # Errors
    /// `Argument` naming the first invalid field.
    ///
    /// # Example
    /// ```
    /// use aa_core::config::Config;
    /// let mut config = Config::default();
    /// assert!(config.validate().is_ok());
    /// config.width = 0;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), CoreError> {
        let bad = |msg: String| Err(CoreError::Argument(msg));
        if self.width == 0 {
            return bad("la largeur doit être > 0".into());
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return bad(format!("aspect_ratio invalide : {}", self.aspect_ratio));
        }
        match &self.palette_chars {
            Some(chars) if chars.is_empty() => return bad("palette explicite vide".into()),
            Some(_) => {}
            None if !(2..=MAX_PALETTE_SIZE).contains(&self.palette_size) => {
                return bad(format!(
                    "nombre de caractères invalide : {} (attendu 2..={MAX_PALETTE_SIZE})",
                    self.palette_size
                ));
            }
            None => {}
        }
        if !(self.rotate_speed.is_finite() && self.rotate_speed >= 0.0) {
            return bad(format!("vitesse de rotation invalide : {}", self.rotate_speed));
        }
        if self.frame_rate == 0 {
            return bad("frame_rate doit être > 0".into());
        }
        Ok(())
    }
}

/// Structure TOML intermédiaire, toutes sections optionnelles.
#[derive(Deserialize, Default)]
struct ConfigFile {
    render: Option<RenderSection>,
    palette: Option<PaletteSection>,
    output: Option<OutputSection>,
    animation: Option<AnimationSection>,
}

#[derive(Deserialize)]
struct RenderSection {
    input: Option<PathBuf>,
    width: Option<u32>,
    aspect_ratio: Option<f32>,
    color: Option<bool>,
}

#[derive(Deserialize)]
struct PaletteSection {
    size: Option<usize>,
    chars: Option<String>,
    coverage_table: Option<PathBuf>,
    invert: Option<bool>,
}

#[derive(Deserialize)]
struct OutputSection {
    file: Option<PathBuf>,
    write_file: Option<bool>,
    terminal: Option<bool>,
    incremental: Option<bool>,
    verbose: Option<bool>,
}

#[derive(Deserialize)]
struct AnimationSection {
    rotate_speed: Option<f32>,
    frame_rate: Option<u32>,
    rotations: Option<u32>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))
}

/// Parse TOML text over the defaults.
///
/// # Errors
/// Returns an error on invalid TOML or mistyped fields.
///
/// # Example
/// ```
/// use aa_core::config::parse_config;
/// let config = parse_config("[render]\nwidth = 80\n").unwrap();
/// assert_eq!(config.width, 80);
/// assert_eq!(config.palette_size, 4);
/// ```
pub fn parse_config(content: &str) -> Result<Config> {
    let file: ConfigFile = toml::from_str(content)?;
    let mut config = Config::default();

    if let Some(r) = file.render {
        if let Some(v) = r.input {
            config.input = v;
        }
        if let Some(v) = r.width {
            config.width = v;
        }
        if let Some(v) = r.aspect_ratio {
            config.aspect_ratio = v;
        }
        if let Some(v) = r.color {
            config.color = v;
        }
    }
    if let Some(p) = file.palette {
        if let Some(v) = p.size {
            config.palette_size = v;
        }
        if p.chars.is_some() {
            config.palette_chars = p.chars;
        }
        if let Some(v) = p.coverage_table {
            config.coverage_table = v;
        }
        if let Some(v) = p.invert {
            config.invert = v;
        }
    }
    if let Some(o) = file.output {
        if let Some(v) = o.file {
            config.output = v;
        }
        if let Some(v) = o.write_file {
            config.file_output = v;
        }
        if let Some(v) = o.terminal {
            config.terminal = v;
        }
        if let Some(v) = o.incremental {
            config.incremental = v;
        }
        if let Some(v) = o.verbose {
            config.verbose = v;
        }
    }
    if let Some(a) = file.animation {
        if let Some(v) = a.rotate_speed {
            config.rotate_speed = v;
        }
        if let Some(v) = a.frame_rate {
            config.frame_rate = v;
        }
        if let Some(v) = a.rotations {
            config.rotations = v;
        }
    }

    Ok(config)
}
