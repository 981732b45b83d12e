use std::path::{Path, PathBuf};

use aa_core::config::{Config, load_config};
use anyhow::Result;
use clap::Parser;

/// Fichier de configuration chargé s'il existe et qu'aucun --config n'est donné.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// asciiart — convert an image to (optionally colored) glyph art.
#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug)]
#[command(name = "asciiart", version, about, long_about = None)]
pub struct Cli {
    /// Image d'entrée (PNG, JPEG, BMP, GIF). Défaut : img/madeline.png.
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Largeur de l'art en caractères. Défaut : 128.
    #[arg(short = 'r', long = "res")]
    pub res: Option<u32>,

    /// Fichier texte de sortie. Défaut : output/output.txt.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Logging verbeux (niveau info).
    #[arg(short = 'v', long, default_value_t = false)]
    pub verbose: bool,

    /// Nombre de caractères de la palette. Défaut : 4.
    #[arg(short = '#', long = "no_of_chars")]
    pub no_of_chars: Option<usize>,

    /// Inverser la luminance.
    #[arg(short = 'i', long, default_value_t = false)]
    pub invert: bool,

    /// Palette explicite, du plus clair au plus dense. Ignore la table de couverture.
    #[arg(short = 'c', long)]
    pub chars: Option<String>,

    /// Afficher aussi dans le terminal.
    #[arg(short = 't', long, default_value_t = false)]
    pub terminal: bool,

    /// Vitesse de rotation en tours par seconde (0 = image fixe).
    #[arg(short = 's', long, allow_negative_numbers = true)]
    pub speed: Option<f32>,

    /// Table de couverture des caractères. Défaut : charsizes.txt.
    #[arg(long)]
    pub table: Option<PathBuf>,

    /// Fichier de configuration TOML. Défaut : config/default.toml s'il existe.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Désactiver la couleur (pipeline niveaux de gris).
    #[arg(long, default_value_t = false)]
    pub no_color: bool,

    /// Redessiner tout l'écran à chaque frame.
    #[arg(long, default_value_t = false)]
    pub full_redraw: bool,

    /// Ne pas écrire le fichier de sortie.
    #[arg(long, default_value_t = false)]
    pub no_file: bool,

    /// Niveau de log : error, warn, info, debug, trace. Prioritaire sur --verbose.
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Log level implied by `--log-level`, then `--verbose` or the
    /// configuration's `verbose`.
    #[must_use]
    pub fn log_filter(&self, config_verbose: bool) -> log::LevelFilter {
        match self.log_level.as_deref().map(str::parse::<log::LevelFilter>) {
            Some(Ok(level)) => level,
            _ if self.verbose || config_verbose => log::LevelFilter::Info,
            _ => log::LevelFilter::Warn,
        }
    }

    /// Defaults, then the config file, then the flags given on the command line.
    ///
    /// # Errors
    /// Returns an error if an explicit config file is missing or invalid.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                load_config(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Config::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    /// Override `config` with the flags present on the command line.
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref v) = self.file {
            config.input.clone_from(v);
        }
        if let Some(v) = self.res {
            config.width = v;
        }
        if let Some(ref v) = self.output {
            config.output.clone_from(v);
        }
        if let Some(v) = self.no_of_chars {
            config.palette_size = v;
        }
        if self.chars.is_some() {
            config.palette_chars.clone_from(&self.chars);
        }
        if let Some(ref v) = self.table {
            config.coverage_table.clone_from(v);
        }
        if let Some(v) = self.speed {
            config.rotate_speed = v;
        }
        config.verbose |= self.verbose;
        config.invert |= self.invert;
        config.terminal |= self.terminal;
        if self.no_color {
            config.color = false;
        }
        if self.full_redraw {
            config.incremental = false;
        }
        if self.no_file {
            config.file_output = false;
        }
    }
}
