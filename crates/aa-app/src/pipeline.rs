use std::io::Write;

use aa_ascii::renderer::{RenderOptions, render_frame};
use aa_core::config::Config;
use aa_core::coverage::CoverageTable;
use aa_core::error::CoreError;
use aa_core::frame::PixelBuffer;
use aa_core::palette::{LuminanceLut, Palette};
use aa_render::display::{Display, RedrawMode};
use aa_render::file::write_frame;
use aa_render::pacing::FrameClock;
use aa_render::rotate::rotate_into;
use aa_render::sequence::RotationPlan;
use aa_source::image::resolve_input_path;
use aa_source::resize::load_resized;
use anyhow::Result;

/// Summary of a pipeline run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunReport {
    /// Frames sent to the terminal, final upright frame included.
    pub frames_displayed: usize,
    /// Mean render + display time of the rotation frames, if any ran.
    pub average_frame_ms: Option<f64>,
    /// The plain frame was written to the output file.
    pub file_written: bool,
}

/// Palette for this run: explicit glyphs, or a selection from the
/// coverage table; reversed when inversion is requested.
///
/// # Errors
/// Coverage table and argument errors.
pub fn build_palette(config: &Config) -> Result<Palette, CoreError> {
    let palette = match &config.palette_chars {
        Some(chars) => Palette::from_chars(chars)?,
        None => {
            let table = CoverageTable::load(&config.coverage_table)?;
            Palette::select(&table, config.palette_size)?
        }
    };
    log::info!("selected ascii character palette: {palette}");

    Ok(if config.invert {
        palette.inverted()
    } else {
        palette
    })
}

/// Run the full pipeline with terminal output on stdout.
///
/// # Errors
/// The first error met: configuration, palette, image, render or output.
pub fn run(config: &Config) -> Result<RunReport> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with(config, &mut out)
}

/// Run the full pipeline, writing terminal output to `out`.
///
/// Loads the palette and the resized image, plays the rotation animation
/// when requested, then renders one upright frame to every active sink.
///
/// # Errors
/// The first error met: configuration, palette, image, render or output.
pub fn run_with<W: Write>(config: &Config, out: &mut W) -> Result<RunReport> {
    config.validate()?;

    let palette = build_palette(config)?;
    let lut = LuminanceLut::new(&palette);

    let input = resolve_input_path(&config.input);
    let buffer = load_resized(&input, config.width, config.aspect_ratio)?;

    let mode = if config.incremental {
        RedrawMode::Incremental
    } else {
        RedrawMode::Full
    };
    let mut display = Display::new(mode);
    let mut report = RunReport::default();

    let plan = RotationPlan {
        speed: config.rotate_speed,
        frame_rate: config.frame_rate,
        rotations: config.rotations,
    };
    if plan.is_animated() {
        if config.terminal {
            let opts = RenderOptions {
                terminal: true,
                file: false,
                color: config.color,
            };
            let clock = play_rotation(&buffer, &lut, opts, &plan, &mut display, out)?;
            report.frames_displayed += clock.frames() as usize;
            report.average_frame_ms = Some(clock.average_ms());
        } else {
            log::warn!("La rotation requiert --terminal, rendu unique");
        }
    }

    let opts = RenderOptions {
        terminal: config.terminal,
        file: config.file_output,
        color: config.color,
    };
    let rendered = render_frame(&buffer, &lut, opts)?;

    if let Some(frame) = &rendered.terminal {
        display.present(out, frame)?;
        display.park_cursor(out)?;
        report.frames_displayed += 1;
    }
    if let Some(avg) = report.average_frame_ms {
        writeln!(out, "Temps moyen par frame : {avg:.2} ms")
            .map_err(|e| CoreError::output("terminal", e))?;
    }
    if let Some(frame) = &rendered.file {
        write_frame(&config.output, frame)?;
        report.file_written = true;
    }

    Ok(report)
}

/// Play every angle of `plan` on the display, paced to its frame rate.
///
/// Returns the clock holding the measured frame times.
///
/// # Errors
/// Allocation, render and terminal write errors.
pub fn play_rotation<W: Write>(
    source: &PixelBuffer,
    lut: &LuminanceLut,
    opts: RenderOptions,
    plan: &RotationPlan,
    display: &mut Display,
    out: &mut W,
) -> Result<FrameClock, CoreError> {
    let mut clock = FrameClock::new(plan.frame_rate);
    let mut rotated = PixelBuffer::new(source.width, source.height, source.channels)?;

    for theta in plan.angles() {
        clock.begin();
        rotate_into(source, theta, &mut rotated)?;
        let rendered = render_frame(&rotated, lut, opts)?;
        if let Some(frame) = &rendered.terminal {
            display.present(out, frame)?;
        }
        clock.end_and_wait();
    }

    log::info!(
        "Temps moyen par frame : {:.2} ms sur {} frames",
        clock.average_ms(),
        clock.frames()
    );
    Ok(clock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};
    use std::path::Path;

    fn write_table(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("charsizes.txt");
        std::fs::write(&path, "@ 10000\no 5000\n. 0\n").unwrap();
        path
    }

    fn base_config(dir: &Path, input: &Path) -> Config {
        Config {
            input: input.to_path_buf(),
            width: 4,
            aspect_ratio: 0.5,
            palette_size: 3,
            coverage_table: write_table(dir),
            output: dir.join("out").join("art.txt"),
            ..Config::default()
        }
    }

    #[test]
    fn palette_from_table_then_inverted() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = base_config(dir.path(), Path::new("unused.png"));
        assert_eq!(build_palette(&config).unwrap().to_string(), ".o@");
        config.invert = true;
        assert_eq!(build_palette(&config).unwrap().to_string(), "@o.");
    }

    #[test]
    fn explicit_chars_bypass_table() {
        let config = Config {
            palette_chars: Some("ab".into()),
            coverage_table: "does/not/exist.txt".into(),
            ..Config::default()
        };
        assert_eq!(build_palette(&config).unwrap().to_string(), "ab");
    }

    #[test]
    fn missing_table_fails() {
        let config = Config {
            coverage_table: "does/not/exist.txt".into(),
            ..Config::default()
        };
        assert!(matches!(
            build_palette(&config),
            Err(CoreError::CoverageTableIo { .. })
        ));
    }

    #[test]
    fn file_only_run_writes_plain_art() {
        let dir = tempfile::tempdir().unwrap();
        let img = dir.path().join("white.png");
        GrayImage::from_pixel(8, 8, Luma([255])).save(&img).unwrap();

        let config = base_config(dir.path(), &img);
        let mut out = Vec::new();
        let report = run_with(&config, &mut out).unwrap();

        assert!(report.file_written);
        assert_eq!(report.frames_displayed, 0);
        assert!(out.is_empty());
        // 4 columns, height 4 * 8/8 * 0.5 = 2
        let text = std::fs::read_to_string(&config.output).unwrap();
        assert_eq!(text, "@@@@\n@@@@\n");
    }

    #[test]
    fn terminal_run_emits_colored_frame() {
        let dir = tempfile::tempdir().unwrap();
        let img = dir.path().join("black.png");
        RgbImage::from_pixel(8, 8, Rgb([0, 0, 0])).save(&img).unwrap();

        let config = Config {
            terminal: true,
            file_output: false,
            ..base_config(dir.path(), &img)
        };
        let mut out = Vec::new();
        let report = run_with(&config, &mut out).unwrap();

        assert_eq!(report.frames_displayed, 1);
        assert!(!report.file_written);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1b[2J"));
        assert!(text.contains("\x1b[38;2;0;0;0m."));
        assert!(!config.output.exists());
    }

    #[test]
    fn rotation_plays_then_ends_upright() {
        let dir = tempfile::tempdir().unwrap();
        let img = dir.path().join("gray.png");
        GrayImage::from_pixel(8, 8, Luma([128])).save(&img).unwrap();

        let config = Config {
            terminal: true,
            rotate_speed: 250.0,
            frame_rate: 1000,
            ..base_config(dir.path(), &img)
        };
        let mut out = Vec::new();
        let report = run_with(&config, &mut out).unwrap();

        // 1000 / 250 = 4 rotated frames, plus the upright one
        assert_eq!(report.frames_displayed, 5);
        assert!(report.average_frame_ms.is_some());
        assert!(String::from_utf8(out).unwrap().contains("Temps moyen par frame"));
        assert!(report.file_written);
    }

    #[test]
    fn invalid_config_is_rejected_before_io() {
        let config = Config {
            width: 0,
            ..Config::default()
        };
        let err = run_with(&config, &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::Argument(_))
        ));
    }
}
