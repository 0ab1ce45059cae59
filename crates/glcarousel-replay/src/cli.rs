use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "glcarousel-replay",
    author,
    version,
    about = "Replay scripted swipes against a carousel and export the rendered frames"
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Carousel configuration TOML (images, transitions, viewport, gesture tuning).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// JSON gesture script to replay. Without one the resting frame is rendered.
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Write the final settled frame to this PNG path.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Write every simulated frame as `frame_NNNNN.png` into this directory.
    #[arg(long, value_name = "DIR")]
    pub frames_dir: Option<PathBuf>,

    /// Simulated frame rate used to advance settle animations.
    #[arg(long, value_name = "FPS", default_value_t = 60.0, value_parser = parse_fps)]
    pub fps: f32,

    /// Override the configured viewport (e.g. `320x480`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the transition effects available to configurations.
    Transitions,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| "invalid width in size".to_string())?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| "invalid height in size".to_string())?;
    if width == 0 || height == 0 {
        return Err("size dimensions must be greater than zero".into());
    }
    Ok((width, height))
}

fn parse_fps(value: &str) -> Result<f32, String> {
    let fps = value
        .trim()
        .parse::<f32>()
        .map_err(|_| format!("invalid fps '{value}'"))?;
    if !fps.is_finite() || fps <= 0.0 {
        return Err("fps must be a positive number".into());
    }
    Ok(fps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_size_variants() {
        assert_eq!(parse_size("320x480").unwrap(), (320, 480));
        assert_eq!(parse_size(" 16 X 9 ").unwrap(), (16, 9));
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("wide").is_err());
    }

    #[test]
    fn rejects_non_positive_fps() {
        assert_eq!(parse_fps("30").unwrap(), 30.0);
        assert!(parse_fps("0").is_err());
        assert!(parse_fps("-5").is_err());
        assert!(parse_fps("inf").is_err());
    }

    #[test]
    fn subcommand_does_not_need_run_args() {
        let cli = Cli::try_parse_from(["glcarousel-replay", "transitions"]).expect("parse");
        assert!(matches!(cli.command, Some(Command::Transitions)));
        assert!(cli.run.config.is_none());
    }
}
