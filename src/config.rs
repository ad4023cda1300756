use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// First-person ray-cast view of the tile grid
    #[value(name = "3d")]
    Scene,
    /// Top-down view of the vertex/linedef map
    Overlay,
}

#[derive(Debug, Parser)]
#[command(name = "wadcaster", version, about = "Grid ray caster with a WAD map overlay")]
pub struct Args {
    /// WAD file to take the overlay map from; the built-in square is used otherwise
    #[arg(long)]
    pub wad: Option<PathBuf>,

    /// Map marker lump to decode
    #[arg(long, default_value = "E1M1")]
    pub map: String,

    /// Internal render width in pixels
    #[arg(long, default_value_t = 384)]
    pub width: u32,

    /// Internal render height in pixels
    #[arg(long, default_value_t = 216)]
    pub height: u32,

    #[arg(long, default_value_t = 1280)]
    pub window_width: u32,

    #[arg(long, default_value_t = 720)]
    pub window_height: u32,

    /// Horizontal field of view in degrees
    #[arg(long, default_value_t = 66.0)]
    pub fov: f32,

    /// Movement speed in grid cells per second
    #[arg(long, default_value_t = 3.0)]
    pub move_speed: f32,

    /// Turn speed in radians per second
    #[arg(long, default_value_t = 3.0)]
    pub turn_speed: f32,

    /// Initial view
    #[arg(long, value_enum, default_value_t = View::Scene)]
    pub view: View,
}

/// Validated runtime settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub wad: Option<PathBuf>,
    pub map: String,
    pub width: usize,
    pub height: usize,
    pub window_width: u32,
    pub window_height: u32,
    pub fov: f32,
    pub move_speed: f32,
    pub turn_speed: f32,
    pub view: View,
}

impl TryFrom<Args> for Config {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        for (width, height) in [
            (args.width, args.height),
            (args.window_width, args.window_height),
        ] {
            if width == 0 || height == 0 {
                return Err(ConfigError::ZeroResolution { width, height });
            }
        }
        if !(args.fov > 0.0 && args.fov < 180.0) {
            return Err(ConfigError::FieldOfView(args.fov));
        }
        for (name, value) in [("move speed", args.move_speed), ("turn speed", args.turn_speed)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::Speed { name, value });
            }
        }

        Ok(Self {
            wad: args.wad,
            map: args.map,
            width: args.width as usize,
            height: args.height as usize,
            window_width: args.window_width,
            window_height: args.window_height,
            fov: args.fov,
            move_speed: args.move_speed,
            turn_speed: args.turn_speed,
            view: args.view,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Config, ConfigError> {
        let args = Args::try_parse_from(std::iter::once("wadcaster").chain(argv.iter().copied()))
            .expect("argv parses");
        Config::try_from(args)
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.wad, None);
        assert_eq!(config.map, "E1M1");
        assert_eq!((config.width, config.height), (384, 216));
        assert_eq!(config.view, View::Scene);
    }

    #[test]
    fn overrides() {
        let config = parse(&[
            "--wad", "doom1.wad", "--map", "E1M2", "--view", "overlay", "--fov", "90",
        ])
        .unwrap();
        assert_eq!(config.wad, Some(PathBuf::from("doom1.wad")));
        assert_eq!(config.map, "E1M2");
        assert_eq!(config.view, View::Overlay);
        assert_eq!(config.fov, 90.0);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(parse(&["--width", "0"]), Err(ConfigError::ZeroResolution { .. })));
        assert!(matches!(parse(&["--fov", "180"]), Err(ConfigError::FieldOfView(_))));
        assert!(matches!(
            parse(&["--turn-speed", "0"]),
            Err(ConfigError::Speed { name: "turn speed", .. })
        ));
    }
}
