//! Engine configuration, loaded from a per-user TOML file: baker, mixer, and RHI parameters.
//! Any field missing from the file (or a brand new file) falls back to a hardcoded default and
//! the effective value is written back out so the file is always a complete, inspectable record
//! of what ran.

use {
    app_dirs::{get_app_root, AppDataType, AppDirsError, AppInfo},
    serde::{Deserialize, Serialize},
    std::{
        fs::{create_dir_all, read_to_string, File},
        io::{Error as IoError, ErrorKind, Write},
        path::PathBuf,
    },
    toml::{from_str, to_string_pretty},
};

#[cfg(debug_assertions)]
const CONFIG_FILENAME: &str = "engine-debug.toml";

#[cfg(not(debug_assertions))]
const CONFIG_FILENAME: &str = "engine.toml";

pub fn get_game_root(game: &'static str) -> Result<PathBuf, IoError> {
    match get_app_root(
        AppDataType::UserConfig,
        &AppInfo {
            name: game,
            author: "Attack Goat",
        },
    ) {
        Err(err) => Err(match err {
            AppDirsError::Io(err) => err,
            AppDirsError::InvalidAppInfo => IoError::from(ErrorKind::InvalidInput),
            AppDirsError::NotSupported => IoError::from(ErrorKind::InvalidData),
        }),
        Ok(res) => Ok(res),
    }
}

fn get_config_path(game: &'static str) -> Result<PathBuf, IoError> {
    let game_root = get_game_root(game)?;
    Ok(game_root.join(CONFIG_FILENAME))
}

pub struct Config {
    data: Data,
    game: &'static str,
}

#[derive(Default, Deserialize, Serialize)]
struct Data {
    // Baker
    bake_ray_count: Option<u32>,
    bake_ray_recursion: Option<u32>,
    bake_fogmap_scale: Option<u32>,
    bake_shadowmap_resolution: Option<u32>,

    // Mixer
    mixer_sample_rate: Option<u32>,
    mixer_channel_count: Option<u32>,

    // RHI
    rhi_msaa_sample_count: Option<u32>,
    rhi_shadow_resolution: Option<u32>,
    rhi_missing_texture_size: Option<u32>,
}

impl Config {
    pub fn read(game: &'static str) -> Result<Self, IoError> {
        let config_path = get_config_path(game)?;
        Ok(if config_path.exists() {
            let config_file = read_to_string(&*config_path).unwrap_or_else(|_| {
                #[cfg(debug_assertions)]
                warn!("Engine config file read error, creating a new one");

                "".to_owned()
            });
            Self {
                data: from_str(&config_file).unwrap_or_default(),
                game,
            }
        } else {
            #[cfg(debug_assertions)]
            info!("Engine config file not found, creating a new one");
            let mut res = Self {
                data: Data::default(),
                game,
            };
            res.data.bake_ray_count = Some(res.bake_ray_count());
            res.data.bake_ray_recursion = Some(res.bake_ray_recursion());
            res.data.bake_fogmap_scale = Some(res.bake_fogmap_scale());
            res.data.bake_shadowmap_resolution = Some(res.bake_shadowmap_resolution());
            res.data.mixer_sample_rate = Some(res.mixer_sample_rate());
            res.data.mixer_channel_count = Some(res.mixer_channel_count());
            res.data.rhi_msaa_sample_count = Some(res.rhi_msaa_sample_count());
            res.data.rhi_shadow_resolution = Some(res.rhi_shadow_resolution());
            res.data.rhi_missing_texture_size = Some(res.rhi_missing_texture_size());
            res.write()?;
            res
        })
    }

    /// Rays traced per texel per bounce. Default `2`.
    pub fn bake_ray_count(&self) -> u32 {
        self.data.bake_ray_count.unwrap_or(2).max(1)
    }

    /// Bounce depth before a path is terminated. Default `1`.
    pub fn bake_ray_recursion(&self) -> u32 {
        self.data.bake_ray_recursion.unwrap_or(1)
    }

    /// Fogmap grid resolution divisor relative to the shadowmap resolution. Default `8`.
    pub fn bake_fogmap_scale(&self) -> u32 {
        self.data.bake_fogmap_scale.unwrap_or(8).max(1)
    }

    /// Resolution the baker treats the sun shadowmap as having, for fogmap grid sizing. Default
    /// `1024`, matching [`crate::passes::SHADOWMAP_SIZE`].
    pub fn bake_shadowmap_resolution(&self) -> u32 {
        self.data.bake_shadowmap_resolution.unwrap_or(crate::passes::SHADOWMAP_SIZE)
    }

    /// Default `44100`, matching the audio-output plugin contract.
    pub fn mixer_sample_rate(&self) -> u32 {
        self.data.mixer_sample_rate.unwrap_or(44_100)
    }

    /// Default `2` (stereo).
    pub fn mixer_channel_count(&self) -> u32 {
        self.data.mixer_channel_count.unwrap_or(2).max(1)
    }

    /// Value will be one of `1`, `2`, `4`, `8`. The default value is `4`.
    pub fn rhi_msaa_sample_count(&self) -> u32 {
        match self.data.rhi_msaa_sample_count.unwrap_or(4) {
            n if n >= 8 => 8,
            n if n >= 4 => 4,
            n if n >= 2 => 2,
            _ => 1,
        }
    }

    /// Default `1024`, matching [`crate::passes::SHADOWMAP_SIZE`].
    pub fn rhi_shadow_resolution(&self) -> u32 {
        self.data.rhi_shadow_resolution.unwrap_or(crate::passes::SHADOWMAP_SIZE)
    }

    /// Default matches [`crate::rhi::MISSING_TEXTURE_SIZE`].
    pub fn rhi_missing_texture_size(&self) -> u32 {
        self.data.rhi_missing_texture_size.unwrap_or(crate::rhi::MISSING_TEXTURE_SIZE)
    }

    pub fn write(&self) -> Result<(), IoError> {
        let game_root = get_game_root(self.game)?;

        if !game_root.exists() {
            create_dir_all(&*game_root)?;
        }

        let config_path = get_config_path(self.game)?;
        let mut config_file = File::create(&*config_path)?;

        let toml = to_string_pretty(&self.data).map_err(|_| IoError::from(ErrorKind::Other))?;
        config_file.write_all(toml.as_bytes())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_applied_when_fields_are_absent() {
        let config = Config {
            data: Data::default(),
            game: "quartz-engine-config-test",
        };
        assert_eq!(config.bake_ray_count(), 2);
        assert_eq!(config.bake_ray_recursion(), 1);
        assert_eq!(config.bake_fogmap_scale(), 8);
        assert_eq!(config.mixer_sample_rate(), 44_100);
        assert_eq!(config.mixer_channel_count(), 2);
        assert_eq!(config.rhi_msaa_sample_count(), 4);
    }

    #[test]
    fn msaa_sample_count_snaps_down_to_the_nearest_valid_value() {
        let config = Config {
            data: Data {
                rhi_msaa_sample_count: Some(3),
                ..Data::default()
            },
            game: "quartz-engine-config-test",
        };
        assert_eq!(config.rhi_msaa_sample_count(), 2);
    }
}
