use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Config {
    /// Procedural cylinder settings
    pub cylinder: CylinderConfig,
    /// Geometry loaded from OBJ files
    #[serde(default)]
    pub geometries: Vec<GeometryConfig>,
    /// Mesh instances placed in the scene
    #[serde(default)]
    pub meshes: Vec<MeshConfig>,
    /// Animation playlist, played in order
    #[serde(default)]
    pub animations: Vec<AnimationConfig>,
    /// Host loop settings
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CylinderConfig {
    /// Geometry name meshes use to refer to the cylinder
    pub name: String,
    /// Nominal radius
    #[serde(default = "default_radius")]
    pub radius: f32,
    /// Number of angular segments
    pub segments: u32,
    /// Scale the ring by the radius instead of keeping a unit ring
    #[serde(default)]
    pub scale_by_radius: bool,
    /// Where the generated OBJ is written
    pub output: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct GeometryConfig {
    /// Geometry name
    pub name: String,
    /// OBJ file path
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct MeshConfig {
    /// Mesh name
    pub name: String,
    /// Name of the geometry to draw
    pub geometry: String,
    /// RGB color
    #[serde(default)]
    pub color: [f32; 3],
    /// Position for meshes without animation
    #[serde(default)]
    pub position: [f32; 3],
    /// Rotation in degrees around x, y and z
    #[serde(default)]
    pub rotation: [f32; 3],
    /// Scale, applied after animation translation
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AnimationConfig {
    /// Mesh moved by this animation
    pub target: String,
    /// Keyframes; the first one is the initial pose
    pub frames: Vec<FrameConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct FrameConfig {
    pub position: [f32; 3],
    /// Milliseconds spent moving into this frame
    #[serde(default)]
    pub duration: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SimulationConfig {
    /// Milliseconds between ticks
    #[serde(default = "default_tick")]
    pub tick_ms: u64,
    /// Stop after this many milliseconds even if the timeline is still playing
    #[serde(default = "default_end")]
    pub end_ms: u64,
    /// Optional JSON-lines trace of animated mesh positions
    #[serde(default)]
    pub trace: Option<PathBuf>,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

fn default_radius() -> f32 {
    1.0
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_tick() -> u64 {
    16
}

fn default_end() -> u64 {
    120_000
}

fn mesh(name: &str, geometry: &str, color: [f32; 3], position: [f32; 3], rotation: [f32; 3], scale: [f32; 3]) -> MeshConfig {
    MeshConfig {
        name: name.to_string(),
        geometry: geometry.to_string(),
        color,
        position,
        rotation,
        scale,
    }
}

fn animation(target: &str, frames: &[([f32; 3], u32)]) -> AnimationConfig {
    AnimationConfig {
        target: target.to_string(),
        frames: frames
            .iter()
            .map(|&(position, duration)| FrameConfig { position, duration })
            .collect(),
    }
}

const YELLOW: [f32; 3] = [0.9, 1.0, 0.1];
const PINK: [f32; 3] = [1.0, 0.0, 1.0];
const RED: [f32; 3] = [0.8, 0.0, 0.0];
const GREEN: [f32; 3] = [0.0, 0.8, 0.0];
const BLUE: [f32; 3] = [0.0, 0.0, 0.8];

impl Default for Config {
    fn default() -> Self {
        Config {
            cylinder: CylinderConfig {
                name: "cylinder".to_string(),
                radius: 1.0,
                segments: 12,
                scale_by_radius: false,
                output: PathBuf::from("meshes/my_cylinder.obj"),
            },
            geometries: vec![
                GeometryConfig { name: "skybox".to_string(), path: PathBuf::from("meshes/skybox.obj") },
                GeometryConfig { name: "cube".to_string(), path: PathBuf::from("meshes/cube.obj") },
                GeometryConfig { name: "torus".to_string(), path: PathBuf::from("meshes/torus.obj") },
            ],
            meshes: vec![
                mesh("Skybox", "skybox", BLUE, [0.0, 0.0, 0.0], [0.0, 120.0, 0.0], [40.0, 40.0, 40.0]),
                mesh("Base", "cube", RED, [0.0, -2.5, 0.0], [0.0, 0.0, 0.0], [5.0, 0.5, 15.0]),
                mesh("PoleOne", "cylinder", BLUE, [0.0, 0.0, -5.0], [90.0, 0.0, 0.0], [1.0, 1.0, 5.0]),
                mesh("PoleTwo", "cylinder", BLUE, [0.0, 0.0, 0.0], [90.0, 0.0, 0.0], [1.0, 1.0, 5.0]),
                mesh("PoleThree", "cylinder", BLUE, [0.0, 0.0, 5.0], [90.0, 0.0, 0.0], [1.0, 1.0, 5.0]),
                mesh("DiskOne", "torus", GREEN, [0.0; 3], [0.0; 3], [4.0; 3]),
                mesh("DiskTwo", "torus", YELLOW, [0.0; 3], [0.0; 3], [3.0; 3]),
                mesh("DiskThree", "torus", PINK, [0.0; 3], [0.0; 3], [2.2; 3]),
            ],
            animations: vec![
                animation("DiskThree", &[
                    ([0.0, -0.05, 0.0], 0),
                    ([0.0, 5.0, 0.0], 3000),
                    ([0.0, 5.0, 5.0], 1500),
                    ([0.0, -1.8, 5.0], 3000),
                ]),
                animation("DiskTwo", &[
                    ([0.0, -0.8, 0.0], 0),
                    ([0.0, 5.0, 0.0], 3000),
                    ([0.0, 5.0, -5.0], 1500),
                    ([0.0, -1.8, -5.0], 3000),
                ]),
                animation("DiskThree", &[
                    ([0.0, -1.8, 5.0], 0),
                    ([0.0, 5.0, 5.0], 3000),
                    ([0.0, 5.0, -5.0], 2000),
                    ([0.0, -0.85, -5.0], 3000),
                ]),
                animation("DiskOne", &[
                    ([0.0, -1.8, 0.0], 0),
                    ([0.0, 5.0, 0.0], 3000),
                    ([0.0, 5.0, 5.0], 1500),
                    ([0.0, -1.8, 5.0], 3000),
                ]),
                animation("DiskThree", &[
                    ([0.0, -0.85, -5.0], 0),
                    ([0.0, 5.0, -5.0], 3000),
                    ([0.0, 5.0, 0.0], 2000),
                    ([0.0, -1.8, 0.0], 3000),
                ]),
                animation("DiskTwo", &[
                    ([0.0, -0.8, -5.0], 0),
                    ([0.0, 5.0, -5.0], 2000),
                    ([0.0, 5.0, 5.0], 3000),
                    ([0.0, -0.8, 5.0], 3000),
                ]),
                animation("DiskThree", &[
                    ([0.0, -1.8, 0.0], 0),
                    ([0.0, 5.0, 0.0], 3000),
                    ([0.0, 5.0, 5.0], 2000),
                    ([0.0, -0.05, 5.0], 3000),
                ]),
                // Resting pose, never played
                animation("DiskThree", &[([0.0, -1.8, 0.0], 0)]),
            ],
            simulation: SimulationConfig {
                tick_ms: default_tick(),
                end_ms: default_end(),
                trace: None,
                verbose: false,
            },
        }
    }
}

impl Config {

    pub fn load(config_path: &Path) -> anyhow::Result<Config> {
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        let config: Config = match config_path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&config_str)?,
            Some("toml") => toml::from_str(&config_str)?,
            _ => bail!("Unsupported config file format. Use .json or .toml"),
        };
        Ok(config)
    }

    pub fn save_default(config_path: &Path) -> anyhow::Result<()> {
        let config = Config::default();
        let config_str = match config_path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::to_string_pretty(&config)?,
            _ => serde_json::to_string_pretty(&config)?, // Default to JSON
        };

        let mut file = File::create(config_path)
            .with_context(|| format!("Failed to create {}", config_path.display()))?;
        file.write_all(config_str.as_bytes())?;
        println!("Generated default configuration file: {}", config_path.display());
        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml_and_json() {
        let config = Config::default();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let from_toml: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(from_toml.animations.len(), 8);
        assert_eq!(from_toml.meshes.len(), config.meshes.len());

        let json_str = serde_json::to_string_pretty(&config).unwrap();
        let from_json: Config = serde_json::from_str(&json_str).unwrap();
        assert_eq!(from_json.cylinder.segments, 12);
        assert_eq!(from_json.animations[1].frames[2].position, [0.0, 5.0, -5.0]);
    }

    #[test]
    fn omitted_fields_take_defaults() {
        let toml_str = r#"
            [cylinder]
            name = "pole"
            segments = 8
            output = "out/pole.obj"

            [[meshes]]
            name = "Pole"
            geometry = "pole"

            [simulation]
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.cylinder.radius, 1.0);
        assert!(!config.cylinder.scale_by_radius);
        assert_eq!(config.meshes[0].scale, [1.0, 1.0, 1.0]);
        assert!(config.animations.is_empty());
        assert_eq!(config.simulation.tick_ms, 16);
        assert_eq!(config.simulation.end_ms, 120_000);
    }
}
