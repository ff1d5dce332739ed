use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::fs::File;
use std::io::{BufWriter, Write};
use anyhow::{anyhow, Context};
use glam::Vec3;
use log::{error, info, warn};
use serde::Serialize;
use lathe::error::Error;
use lathe::{Animation, Cylinder, Frame, GeometryHandle, Mesh, MeshData, MeshHandle, Scene};
use crate::config::Config;
use crate::stats::SimulationStats;

#[derive(Debug, Serialize)]
struct TraceRecord<'a> {
    time: u64,
    entry: usize,
    meshes: Vec<TracedMesh<'a>>,
}

#[derive(Debug, Serialize)]
struct TracedMesh<'a> {
    name: &'a str,
    position: [f32; 3],
}

pub(crate) struct Simulator {
    config: Config
}

impl Simulator {

    pub(crate) fn new(config: Config) -> Self {
        Simulator {
            config
        }
    }

    pub(crate) fn build_scene(&self) -> anyhow::Result<Scene> {
        let mut scene = Scene::new();
        let mut geometries: HashMap<&str, GeometryHandle> = HashMap::new();

        // Generate the cylinder and keep it in memory even if the OBJ cannot be written
        let cylinder_config = &self.config.cylinder;
        let cylinder = Cylinder::new(cylinder_config.radius, cylinder_config.segments)
            .with_radius_scaling(cylinder_config.scale_by_radius);
        let cylinder_mesh = cylinder
            .generate()
            .context("Failed to generate cylinder geometry")?;

        info!("Generating geometry and saving to {}", cylinder_config.output.display());
        if let Some(parent) = cylinder_config.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Failed to create {}: {}", parent.display(), e);
            }
        }
        if let Err(e) = cylinder_mesh.export_obj(&cylinder_config.output) {
            error!("Failed to save {}: {}", cylinder_config.output.display(), e);
        }
        geometries.insert(cylinder_config.name.as_str(), scene.add_geometry(cylinder_mesh));

        for geometry in &self.config.geometries {
            let data = match MeshData::load_obj(&geometry.path) {
                Ok(data) => data,
                Err(e) => {
                    warn!("Failed to load {} from {}: {}", geometry.name, geometry.path.display(), e);
                    MeshData::new()
                }
            };
            geometries.insert(geometry.name.as_str(), scene.add_geometry(data));
        }

        for mesh_config in &self.config.meshes {
            let geometry = *geometries
                .get(mesh_config.geometry.as_str())
                .ok_or_else(|| anyhow!("Mesh {} uses unknown geometry {}", mesh_config.name, mesh_config.geometry))?;
            let vertex_count = scene.geometry(geometry).map_or(0, |g| g.vertex_count());

            let mut mesh = Mesh::new(mesh_config.name.as_str(), geometry, vertex_count);
            mesh.color = Vec3::from_array(mesh_config.color);
            mesh.position = Vec3::from_array(mesh_config.position);
            mesh.rotation = Vec3::from_array(mesh_config.rotation);
            mesh.scale = Vec3::from_array(mesh_config.scale);
            scene.add_mesh(mesh);
        }

        for animation_config in &self.config.animations {
            let target = scene
                .find_mesh(&animation_config.target)
                .ok_or_else(|| Error::UnknownMesh(animation_config.target.clone()))?;
            let frames = animation_config
                .frames
                .iter()
                .map(|f| Frame::new(Vec3::from_array(f.position), f.duration))
                .collect();
            scene.add_animation(target, Animation::new(frames))?;
        }

        scene.initialize();

        if self.config.simulation.verbose {
            println!(
                "Scene: {} meshes, {} timeline entries",
                scene.meshes().len(),
                scene.timeline().len()
            );
        }

        Ok(scene)
    }

    /// Ticks the scene from 0 ms until the timeline stops or the end time is reached.
    pub(crate) fn run(&self, scene: &mut Scene) -> anyhow::Result<SimulationStats> {
        let simulation = &self.config.simulation;
        let tick = simulation.tick_ms.max(1);

        let animated: BTreeSet<MeshHandle> = scene.timeline().entries().iter().map(|e| e.target).collect();

        let mut trace = match &simulation.trace {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create trace file {}", path.display()))?;
                Some(BufWriter::new(file))
            }
            None => None,
        };

        let mut stats = SimulationStats::new(scene.timeline().len());
        let mut time = 0;

        loop {
            let entry = scene.timeline().current_entry_index();
            scene.advance(time);
            stats.ticks += 1;
            stats.end_time = time;

            if scene.timeline().current_entry_index() != entry {
                stats.switches += 1;
                if simulation.verbose {
                    stats.print_progress(scene.timeline().current_entry_index(), time);
                }
            }

            if let Some(writer) = trace.as_mut() {
                let record = TraceRecord {
                    time,
                    entry: scene.timeline().current_entry_index(),
                    meshes: animated
                        .iter()
                        .filter_map(|&h| scene.mesh(h))
                        .map(|m| TracedMesh {
                            name: m.name.as_str(),
                            position: m.transform.w_axis.truncate().to_array(),
                        })
                        .collect(),
                };
                serde_json::to_writer(&mut *writer, &record)?;
                writeln!(writer)?;
            }

            if !scene.timeline().is_animating() || time >= simulation.end_ms {
                break;
            }
            time += tick;
        }

        if let Some(mut writer) = trace {
            writer.flush()?;
        }

        stats.final_entry = scene.timeline().current_entry_index();
        stats.finished = !scene.timeline().is_animating();
        Ok(stats)
    }
}
