use lathe::Scene;

#[derive(Debug)]
pub(crate) struct SimulationStats {
    pub(crate) total_entries: usize,
    pub(crate) ticks: usize,
    pub(crate) switches: usize,
    pub(crate) end_time: u64,
    pub(crate) final_entry: usize,
    pub(crate) finished: bool,
}

impl SimulationStats {
    pub(crate) fn new(total_entries: usize) -> Self {
        Self {
            total_entries,
            ticks: 0,
            switches: 0,
            end_time: 0,
            final_entry: 0,
            finished: false,
        }
    }

    /// Entries whose animation ran to completion.
    pub(crate) fn completed_entries(&self) -> usize {
        if self.finished {
            self.final_entry + 1
        } else {
            self.switches
        }
    }

    pub(crate) fn print_progress(&self, entry: usize, time: u64) {
        println!(
            "Progress: entry {}/{} started at {} ms",
            entry + 1,
            self.total_entries,
            time
        );
    }

    pub(crate) fn print_summary(&self, scene: &Scene) {
        println!("\n=== Simulation Summary ===");
        println!("Ticks simulated: {}", self.ticks);
        println!("Simulated time: {} ms", self.end_time);
        println!("Timeline entries completed: {}/{}", self.completed_entries(), self.total_entries);
        println!("Final entry: {}", self.final_entry);
        println!("Finished: {}", if self.finished { "yes" } else { "no" });
        println!("Final positions:");
        for (name, transform) in scene.model_matrices() {
            let t = transform.w_axis;
            println!("  {:<12} ({:.3}, {:.3}, {:.3})", name, t.x, t.y, t.z);
        }
    }
}
