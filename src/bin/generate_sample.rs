use std::fs;
use std::path::Path;

/// Ground-state energy of the synthetic chain: smooth in J, extensive in N.
fn ground_energy(n_sites: usize, j: f64) -> f64 {
    -(n_sites as f64) * (1.0 + j * j).sqrt()
}

/// k-th level above the ground state; the gap closes towards J = 1.
fn level_energy(n_sites: usize, k: usize, j: f64) -> f64 {
    let gap = 2.0 * (1.0 - j).abs() + 1.0 / n_sites as f64;
    ground_energy(n_sites, j) + k as f64 * gap
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const LEVELS: usize = 3;

fn coupling_grid(first_step: usize, last_step: usize) -> Vec<f64> {
    (first_step..=last_step).map(|i| i as f64 * 0.1).collect()
}

/// The wide solver table: header, coupling row, then three level rows per
/// system size. Values start at column 2, matching the reshaper default.
fn write_wide_table(path: &str, sizes: &[usize], j: &[f64]) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create wide table");

    let mut header = vec!["model".to_string(), "level".to_string()];
    header.extend(j.iter().map(|x| format!("J={x:.1}")));
    writer.write_record(&header).expect("Failed to write header");

    let mut j_row = vec!["ising".to_string(), "J".to_string()];
    j_row.extend(j.iter().map(|x| x.to_string()));
    writer.write_record(&j_row).expect("Failed to write coupling row");

    for &n in sizes {
        for k in 0..LEVELS {
            let mut row = vec!["ising".to_string(), format!("E{k}")];
            row.extend(j.iter().map(|&x| level_energy(n, k, x).to_string()));
            writer.write_record(&row).expect("Failed to write level row");
        }
    }
    writer.flush().expect("Failed to flush wide table");
}

/// A `[j, E0, E1, ...]` spectrum file. Noise perturbs every level; now and
/// then two levels are swapped, the permuted ordering the comparison
/// plotter has to re-sort.
fn write_spectrum(
    path: &Path,
    n_sites: usize,
    j: &[f64],
    noise: f64,
    shuffle: bool,
    rng: &mut SimpleRng,
) {
    let mut writer = csv::Writer::from_path(path)
        .unwrap_or_else(|e| panic!("Failed to create {}: {e}", path.display()));

    for &x in j {
        let mut levels: Vec<f64> = (0..LEVELS)
            .map(|k| rng.gauss(level_energy(n_sites, k, x), noise))
            .collect();
        if shuffle && rng.next_f64() < 0.2 {
            levels.swap(0, 1);
        }

        let mut row = vec![x.to_string()];
        row.extend(levels.iter().map(|v| v.to_string()));
        writer
            .write_record(&row)
            .unwrap_or_else(|e| panic!("Failed to write {}: {e}", path.display()));
    }
    writer
        .flush()
        .unwrap_or_else(|e| panic!("Failed to flush {}: {e}", path.display()));
}

fn main() {
    let mut rng = SimpleRng::new(42);

    for dir in [
        "./logs",
        "./logs_spinHalf",
        "./plots",
        "./plots_spinHalf",
        "./exact-diagonalisation",
        "./0_exact-diagonalisation_archive-h",
    ] {
        fs::create_dir_all(dir).expect("Failed to create output directory");
    }

    // J = 0.1 .. 2.1 for the solver outputs; the MPS log carries one extra
    // leading sample so the couplings only partially overlap.
    let j_solver = coupling_grid(1, 21);
    let j_mps = coupling_grid(0, 21);

    let sizes = [4usize, 5, 6, 7, 8];
    write_wide_table("table.csv", &sizes, &j_solver);

    write_spectrum(
        Path::new("./exact-diagonalisation/ising_16.csv"),
        16,
        &j_solver,
        0.0,
        false,
        &mut rng,
    );
    write_spectrum(
        Path::new("./logs_spinHalf/ising16_energies.csv"),
        16,
        &j_mps,
        1e-3,
        true,
        &mut rng,
    );
    write_spectrum(
        Path::new("./logs/ising_energies.csv"),
        8,
        &j_solver,
        1e-3,
        false,
        &mut rng,
    );

    println!(
        "Wrote table.csv ({} sizes, {} couplings), one ED reference and two spectrum logs",
        sizes.len(),
        j_solver.len()
    );
}
