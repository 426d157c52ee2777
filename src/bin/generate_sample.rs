use std::fs::File;
use std::io::{BufWriter, Write};

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

/// Nominal thrust in kilograms-force at `t` seconds after ignition:
/// sharp ramp, slowly sagging plateau, exponential tail-off.
fn thrust_kgf(t: f64) -> f64 {
    const IGNITION: f64 = 0.50;
    const RAMP: f64 = 0.15;
    const PLATEAU_END: f64 = 2.20;
    const PEAK: f64 = 6.0;

    let b = t - IGNITION;
    if b < 0.0 {
        0.0
    } else if b < RAMP {
        PEAK * (b / RAMP)
    } else if t < PLATEAU_END {
        PEAK * (1.0 - 0.08 * (t - IGNITION - RAMP) / (PLATEAU_END - IGNITION - RAMP))
    } else {
        PEAK * 0.92 * (-(t - PLATEAU_END) / 0.12).exp()
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let output_path = "sample_data.csv";
    let file = File::create(output_path).expect("Failed to create output file");
    let mut writer = BufWriter::new(file);

    writeln!(writer, "Tiempo_ms,Fuerza_kg").expect("Failed to write header");

    // 10 ms sampling over 3.5 s: quiet pad, burn, quiet tail.  Quiet rows
    // sit below the analyzer's 0.5 N noise floor and should be filtered out.
    let mut rows = 0usize;
    for i in 0..350 {
        let t_ms = i as f64 * 10.0;
        let t_s = t_ms / 1000.0;
        let nominal = thrust_kgf(t_s);
        let noise = if nominal > 0.0 {
            rng.gauss(0.0, 0.03)
        } else {
            rng.gauss(0.0, 0.005)
        };
        let force_kg = (nominal + noise).max(0.0);
        writeln!(writer, "{t_ms:.1},{force_kg:.4}").expect("Failed to write row");
        rows += 1;
    }

    writer.flush().expect("Failed to flush output file");
    println!("Wrote {rows} samples to {output_path}");
}
