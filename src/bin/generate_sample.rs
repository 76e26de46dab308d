use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::Float64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

    /// Exponential distribution with the given mean
    fn exponential(&mut self, mean: f64) -> f64 {
        -mean * self.next_f64().max(1e-15).ln()
    }
}

/// One synthetic taxi trip.
struct Trip {
    miles: f64,
    seconds: f64,
    fare: f64,
    tip_rate: Option<f64>,
}

fn generate_trip(rng: &mut SimpleRng) -> Trip {
    let miles = 0.2 + rng.exponential(4.0);
    // ~3 minutes per mile plus traffic noise
    let seconds = (miles * 180.0 + rng.gauss(120.0, 90.0)).max(60.0);
    // Flag fall + per-mile rate
    let fare = (3.25 + 2.25 * miles + rng.gauss(0.0, 1.5)).max(3.25);
    // Cash trips have no recorded tip
    let tip_rate = if rng.next_f64() < 0.1 {
        None
    } else {
        Some((rng.gauss(15.0, 6.0)).clamp(0.0, 40.0))
    };

    Trip {
        miles,
        seconds,
        fare,
        tip_rate,
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let trips: Vec<Trip> = (0..2000).map(|_| generate_trip(&mut rng)).collect();

    // ---- Parquet ----
    let schema = Arc::new(Schema::new(vec![
        Field::new("TRIP_MILES", DataType::Float64, false),
        Field::new("TRIP_SECONDS", DataType::Float64, false),
        Field::new("FARE", DataType::Float64, false),
        Field::new("TIP_RATE", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from_iter_values(trips.iter().map(|t| t.miles))),
            Arc::new(Float64Array::from_iter_values(trips.iter().map(|t| t.seconds))),
            Arc::new(Float64Array::from_iter_values(trips.iter().map(|t| t.fare))),
            Arc::new(Float64Array::from(
                trips.iter().map(|t| t.tip_rate).collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let parquet_path = "sample_trips.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    // ---- CSV ----
    let csv_path = "sample_trips.csv";
    let mut csv_writer = csv::Writer::from_path(csv_path).context("creating CSV file")?;
    csv_writer.write_record(["TRIP_MILES", "TRIP_SECONDS", "FARE", "TIP_RATE"])?;
    for t in &trips {
        csv_writer.write_record([
            format!("{:.2}", t.miles),
            format!("{:.0}", t.seconds),
            format!("{:.2}", t.fare),
            t.tip_rate.map(|r| format!("{r:.2}")).unwrap_or_default(),
        ])?;
    }
    csv_writer.flush()?;

    log::info!("generated {} trips", trips.len());
    println!(
        "Wrote {} trips to {parquet_path} and {csv_path}",
        trips.len()
    );
    Ok(())
}
