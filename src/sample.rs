//! Synthetic population and employment tables for running the pipeline
//! without real KOSIS downloads.

use std::path::{Path, PathBuf};

use log::info;

use crate::data::model::{Column, ColumnData, Dataset};
use crate::data::writer::write_csv;
use crate::error::{PreprocessError, Result};

pub const SAMPLE_POPULATION_FILE: &str = "sample_population.csv";
pub const SAMPLE_EMPLOYMENT_FILE: &str = "sample_employment.csv";

pub const YEARS: std::ops::Range<i64> = 2015..2025;
pub const AGE_GROUPS: [&str; 4] = ["15-19", "20-24", "25-29", "30-34"];
pub const JOBS: [&str; 3] = ["소프트웨어개발자", "데이터분석가", "정보보안전문가"];

/// Population counts are drawn from `[2_000_000, 3_500_000)`.
pub const POPULATION_RANGE: (i64, i64) = (2_000_000, 3_500_000);
/// Employment counts are drawn from `[50_000, 200_000)`.
pub const EMPLOYMENT_RANGE: (i64, i64) = (50_000, 200_000);

/// Minimal deterministic PRNG (xoshiro256**)
pub struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    /// Uniform integer in `[low, high)`. An empty range is an error.
    pub fn int_in(&mut self, low: i64, high: i64) -> Result<i64> {
        if low >= high {
            return Err(PreprocessError::Config(format!(
                "empty sample range [{low}, {high})"
            )));
        }
        let span = (high - low) as f64;
        Ok((low + (self.next_f64() * span) as i64).min(high - 1))
    }
}

/// Year × age band → population.
pub fn sample_population(rng: &mut SimpleRng) -> Result<Dataset> {
    long_table(rng, "연령대", &AGE_GROUPS, "인구수", POPULATION_RANGE)
}

/// Year × job title → employed persons.
pub fn sample_employment(rng: &mut SimpleRng) -> Result<Dataset> {
    long_table(rng, "직업", &JOBS, "취업자수", EMPLOYMENT_RANGE)
}

fn long_table(
    rng: &mut SimpleRng,
    category_name: &str,
    categories: &[&str],
    value_name: &str,
    (low, high): (i64, i64),
) -> Result<Dataset> {
    let mut years = Vec::new();
    let mut labels = Vec::new();
    let mut values = Vec::new();
    for year in YEARS {
        for &category in categories {
            years.push(Some(year));
            labels.push(Some(category.to_string()));
            values.push(Some(rng.int_in(low, high)?));
        }
    }
    Dataset::new(vec![
        Column::new("연도", ColumnData::Integer(years)),
        Column::new(category_name, ColumnData::Text(labels)),
        Column::new(value_name, ColumnData::Integer(values)),
    ])
}

/// Write both sample tables into `data_dir` and return their paths.
pub fn generate_samples(data_dir: &Path, seed: u64) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(data_dir)?;
    let mut rng = SimpleRng::new(seed);

    let mut written = Vec::new();
    for (file_name, dataset) in [
        (SAMPLE_POPULATION_FILE, sample_population(&mut rng)?),
        (SAMPLE_EMPLOYMENT_FILE, sample_employment(&mut rng)?),
    ] {
        let path = data_dir.join(file_name);
        write_csv(&dataset, &path)?;
        info!("generated {} ({} rows)", path.display(), dataset.len());
        written.push(path);
    }
    Ok(written)
}
