//! Deterministic synthetic occurrence data

use crate::{OccurrenceSource, SourceResult};
use chrono::NaiveDate;
use marex_core::{Dataset, OccurrenceRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const MOCK_SEED: u64 = 42;
pub const MOCK_RECORD_COUNT: usize = 300;

pub const MOCK_SPECIES: [&str; 3] = [
    "Sardinella longiceps",
    "Thunnus albacares",
    "Lutjanus campechanus",
];

const LATITUDE_RANGE: std::ops::Range<f64> = 8.5..12.0;
const LONGITUDE_RANGE: std::ops::Range<f64> = 74.5..77.0;
const ABUNDANCE_RANGE: std::ops::Range<i64> = 10..500;
const TEMPERATURE_RANGE: std::ops::Range<f64> = 22.0..30.0;

/// First collection date of the mock series
pub fn mock_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 1).expect("2022-01-01 is a valid date")
}

/// Generator for the mock dataset
///
/// Same seed, same records: each column is drawn in full before the next
/// (species, latitude, longitude, abundance, temperature) from one seeded RNG.
#[derive(Debug, Clone)]
pub struct MockSource {
    seed: u64,
    count: usize,
    start: NaiveDate,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new(MOCK_SEED, MOCK_RECORD_COUNT)
    }
}

impl MockSource {
    pub fn new(seed: u64, count: usize) -> Self {
        Self {
            seed,
            count,
            start: mock_epoch(),
        }
    }

    pub fn generate(&self) -> Dataset {
        let n = self.count;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let species: Vec<&str> = (0..n)
            .map(|_| MOCK_SPECIES[rng.gen_range(0..MOCK_SPECIES.len())])
            .collect();
        let latitudes: Vec<f64> = (0..n).map(|_| rng.gen_range(LATITUDE_RANGE)).collect();
        let longitudes: Vec<f64> = (0..n).map(|_| rng.gen_range(LONGITUDE_RANGE)).collect();
        let abundances: Vec<i64> = (0..n).map(|_| rng.gen_range(ABUNDANCE_RANGE)).collect();
        let temperatures: Vec<f64> = (0..n).map(|_| rng.gen_range(TEMPERATURE_RANGE)).collect();

        self.start
            .iter_days()
            .take(n)
            .enumerate()
            .map(|(i, collection_date)| OccurrenceRecord {
                species: species[i].to_string(),
                latitude: latitudes[i],
                longitude: longitudes[i],
                collection_date,
                abundance: abundances[i],
                temperature: temperatures[i],
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl OccurrenceSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self) -> SourceResult<Dataset> {
        let dataset = self.generate();
        tracing::debug!(records = dataset.len(), seed = self.seed, "Generated mock dataset");
        Ok(dataset)
    }
}
