//! Best-effort catalog: the fastest known time per standard distance.
//!
//! Records only ever improve. Every write goes through
//! [`RecordStore::replace_if_faster`], an atomic compare-and-swap keyed by
//! distance, so concurrent updates cannot lose a faster time, and an exact tie
//! keeps the record already stored.

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    best_effort::{EffortWindow, WorkoutEfforts},
    errors::{AnalyticsError, Result},
    models::{BestEffortRecord, StandardDistance, Workout},
};

/// What a compare-and-swap did to one distance's record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordChange {
    Created(BestEffortRecord),
    Improved {
        previous: BestEffortRecord,
        current: BestEffortRecord,
    },
    Kept {
        existing: BestEffortRecord,
        candidate_seconds: f64,
    },
}

impl RecordChange {
    pub fn distance(&self) -> StandardDistance {
        match self {
            RecordChange::Created(r) => r.distance,
            RecordChange::Improved { current, .. } => current.distance,
            RecordChange::Kept { existing, .. } => existing.distance,
        }
    }

    /// The record stored after the operation.
    pub fn record(&self) -> &BestEffortRecord {
        match self {
            RecordChange::Created(r) => r,
            RecordChange::Improved { current, .. } => current,
            RecordChange::Kept { existing, .. } => existing,
        }
    }

    pub fn is_write(&self) -> bool {
        !matches!(self, RecordChange::Kept { .. })
    }
}

/// Storage for best-effort records, one per distance.
pub trait RecordStore: Send + Sync {
    fn get(&self, distance: StandardDistance) -> Result<Option<BestEffortRecord>>;

    /// All records, shortest distance first.
    fn list(&self) -> Result<Vec<BestEffortRecord>>;

    fn clear(&self) -> Result<()>;

    /// Unconditional whole-record write.
    fn put(&self, record: BestEffortRecord) -> Result<()>;

    /// Stores `candidate` if no record exists for its distance or it is
    /// strictly faster than the existing one. Must be atomic per distance.
    fn replace_if_faster(&self, candidate: BestEffortRecord) -> Result<RecordChange>;
}

/// Mutex-guarded in-process store.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: Mutex<BTreeMap<StandardDistance, BestEffortRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<StandardDistance, BestEffortRecord>>> {
        self.records
            .lock()
            .map_err(|_| AnalyticsError::store("record map lock poisoned"))
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get(&self, distance: StandardDistance) -> Result<Option<BestEffortRecord>> {
        Ok(self.lock()?.get(&distance).cloned())
    }

    fn list(&self) -> Result<Vec<BestEffortRecord>> {
        Ok(self.lock()?.values().cloned().collect())
    }

    fn clear(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }

    fn put(&self, record: BestEffortRecord) -> Result<()> {
        self.lock()?.insert(record.distance, record);
        Ok(())
    }

    fn replace_if_faster(&self, candidate: BestEffortRecord) -> Result<RecordChange> {
        let mut records = self.lock()?;
        let change = match records.get(&candidate.distance) {
            None => RecordChange::Created(candidate.clone()),
            Some(existing) if candidate.is_faster_than(existing) => RecordChange::Improved {
                previous: existing.clone(),
                current: candidate.clone(),
            },
            Some(existing) => {
                return Ok(RecordChange::Kept {
                    existing: existing.clone(),
                    candidate_seconds: candidate.time_seconds,
                });
            }
        };
        records.insert(candidate.distance, candidate);
        Ok(change)
    }
}

/// Outcome of a full recompute.
#[derive(Debug, Clone, Default)]
pub struct RecomputeReport {
    /// Stored records, longest distance first.
    pub records: Vec<BestEffortRecord>,
    pub workouts_scanned: usize,
    /// Workouts with neither a usable time series nor a usable route.
    pub workouts_without_source: usize,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    workout_index: usize,
    window: EffortWindow,
}

impl Candidate {
    /// Keeps the faster candidate; on a tie the earlier workout wins so the
    /// result does not depend on how rayon splits the work.
    fn faster_of(a: Candidate, b: Candidate) -> Candidate {
        let by_time = b.window.duration_seconds.total_cmp(&a.window.duration_seconds);
        match by_time.then(b.workout_index.cmp(&a.workout_index)) {
            std::cmp::Ordering::Less => b,
            _ => a,
        }
    }
}

pub struct BestEffortCatalog<S = InMemoryRecordStore> {
    store: S,
}

impl Default for BestEffortCatalog<InMemoryRecordStore> {
    fn default() -> Self {
        Self::new(InMemoryRecordStore::new())
    }
}

impl<S: RecordStore> BestEffortCatalog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn records(&self) -> Result<Vec<BestEffortRecord>> {
        self.store.list()
    }

    pub fn record(&self, distance: StandardDistance) -> Result<Option<BestEffortRecord>> {
        self.store.get(distance)
    }

    /// Clears every record and rebuilds the catalog from `workouts`.
    ///
    /// Workouts are evaluated in parallel; per distance the fastest candidate
    /// wins, ties going to the workout listed first.
    pub fn recompute_all(&self, workouts: &[Workout]) -> Result<RecomputeReport> {
        self.store.clear()?;

        let prepared: Vec<WorkoutEfforts> =
            workouts.par_iter().map(WorkoutEfforts::prepare).collect();
        let mut report = RecomputeReport {
            workouts_scanned: workouts.len(),
            workouts_without_source: prepared.iter().filter(|p| !p.has_source()).count(),
            ..Default::default()
        };

        for distance in StandardDistance::ALL.into_iter().rev() {
            let target = distance.meters();
            let best = workouts
                .par_iter()
                .zip(prepared.par_iter())
                .enumerate()
                .filter(|(_, (workout, _))| workout.distance_meters >= target)
                .filter_map(|(workout_index, (_, efforts))| {
                    efforts.fastest(target).map(|window| Candidate {
                        workout_index,
                        window,
                    })
                })
                .reduce_with(Candidate::faster_of);

            let Some(best) = best else {
                debug!("No qualifying workout for {distance}");
                continue;
            };

            let record = BestEffortRecord::new(
                distance,
                best.window.duration_seconds,
                &workouts[best.workout_index],
                best.window.method,
            );
            info!(
                "Best {distance}: {:.1}s from workout {}",
                record.time_seconds, record.source_workout_id
            );
            self.store.put(record.clone())?;
            report.records.push(record);
        }

        info!(
            "Recomputed best efforts: {} records from {} workouts ({} without usable data)",
            report.records.len(),
            report.workouts_scanned,
            report.workouts_without_source
        );
        Ok(report)
    }

    /// Folds one new workout into the catalog. Distances the workout is too
    /// short for are not touched.
    pub fn update_for_workout(&self, workout: &Workout) -> Result<Vec<RecordChange>> {
        let efforts = WorkoutEfforts::prepare(workout);
        let mut changes = Vec::new();

        for distance in StandardDistance::reachable(workout.distance_meters) {
            let Some(window) = efforts.fastest(distance.meters()) else {
                debug!("Workout {} has no {distance} effort", workout.id);
                continue;
            };

            let candidate = BestEffortRecord::new(
                distance,
                window.duration_seconds,
                workout,
                window.method,
            );
            let change = self.store.replace_if_faster(candidate)?;
            match &change {
                RecordChange::Created(r) => {
                    info!(
                        "First {distance} record: {:.1}s from workout {}",
                        r.time_seconds, workout.id
                    );
                }
                RecordChange::Improved { previous, current } => {
                    info!(
                        "Workout {} beat {distance}: {:.1}s < {:.1}s",
                        workout.id, current.time_seconds, previous.time_seconds
                    );
                }
                RecordChange::Kept {
                    existing,
                    candidate_seconds,
                } => {
                    debug!(
                        "Workout {} did not beat {distance}: {candidate_seconds:.1}s >= {:.1}s",
                        workout.id, existing.time_seconds
                    );
                }
            }
            changes.push(change);
        }

        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExtractionMethod, TimeSeriesPoint};
    use time::OffsetDateTime;

    /// Constant-pace workout sampled every 100 m.
    fn workout(distance: f64, seconds_per_km: f64) -> Workout {
        let steps = (distance / 100.0).round() as i64;
        let per_step = seconds_per_km / 10.0;
        let series = (0..=steps)
            .map(|i| {
                TimeSeriesPoint::new((i as f64 * per_step).round() as i64, Some(i as f64 * 100.0))
            })
            .collect();
        Workout::new(distance, distance / 1000.0 * seconds_per_km, OffsetDateTime::now_utc())
            .with_time_series(series)
    }

    fn sample_record(distance: StandardDistance) -> BestEffortRecord {
        BestEffortRecord::new(distance, 1.0, &workout(500.0, 300.0), ExtractionMethod::TimeSeries)
    }

    struct FailingStore;

    impl RecordStore for FailingStore {
        fn get(&self, _: StandardDistance) -> Result<Option<BestEffortRecord>> {
            Err(AnalyticsError::store("offline"))
        }
        fn list(&self) -> Result<Vec<BestEffortRecord>> {
            Err(AnalyticsError::store("offline"))
        }
        fn clear(&self) -> Result<()> {
            Err(AnalyticsError::store("offline"))
        }
        fn put(&self, _: BestEffortRecord) -> Result<()> {
            Err(AnalyticsError::store("offline"))
        }
        fn replace_if_faster(&self, _: BestEffortRecord) -> Result<RecordChange> {
            Err(AnalyticsError::store("offline"))
        }
    }

    #[test]
    fn test_replace_if_faster_tie_keeps_existing() {
        let store = InMemoryRecordStore::new();
        let first = sample_record(StandardDistance::Km1);
        let mut tie = sample_record(StandardDistance::Km1);
        tie.source_workout_id = uuid::Uuid::new_v4();

        assert!(matches!(
            store.replace_if_faster(first.clone()).unwrap(),
            RecordChange::Created(_)
        ));
        let change = store.replace_if_faster(tie).unwrap();
        assert!(!change.is_write());
        assert_eq!(store.get(StandardDistance::Km1).unwrap(), Some(first));
    }

    #[test]
    fn test_recompute_keeps_fastest() {
        let workouts = vec![workout(5000.0, 300.0), workout(5000.0, 240.0), workout(1000.0, 180.0)];
        let catalog = BestEffortCatalog::default();
        let report = catalog.recompute_all(&workouts).unwrap();

        let five_k = catalog.record(StandardDistance::Km5).unwrap().unwrap();
        assert_eq!(five_k.time_seconds, 1200.0);
        assert_eq!(five_k.source_workout_id, workouts[1].id);

        let one_k = catalog.record(StandardDistance::Km1).unwrap().unwrap();
        assert_eq!(one_k.time_seconds, 180.0);
        assert_eq!(one_k.source_workout_id, workouts[2].id);

        assert!(catalog.record(StandardDistance::Km10).unwrap().is_none());
        // 400m, 1/2 mile, 1K, 1 mile, 2 mile, 5K
        assert_eq!(report.records.len(), 6);
        assert_eq!(report.records[0].distance, StandardDistance::Km5);
    }

    #[test]
    fn test_recompute_tie_goes_to_first_workout() {
        let workouts = vec![workout(2000.0, 300.0), workout(2000.0, 300.0)];
        let catalog = BestEffortCatalog::default();
        catalog.recompute_all(&workouts).unwrap();
        for record in catalog.records().unwrap() {
            assert_eq!(record.source_workout_id, workouts[0].id);
        }
    }

    #[test]
    fn test_recompute_clears_stale_records() {
        let catalog = BestEffortCatalog::default();
        catalog.update_for_workout(&workout(10000.0, 200.0)).unwrap();
        assert!(catalog.record(StandardDistance::Km10).unwrap().is_some());

        catalog.recompute_all(&[workout(1000.0, 300.0)]).unwrap();
        assert!(catalog.record(StandardDistance::Km10).unwrap().is_none());
        assert_eq!(catalog.records().unwrap().len(), 3);
    }

    #[test]
    fn test_recompute_skips_unusable_workouts() {
        let broken = Workout::new(5000.0, 1500.0, OffsetDateTime::now_utc()).with_route("[]");
        let workouts = vec![broken, workout(5000.0, 300.0)];
        let catalog = BestEffortCatalog::default();
        let report = catalog.recompute_all(&workouts).unwrap();
        assert_eq!(report.workouts_without_source, 1);
        let five_k = catalog.record(StandardDistance::Km5).unwrap().unwrap();
        assert_eq!(five_k.source_workout_id, workouts[1].id);
    }

    #[test]
    fn test_update_reports_changes() {
        let catalog = BestEffortCatalog::default();
        let changes = catalog.update_for_workout(&workout(1000.0, 300.0)).unwrap();
        assert_eq!(changes.len(), 3);
        assert!(changes.iter().all(|c| matches!(c, RecordChange::Created(_))));

        let changes = catalog.update_for_workout(&workout(1000.0, 250.0)).unwrap();
        assert!(changes.iter().all(|c| matches!(c, RecordChange::Improved { .. })));

        let changes = catalog.update_for_workout(&workout(1000.0, 400.0)).unwrap();
        assert!(changes.iter().all(|c| !c.is_write()));
        assert_eq!(
            catalog.record(StandardDistance::Km1).unwrap().unwrap().time_seconds,
            250.0
        );
    }

    #[test]
    fn test_concurrent_updates_keep_fastest() {
        let catalog = BestEffortCatalog::default();
        let workouts: Vec<Workout> = (0..16)
            .map(|i| workout(2000.0, 400.0 - i as f64 * 10.0))
            .collect();

        std::thread::scope(|scope| {
            for w in &workouts {
                let catalog = &catalog;
                scope.spawn(move || catalog.update_for_workout(w).unwrap());
            }
        });

        let record = catalog.record(StandardDistance::Km1).unwrap().unwrap();
        assert_eq!(record.time_seconds, 250.0);
        assert_eq!(record.source_workout_id, workouts[15].id);
    }

    #[test]
    fn test_store_failure_propagates() {
        let catalog = BestEffortCatalog::new(FailingStore);
        let err = catalog.update_for_workout(&workout(1000.0, 300.0)).unwrap_err();
        assert!(err.is_store());
        assert!(catalog.recompute_all(&[]).unwrap_err().is_store());
    }
}
