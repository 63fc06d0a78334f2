//! Background terrain generation on a worker pool.
//!
//! Synthesis and erosion scale with `iterations × width × depth` and are too
//! slow for an interactive thread. [`BackgroundGenerator`] runs whole jobs on
//! worker threads and hands finished terrain back through a bounded channel.
//!
//! Cancellation is coarse: a cancelled job is skipped if it has not started
//! and its result is discarded if it has. A running job is never interrupted.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};
use dashmap::DashMap;
use strata_heightfield::HeightFieldError;

use crate::erosion::{ErosionPipeline, ErosionReport};
use crate::synthesis::{SynthesisOutput, SynthesisParams, TerrainSynthesizer};

/// Caller-chosen identifier for a generation job.
pub type JobId = u64;

/// A request to synthesize (and optionally erode) one terrain.
#[derive(Clone, Debug)]
pub struct GenerationJob {
    /// Identifier used for cancellation and to match results.
    pub id: JobId,
    /// Synthesis parameters.
    pub params: SynthesisParams,
    /// Erosion to run after synthesis, if any.
    pub erosion: Option<ErosionPipeline>,
}

/// A finished job.
#[derive(Debug)]
pub struct GeneratedTerrain {
    /// The id of the originating job.
    pub id: JobId,
    /// Synthesized (and eroded) terrain.
    pub output: SynthesisOutput,
    /// Erosion bookkeeping, if erosion ran.
    pub erosion: Option<ErosionReport>,
    /// Wall time spent on the job, in microseconds.
    pub generation_time_us: u64,
}

/// Errors from submitting a job.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The job queue is at capacity.
    #[error("generation queue full, job {0} rejected")]
    QueueFull(JobId),

    /// The job's parameters cannot produce a height field.
    #[error("invalid parameters for job {id}: {source}")]
    InvalidParams {
        /// The rejected job.
        id: JobId,
        /// Why the parameters are invalid.
        #[source]
        source: HeightFieldError,
    },

    /// All worker threads have exited.
    #[error("generation workers are gone")]
    Disconnected,
}

struct QueuedJob {
    job: GenerationJob,
    cancelled: Arc<AtomicBool>,
}

/// Runs [`GenerationJob`]s on a fixed pool of worker threads.
pub struct BackgroundGenerator {
    job_sender: Sender<QueuedJob>,
    result_receiver: Receiver<GeneratedTerrain>,
    active_jobs: Arc<DashMap<JobId, Arc<AtomicBool>>>,
    in_flight: Arc<AtomicU64>,
}

impl BackgroundGenerator {
    /// Spawn `thread_count` workers.
    ///
    /// `max_queued` bounds pending jobs; `result_capacity` bounds finished
    /// results waiting to be drained.
    pub fn new(thread_count: usize, max_queued: usize, result_capacity: usize) -> Self {
        let (job_sender, job_receiver) = bounded::<QueuedJob>(max_queued.max(1));
        let (result_sender, result_receiver) = bounded::<GeneratedTerrain>(result_capacity.max(1));
        let in_flight = Arc::new(AtomicU64::new(0));
        let active_jobs: Arc<DashMap<JobId, Arc<AtomicBool>>> = Arc::new(DashMap::new());

        for worker in 0..thread_count.max(1) {
            let receiver = job_receiver.clone();
            let sender = result_sender.clone();
            let in_flight = Arc::clone(&in_flight);
            let active_jobs = Arc::clone(&active_jobs);

            std::thread::Builder::new()
                .name(format!("terrain-gen-{worker}"))
                .spawn(move || {
                    while let Ok(queued) = receiver.recv() {
                        if queued.cancelled.load(Ordering::Relaxed) {
                            tracing::debug!(job = queued.job.id, "skipping cancelled job");
                            in_flight.fetch_sub(1, Ordering::Relaxed);
                            continue;
                        }

                        let result = run_job(&queued.job);

                        match result {
                            Ok(terrain) if !queued.cancelled.load(Ordering::Relaxed) => {
                                let _ = sender.send(terrain);
                            }
                            Ok(_) => {
                                tracing::debug!(job = queued.job.id, "discarding cancelled result");
                            }
                            Err(err) => {
                                active_jobs.remove(&queued.job.id);
                                tracing::error!(job = queued.job.id, %err, "terrain generation failed");
                            }
                        }

                        in_flight.fetch_sub(1, Ordering::Relaxed);
                    }
                })
                .expect("failed to spawn terrain generation worker");
        }

        Self {
            job_sender,
            result_receiver,
            active_jobs,
            in_flight,
        }
    }

    /// A pool sized to the machine, leaving two cores for the host.
    pub fn with_defaults() -> Self {
        let cpus = num_cpus::get().max(2);
        Self::new((cpus - 2).max(1), 16, 16)
    }

    /// Queue a job.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidParams`] for degenerate resolution or
    /// extent, [`GenerationError::QueueFull`] when at capacity.
    pub fn submit(&self, job: GenerationJob) -> Result<(), GenerationError> {
        validate(&job.params).map_err(|source| GenerationError::InvalidParams {
            id: job.id,
            source,
        })?;

        let id = job.id;
        let cancelled = Arc::new(AtomicBool::new(false));
        self.active_jobs.insert(id, Arc::clone(&cancelled));
        self.in_flight.fetch_add(1, Ordering::Relaxed);

        self.job_sender
            .try_send(QueuedJob { job, cancelled })
            .map_err(|e| {
                self.in_flight.fetch_sub(1, Ordering::Relaxed);
                self.active_jobs.remove(&id);
                if e.is_full() {
                    GenerationError::QueueFull(id)
                } else {
                    GenerationError::Disconnected
                }
            })
    }

    /// Cancel a pending or running job. No-op if it already finished.
    pub fn cancel(&self, id: JobId) {
        if let Some((_, cancelled)) = self.active_jobs.remove(&id) {
            cancelled.store(true, Ordering::Relaxed);
        }
    }

    /// Collect every finished job without blocking.
    pub fn drain_results(&self) -> Vec<GeneratedTerrain> {
        let mut results = Vec::new();
        while let Ok(terrain) = self.result_receiver.try_recv() {
            self.active_jobs.remove(&terrain.id);
            results.push(terrain);
        }
        results
    }

    /// Block until the next job finishes. `None` once all workers are gone.
    pub fn wait_for_result(&self) -> Option<GeneratedTerrain> {
        let terrain = self.result_receiver.recv().ok()?;
        self.active_jobs.remove(&terrain.id);
        Some(terrain)
    }

    /// Jobs queued or executing.
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Returns `true` if `id` is queued or executing and not cancelled.
    pub fn is_pending(&self, id: JobId) -> bool {
        self.active_jobs.contains_key(&id)
    }
}

fn validate(params: &SynthesisParams) -> Result<(), HeightFieldError> {
    if params.width < 2 || params.depth < 2 {
        return Err(HeightFieldError::InvalidResolution {
            width: params.width,
            depth: params.depth,
        });
    }
    let extent_ok = |v: f32| v.is_finite() && v > 0.0;
    if !extent_ok(params.world_width) || !extent_ok(params.world_depth) {
        return Err(HeightFieldError::InvalidExtent {
            world_width: params.world_width,
            world_depth: params.world_depth,
        });
    }
    Ok(())
}

/// Synthesize and erode one job on the calling thread.
pub fn run_job(job: &GenerationJob) -> Result<GeneratedTerrain, HeightFieldError> {
    let start = std::time::Instant::now();
    let synthesizer = TerrainSynthesizer::new(job.params.clone());
    let mut output = synthesizer.generate()?;

    let erosion = job.erosion.as_ref().map(|pipeline| {
        let report = pipeline.run(&mut output.field, job.params.height_scale);
        // Biomes follow the eroded surface.
        if output.climate.is_some() {
            output.climate = Some(synthesizer.climate(&output.field));
        }
        report
    });

    Ok(GeneratedTerrain {
        id: job.id,
        output,
        erosion,
        generation_time_us: start.elapsed().as_micros() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_job(id: JobId) -> GenerationJob {
        GenerationJob {
            id,
            params: SynthesisParams {
                seed: id as u32,
                width: 16,
                depth: 16,
                ..Default::default()
            },
            erosion: None,
        }
    }

    /// Large enough with erosion that a single worker stays busy for a while.
    fn slow_job(id: JobId) -> GenerationJob {
        GenerationJob {
            id,
            params: SynthesisParams {
                seed: id as u32,
                width: 128,
                depth: 128,
                ..Default::default()
            },
            erosion: Some(ErosionPipeline::default()),
        }
    }

    fn wait_until_idle(generator: &BackgroundGenerator) {
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(60);
        while generator.in_flight_count() > 0 {
            assert!(std::time::Instant::now() < deadline, "workers never went idle");
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
    }

    #[test]
    fn test_run_job_matches_direct_synthesis() {
        let job = small_job(3);
        let terrain = run_job(&job).unwrap();
        let direct = TerrainSynthesizer::new(job.params.clone()).generate().unwrap();
        assert_eq!(terrain.output.field, direct.field);
        assert!(terrain.erosion.is_none());
    }

    #[test]
    fn test_run_job_with_erosion_reports_volume() {
        let job = GenerationJob {
            erosion: Some(ErosionPipeline {
                hydraulic_iterations: 5,
                thermal_iterations: 5,
                ..Default::default()
            }),
            ..small_job(4)
        };
        let terrain = run_job(&job).unwrap();
        let report = terrain.erosion.unwrap();
        assert!(report.volume_after.is_finite());
        assert!(terrain.output.climate.is_some());
    }

    #[test]
    fn test_background_job_completes() {
        let generator = BackgroundGenerator::new(1, 4, 4);
        generator.submit(small_job(1)).unwrap();
        let terrain = generator.wait_for_result().expect("worker alive");
        assert_eq!(terrain.id, 1);
        assert_eq!(terrain.output.field.width(), 16);
        assert!(!generator.is_pending(1));
    }

    #[test]
    fn test_background_results_are_deterministic() {
        let generator = BackgroundGenerator::new(2, 4, 4);
        generator.submit(small_job(7)).unwrap();
        let a = generator.wait_for_result().unwrap();
        generator.submit(small_job(7)).unwrap();
        let b = generator.wait_for_result().unwrap();
        assert_eq!(a.output.field, b.output.field);
    }

    #[test]
    fn test_invalid_params_rejected_at_submit() {
        let generator = BackgroundGenerator::new(1, 4, 4);
        let mut job = small_job(9);
        job.params.width = 0;
        let err = generator.submit(job).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidParams { id: 9, .. }));
        assert_eq!(generator.in_flight_count(), 0);
    }

    #[test]
    fn test_cancelled_job_never_delivers() {
        let generator = BackgroundGenerator::new(1, 2, 4);
        generator.submit(slow_job(1)).unwrap();
        generator.submit(small_job(2)).unwrap();
        generator.cancel(2);
        assert!(!generator.is_pending(2));
        assert!(generator.is_pending(1));

        let first = generator.wait_for_result().expect("worker alive");
        assert_eq!(first.id, 1);
        assert!(first.erosion.is_some());

        wait_until_idle(&generator);
        assert!(generator.drain_results().is_empty());
        assert!(!generator.is_pending(1));
    }

    #[test]
    fn test_full_queue_rejects_and_rolls_back() {
        let generator = BackgroundGenerator::new(1, 1, 4);
        let mut accepted = Vec::new();
        let mut rejected = None;
        // One job runs and one waits; the next submission cannot fit.
        for id in 1..=3 {
            match generator.submit(slow_job(id)) {
                Ok(()) => accepted.push(id),
                Err(err) => {
                    rejected = Some((id, err));
                    break;
                }
            }
        }

        let (id, err) = rejected.expect("queue never filled");
        assert!(matches!(err, GenerationError::QueueFull(rejected_id) if rejected_id == id));
        assert!(!generator.is_pending(id));
        assert_eq!(generator.in_flight_count(), accepted.len() as u64);
        assert!(accepted.iter().all(|&a| generator.is_pending(a)));

        for a in accepted {
            generator.cancel(a);
        }
        wait_until_idle(&generator);
        assert!(generator.drain_results().is_empty());
    }

    #[test]
    fn test_cancel_unknown_job_is_noop() {
        let generator = BackgroundGenerator::new(1, 4, 4);
        generator.cancel(42);
        assert!(!generator.is_pending(42));
        assert!(generator.drain_results().is_empty());
    }
}
