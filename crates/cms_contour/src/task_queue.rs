//! Task queue for batch contouring.
//!
//! Following the IStage pattern: Enqueue → Tick → Completions
//!
//! Independent volumes run in parallel on rayon. Cancellation is cooperative:
//! the token is checked before each volume starts, and a build that has
//! started always runs to completion or fault.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use web_time::Instant;

use crate::{contour, ContourConfig, ContourError, MeshOutput, VolumeGrid};

/// Shared cancellation flag for a [`ContourStage`].
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
  pub fn new() -> Self {
    Self::default()
  }

  /// Request cancellation of every request not yet started.
  pub fn cancel(&self) {
    self.0.store(true, Ordering::Release);
  }

  /// Clear a previous cancellation.
  pub fn reset(&self) {
    self.0.store(false, Ordering::Release);
  }

  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::Acquire)
  }
}

/// Request to contour one volume.
#[derive(Clone)]
pub struct ContourRequest {
  /// Unique identifier for this request
  pub id: u64,
  /// Input volume
  pub volume: Arc<VolumeGrid>,
  /// Contouring configuration
  pub config: ContourConfig,
}

/// How a request finished.
#[derive(Debug)]
pub enum ContourOutcome {
  Mesh(MeshOutput),
  Failed(ContourError),
  /// Cancelled before the build started.
  Cancelled,
}

impl ContourOutcome {
  /// The mesh, if the build succeeded.
  pub fn mesh(&self) -> Option<&MeshOutput> {
    match self {
      ContourOutcome::Mesh(output) => Some(output),
      _ => None,
    }
  }

  pub fn is_cancelled(&self) -> bool {
    matches!(self, ContourOutcome::Cancelled)
  }
}

/// Completed contouring result.
#[derive(Debug)]
pub struct ContourCompletion {
  /// Request ID this completion corresponds to
  pub id: u64,
  pub outcome: ContourOutcome,
  /// Raw contouring time in microseconds (0 when cancelled)
  pub contour_time_us: u64,
}

/// Contouring stage that processes requests in parallel.
pub struct ContourStage {
  /// Pending requests waiting to be processed
  pending: Vec<ContourRequest>,
  /// Completed results ready to be collected
  completed: Vec<ContourCompletion>,
  /// Next request ID
  next_id: u64,
  cancel: CancelToken,
}

impl Default for ContourStage {
  fn default() -> Self {
    Self::new()
  }
}

impl ContourStage {
  pub fn new() -> Self {
    Self {
      pending: Vec::new(),
      completed: Vec::new(),
      next_id: 0,
      cancel: CancelToken::new(),
    }
  }

  /// Token that cancels requests of this stage from any thread.
  pub fn cancel_handle(&self) -> CancelToken {
    self.cancel.clone()
  }

  /// Enqueue a contouring request, returning the assigned ID.
  pub fn enqueue(&mut self, volume: impl Into<Arc<VolumeGrid>>, config: ContourConfig) -> u64 {
    let id = self.next_id;
    self.next_id += 1;

    self.pending.push(ContourRequest {
      id,
      volume: volume.into(),
      config,
    });

    id
  }

  /// Process pending requests in parallel and move completions to output.
  /// Returns the number of requests processed this tick, cancelled ones
  /// included.
  pub fn tick(&mut self) -> usize {
    if self.pending.is_empty() {
      return 0;
    }

    let requests = std::mem::take(&mut self.pending);
    let count = requests.len();

    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("contour_stage::tick", requests = count).entered();

    let cancel = &self.cancel;
    let completions: Vec<ContourCompletion> = requests
      .into_par_iter()
      .map(|req| run_request(req, cancel))
      .collect();

    self.completed.extend(completions);
    count
  }

  /// Take all completed results.
  pub fn drain_completions(&mut self) -> Vec<ContourCompletion> {
    std::mem::take(&mut self.completed)
  }

  /// Number of pending requests.
  pub fn pending_count(&self) -> usize {
    self.pending.len()
  }

  /// Number of completed results waiting to be drained.
  pub fn completed_count(&self) -> usize {
    self.completed.len()
  }

  /// True when no work remains.
  pub fn is_idle(&self) -> bool {
    self.pending.is_empty() && self.completed.is_empty()
  }
}

fn run_request(req: ContourRequest, cancel: &CancelToken) -> ContourCompletion {
  if cancel.is_cancelled() {
    return ContourCompletion {
      id: req.id,
      outcome: ContourOutcome::Cancelled,
      contour_time_us: 0,
    };
  }

  let start = Instant::now();
  let outcome = match contour::generate(&req.volume, &req.config) {
    Ok(output) => ContourOutcome::Mesh(output),
    Err(err) => {
      #[cfg(feature = "tracing")]
      tracing::warn!(id = req.id, stage = %err.stage(), error = %err, "contouring failed");
      ContourOutcome::Failed(err)
    }
  };
  let contour_time_us = start.elapsed().as_micros() as u64;

  ContourCompletion {
    id: req.id,
    outcome,
    contour_time_us,
  }
}

#[cfg(test)]
#[path = "task_queue_test.rs"]
mod task_queue_test;
