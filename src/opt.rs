//! Stochastic, derivative-free search over ability space.
//!
//! Every evaluation simulates a fresh season, so the error of a candidate is a noisy estimate.
//! The search is a state machine that can be driven one transition at a time with
//! [AttributeSearch::step] or to completion with [AttributeSearch::run]:
//!
//! ```text
//! Init → Iterate → Evaluate → Accept | Reject → Iterate → … → Terminate
//! ```

use std::mem;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::bail;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tinyrand::{Rand, Seeded, Wyrand};
use tracing::{debug, trace};

use crate::ability::AbilityVector;
use crate::loss::{score, ErrorWeights};
use crate::model::OutcomeModel;
use crate::player::TargetStats;
use crate::probs::random_f64;
use crate::season::SeasonSimulator;
use crate::stats::StatsAggregator;

/// How candidates are generated from the incumbent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Proposal {
    /// Offsets every attribute of the incumbent by a uniform amount in `-step..=step`.
    Perturb { step: f64 },
    /// Samples every attribute uniformly within the search bounds.
    Uniform,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub rounds: u64,
    pub proposal: Proposal,
    pub bounds: RangeInclusive<f64>,
    pub candidates_per_round: usize,
    /// Stops early once the best error falls to this level. Zero disables early stopping in
    /// practice, as a noisy evaluation is never exact.
    pub acceptable_error: f64,
}
impl SearchConfig {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if let Proposal::Perturb { step } = self.proposal {
            if !step.is_finite() || step <= 0.0 {
                bail!("perturbation step must be positive");
            }
        }
        if !self.bounds.start().is_finite() || !self.bounds.end().is_finite() {
            bail!("search bounds must be finite");
        }
        if self.bounds.start() >= self.bounds.end() {
            bail!("search bounds {:?} must span a non-empty range", self.bounds);
        }
        if self.candidates_per_round == 0 {
            bail!("at least one candidate must be evaluated per round");
        }
        if !(self.acceptable_error >= 0.0) {
            bail!("acceptable error must be non-negative");
        }
        Ok(())
    }

    /// Ultrafast presets when accuracy is unimportant (e.g., a demo).
    pub fn fast() -> Self {
        Self {
            rounds: 100,
            ..Self::default()
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            rounds: 500,
            proposal: Proposal::Perturb { step: 5.0 },
            bounds: 20.0..=150.0,
            candidates_per_round: 1,
            acceptable_error: 0.0,
        }
    }
}

/// Cooperative cancellation, checked between rounds.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);
impl StopSignal {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Runs a candidate through model → simulator → aggregator → error function.
pub struct Evaluator<'a, S, A> {
    pub model: &'a OutcomeModel,
    pub simulator: &'a S,
    pub aggregator: &'a A,
    pub target: &'a TargetStats,
    pub anchor: AbilityVector,
    pub weights: &'a ErrorWeights,
    pub deviation_penalty: f64,
}
impl<S: SeasonSimulator, A: StatsAggregator> Evaluator<'_, S, A> {
    pub fn evaluate(&self, candidate: &AbilityVector, rand: &mut impl Rand) -> f64 {
        let distribution = self.model.probabilities(candidate, self.target.hbp_rate);
        let counts = self
            .simulator
            .simulate(&distribution, self.target.plate_appearances, rand);
        let simulated = self
            .aggregator
            .aggregate(&counts, self.target.plate_appearances);
        score(
            &simulated,
            self.target,
            candidate,
            &self.anchor,
            self.weights,
            self.deviation_penalty,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub abilities: AbilityVector,
    /// Seeds the random source of this candidate's season, independently of other candidates.
    pub seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub abilities: AbilityVector,
    pub error: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Improvement {
    pub round: u64,
    pub abilities: AbilityVector,
    pub error: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Init,
    Iterate,
    Evaluate(Vec<Candidate>),
    /// The round's best candidate strictly improved on the incumbent and replaced it.
    Accept(Evaluation),
    /// No candidate improved on the incumbent. Holds the round's best admissible evaluation, if any.
    Reject(Option<Evaluation>),
    Terminate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub abilities: AbilityVector,
    pub error: f64,
    pub initial_error: f64,
    pub rounds: u64,
    pub evaluations: u64,
    pub improvements: Vec<Improvement>,
    pub elapsed: Duration,
}

pub struct AttributeSearch<'a, S, A, R> {
    config: &'a SearchConfig,
    evaluator: Evaluator<'a, S, A>,
    rand: &'a mut R,
    stop: StopSignal,
    phase: Phase,
    best: Evaluation,
    initial_error: f64,
    round: u64,
    evaluations: u64,
    improvements: Vec<Improvement>,
    start_time: Instant,
}
impl<'a, S, A, R> AttributeSearch<'a, S, A, R>
where
    S: SeasonSimulator + Sync,
    A: StatsAggregator + Sync,
    R: Rand,
{
    pub fn new(config: &'a SearchConfig, evaluator: Evaluator<'a, S, A>, rand: &'a mut R) -> Self {
        let anchor = evaluator.anchor;
        Self {
            config,
            evaluator,
            rand,
            stop: StopSignal::default(),
            phase: Phase::Init,
            best: Evaluation {
                abilities: anchor,
                error: f64::INFINITY,
            },
            initial_error: f64::INFINITY,
            round: 0,
            evaluations: 0,
            improvements: vec![],
            start_time: Instant::now(),
        }
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn best(&self) -> &Evaluation {
        &self.best
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    /// Performs a single transition of the state machine.
    pub fn step(&mut self) -> &Phase {
        self.phase = match mem::replace(&mut self.phase, Phase::Terminate) {
            Phase::Init => {
                let seed = self.rand.next_u64();
                let anchor = self.best.abilities;
                let error = self.evaluator.evaluate(&anchor, &mut Wyrand::seed(seed));
                self.evaluations += 1;
                self.initial_error = sanitise(error);
                self.best.error = self.initial_error;
                debug!("initial abilities: {anchor}, error: {error:.6}");
                Phase::Iterate
            }
            Phase::Iterate => {
                if self.round >= self.config.rounds
                    || self.stop.is_stopped()
                    || self.best.error <= self.config.acceptable_error
                {
                    Phase::Terminate
                } else {
                    self.round += 1;
                    let candidates = (0..self.config.candidates_per_round)
                        .map(|_| Candidate {
                            abilities: self.propose(),
                            seed: self.rand.next_u64(),
                        })
                        .collect();
                    Phase::Evaluate(candidates)
                }
            }
            Phase::Evaluate(candidates) => {
                let errors = self.evaluate_all(&candidates);
                self.evaluations += candidates.len() as u64;
                let round_best = candidates
                    .iter()
                    .zip(errors)
                    .filter(|(_, error)| admissible(*error))
                    .map(|(candidate, error)| Evaluation {
                        abilities: candidate.abilities,
                        error,
                    })
                    .reduce(|best, next| if next.error < best.error { next } else { best });
                match round_best {
                    Some(evaluation) if evaluation.error < self.best.error => {
                        self.best = evaluation;
                        self.improvements.push(Improvement {
                            round: self.round,
                            abilities: evaluation.abilities,
                            error: evaluation.error,
                        });
                        Phase::Accept(evaluation)
                    }
                    _ => Phase::Reject(round_best),
                }
            }
            Phase::Accept(evaluation) => {
                debug!(
                    "round {}: accepted {}, error: {:.6}",
                    self.round, evaluation.abilities, evaluation.error
                );
                Phase::Iterate
            }
            Phase::Reject(evaluation) => {
                trace!(
                    "round {}: rejected {evaluation:?}, incumbent error: {:.6}",
                    self.round,
                    self.best.error
                );
                Phase::Iterate
            }
            Phase::Terminate => Phase::Terminate,
        };
        &self.phase
    }

    pub fn run(mut self) -> SearchResult {
        while self.phase != Phase::Terminate {
            self.step();
        }
        self.into_result()
    }

    fn into_result(self) -> SearchResult {
        SearchResult {
            abilities: self.best.abilities,
            error: self.best.error,
            initial_error: self.initial_error,
            rounds: self.round,
            evaluations: self.evaluations,
            improvements: self.improvements,
            elapsed: self.start_time.elapsed(),
        }
    }

    fn propose(&mut self) -> AbilityVector {
        let incumbent = self.best.abilities;
        let bounds = &self.config.bounds;
        let rand = &mut *self.rand;
        let candidate = match self.config.proposal {
            Proposal::Perturb { step } => AbilityVector::new(
                incumbent.power + offset(rand, step),
                incumbent.contact + offset(rand, step),
                incumbent.discipline + offset(rand, step),
            ),
            Proposal::Uniform => {
                let (start, range) = (*bounds.start(), bounds.end() - bounds.start());
                AbilityVector::new(
                    start + random_f64(rand) * range,
                    start + random_f64(rand) * range,
                    start + random_f64(rand) * range,
                )
            }
        };
        candidate.clamp(bounds)
    }

    fn evaluate_all(&self, candidates: &[Candidate]) -> Vec<f64> {
        let evaluator = &self.evaluator;
        let evaluate =
            |candidate: &Candidate| evaluator.evaluate(&candidate.abilities, &mut Wyrand::seed(candidate.seed));
        if candidates.len() == 1 {
            candidates.iter().map(evaluate).collect()
        } else {
            candidates.par_iter().map(evaluate).collect()
        }
    }
}

#[inline]
fn offset(rand: &mut impl Rand, step: f64) -> f64 {
    (random_f64(rand) * 2.0 - 1.0) * step
}

/// Errors are sums of weighted squares and non-negative penalties; anything else is rejected.
#[inline]
fn admissible(error: f64) -> bool {
    error.is_finite() && error >= 0.0
}

#[inline]
fn sanitise(error: f64) -> f64 {
    if admissible(error) {
        error
    } else {
        f64::INFINITY
    }
}
