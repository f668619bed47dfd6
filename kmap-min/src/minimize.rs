// Copyright (c) The kmap-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::cancel::CancelToken;
use crate::chart::PiChart;
use crate::cover::{solve_cover, ReductionCadence, SolveError};
use crate::cube::Cube;
use crate::errors::MinimizeError;
use crate::logic_function::LogicFunction;
use crate::primes::{prime_implicants, PrimeGeneration, PrimeImplicant};
use crate::render::{self, KmapGroup};
use crate::trace::StepTrace;
use log::debug;
use std::time::{Duration, Instant};

/// Default variable names, first name bound to the most significant bit.
pub const DEFAULT_VARIABLE_NAMES: [&str; 15] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O",
];

pub const DEFAULT_OUTPUT_NAME: &str = "F";

/// Search tuning knob. Every level is exact; the resolved level only sets
/// how much dominance reduction reruns inside branch-and-bound nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OptimizationLevel {
    /// Resolve by problem size: `Small` for up to 10 variables.
    #[default]
    Auto,
    Small,
    Large,
}

impl OptimizationLevel {
    pub fn resolve(self, n_vars: u8) -> OptimizationLevel {
        match self {
            OptimizationLevel::Auto => {
                if n_vars <= 10 {
                    OptimizationLevel::Small
                } else {
                    OptimizationLevel::Large
                }
            }
            other => other,
        }
    }

    fn cadence(self) -> ReductionCadence {
        match self {
            OptimizationLevel::Large => ReductionCadence::EssentialsOnly,
            _ => ReductionCadence::EveryNode,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MinimizeOptions {
    /// Up to `n_vars` names; missing positions fall back to
    /// [`DEFAULT_VARIABLE_NAMES`].
    pub variable_names: Vec<String>,
    pub output_name: String,
    pub compute_pos: bool,
    pub emit_steps: bool,
    pub deadline: Option<Duration>,
    pub optimization_level: OptimizationLevel,
}

impl Default for MinimizeOptions {
    fn default() -> Self {
        Self {
            variable_names: DEFAULT_VARIABLE_NAMES.iter().map(|s| s.to_string()).collect(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            compute_pos: true,
            emit_steps: true,
            deadline: None,
            optimization_level: OptimizationLevel::Auto,
        }
    }
}

/// Wall-clock spent in each pipeline stage. `pos` is `None` when the POS
/// pass was skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StageTimings {
    pub input: Duration,
    pub primes: Duration,
    pub chart: Duration,
    pub cover: Duration,
    pub render: Duration,
    pub pos: Option<Duration>,
    pub total: Duration,
}

/// Size counters of the primary (SOP) pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageCounts {
    pub minterms: usize,
    pub dont_cares: usize,
    pub prime_implicants: usize,
    pub essential: usize,
    pub selected: usize,
    pub generations: usize,
    pub bb_nodes: u64,
    /// The level actually used, never `Auto`.
    pub optimization_level: OptimizationLevel,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MinimizationResult {
    /// Every prime implicant, canonically ordered, with essentiality marks.
    pub prime_implicants: Vec<PrimeImplicant>,
    /// The minimum cover, canonically ordered by `(mask, value)`.
    pub selected: Vec<Cube>,
    pub minimal_sop: String,
    /// `None` iff POS computation was disabled.
    pub minimal_pos: Option<String>,
    pub canonical_sop: String,
    pub canonical_pos: String,
    pub groups: Vec<KmapGroup>,
    pub steps: Vec<String>,
    pub timings: StageTimings,
    pub counts: StageCounts,
    /// False only on a partial result carried by a cancellation error.
    pub minimum: bool,
}

/// Runs the full pipeline with a deadline taken from `options`.
pub fn minimize(
    function: &LogicFunction,
    options: &MinimizeOptions,
) -> Result<MinimizationResult, MinimizeError> {
    let cancel = match options.deadline {
        Some(deadline) => CancelToken::with_deadline(deadline),
        None => CancelToken::new(),
    };
    minimize_with_token(function, options, &cancel)
}

/// Runs the full pipeline polling an externally owned token: prime
/// generation, chart construction, exact covering, rendering, and (unless
/// disabled) the dual POS pass over the complement function.
pub fn minimize_with_token(
    function: &LogicFunction,
    options: &MinimizeOptions,
    cancel: &CancelToken,
) -> Result<MinimizationResult, MinimizeError> {
    let total_start = Instant::now();
    let level = options.optimization_level.resolve(function.n_vars());
    let names = resolve_names(options, function.n_vars());
    let mut trace = StepTrace::new(options.emit_steps);
    let input_time = total_start.elapsed();

    let pass = match cover_pass(function, level.cadence(), cancel, &mut trace) {
        Ok(pass) => pass,
        Err(PassError::Fatal(err)) => return Err(err),
        Err(PassError::Cancelled { partial: None }) => {
            return Err(MinimizeError::Cancelled { partial: None });
        }
        Err(PassError::Cancelled { partial: Some(pass) }) => {
            let result = assemble_result(AssembleInput {
                function,
                names: &names,
                pass,
                minimal_pos: None,
                pos_time: None,
                trace,
                level,
                input_time,
                total_start,
                minimum: false,
            });
            return Err(MinimizeError::Cancelled {
                partial: Some(Box::new(result)),
            });
        }
    };

    let mut minimal_pos = None;
    let mut pos_time = None;
    if options.compute_pos {
        let pos_start = Instant::now();
        let complement = function.complement();
        let mut pos_trace = StepTrace::new(options.emit_steps);
        match cover_pass(&complement, level.cadence(), cancel, &mut pos_trace) {
            Ok(pos_pass) => {
                let pos_selected: Vec<Cube> = pos_pass
                    .selected_rows
                    .iter()
                    .map(|&row| pos_pass.primes[row].cube)
                    .collect();
                minimal_pos = Some(render::pos_expression(
                    &pos_selected,
                    function.n_vars(),
                    &names,
                ));
                pos_time = Some(pos_start.elapsed());
                trace.extend_prefixed("POS: ", pos_trace);
            }
            Err(PassError::Fatal(err)) => return Err(err),
            Err(PassError::Cancelled { .. }) => {
                // The SOP side finished; hand it back as the partial result.
                let result = assemble_result(AssembleInput {
                    function,
                    names: &names,
                    pass,
                    minimal_pos: None,
                    pos_time: None,
                    trace,
                    level,
                    input_time,
                    total_start,
                    minimum: false,
                });
                return Err(MinimizeError::Cancelled {
                    partial: Some(Box::new(result)),
                });
            }
        }
    }

    let result = assemble_result(AssembleInput {
        function,
        names: &names,
        pass,
        minimal_pos,
        pos_time,
        trace,
        level,
        input_time,
        total_start,
        minimum: true,
    });
    debug!(
        "minimized {} minterms: {} primes, {} selected, {} nodes",
        result.counts.minterms,
        result.counts.prime_implicants,
        result.counts.selected,
        result.counts.bb_nodes
    );
    Ok(result)
}

fn resolve_names(options: &MinimizeOptions, n_vars: u8) -> Vec<String> {
    let n = usize::from(n_vars);
    let mut names: Vec<String> = options.variable_names.iter().take(n).cloned().collect();
    for ix in names.len()..n {
        names.push(DEFAULT_VARIABLE_NAMES[ix].to_string());
    }
    names
}

/// One generate-chart-solve pass over a function; used once for SOP and
/// once over the complement for POS.
struct PassOutput {
    primes: Vec<PrimeImplicant>,
    selected_rows: Vec<usize>,
    generations: usize,
    nodes: u64,
    essential_count: usize,
    primes_time: Duration,
    chart_time: Duration,
    cover_time: Duration,
}

enum PassError {
    Fatal(MinimizeError),
    Cancelled { partial: Option<PassOutput> },
}

fn cover_pass(
    function: &LogicFunction,
    cadence: ReductionCadence,
    cancel: &CancelToken,
    trace: &mut StepTrace,
) -> Result<PassOutput, PassError> {
    let stage_start = Instant::now();
    let PrimeGeneration { primes: mut primes_list, generations } =
        prime_implicants(function, cancel, trace).map_err(|err| match err {
            MinimizeError::Cancelled { .. } => PassError::Cancelled { partial: None },
            other => PassError::Fatal(other),
        })?;
    let primes_time = stage_start.elapsed();

    let stage_start = Instant::now();
    let chart = PiChart::build(&mut primes_list, function).map_err(PassError::Fatal)?;
    let chart_time = stage_start.elapsed();
    let essential_count = primes_list.iter().filter(|pi| pi.essential).count();
    trace.push(|| format!("Identified {} essential prime implicants", essential_count));

    let stage_start = Instant::now();
    match solve_cover(&chart, cadence, cancel, trace) {
        Ok(report) => Ok(PassOutput {
            primes: primes_list,
            selected_rows: report.solution.rows,
            generations,
            nodes: report.nodes,
            essential_count,
            primes_time,
            chart_time,
            cover_time: stage_start.elapsed(),
        }),
        Err(SolveError::Cancelled { best }) => Err(PassError::Cancelled {
            partial: best.map(|solution| PassOutput {
                primes: primes_list,
                selected_rows: solution.rows,
                generations,
                nodes: 0,
                essential_count,
                primes_time,
                chart_time,
                cover_time: stage_start.elapsed(),
            }),
        }),
        Err(SolveError::Infeasible { message }) => {
            Err(PassError::Fatal(MinimizeError::Internal { message }))
        }
    }
}

struct AssembleInput<'a> {
    function: &'a LogicFunction,
    names: &'a [String],
    pass: PassOutput,
    minimal_pos: Option<String>,
    pos_time: Option<Duration>,
    trace: StepTrace,
    level: OptimizationLevel,
    input_time: Duration,
    total_start: Instant,
    minimum: bool,
}

fn assemble_result(input: AssembleInput<'_>) -> MinimizationResult {
    let AssembleInput {
        function,
        names,
        pass,
        minimal_pos,
        pos_time,
        trace,
        level,
        input_time,
        total_start,
        minimum,
    } = input;

    let stage_start = Instant::now();
    // Selected rows arrive sorted, so selection output follows the
    // canonical (mask, value) order.
    let selected_pis: Vec<&PrimeImplicant> =
        pass.selected_rows.iter().map(|&row| &pass.primes[row]).collect();
    let selected: Vec<Cube> = selected_pis.iter().map(|pi| pi.cube).collect();
    let minimal_sop = render::sop_expression(&selected, function.n_vars(), names);
    let canonical_sop = render::canonical_sop(function);
    let canonical_pos = render::canonical_pos(function);
    let groups = render::kmap_groups(&selected_pis);
    let render_time = stage_start.elapsed();

    let counts = StageCounts {
        minterms: function.ones().len(),
        dont_cares: function.dont_cares().len(),
        prime_implicants: pass.primes.len(),
        essential: pass.essential_count,
        selected: selected.len(),
        generations: pass.generations,
        bb_nodes: pass.nodes,
        optimization_level: level,
    };
    let timings = StageTimings {
        input: input_time,
        primes: pass.primes_time,
        chart: pass.chart_time,
        cover: pass.cover_time,
        render: render_time,
        pos: pos_time,
        total: total_start.elapsed(),
    };

    MinimizationResult {
        prime_implicants: pass.primes,
        selected,
        minimal_sop,
        minimal_pos,
        canonical_sop,
        canonical_pos,
        groups,
        steps: trace.into_entries(),
        timings,
        counts,
        minimum,
    }
}
