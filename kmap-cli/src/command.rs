// Copyright (c) The kmap-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::{Parser, ValueEnum};
use color_eyre::{eyre::eyre, Result};
use kmap_min::{
    minimize, LogicFunction, MinimizationResult, MinimizeOptions, Minterm, OptimizationLevel,
    Polarity,
};
use std::time::Duration;

#[derive(Debug, Parser)]
#[clap(name = "kmap-cli", about = "Exact two-level minimization of Boolean functions")]
pub struct KmapApp {
    #[clap(subcommand)]
    command: KmapCommand,
}

#[derive(Debug, Parser)]
pub enum KmapCommand {
    /// Minimize a function given by its on-set (or off-set) minterms.
    Minimize {
        /// Number of input variables, 2 to 15.
        #[clap(long, short)]
        n_vars: u8,
        /// On-set minterms, e.g. `--ones 0,2,5,7`.
        #[clap(long, value_delimiter = ',', conflicts_with = "maxterms")]
        ones: Vec<Minterm>,
        /// Off-set maxterms; selects maxterm polarity instead of `--ones`.
        #[clap(long, value_delimiter = ',')]
        maxterms: Vec<Minterm>,
        /// Don't-care points.
        #[clap(long, value_delimiter = ',')]
        dont_cares: Vec<Minterm>,
        /// Variable names, most significant first. Missing names default
        /// to A..O.
        #[clap(long, value_delimiter = ',')]
        names: Vec<String>,
        #[clap(long, default_value = "F")]
        output: String,
        /// Skip the Product-of-Sums pass.
        #[clap(long)]
        no_pos: bool,
        /// Skip the human-readable step trace.
        #[clap(long)]
        no_steps: bool,
        /// Abort with a partial result after this many milliseconds.
        #[clap(long)]
        deadline_ms: Option<u64>,
        #[clap(long, value_enum, default_value_t = LevelArg::Auto)]
        opt_level: LevelArg,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LevelArg {
    Auto,
    Small,
    Large,
}

impl From<LevelArg> for OptimizationLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Auto => OptimizationLevel::Auto,
            LevelArg::Small => OptimizationLevel::Small,
            LevelArg::Large => OptimizationLevel::Large,
        }
    }
}

impl KmapApp {
    pub fn exec(self) -> Result<()> {
        self.command.exec()
    }
}

impl KmapCommand {
    pub fn exec(self) -> Result<()> {
        match self {
            Self::Minimize {
                n_vars,
                ones,
                maxterms,
                dont_cares,
                names,
                output,
                no_pos,
                no_steps,
                deadline_ms,
                opt_level,
            } => {
                let function = if !maxterms.is_empty() {
                    LogicFunction::from_maxterms(n_vars, maxterms, dont_cares)
                } else {
                    LogicFunction::new(n_vars, ones, dont_cares)
                }
                .map_err(color_eyre::Report::new)?;

                let mut options = MinimizeOptions {
                    output_name: output,
                    compute_pos: !no_pos,
                    emit_steps: !no_steps,
                    deadline: deadline_ms.map(Duration::from_millis),
                    optimization_level: opt_level.into(),
                    ..Default::default()
                };
                if !names.is_empty() {
                    options.variable_names = names;
                }

                let result = minimize(&function, &options)
                    .map_err(|err| eyre!("{}", err))?;
                print_result(&function, &options, &result);
                Ok(())
            }
        }
    }
}

fn print_result(function: &LogicFunction, options: &MinimizeOptions, result: &MinimizationResult) {
    let name = &options.output_name;
    println!("{} = {}", name, result.minimal_sop);
    if let Some(pos) = &result.minimal_pos {
        println!("{} = {}", name, pos);
    }
    println!("canonical: {} = {}", name, result.canonical_sop);
    println!("canonical: {} = {}", name, result.canonical_pos);

    println!("\nprime implicants:");
    let mut names = options.variable_names.clone();
    for (ix, default) in kmap_min::DEFAULT_VARIABLE_NAMES.iter().enumerate() {
        if names.len() <= ix {
            names.push(default.to_string());
        }
    }
    for pi in &result.prime_implicants {
        println!(
            "  {}  {}{}  covers {:?}",
            pi.cube.binary_display(function.n_vars()),
            pi.cube
                .algebraic_display(function.n_vars(), &names, Polarity::Sop),
            if pi.essential { "  (essential)" } else { "" },
            pi.covers,
        );
    }

    if !result.groups.is_empty() {
        println!("\ngroups:");
        for group in &result.groups {
            println!("  color {:>3}: {:?}", group.color_index, group.cells);
        }
    }

    if !result.steps.is_empty() {
        println!("\nsteps:");
        for step in &result.steps {
            println!("  {}", step);
        }
    }

    let t = &result.timings;
    println!(
        "\ntimings: primes {:?}, chart {:?}, cover {:?}, render {:?}, total {:?}",
        t.primes, t.chart, t.cover, t.render, t.total
    );
    let c = &result.counts;
    println!(
        "counts: {} minterms, {} primes ({} essential), {} selected, {} nodes, level {:?}",
        c.minterms, c.prime_implicants, c.essential, c.selected, c.bb_nodes, c.optimization_level
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimize() {
        let app = KmapApp::try_parse_from([
            "kmap-cli",
            "minimize",
            "--n-vars",
            "3",
            "--ones",
            "0,2,5,7",
            "--no-steps",
        ])
        .unwrap();
        let KmapApp {
            command:
                KmapCommand::Minimize {
                    n_vars,
                    ones,
                    no_steps,
                    opt_level,
                    ..
                },
        } = app;
        assert_eq!(n_vars, 3);
        assert_eq!(ones, vec![0, 2, 5, 7]);
        assert!(no_steps);
        assert_eq!(opt_level, LevelArg::Auto);
    }

    #[test]
    fn test_ones_conflict_with_maxterms() {
        let parsed = KmapApp::try_parse_from([
            "kmap-cli",
            "minimize",
            "--n-vars",
            "3",
            "--ones",
            "1",
            "--maxterms",
            "0",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_exec_end_to_end() {
        let app = KmapApp::try_parse_from([
            "kmap-cli",
            "minimize",
            "--n-vars",
            "2",
            "--ones",
            "0,1,2,3",
        ])
        .unwrap();
        app.exec().unwrap();
    }
}
