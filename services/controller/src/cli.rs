use clap::{Args, Parser, Subcommand, ValueEnum};
use protocol::config::DEFAULT_OPTIMIZER_TYPE;
use protocol::{CrossoverType, GeneticParams, OptimizeOptions};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Green-wave service controller")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML file with base_url, desired_speed_kmh, log_level and history_dir
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Overrides the service base URL from the config file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Desired travel speed in km/h
    #[arg(long, global = true)]
    pub speed: Option<f64>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check that the service is reachable
    Health,

    /// Check junction structure and cycle lengths without contacting the service
    Validate(NetworkArgs),

    /// Extract green waves for the junction network
    Extract(NetworkArgs),

    /// Optimize junction offsets
    Optimize(OptimizeArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct NetworkArgs {
    /// JSON file holding a junction array or {"junctions": [...], "desired_speed_kmh": n}.
    /// The bundled demo network is used when omitted.
    #[arg(long)]
    pub junctions: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CrossoverArg {
    Blend,
    Uniform,
}

impl From<CrossoverArg> for CrossoverType {
    fn from(arg: CrossoverArg) -> Self {
        match arg {
            CrossoverArg::Blend => CrossoverType::Blend,
            CrossoverArg::Uniform => CrossoverType::Uniform,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    #[arg(long, default_value = DEFAULT_OPTIMIZER_TYPE)]
    pub optimizer: String,

    #[arg(long)]
    pub population_size: Option<u32>,

    #[arg(long)]
    pub generations: Option<u32>,

    #[arg(long)]
    pub mutation_rate: Option<f64>,

    #[arg(long)]
    pub tournament_size: Option<u32>,

    #[arg(long, value_enum)]
    pub crossover: Option<CrossoverArg>,

    /// Write the fitness history and offsets to a CSV file under history_dir
    #[arg(long)]
    pub history_csv: bool,

    /// Copy the optimized offsets onto the junctions before printing them
    #[arg(long)]
    pub apply: bool,
}

impl OptimizeArgs {
    #[must_use]
    pub fn genetic_params(&self) -> GeneticParams {
        GeneticParams {
            population_size: self.population_size,
            generations: self.generations,
            mutation_rate: self.mutation_rate,
            tournament_size: self.tournament_size,
            crossover_type: self.crossover.map(CrossoverType::from),
        }
    }

    #[must_use]
    pub fn options(&self) -> OptimizeOptions {
        OptimizeOptions {
            optimizer_type: self.optimizer.clone(),
            ..OptimizeOptions::genetic(&self.genetic_params())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("greenwave-controller").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = parse(&["extract", "--base-url", "http://x", "--speed", "50"]);
        assert_eq!(cli.base_url.as_deref(), Some("http://x"));
        assert_eq!(cli.speed, Some(50.0));
        assert!(matches!(cli.command, Command::Extract(NetworkArgs { junctions: None })));
    }

    #[test]
    fn optimize_flags_become_params() {
        let cli = parse(&["optimize", "--generations", "25", "--crossover", "uniform"]);
        let Command::Optimize(args) = cli.command else {
            panic!("expected optimize");
        };

        let options = args.options();

        assert_eq!(options.optimizer_type, "genetic");
        assert_eq!(
            serde_json::Value::Object(options.optimizer_params),
            json!({ "generations": 25, "crossover_type": "uniform" })
        );
    }

    #[test]
    fn optimizer_name_is_passed_through() {
        let cli = parse(&["optimize", "--optimizer", "annealing"]);
        let Command::Optimize(args) = cli.command else {
            panic!("expected optimize");
        };
        assert_eq!(args.options().optimizer_type, "annealing");
        assert!(args.options().optimizer_params.is_empty());
    }
}
