use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use oddslab_core::{
    house_edge, run_batch, run_suite, verify_spin, Game, GameConfig, GameKind, ProvablyFairRng,
    ReelsConfig, Symbol,
};
use oddslab_shared::{SimulateRequest, StatsRow};

#[derive(Parser)]
#[command(name = "oddslab-cli", about = "Run and compare betting game simulations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Server seed the trial stream is derived from
    #[arg(long, env = "ODDSLAB_SEED", default_value = "oddslab")]
    seed: String,
    #[arg(long, default_value = "cli")]
    client_seed: String,
    #[arg(long, default_value_t = 1)]
    nonce: u64,
}

#[derive(clap::Args)]
struct GameParams {
    #[arg(long, default_value_t = 1.0)]
    bet: f64,
    #[arg(long, default_value_t = 5.0)]
    tweaked_payout: f64,
    #[arg(long, default_value_t = 0.12)]
    weighted_prob: f64,
    #[arg(long, default_value_t = 5.7)]
    modified_payout: f64,
    #[arg(long, default_value_t = 5.0)]
    normal_mean: f64,
    #[arg(long, default_value_t = 1.5)]
    normal_std: f64,
    #[arg(long, default_value_t = 2.0)]
    lucky9_payout: f64,
}

impl GameParams {
    fn request(&self, games: Vec<String>, trials: usize, client_seed: &str) -> SimulateRequest {
        SimulateRequest {
            games,
            num_simulations: trials,
            bet_amount: self.bet,
            tweaked_payout: self.tweaked_payout,
            weighted_prob: self.weighted_prob,
            modified_payout: self.modified_payout,
            normal_mean: self.normal_mean,
            normal_std: self.normal_std,
            lucky9_payout: self.lucky9_payout,
            client_seed: client_seed.to_string(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate games side by side and print a comparison table
    Simulate {
        /// Comma separated game keys; all games when omitted
        #[arg(long, value_delimiter = ',')]
        games: Vec<String>,
        #[arg(long, default_value_t = 5000)]
        trials: usize,
        #[command(flatten)]
        params: GameParams,
        /// Print full summaries as JSON instead of the table
        #[arg(long)]
        json: bool,
    },
    /// Export every trial of one game to CSV path
    ExportCsv {
        path: String,
        #[arg(long, default_value = "fair")]
        game: String,
        #[arg(long, default_value_t = 1000)]
        trials: usize,
        #[command(flatten)]
        params: GameParams,
    },
    /// Closed-form house edge; lists every game's edge when no odds are given
    HouseEdge {
        probability: Option<f64>,
        multiplier: Option<f64>,
    },
    /// Print the seed commitment, optionally checking a revealed spin
    Verify {
        /// Revealed reels, e.g. `A,7,BAR`
        #[arg(long, value_delimiter = ',')]
        spin: Vec<String>,
    },
}

fn parse_symbol(raw: &str) -> anyhow::Result<Symbol> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_uppercase()))
        .with_context(|| format!("unknown symbol {raw}"))
}

fn print_table(rows: &[StatsRow]) {
    println!(
        "{:<24} {:>9} {:>10} {:>10} {:>14} {:>14} {:>10}",
        "game", "win rate", "player roi", "house roi", "player final", "house final", "edge"
    );
    for r in rows {
        println!(
            "{:<24} {:>9} {:>10} {:>10} {:>14} {:>14} {:>10}",
            r.game,
            r.win_rate,
            r.player_roi,
            r.house_roi,
            r.final_player_balance,
            r.final_house_balance,
            r.theoretical_edge
        );
    }
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let rng = ProvablyFairRng::new(cli.seed.as_str(), cli.client_seed.as_str(), cli.nonce);

    match cli.command {
        Commands::Simulate {
            games,
            trials,
            params,
            json,
        } => {
            let games = if games.is_empty() {
                GameKind::KEYS.iter().map(|k| k.to_string()).collect()
            } else {
                games
            };
            let req = params.request(games, trials, &cli.client_seed);
            let configs = req.configs()?;
            info!(games = configs.len(), trials, "simulating");
            let entries = run_suite(&configs, trials, &rng)?;
            if json {
                let summaries: Vec<_> = entries
                    .iter()
                    .map(|e| (&e.key, &e.summary, e.theoretical_edge))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                let rows: Vec<StatsRow> = entries.iter().map(StatsRow::from).collect();
                print_table(&rows);
            }
        }
        Commands::ExportCsv {
            path,
            game,
            trials,
            params,
        } => {
            let req = params.request(vec![game], trials, &cli.client_seed);
            let configs = req.configs()?;
            let model = configs[0].build()?;
            let batch = run_batch(&model, trials, &mut rng.clone())?;

            let mut wtr = csv::Writer::from_path(&path)?;
            wtr.write_record([
                "game_number",
                "player_bet",
                "player_won",
                "payout",
                "player_profit",
                "house_profit",
                "cumulative_player_profit",
                "cumulative_house_profit",
                "detail",
            ])?;
            for r in &batch.records {
                let o = &r.outcome;
                wtr.write_record(&[
                    r.game_number.to_string(),
                    o.player_bet.to_string(),
                    o.player_won.to_string(),
                    o.payout.to_string(),
                    o.player_profit.to_string(),
                    o.house_profit.to_string(),
                    r.cumulative_player_profit.to_string(),
                    r.cumulative_house_profit.to_string(),
                    serde_json::to_string(&o.detail)?,
                ])?;
            }
            wtr.flush()?;
            println!("Exported {} {} trials to {}", batch.len(), model.name(), path);
        }
        Commands::HouseEdge {
            probability,
            multiplier,
        } => match (probability, multiplier) {
            (Some(p), Some(m)) => {
                if !(0.0..=1.0).contains(&p) {
                    bail!("probability must be within [0, 1], got {p}");
                }
                println!("{:.2}%", house_edge(p, m));
            }
            (None, None) => {
                for kind in GameKind::all_defaults() {
                    let model = GameConfig::new(1.0, kind).build()?;
                    let edge = model
                        .theoretical_house_edge()
                        .map(|e| format!("{e:.2}%"))
                        .unwrap_or_else(|| "N/A".to_string());
                    println!("{:<24} {:>10}", model.name(), edge);
                }
            }
            _ => bail!("give both a win probability and a payout multiplier"),
        },
        Commands::Verify { spin } => {
            println!("server seed hash: {}", rng.server_seed_hash_hex());
            if !spin.is_empty() {
                let expected = spin
                    .iter()
                    .map(|s| parse_symbol(s))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                let ok = verify_spin(
                    &cli.seed,
                    &cli.client_seed,
                    cli.nonce,
                    &ReelsConfig::default_3_reel(),
                    &expected,
                );
                println!("spin {}", if ok { "verified" } else { "does NOT match" });
            }
        }
    }

    Ok(())
}
