use oddslab_core::{house_edge, run_suite, GameConfig, GameKind, ProvablyFairRng};

fn main() {
    // Example end-to-end comparison of every game at its defaults
    let rng = ProvablyFairRng::new("example-server-seed", "example-client-seed", 1);
    let configs: Vec<GameConfig> = GameKind::all_defaults()
        .into_iter()
        .map(|kind| GameConfig::new(1.0, kind))
        .collect();
    let entries = match run_suite(&configs, 10_000, &rng) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("simulation failed: {e}");
            return;
        }
    };
    println!("server_seed_hash={}", rng.server_seed_hash_hex());
    for e in entries {
        println!(
            "{:<24} win_rate={:>6.2}% house_roi={:>7.2}% final_player={:>9.2} edge={}",
            e.label,
            e.summary.win_rate * 100.0,
            e.summary.house_roi,
            e.summary.final_player_balance,
            e.theoretical_edge
                .map(|v| format!("{v:.2}%"))
                .unwrap_or_else(|| "N/A".into())
        );
    }
    println!("reference edge at 5.0x: {:.2}%", house_edge(1.0 / 6.0, 5.0));
}
