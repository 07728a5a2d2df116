use leaderboard_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("leaderboard error: {err}");
        std::process::exit(1);
    }
}
