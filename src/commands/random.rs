use rand::SeedableRng;
use rand::rngs::StdRng;
use time::OffsetDateTime;

use crate::apis::icanhazdadjoke::{self, HttpFetcher, JokeError};
use crate::utilities::config::Config;

#[derive(clap::Args)]
pub struct Args {
    /// A search term
    #[arg(long, default_value = "")]
    pub term: String,
}

pub async fn execute(config: &Config, args: &Args) -> Result<String, JokeError> {
    let fetcher = HttpFetcher::new(config.timeout)?;
    let mut rng = time_seeded_rng();

    if args.term.trim().is_empty() {
        log::info!("getting a random dad joke");
    } else {
        log::info!("searching dad jokes for {:?}", args.term);
    }

    icanhazdadjoke::random_joke(&fetcher, &config.api_url, &args.term, &mut rng).await
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn time_seeded_rng() -> StdRng {
    StdRng::seed_from_u64(OffsetDateTime::now_utc().unix_timestamp_nanos() as u64)
}
