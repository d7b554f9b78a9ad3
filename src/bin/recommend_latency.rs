extern crate itertools;
extern crate num_format;
extern crate rand_pcg;
extern crate sound_recommender;

use std::sync::Arc;

use bencher::black_box;
use indicatif::ProgressBar;
use itertools::Itertools;
use num_format::{Locale, ToFormattedString};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use sound_recommender::domain::{Credit, Sound};
use sound_recommender::io::SoundId;
use sound_recommender::logging;
use sound_recommender::similarity::features::ItemRecord;
use sound_recommender::similarity::graph::SimilarityGraph;
use sound_recommender::similarity::recommender::Recommender;
use sound_recommender::stopwatch::Stopwatch;

const DEFAULT_QTY_SOUNDS: usize = 20_000;
const DEFAULT_QTY_REQUESTS: usize = 1_000;
const INGEST_BATCH_SIZE: usize = 1_000;
const MAX_PLAYLIST_SIZE: usize = 20;

const GENRES: &[&str] = &[
    "rock", "pop", "jazz", "techno", "house", "ambient", "hiphop", "folk", "classical", "metal",
];
const ROLES: &[&str] = &["artist", "producer", "composer"];
const QTY_CONTRIBUTORS: usize = 500;

fn synthetic_sound(rng: &mut Pcg64, position: usize) -> Sound {
    let qty_genres = rng.gen_range(1..=3);
    let genres = GENRES
        .choose_multiple(rng, qty_genres)
        .map(|genre| genre.to_string())
        .collect_vec();
    let qty_credits = rng.gen_range(1..=2);
    let credits = (0..qty_credits)
        .map(|_| Credit {
            name: format!("contributor-{}", rng.gen_range(0..QTY_CONTRIBUTORS)),
            role: ROLES[rng.gen_range(0..ROLES.len())].to_string(),
        })
        .collect_vec();

    Sound {
        id: format!("sound-{}", position),
        title: format!("Sound {}", position),
        bpm: rng.gen_range(60..180) as f64,
        genres,
        duration_in_seconds: rng.gen_range(60..400) as f64,
        credits,
    }
}

fn main() -> anyhow::Result<()> {
    logging::init("warn");

    let qty_sounds = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => DEFAULT_QTY_SOUNDS,
    };
    let qty_requests = match std::env::args().nth(2) {
        Some(arg) => arg.parse()?,
        None => DEFAULT_QTY_REQUESTS,
    };

    let mut rng = Pcg64::seed_from_u64(42);
    let sounds = (0..qty_sounds)
        .map(|position| synthetic_sound(&mut rng, position))
        .collect_vec();

    println!(
        "Indexing {} synthetic sounds",
        qty_sounds.to_formatted_string(&Locale::en)
    );
    let recommender = Recommender::new(Arc::new(SimilarityGraph::new()));
    let pb = ProgressBar::new(qty_sounds as u64);
    for batch in sounds.chunks(INGEST_BATCH_SIZE) {
        let records = batch.iter().map(ItemRecord::from).collect_vec();
        recommender.ingest(&records);
        pb.inc(batch.len() as u64);
    }
    pb.finish_and_clear();

    let mut stopwatch = Stopwatch::new();
    for _ in 0..qty_requests {
        let playlist_size = rng.gen_range(1..=MAX_PLAYLIST_SIZE);
        let playlist: Vec<SoundId> = (0..playlist_size)
            .map(|_| sounds[rng.gen_range(0..sounds.len())].id.clone())
            .unique()
            .collect();

        stopwatch.start();
        black_box(recommender.recommend(&playlist));
        stopwatch.stop(playlist.len());
    }

    let percentiles = [0.5, 0.9, 0.95, 0.99, 0.995]
        .iter()
        .map(|q| {
            format!(
                "p{}={}",
                q * 100.0,
                (stopwatch.get_percentile_in_micros(*q) as usize).to_formatted_string(&Locale::en)
            )
        })
        .join(" ");

    println!(
        "Qty requests: {}",
        stopwatch.get_n().to_formatted_string(&Locale::en)
    );
    println!("Recommend latency percentiles (micros): {}", percentiles);

    let durations_by_playlist_size = stopwatch
        .get_raw_durations()
        .iter()
        .copied()
        .into_group_map();
    println!("playlist_size,qty_requests,mean_duration_(micros)");
    for playlist_size in durations_by_playlist_size.keys().sorted() {
        let durations = &durations_by_playlist_size[playlist_size];
        let mean = durations.iter().sum::<f64>() / durations.len() as f64;
        println!("{},{},{:.1}", playlist_size, durations.len(), mean);
    }

    Ok(())
}
