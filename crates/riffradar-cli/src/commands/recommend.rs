use anyhow::Result;

use riffradar_core::model::Recommendation;
use riffradar_service::Config;

use super::open_recommender;

pub async fn run_recommend(
    config: &Config,
    chords: &[String],
    max_results: usize,
    json: bool,
    with_tutorials: bool,
) -> Result<()> {
    let recommender = open_recommender(config, with_tutorials)?;
    let recommendations = recommender.recommend(chords, max_results).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
        return Ok(());
    }

    print_table(chords, &recommendations);
    Ok(())
}

fn print_table(chords: &[String], recommendations: &[Recommendation]) {
    println!("\n🎸 Songs like {}\n", chords.join(" "));

    if recommendations.is_empty() {
        println!("  No similar songs found.");
        println!("\n  Run `riffradar stats` to check the catalog is seeded.");
        return;
    }

    for (rank, rec) in recommendations.iter().enumerate() {
        println!(
            "  {:>2}. {} by {}  ({:.3}, {})",
            rank + 1,
            rec.song_name,
            rec.artist,
            rec.similarity_score,
            rec.difficulty
        );
        println!("      Chords: {}", rec.chords.join(" "));
        if let Some(tutorial) = &rec.tutorial {
            println!("      Tutorial: {} ({})", tutorial.title, tutorial.url);
        }
    }
    println!();
}
