use crossterm::style::Stylize;
use profile_core::config::{DEFAULT_SNAPSHOT_PATH, SNAPSHOT_ENV};
use profile_core::persistence::to_json;
use profile_core::{EngineConfig, GroupPlacement, ProfileEngine, Recipe, Result};
use std::fs::File;
use std::io::{stdin, stdout, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

const DEFAULT_RECOMMENDATIONS: usize = 5;

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();

    let config = EngineConfig::from_env()?;
    let snapshot_path = std::env::var(SNAPSHOT_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SNAPSHOT_PATH));
    let mut engine = ProfileEngine::from_file_or_new(&snapshot_path, config)?;

    println!("{}", "Recipe profile engine. Type 'help' for commands.".bold());
    println!("---------------------------------------------------------------");

    let mut lines = stdin().lock().lines();
    loop {
        print!("\n> ");
        stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts.as_slice() {
            [] => {}
            ["exit"] | ["quit"] => break,
            ["help"] => print_help(),
            ["groups"] => print_groups(&engine),
            ["add", path] => match read_recipe(Path::new(path)) {
                Ok(recipe) => match engine.record_recipe(&recipe) {
                    Ok(GroupPlacement::Seeded(index)) => {
                        println!("Seeded new group {}", index.to_string().green())
                    }
                    Ok(GroupPlacement::Joined { index, score }) => {
                        println!("Joined group {} (similarity {:.3})", index.to_string().green(), score)
                    }
                    Err(e) => print_error(&e),
                },
                Err(e) => print_error(&e),
            },
            ["recommend", path, rest @ ..] => {
                let count = rest
                    .first()
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(DEFAULT_RECOMMENDATIONS);
                match read_recipe(Path::new(path)).and_then(|q| engine.recommend(&q, count)) {
                    Ok(ranked) if ranked.is_empty() => println!("No groups yet."),
                    Ok(ranked) => {
                        for (rank, scored) in ranked.iter().enumerate() {
                            println!(
                                "  {}. {:.3}  {}",
                                rank + 1,
                                scored.score,
                                scored.item.recipe_ids().join(", ")
                            );
                        }
                    }
                    Err(e) => print_error(&e),
                }
            }
            ["merge", into, from] => match (into.parse(), from.parse()) {
                (Ok(into), Ok(from)) => match engine.merge_groups(into, from) {
                    Ok(index) => println!("Merged into group {}", index),
                    Err(e) => print_error(&e),
                },
                _ => println!("{}", "usage: merge <into> <from>".yellow()),
            },
            ["consolidate", rest @ ..] => {
                let threshold = rest
                    .first()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(engine.config().assign_threshold);
                match engine.consolidate(threshold) {
                    Ok(merges) => println!("{} merges, {} groups remain", merges, engine.len()),
                    Err(e) => print_error(&e),
                }
            }
            ["export"] => match to_json(&engine.snapshot()) {
                Ok(json) => println!("{}", json),
                Err(e) => print_error(&e),
            },
            _ => println!("{}", "Unknown command. Type 'help'.".yellow()),
        }
    }

    println!("\nSaving profile...");
    if let Err(e) = engine.save() {
        eprintln!("{} could not save profile: {}", "[ERROR]".red(), e);
    } else {
        println!("Profile saved to '{}'", snapshot_path.display());
    }
    Ok(())
}

fn read_recipe(path: &Path) -> Result<Recipe> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn print_help() {
    println!("  add <recipe.json>              fold a recipe into the profile");
    println!("  recommend <recipe.json> [n]    rank groups against a recipe");
    println!("  groups                         list groups");
    println!("  merge <into> <from>            merge two groups");
    println!("  consolidate [threshold]        merge groups that are alike");
    println!("  export                         print the profile as JSON");
    println!("  exit                           save and quit");
}

fn print_groups(engine: &ProfileEngine) {
    if engine.is_empty() {
        println!("No groups yet.");
        return;
    }
    for (index, group) in engine.groups().iter().enumerate() {
        println!(
            "{} {} recipes, {} ingredients, prep {:?}, cook {:?}",
            format!("[{}]", index).cyan(),
            group.len(),
            group.ingredients().len(),
            group.prep_time(),
            group.cook_time()
        );
    }
}

fn print_error(e: &profile_core::ProfileError) {
    println!("{} {}", "[ERROR]".red(), e);
}
