use abtest::{load_observations, two_proportion_z_test, ZTestResult, ALPHA};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::UserId;
use engine::{find_model_name, RecommendationEngine};
use pipeline::{run_training, TrainingReport};
use std::path::PathBuf;
use std::time::Instant;

/// CineRank - MovieLens 100k recommendation pipeline
#[derive(Parser)]
#[command(name = "cinerank")]
#[command(about = "Train, compare, and serve movie recommendation models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train all five models, compare them, and persist the winner
    Train {
        /// Path to the MovieLens 100k dataset directory
        #[arg(long, default_value = "data/ml-100k")]
        data_dir: PathBuf,

        /// Directory the winning model bundle is written to
        #[arg(long, default_value = "models")]
        models_dir: PathBuf,
    },

    /// Get movie recommendations for a user from the persisted model
    Recommend {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: UserId,

        /// Number of recommendations to return
        #[arg(long, default_value = "5")]
        n: usize,

        /// Directory the model bundle was persisted to
        #[arg(long, default_value = "models")]
        models_dir: PathBuf,

        /// Model name to load (defaults to the persisted winner)
        #[arg(long)]
        model: Option<String>,
    },

    /// Serve the persisted model over HTTP
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0:5000")]
        addr: String,

        /// Directory the model bundle was persisted to
        #[arg(long, default_value = "models")]
        models_dir: PathBuf,
    },

    /// Analyze an A/B conversion log with a two-proportion z-test
    AbTest {
        /// Path to the experiment CSV (user_id, timestamp, group, converted)
        #[arg(long, default_value = "ab_test_data.csv")]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            data_dir,
            models_dir,
        } => handle_train(&data_dir, &models_dir),
        Commands::Recommend {
            user_id,
            n,
            models_dir,
            model,
        } => handle_recommend(user_id, n, &models_dir, model),
        Commands::Serve { addr, models_dir } => server::run(&addr, &models_dir).await,
        Commands::AbTest { file } => handle_ab_test(&file),
    }
}

/// Handle the 'train' command
fn handle_train(data_dir: &PathBuf, models_dir: &PathBuf) -> Result<()> {
    println!(
        "Training on MovieLens data from {}...",
        data_dir.display()
    );
    let start = Instant::now();
    let report = run_training(data_dir, models_dir).context("training run failed")?;
    println!(
        "{} Trained and compared 5 models in {:?}",
        "✓".green(),
        start.elapsed()
    );
    print_training_report(&report);
    Ok(())
}

fn print_training_report(report: &TrainingReport) {
    println!();
    println!("{}", "Dataset".bold().blue());
    println!("  ratings:     {}", report.summary.n_ratings);
    println!("  users:       {}", report.summary.n_users);
    println!("  movies:      {}", report.summary.n_movies);
    println!("  global mean: {:.4}", report.summary.global_mean);
    println!("  sparsity:    {:.2}%", report.summary.sparsity * 100.0);
    println!(
        "  split:       {} train / {} test (hash {:016x})",
        report.train_len, report.test_len, report.split_hash
    );

    println!();
    println!("{}", "Model comparison (by RMSE)".bold().blue());
    for (rank, model) in report.ranking.iter().enumerate() {
        let line = format!(
            "  {}. {:<12} RMSE {:.4}  MAE {:.4}",
            rank + 1,
            model.name,
            model.evaluation.rmse,
            model.evaluation.mae
        );
        if model.name == report.best_model {
            println!("{}", line.green().bold());
        } else {
            println!("{line}");
        }
    }
    println!();
    println!(
        "{} Persisted '{}' to {}",
        "✓".green(),
        report.best_model,
        report.artifact_path.display()
    );
}

/// Handle the 'recommend' command
fn handle_recommend(
    user_id: UserId,
    n: usize,
    models_dir: &PathBuf,
    model: Option<String>,
) -> Result<()> {
    let model_name = match model {
        Some(name) => name,
        None => find_model_name(models_dir)
            .with_context(|| format!("no persisted model found in {}", models_dir.display()))?,
    };
    let engine = RecommendationEngine::load(models_dir, &model_name)
        .with_context(|| format!("loading model bundle '{model_name}'"))?;

    let recommendations = engine
        .recommend(user_id, n)
        .with_context(|| format!("generating recommendations for user {user_id}"))?;

    println!(
        "{}",
        format!("Top {} movies for user {} ({} model):", recommendations.len(), user_id, model_name)
            .bold()
            .blue()
    );
    for (rank, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} (predicted {:.2})",
            (rank + 1).to_string().green(),
            rec.title,
            rec.predicted_rating
        );
    }
    Ok(())
}

/// Handle the 'ab-test' command
fn handle_ab_test(file: &PathBuf) -> Result<()> {
    let observations = load_observations(file)
        .with_context(|| format!("loading experiment log {}", file.display()))?;
    println!("Loaded {} observations", observations.len());

    let result = two_proportion_z_test(&observations).context("running z-test")?;
    print_ab_test_result(&result);
    Ok(())
}

fn print_ab_test_result(result: &ZTestResult) {
    println!();
    println!("{}", "Conversion by group".bold().blue());
    for stats in [&result.control, &result.treatment] {
        println!(
            "  {:<10} {:>6} users, {:>5} conversions, rate {:.4}",
            stats.group.as_str(),
            stats.users,
            stats.conversions,
            stats.conversion_rate
        );
    }

    println!();
    println!("{}", "Two-proportion z-test (two-tailed)".bold().blue());
    println!("  pooled rate:     {:.4}", result.pooled_rate);
    println!("  standard error:  {:.4}", result.standard_error);
    println!("  z statistic:     {:.4}", result.z_statistic);
    println!("  p-value:         {:.4}", result.p_value);
    println!(
        "  rate difference: {:.4} (95% CI [{:.4}, {:.4}])",
        result.rate_difference, result.confidence_interval.0, result.confidence_interval.1
    );

    println!();
    if result.significant {
        println!(
            "{} p = {:.4} < {}: the groups differ",
            "✓".green(),
            result.p_value,
            ALPHA
        );
        if result.rate_difference > 0.0 {
            println!("  Treatment converts better than control.");
        } else {
            println!("  Treatment converts worse than control.");
        }
    } else {
        println!(
            "{} p = {:.4} >= {}: no significant difference",
            "✗".red(),
            result.p_value,
            ALPHA
        );
    }
}
