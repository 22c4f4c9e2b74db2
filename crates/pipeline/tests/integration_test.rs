//! End-to-end training run over a small synthetic dataset.

use engine::{AuxiliaryData, load_artifact};
use pipeline::run_training;
use std::fmt::Write as _;
use std::path::PathBuf;

fn write_dataset(dir: &PathBuf, n_users: u32, n_movies: u32) {
    std::fs::create_dir_all(dir).unwrap();

    let mut data = String::new();
    for user in 1..=n_users {
        for item in 1..=n_movies {
            // Deterministic but varied ratings, with some pairs left unrated
            if (user + item) % 3 == 0 {
                continue;
            }
            let rating = 1 + (user * 7 + item * 3) % 5;
            writeln!(data, "{user}\t{item}\t{rating}\t88125{user:03}").unwrap();
        }
    }
    std::fs::write(dir.join("u.data"), data).unwrap();

    let mut items = String::new();
    for item in 1..=n_movies {
        writeln!(items, "{item}|Movie {item} (1995)|01-Jan-1995||http://example.com").unwrap();
    }
    std::fs::write(dir.join("u.item"), items).unwrap();
}

fn temp_root(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pipeline-test-{}-{}", std::process::id(), tag));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn training_run_persists_the_winner() {
    let root = temp_root("full-run");
    let data_dir = root.join("data");
    let models_dir = root.join("models");
    write_dataset(&data_dir, 12, 20);

    let report = run_training(&data_dir, &models_dir).unwrap();

    assert_eq!(report.ranking.len(), 5);
    assert_eq!(report.best_model, report.ranking[0].name);
    for pair in report.ranking.windows(2) {
        assert!(pair[0].evaluation.rmse <= pair[1].evaluation.rmse);
    }
    assert_eq!(report.summary.n_users, 12);
    assert_eq!(report.summary.n_movies, 20);
    assert_eq!(
        report.train_len + report.test_len,
        report.summary.n_ratings
    );

    // Both persisted units load back independently
    let artifact = load_artifact(&models_dir, &report.best_model).unwrap();
    assert_eq!(artifact.name(), report.best_model);
    let auxiliary = AuxiliaryData::load(&models_dir).unwrap();
    assert_eq!(auxiliary.train.len(), report.train_len);
    assert_eq!(auxiliary.ratings.len(), report.summary.n_ratings);

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn training_is_reproducible() {
    let root = temp_root("repro");
    let data_dir = root.join("data");
    write_dataset(&data_dir, 10, 15);

    let first = run_training(&data_dir, &root.join("models-a")).unwrap();
    let second = run_training(&data_dir, &root.join("models-b")).unwrap();

    assert_eq!(first.split_hash, second.split_hash);
    assert_eq!(first.best_model, second.best_model);
    for (a, b) in first.ranking.iter().zip(&second.ranking) {
        assert_eq!(a.name, b.name);
        assert!((a.evaluation.rmse - b.evaluation.rmse).abs() < 1e-12);
    }

    let _ = std::fs::remove_dir_all(&root);
}
