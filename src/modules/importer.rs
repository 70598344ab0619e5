use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use super::config::ImportSpec;
use super::error::ImportError;
use super::parser::read_csv_file;
use super::store::RemoteStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported { key: String, rows: usize },
    // the csv file was not there, the remote key was left alone
    Skipped { path: PathBuf },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    // destination keys written, in order
    pub imported: Vec<String>,
    pub skipped: Vec<PathBuf>,
    pub rows: usize,
    pub finished_at: DateTime<Utc>,
}

// replace the content at spec.destination_key with the rows of spec.source_path
pub async fn import_one<S>(store: &S, spec: &ImportSpec) -> Result<ImportOutcome, ImportError>
where
    S: RemoteStore + ?Sized,
{
    let rows = match read_csv_file(&spec.source_path).await? {
        Some(rows) => rows,
        None => {
            warn!("File not found, skipped: {}", spec.source_path.display());
            return Ok(ImportOutcome::Skipped {
                path: spec.source_path.clone(),
            });
        }
    };

    store.set(&spec.destination_key, &rows).await?;
    info!(
        "Imported: {} -> /{} ({} rows)",
        spec.source_path.display(),
        spec.destination_key,
        rows.len()
    );

    Ok(ImportOutcome::Imported {
        key: spec.destination_key.clone(),
        rows: rows.len(),
    })
}

// import specs one after another, the first failure ends the run
pub async fn import_all<S>(store: &S, specs: &[ImportSpec]) -> Result<ImportSummary, ImportError>
where
    S: RemoteStore + ?Sized,
{
    info!("Starting to import {} csv files", specs.len());

    let mut imported = Vec::new();
    let mut skipped = Vec::new();
    let mut total_rows = 0;

    for spec in specs {
        match import_one(store, spec).await? {
            ImportOutcome::Imported { key, rows } => {
                imported.push(key);
                total_rows += rows;
            }
            ImportOutcome::Skipped { path } => skipped.push(path),
        }
    }

    let summary = ImportSummary {
        imported,
        skipped,
        rows: total_rows,
        finished_at: Utc::now(),
    };
    info!(
        "All csv files have been processed: {}",
        serde_json::to_string(&summary).unwrap_or_default()
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::config::IMPORT_LIST;
    use crate::modules::parser::Row;
    use crate::modules::store::memory::MemoryStore;
    use std::path::Path;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn write_csv(dir: &Path, file: &str, content: &str) -> PathBuf {
        let path = dir.join(file);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn missing_file_is_skipped_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();
        let spec = ImportSpec::new(dir.path().join("teacher.csv"), "teachers").unwrap();

        let outcome = import_one(&store, &spec).await.unwrap();

        assert_eq!(outcome, ImportOutcome::Skipped { path: spec.source_path.clone() });
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn writes_parsed_rows_to_destination_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "people.csv", "name,age\nAlice,30\nBob,25\n");
        let store = MemoryStore::new();
        let spec = ImportSpec::new(path, "people").unwrap();

        let outcome = import_one(&store, &spec).await.unwrap();

        assert_eq!(outcome, ImportOutcome::Imported { key: "people".to_string(), rows: 2 });
        assert_eq!(
            store.writes(),
            vec![(
                "people".to_string(),
                vec![row(&[("name", "Alice"), ("age", "30")]), row(&[("name", "Bob"), ("age", "25")])]
            )]
        );
    }

    #[tokio::test]
    async fn reimport_of_unchanged_file_gives_same_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "room.csv", "room_id,capacity\nR1,40\nR2,25\n");
        let store = MemoryStore::new();
        let spec = ImportSpec::new(path, "rooms").unwrap();

        import_one(&store, &spec).await.unwrap();
        let first = store.get("rooms");
        import_one(&store, &spec).await.unwrap();

        assert_eq!(store.get("rooms"), first);
        assert_eq!(store.writes().len(), 2);
    }

    #[tokio::test]
    async fn shrunk_file_leaves_no_stale_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "room.csv", "room_id\nR1\nR2\nR3\n");
        let store = MemoryStore::new();
        let spec = ImportSpec::new(&path, "rooms").unwrap();

        import_one(&store, &spec).await.unwrap();
        std::fs::write(&path, "room_id\nR9\n").unwrap();
        import_one(&store, &spec).await.unwrap();

        assert_eq!(store.get("rooms"), Some(vec![row(&[("room_id", "R9")])]));
    }

    #[tokio::test]
    async fn short_rows_do_not_stop_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let teachers = write_csv(dir.path(), "teacher.csv", "teacher_id,name\nT1,Ann\nT2\n");
        let subjects = write_csv(dir.path(), "subject.csv", "subject_id\nS1\n");
        let store = MemoryStore::new();
        let specs = vec![
            ImportSpec::new(teachers, "teachers").unwrap(),
            ImportSpec::new(subjects, "subjects").unwrap(),
        ];

        let summary = import_all(&store, &specs).await.unwrap();

        assert_eq!(summary.imported, ["teachers", "subjects"]);
        assert_eq!(
            store.get("teachers"),
            Some(vec![row(&[("teacher_id", "T1"), ("name", "Ann")]), row(&[("teacher_id", "T2")])])
        );
    }

    #[tokio::test]
    async fn read_failure_stops_the_remaining_imports() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where a csv file is expected cannot be read
        let a = dir.path().join("a.csv");
        std::fs::create_dir(&a).unwrap();
        let b = write_csv(dir.path(), "b.csv", "y\n2\n");
        let store = MemoryStore::new();
        let specs = vec![ImportSpec::new(&a, "a").unwrap(), ImportSpec::new(b, "b").unwrap()];

        let result = import_all(&store, &specs).await;

        match result {
            Err(ImportError::Io { path, .. }) => assert_eq!(path, a),
            other => panic!("expected read error, got {:?}", other),
        }
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn write_failure_stops_the_remaining_imports() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_csv(dir.path(), "a.csv", "x\n1\n");
        let b = write_csv(dir.path(), "b.csv", "y\n2\n");
        let store = MemoryStore::failing_on(&["a"]);
        let specs = vec![ImportSpec::new(a, "a").unwrap(), ImportSpec::new(b, "b").unwrap()];

        let result = import_all(&store, &specs).await;

        match result {
            Err(ImportError::Remote { key, .. }) => assert_eq!(key, "a"),
            other => panic!("expected remote error, got {:?}", other),
        }
        assert_eq!(store.get("b"), None);
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn skipped_file_does_not_stop_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let b = write_csv(dir.path(), "b.csv", "y\n2\n3\n");
        let store = MemoryStore::new();
        let specs = vec![
            ImportSpec::new(dir.path().join("a.csv"), "a").unwrap(),
            ImportSpec::new(b, "b").unwrap(),
        ];

        let summary = import_all(&store, &specs).await.unwrap();

        assert_eq!(summary.imported, ["b"]);
        assert_eq!(summary.skipped, [dir.path().join("a.csv")]);
        assert_eq!(summary.rows, 2);
        assert_eq!(store.writes().len(), 1);
    }

    #[tokio::test]
    async fn full_run_sets_every_configured_key_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut specs = Vec::new();
        for (i, (file, key)) in IMPORT_LIST.iter().enumerate() {
            let path = write_csv(dir.path(), file, &format!("id,label\n{},{}\n", i, key));
            specs.push(ImportSpec::new(path, key).unwrap());
        }
        let store = MemoryStore::new();

        let summary = import_all(&store, &specs).await.unwrap();

        assert_eq!(summary.imported, ["teachers", "subjects", "groups", "rooms", "timeslots"]);
        assert!(summary.skipped.is_empty());
        assert_eq!(summary.rows, 5);
        let written: Vec<_> = store.writes().into_iter().map(|(key, _)| key).collect();
        assert_eq!(written, ["teachers", "subjects", "groups", "rooms", "timeslots"]);
        assert_eq!(
            store.get("groups"),
            Some(vec![row(&[("id", "2"), ("label", "groups")])])
        );
    }

    #[tokio::test]
    async fn empty_list_succeeds_with_nothing_done() {
        let store = MemoryStore::new();

        let summary = import_all(&store, &[]).await.unwrap();

        assert!(summary.imported.is_empty() && summary.skipped.is_empty());
        assert_eq!(summary.rows, 0);
    }
}
