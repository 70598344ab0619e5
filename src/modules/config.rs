use clap::Parser;
use std::path::{Path, PathBuf};
use super::error::ImportError;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_URL: &str =
    "https://autotimetable-382ee-default-rtdb.asia-southeast1.firebasedatabase.app/";
pub const DATASET_DIR_NAME: &str = "dataset";
pub const CREDENTIALS_FILE_NAME: &str = "key1.json";

// (file under the dataset directory, destination key), imported in this order
pub const IMPORT_LIST: [(&str, &str); 5] = [
    ("teacher.csv", "teachers"),
    ("subject.csv", "subjects"),
    ("student_group.csv", "groups"),
    ("room.csv", "rooms"),
    ("timeslot.csv", "timeslots"),
];

// characters the Realtime Database refuses in a key
const FORBIDDEN_KEY_CHARS: [char; 5] = ['.', '$', '#', '[', ']'];

#[derive(Parser, Debug, Clone)]
#[command(
    name = "CSV_To_Firebase",
    version,
    about = "Uploads the timetable datasets to Firebase on start and serves a health check"
)]
pub struct Config {
    /// Port the HTTP server listens on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory holding the csv files to import
    #[arg(short, long, env = "DATASET_DIR", default_value_os_t = default_dataset_dir())]
    pub dataset_dir: PathBuf,

    /// Service account key file used to authenticate against Firebase
    #[arg(short, long, env = "GOOGLE_APPLICATION_CREDENTIALS", default_value_os_t = default_credentials())]
    pub credentials: PathBuf,

    /// Realtime Database URL
    #[arg(long, env = "FIREBASE_DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Serve the health check without running the startup import
    #[arg(long)]
    pub skip_import: bool,
}

impl Config {
    // resolve the fixed import list under dataset_dir
    pub fn import_specs(&self) -> Result<Vec<ImportSpec>, ImportError> {
        IMPORT_LIST
            .iter()
            .map(|(file, key)| ImportSpec::new(self.dataset_dir.join(file), *key))
            .collect()
    }
}

/// One csv file and the remote location its rows replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub source_path: PathBuf,
    pub destination_key: String,
}

impl ImportSpec {
    pub fn new(source_path: impl Into<PathBuf>, destination_key: &str) -> Result<ImportSpec, ImportError> {
        if destination_key.is_empty() {
            return Err(ImportError::Config("destination key cannot be empty".to_string()));
        }
        if let Some(c) = destination_key.chars().find(|c| FORBIDDEN_KEY_CHARS.contains(c)) {
            return Err(ImportError::Config(format!(
                "destination key {} contains forbidden character '{}'",
                destination_key, c
            )));
        }

        Ok(ImportSpec {
            source_path: source_path.into(),
            destination_key: destination_key.to_owned(),
        })
    }
}

// the sources' directory plays the role of "next to the program"
fn crate_dir() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
}

fn default_dataset_dir() -> PathBuf {
    crate_dir().join(DATASET_DIR_NAME)
}

fn default_credentials() -> PathBuf {
    crate_dir().join(CREDENTIALS_FILE_NAME)
}
