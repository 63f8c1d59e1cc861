use async_trait::async_trait;
use modelarium::models::{DownloadOutcome, FetchOptions, Fetcher, FileOutcome, HubClient};
use modelarium::{ModelariumError, Result};
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

/// Hub that writes a fixed payload and remembers what was requested
#[derive(Default)]
struct FakeHub {
    requests: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl FakeHub {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HubClient for FakeHub {
    async fn fetch(&self, repo_id: &str, filename: &str, dest: &Path) -> Result<u64> {
        self.requests
            .lock()
            .unwrap()
            .push((repo_id.to_string(), filename.to_string()));

        if self.fail {
            return Err(ModelariumError::Download(format!(
                "{filename} not found in {repo_id} (revision main)"
            )));
        }

        std::fs::write(dest, b"GGUF fake weights")?;
        Ok(17)
    }
}

fn options(output_dir: &Path) -> FetchOptions {
    FetchOptions {
        repo_id: "org/model".to_string(),
        filename: "llama-7b.Q4.gguf".to_string(),
        output_dir: output_dir.to_path_buf(),
        redownload: false,
    }
}

#[tokio::test]
async fn test_fetch_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let fetcher = Fetcher::new(FakeHub::default());
    let opts = options(temp_dir.path());

    let first = fetcher.fetch(&opts).await.unwrap();
    let modelfile = std::fs::read(&first.modelfile_path).unwrap();
    let note = std::fs::read(&first.note_path).unwrap();

    let second = fetcher.fetch(&opts).await.unwrap();

    assert_eq!(fetcher.hub().request_count(), 1);
    assert_eq!(second.download, DownloadOutcome::AlreadyPresent);
    assert_eq!(second.modelfile, FileOutcome::AlreadyExists);
    assert_eq!(second.note, FileOutcome::AlreadyExists);
    assert_eq!(std::fs::read(&second.modelfile_path).unwrap(), modelfile);
    assert_eq!(std::fs::read(&second.note_path).unwrap(), note);
}

#[tokio::test]
async fn test_redownload_always_downloads() {
    let temp_dir = TempDir::new().unwrap();
    let fetcher = Fetcher::new(FakeHub::default());
    let mut opts = options(temp_dir.path());
    opts.redownload = true;

    fetcher.fetch(&opts).await.unwrap();
    let report = fetcher.fetch(&opts).await.unwrap();

    assert_eq!(fetcher.hub().request_count(), 2);
    assert_eq!(report.download, DownloadOutcome::Downloaded { bytes: 17 });
    assert_eq!(report.modelfile, FileOutcome::AlreadyExists);
}

#[tokio::test]
async fn test_existing_modelfile_is_preserved() {
    let temp_dir = TempDir::new().unwrap();
    let modelfiles_dir = temp_dir.path().join("modelfiles");
    std::fs::create_dir_all(&modelfiles_dir).unwrap();
    let custom = "FROM ../models/llama-7b.Q4.gguf\nPARAMETER temperature 0.2\n";
    std::fs::write(modelfiles_dir.join("llama-7b.Q4.modelfile"), custom).unwrap();

    let mut opts = options(temp_dir.path());
    opts.redownload = true;
    let report = Fetcher::new(FakeHub::default())
        .fetch(&opts)
        .await
        .unwrap();

    assert_eq!(report.modelfile, FileOutcome::AlreadyExists);
    assert_eq!(
        std::fs::read_to_string(modelfiles_dir.join("llama-7b.Q4.modelfile")).unwrap(),
        custom
    );
}

#[tokio::test]
async fn test_generated_files() {
    let temp_dir = TempDir::new().unwrap();
    let fetcher = Fetcher::new(FakeHub::default());
    fetcher.fetch(&options(temp_dir.path())).await.unwrap();

    let modelfile =
        std::fs::read_to_string(temp_dir.path().join("modelfiles/llama-7b.Q4.modelfile")).unwrap();
    assert!(modelfile.starts_with("FROM ../models/llama-7b.Q4.gguf\n"));
    assert!(modelfile.contains("You are a helpful assistant."));

    let note = std::fs::read_to_string(temp_dir.path().join("notes/org_model.md")).unwrap();
    assert!(note.starts_with("# Notes for org/model\n"));
    assert!(note.contains("[org/model](https://huggingface.co/org/model)"));

    assert_eq!(
        std::fs::read(temp_dir.path().join("models/llama-7b.Q4.gguf")).unwrap(),
        b"GGUF fake weights"
    );
    assert_eq!(
        *fetcher.hub().requests.lock().unwrap(),
        [("org/model".to_string(), "llama-7b.Q4.gguf".to_string())]
    );
}

#[tokio::test]
async fn test_download_failure_propagates() {
    let temp_dir = TempDir::new().unwrap();
    let fetcher = Fetcher::new(FakeHub::failing());

    let result = fetcher.fetch(&options(temp_dir.path())).await;

    assert!(matches!(result, Err(ModelariumError::Download(_))));
    assert!(!temp_dir.path().join("modelfiles/llama-7b.Q4.modelfile").exists());
    assert!(!temp_dir.path().join("notes/org_model.md").exists());
}

#[tokio::test]
async fn test_missing_filename_is_invalid() {
    let temp_dir = TempDir::new().unwrap();
    let fetcher = Fetcher::new(FakeHub::default());
    let mut opts = options(&temp_dir.path().join("out"));
    opts.filename = String::new();

    let result = fetcher.fetch(&opts).await;

    assert!(matches!(result, Err(ModelariumError::InvalidArgument(_))));
    assert_eq!(fetcher.hub().request_count(), 0);
    assert!(!temp_dir.path().join("out").exists());
}
