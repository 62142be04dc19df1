use crate::core::{dedup, ColumnValues, ConfigProvider, DedupReport, Pipeline, Storage};
use crate::utils::error::{EtlError, Result};
use chrono::Local;
use reqwest::Client;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const LIST_FILE: &str = "emails.txt";
pub const LOG_FILE: &str = "duplicates.txt";
pub const SUMMARY_FILE: &str = "summary.json";
pub const BUNDLE_FILE: &str = "maillist_output.zip";

/// Reads one column of a tabular source, de-duplicates it, and writes the
/// downloadable artifacts. Generic over storage so the same pipeline serves
/// the CLI (local files) and Lambda (S3).
pub struct ColumnPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> ColumnPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }

    async fn fetch_source(&self) -> Result<Vec<u8>> {
        let source = self.config.source();
        if source.starts_with("http://") || source.starts_with("https://") {
            tracing::debug!("Downloading source from: {}", source);
            let response = self.client.get(source).send().await?.error_for_status()?;
            Ok(response.bytes().await?.to_vec())
        } else {
            tracing::debug!("Reading source file: {}", source);
            self.storage.read_file(source).await
        }
    }

    /// Map the configured selector to a field index and a display name. An
    /// all-digits selector is a 0-based index; anything else is matched
    /// against the header row, case-insensitively after trimming.
    fn resolve_column(&self, headers: Option<&csv::StringRecord>) -> Result<(usize, String)> {
        let selector = self.config.column().trim();

        if let Ok(index) = selector.parse::<usize>() {
            return match headers {
                Some(headers) => match headers.get(index) {
                    Some(name) => Ok((index, name.trim().to_string())),
                    None => Err(EtlError::ColumnNotFoundError {
                        column: selector.to_string(),
                    }),
                },
                None => Ok((index, format!("#{}", index))),
            };
        }

        let Some(headers) = headers else {
            return Err(EtlError::InvalidConfigValueError {
                field: "column".to_string(),
                value: selector.to_string(),
                reason: "a column name needs a header row; pass a 0-based index instead"
                    .to_string(),
            });
        };

        for (index, header) in headers.iter().enumerate() {
            if header.trim().eq_ignore_ascii_case(selector) {
                return Ok((index, header.trim().to_string()));
            }
        }

        Err(EtlError::ColumnNotFoundError {
            column: selector.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ColumnPipeline<S, C> {
    async fn extract(&self) -> Result<ColumnValues> {
        let data = self.fetch_source().await?;

        // Spreadsheet exports are often ragged; flexible() keeps short rows
        // readable, and a missing field simply counts as an empty cell.
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter())
            .has_headers(self.config.has_headers())
            .flexible(true)
            .from_reader(data.as_slice());

        let headers = if self.config.has_headers() {
            Some(reader.headers()?.clone())
        } else {
            None
        };
        let (index, column) = self.resolve_column(headers.as_ref())?;
        tracing::debug!("Column '{}' resolved to field index {}", column, index);

        let mut values = Vec::new();
        let mut rows = 0usize;
        for result in reader.records() {
            if let Some(cap) = self.config.max_rows() {
                if rows >= cap {
                    tracing::warn!("Row cap reached after {} rows, ignoring the rest", rows);
                    break;
                }
            }
            rows += 1;

            let record = result?;
            match record.get(index) {
                Some(cell) if !cell.trim().is_empty() => values.push(cell.to_string()),
                // Missing and blank cells are dropped here, silently; they
                // are not part of the de-duplication contract.
                _ => {}
            }
        }

        tracing::debug!("{} of {} rows carried a value", values.len(), rows);
        Ok(ColumnValues { column, values })
    }

    async fn transform(&self, column: ColumnValues) -> Result<DedupReport> {
        let report = dedup::dedupe(&column.values, Local::now());

        tracing::info!(
            "✨ {} unique emails, ❌ {} duplicates removed",
            report.unique_count,
            report.duplicate_count
        );

        Ok(report)
    }

    async fn load(&self, report: DedupReport) -> Result<String> {
        let list = report.email_list();
        let log = report.log_text();
        let summary = serde_json::to_string_pretty(&report)?;
        let out = self.config.output_path();

        self.storage
            .write_file(&format!("{}/{}", out, LIST_FILE), list.as_bytes())
            .await?;
        self.storage
            .write_file(&format!("{}/{}", out, LOG_FILE), log.as_bytes())
            .await?;
        self.storage
            .write_file(&format!("{}/{}", out, SUMMARY_FILE), summary.as_bytes())
            .await?;

        if !self.config.bundle_output() {
            return Ok(format!("{}/{}", out, LIST_FILE));
        }

        tracing::debug!("Bundling output files into {}", BUNDLE_FILE);
        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            zip.start_file::<_, ()>(LIST_FILE, FileOptions::default())?;
            zip.write_all(list.as_bytes())?;

            zip.start_file::<_, ()>(LOG_FILE, FileOptions::default())?;
            zip.write_all(log.as_bytes())?;

            zip.start_file::<_, ()>(SUMMARY_FILE, FileOptions::default())?;
            zip.write_all(summary.as_bytes())?;

            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        let bundle_path = format!("{}/{}", out, BUNDLE_FILE);
        tracing::debug!("Writing bundle ({} bytes) to storage", zip_data.len());
        self.storage.write_file(&bundle_path, &zip_data).await?;

        Ok(bundle_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put_file(&self, path: &str, data: &[u8]) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        source: String,
        column: String,
        delimiter: u8,
        has_headers: bool,
        output_path: String,
        bundle: bool,
        max_rows: Option<usize>,
    }

    impl MockConfig {
        fn new(source: &str) -> Self {
            Self {
                source: source.to_string(),
                column: "email".to_string(),
                delimiter: b',',
                has_headers: true,
                output_path: "test_output".to_string(),
                bundle: false,
                max_rows: None,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn source(&self) -> &str {
            &self.source
        }

        fn column(&self) -> &str {
            &self.column
        }

        fn delimiter(&self) -> u8 {
            self.delimiter
        }

        fn has_headers(&self) -> bool {
            self.has_headers
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn bundle_output(&self) -> bool {
            self.bundle
        }

        fn max_rows(&self) -> Option<usize> {
            self.max_rows
        }
    }

    async fn pipeline_with_csv(
        csv: &str,
        config: MockConfig,
    ) -> ColumnPipeline<MockStorage, MockConfig> {
        let storage = MockStorage::new();
        storage.put_file(config.source(), csv.as_bytes()).await;
        ColumnPipeline::new(storage, config)
    }

    #[tokio::test]
    async fn test_extract_by_header_name() {
        let csv = "name,email\nAda,ada@x.com\nBob,bob@y.com\n";
        let pipeline = pipeline_with_csv(csv, MockConfig::new("input.csv")).await;

        let column = pipeline.extract().await.unwrap();

        assert_eq!(column.column, "email");
        assert_eq!(column.values, vec!["ada@x.com", "bob@y.com"]);
    }

    #[tokio::test]
    async fn test_extract_header_match_is_case_insensitive() {
        let csv = " Email ,name\nada@x.com,Ada\n";
        let mut config = MockConfig::new("input.csv");
        config.column = "EMAIL".to_string();
        let pipeline = pipeline_with_csv(csv, config).await;

        let column = pipeline.extract().await.unwrap();

        assert_eq!(column.column, "Email");
        assert_eq!(column.values, vec!["ada@x.com"]);
    }

    #[tokio::test]
    async fn test_extract_by_index() {
        let csv = "name,email\nAda,ada@x.com\n";
        let mut config = MockConfig::new("input.csv");
        config.column = "1".to_string();
        let pipeline = pipeline_with_csv(csv, config).await;

        let column = pipeline.extract().await.unwrap();

        assert_eq!(column.column, "email");
        assert_eq!(column.values, vec!["ada@x.com"]);
    }

    #[tokio::test]
    async fn test_extract_drops_empty_and_missing_cells() {
        let csv = "name,email\nAda,ada@x.com\nNoMail,\nBlank,   \nShortRow\nBob,bob@y.com\n";
        let pipeline = pipeline_with_csv(csv, MockConfig::new("input.csv")).await;

        let column = pipeline.extract().await.unwrap();

        assert_eq!(column.values, vec!["ada@x.com", "bob@y.com"]);
    }

    #[tokio::test]
    async fn test_extract_unknown_column_fails() {
        let csv = "name,email\nAda,ada@x.com\n";
        let mut config = MockConfig::new("input.csv");
        config.column = "mail_address".to_string();
        let pipeline = pipeline_with_csv(csv, config).await;

        let err = pipeline.extract().await.unwrap_err();

        assert!(matches!(err, EtlError::ColumnNotFoundError { .. }));
    }

    #[tokio::test]
    async fn test_extract_index_out_of_header_range_fails() {
        let csv = "name,email\nAda,ada@x.com\n";
        let mut config = MockConfig::new("input.csv");
        config.column = "7".to_string();
        let pipeline = pipeline_with_csv(csv, config).await;

        let err = pipeline.extract().await.unwrap_err();

        assert!(matches!(err, EtlError::ColumnNotFoundError { .. }));
    }

    #[tokio::test]
    async fn test_extract_name_selector_without_headers_fails() {
        let csv = "ada@x.com\nbob@y.com\n";
        let mut config = MockConfig::new("input.csv");
        config.has_headers = false;
        let pipeline = pipeline_with_csv(csv, config).await;

        let err = pipeline.extract().await.unwrap_err();

        assert!(matches!(err, EtlError::InvalidConfigValueError { .. }));
    }

    #[tokio::test]
    async fn test_extract_headerless_with_index() {
        let csv = "ada@x.com\nbob@y.com\n";
        let mut config = MockConfig::new("input.csv");
        config.has_headers = false;
        config.column = "0".to_string();
        let pipeline = pipeline_with_csv(csv, config).await;

        let column = pipeline.extract().await.unwrap();

        assert_eq!(column.column, "#0");
        assert_eq!(column.values, vec!["ada@x.com", "bob@y.com"]);
    }

    #[tokio::test]
    async fn test_extract_with_semicolon_delimiter() {
        let csv = "name;email\nAda;ada@x.com\n";
        let mut config = MockConfig::new("input.csv");
        config.delimiter = b';';
        let pipeline = pipeline_with_csv(csv, config).await;

        let column = pipeline.extract().await.unwrap();

        assert_eq!(column.values, vec!["ada@x.com"]);
    }

    #[tokio::test]
    async fn test_extract_respects_max_rows() {
        let csv = "email\na@x.com\nb@x.com\nc@x.com\n";
        let mut config = MockConfig::new("input.csv");
        config.max_rows = Some(2);
        let pipeline = pipeline_with_csv(csv, config).await;

        let column = pipeline.extract().await.unwrap();

        assert_eq!(column.values, vec!["a@x.com", "b@x.com"]);
    }

    #[tokio::test]
    async fn test_extract_from_url() {
        let server = MockServer::start();
        let csv_mock = server.mock(|when, then| {
            when.method(GET).path("/contacts.csv");
            then.status(200)
                .header("Content-Type", "text/csv")
                .body("email\nada@x.com\nbob@y.com\n");
        });

        let storage = MockStorage::new();
        let config = MockConfig::new(&server.url("/contacts.csv"));
        let pipeline = ColumnPipeline::new(storage, config);

        let column = pipeline.extract().await.unwrap();

        csv_mock.assert();
        assert_eq!(column.values, vec!["ada@x.com", "bob@y.com"]);
    }

    #[tokio::test]
    async fn test_extract_from_url_http_error() {
        let server = MockServer::start();
        let csv_mock = server.mock(|when, then| {
            when.method(GET).path("/contacts.csv");
            then.status(404);
        });

        let storage = MockStorage::new();
        let config = MockConfig::new(&server.url("/contacts.csv"));
        let pipeline = ColumnPipeline::new(storage, config);

        let err = pipeline.extract().await.unwrap_err();

        csv_mock.assert();
        assert!(matches!(err, EtlError::DownloadError(_)));
    }

    #[tokio::test]
    async fn test_transform_dedupes_and_sorts() {
        let storage = MockStorage::new();
        let config = MockConfig::new("input.csv");
        let pipeline = ColumnPipeline::new(storage, config);

        let column = ColumnValues {
            column: "email".to_string(),
            values: vec![
                "a@x.com".to_string(),
                "A@X.COM".to_string(),
                " b@y.com".to_string(),
                "c".to_string(),
            ],
        };
        let report = pipeline.transform(column).await.unwrap();

        assert_eq!(report.email_list(), "c, a@x.com, b@y.com");
        assert_eq!(report.unique_count, 3);
        assert_eq!(report.duplicate_count, 1);
    }

    #[tokio::test]
    async fn test_load_writes_list_log_and_summary() {
        let storage = MockStorage::new();
        let config = MockConfig::new("input.csv");
        let pipeline = ColumnPipeline::new(storage.clone(), config);

        let report = DedupReport {
            unique_emails: vec!["a@x.com".to_string(), "b@y.com".to_string()],
            log_entries: vec![
                "Extraction report - 2025-12-24 10:30".to_string(),
                "DUPLICATE: a@x.com".to_string(),
            ],
            unique_count: 2,
            duplicate_count: 1,
        };

        let output_path = pipeline.load(report).await.unwrap();

        assert_eq!(output_path, "test_output/emails.txt");

        let list = storage.get_file("test_output/emails.txt").await.unwrap();
        assert_eq!(String::from_utf8(list).unwrap(), "a@x.com, b@y.com");

        let log = storage.get_file("test_output/duplicates.txt").await.unwrap();
        let log = String::from_utf8(log).unwrap();
        assert!(log.starts_with("Extraction report - "));
        assert!(log.ends_with("DUPLICATE: a@x.com"));

        let summary = storage.get_file("test_output/summary.json").await.unwrap();
        let summary: serde_json::Value = serde_json::from_slice(&summary).unwrap();
        assert_eq!(summary["unique_count"], 2);
        assert_eq!(summary["duplicate_count"], 1);
    }

    #[tokio::test]
    async fn test_load_with_bundle_writes_zip() {
        let storage = MockStorage::new();
        let mut config = MockConfig::new("input.csv");
        config.bundle = true;
        let pipeline = ColumnPipeline::new(storage.clone(), config);

        let report = DedupReport {
            unique_emails: vec!["a@x.com".to_string()],
            log_entries: vec!["Extraction report - 2025-12-24 10:30".to_string()],
            unique_count: 1,
            duplicate_count: 0,
        };

        let output_path = pipeline.load(report).await.unwrap();

        assert_eq!(output_path, "test_output/maillist_output.zip");

        let zip_data = storage
            .get_file("test_output/maillist_output.zip")
            .await
            .unwrap();
        let cursor = std::io::Cursor::new(zip_data);
        let mut archive = zip::ZipArchive::new(cursor).unwrap();

        assert_eq!(archive.len(), 3);

        let mut file_names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        file_names.sort();
        assert_eq!(
            file_names,
            vec!["duplicates.txt", "emails.txt", "summary.json"]
        );

        let mut list_file = archive.by_name("emails.txt").unwrap();
        let mut content = String::new();
        std::io::Read::read_to_string(&mut list_file, &mut content).unwrap();
        assert_eq!(content, "a@x.com");
    }

    #[tokio::test]
    async fn test_end_to_end_stages_on_mock_storage() {
        let csv = "name,email\nAda, Ada@X.com \nBob,bob@y.com\nDup,ada@x.com\nNoMail,\n";
        let pipeline = pipeline_with_csv(csv, MockConfig::new("input.csv")).await;

        let column = pipeline.extract().await.unwrap();
        let report = pipeline.transform(column).await.unwrap();

        assert_eq!(report.email_list(), "ada@x.com, bob@y.com");
        assert_eq!(report.unique_count, 2);
        assert_eq!(report.duplicate_count, 1);
        assert_eq!(&report.log_entries[1..], &["DUPLICATE: ada@x.com"]);
    }
}
