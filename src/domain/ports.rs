use crate::domain::model::{ColumnValues, DedupReport};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// Path or http(s) URL of the tabular source.
    fn source(&self) -> &str;
    /// Column selector: header name, or 0-based index when all digits.
    fn column(&self) -> &str;
    fn delimiter(&self) -> u8;
    fn has_headers(&self) -> bool;
    fn output_path(&self) -> &str;
    /// Bundle the output files into a single zip archive.
    fn bundle_output(&self) -> bool;
    /// Cap on the number of data rows read, if any.
    fn max_rows(&self) -> Option<usize>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ColumnValues>;
    async fn transform(&self, column: ColumnValues) -> Result<DedupReport>;
    async fn load(&self, report: DedupReport) -> Result<String>;
}
