#[cfg(feature = "lambda")]
use aws_config::BehaviorVersion;
#[cfg(feature = "lambda")]
use aws_sdk_s3::config::Region;
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use maillist::config::lambda::{LambdaConfig, S3Storage};
#[cfg(feature = "lambda")]
use maillist::domain::ports::Pipeline;
#[cfg(feature = "lambda")]
use maillist::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use maillist::ColumnPipeline;
#[cfg(feature = "lambda")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "lambda")]
#[derive(Deserialize)]
pub struct Request {
    pub source_key: Option<String>,
    pub column: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_prefix: Option<String>,
}

#[cfg(feature = "lambda")]
#[derive(Serialize)]
pub struct Response {
    pub message: String,
    pub output_path: String,
    pub unique_count: usize,
    pub duplicate_count: usize,
}

#[cfg(feature = "lambda")]
async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    tracing::info!("Starting maillist Lambda function");

    // Event fields override the environment when present.
    if let Some(key) = &event.payload.source_key {
        std::env::set_var("SOURCE_KEY", key);
    }
    if let Some(column) = &event.payload.column {
        std::env::set_var("COLUMN", column);
    }
    if let Some(bucket) = &event.payload.s3_bucket {
        std::env::set_var("S3_BUCKET", bucket);
    }
    if let Some(prefix) = &event.payload.s3_prefix {
        std::env::set_var("S3_PREFIX", prefix);
    }

    let lambda_config = LambdaConfig::from_env()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    lambda_config
        .validate()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let config = aws_sdk_s3::config::Builder::from(&config)
        .region(Region::new(lambda_config.s3_region.clone()))
        .build();
    let s3_client = S3Client::from_conf(config);

    let storage = S3Storage::new(s3_client, lambda_config.s3_bucket.clone());
    let pipeline = ColumnPipeline::new(storage, lambda_config);

    // Run the stages directly so the counts can be surfaced in the response.
    let outcome: maillist::Result<(String, maillist::DedupReport)> = async {
        let column = pipeline.extract().await?;
        let report = pipeline.transform(column).await?;
        let output_path = pipeline.load(report.clone()).await?;
        Ok((output_path, report))
    }
    .await;

    let (output_path, report) =
        outcome.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    tracing::info!("maillist Lambda function completed successfully");
    Ok(Response {
        message: "Extraction completed successfully".to_string(),
        output_path,
        unique_count: report.unique_count,
        duplicate_count: report.duplicate_count,
    })
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
