use aws_sdk_s3::Client;

/// Build an S3 client for a region, optionally pointed at an S3-compatible
/// endpoint (MinIO, LocalStack). Custom endpoints use path-style addressing.
pub async fn build_client(region: &str, endpoint_url: Option<&str>) -> Client {
    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await;

    let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
    if let Some(url) = endpoint_url {
        builder = builder.endpoint_url(url).force_path_style(true);
    }

    Client::from_conf(builder.build())
}
