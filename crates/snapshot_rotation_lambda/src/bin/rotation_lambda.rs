use lambda_runtime::Error;
use snapshot_rotation_lambda::entry;
use snapshot_rotation_lambda::runtime::config::Pipeline;

#[tokio::main]
async fn main() -> Result<(), Error> {
    entry::run(Pipeline::rotation()).await
}
