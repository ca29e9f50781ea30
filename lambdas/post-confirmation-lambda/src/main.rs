use std::sync::Arc;

use aws_lambda_events::event::cognito::CognitoEventUserPoolsPostConfirmation;
use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use registration_shared::directory::PgUserDirectory;
use registration_shared::records::DynamoRecordStore;
use registration_shared::{Config, RegistrationFinalizer};

type Finalizer = RegistrationFinalizer<DynamoRecordStore, PgUserDirectory>;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    // Clients are created once per cold start and shared by every invocation
    let config = Config::from_env()?;
    tracing::info!("Starting post confirmation lambda with {:?}", config);

    let aws_config = aws_config::load_from_env().await;
    let store = DynamoRecordStore::new(DynamoClient::new(&aws_config), &config);
    let directory = PgUserDirectory::connect(&config).await;

    let finalizer: Arc<Finalizer> = Arc::new(RegistrationFinalizer::new(store, directory));

    run(service_fn(
        move |event: LambdaEvent<CognitoEventUserPoolsPostConfirmation>| {
            let finalizer = Arc::clone(&finalizer);
            async move { function_handler(event, finalizer).await }
        },
    ))
    .await
}

async fn function_handler(
    event: LambdaEvent<CognitoEventUserPoolsPostConfirmation>,
    finalizer: Arc<Finalizer>,
) -> Result<CognitoEventUserPoolsPostConfirmation, Error> {
    tracing::info!("Post confirmation invoked, request id: {}", event.context.request_id);

    Ok(finalizer.finalize(event.payload).await?)
}
