use lambda_runtime::{run, service_fn, Error};
use std::sync::Arc;
use tracing_subscriber;

mod processor;
use processor::TurnTimerProcessor;
use shared::{
    config::TurnTimingConfig,
    repositories::{
        game_repository::DynamoDbGameRepository, lock_repository::DynamoDbGameLockRepository,
        member_repository::DynamoDbTeamMemberRepository, move_repository::DynamoDbMoveRepository,
        team_repository::DynamoDbTeamRepository,
    },
    services::{
        game_end::GameEndEvaluator, game_lock::GameLockService, rule_engine::ChessRuleEngine,
        timeout_service::TimeoutService,
    },
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    // Set up AWS configuration and processor
    let config = aws_config::load_from_env().await;
    let client = aws_sdk_dynamodb::Client::new(&config);
    let timing = TurnTimingConfig::default();

    // Create services
    let games = Arc::new(DynamoDbGameRepository::new(client.clone()));
    let teams = Arc::new(DynamoDbTeamRepository::new(client.clone()));
    let members = Arc::new(DynamoDbTeamMemberRepository::new(client.clone()));
    let moves = Arc::new(DynamoDbMoveRepository::new(client.clone()));
    let locks = Arc::new(DynamoDbGameLockRepository::new(client.clone()));

    let lock = Arc::new(GameLockService::new(locks, timing.clone()));
    let rule_engine = Arc::new(ChessRuleEngine::new());
    let evaluator = Arc::new(GameEndEvaluator::new(rule_engine));

    let timeout_service = Arc::new(TimeoutService::new(
        games.clone(),
        teams,
        members,
        moves,
        lock,
        evaluator,
        timing,
    ));

    // Create processor with services
    let processor = TurnTimerProcessor::new(games, timeout_service);

    // Run the Lambda function
    run(service_fn(
        move |event: lambda_runtime::LambdaEvent<serde_json::Value>| {
            let processor = processor.clone();
            async move { processor.process_event(event.payload).await }
        },
    ))
    .await
}
