//! Wiring for the `run` command.

use std::sync::Arc;

use push_notifier::{HttpPushNotifier, PushCredentials};
use read_signature::SignatureEngine;
use read_simulator::{
    PayloadBuilder, ReadEndpoints, ReadSimulator, RunSummary, SimulatorConfig, WebReadApi,
};
use reader_config_and_utils::Config;
use session_renewal::{
    build_http_client, RenewalConfig, SessionRefresher, SessionStore, DEFAULT_READ_ROUTE,
    RENEWAL_TIMEOUT,
};
use tracing::info;

/// Build every component from `config` and run the loop to completion.
pub async fn run(config: Config) -> Result<RunSummary, Box<dyn std::error::Error>> {
    config.validate()?;

    let http_client = build_http_client(&config.headers, config.request_timeout())?;

    let api = WebReadApi::new(
        http_client.clone(),
        ReadEndpoints {
            read_url: config.endpoints.read_url.clone(),
            fix_synckey_url: config.endpoints.fix_synckey_url.clone(),
        },
        config.fix_synckey_book_ids.clone(),
    );

    let renewer = SessionRefresher::new(
        http_client,
        RenewalConfig {
            renew_url: config.endpoints.renew_url.clone(),
            route: DEFAULT_READ_ROUTE.to_string(),
            ql_override: config.renewal_ql,
            timeout: RENEWAL_TIMEOUT,
        },
    );

    let notifier = HttpPushNotifier::new(PushCredentials::from_env())?;

    let builder = PayloadBuilder::new(
        config.payload_template.clone(),
        config.books.clone(),
        config.chapters.clone(),
        SignatureEngine::new(config.signing_salt.clone()),
    )?;

    info!(
        read_num = config.read_num,
        books = config.books.len(),
        chapters = config.chapters.len(),
        push_method = ?config.push_method,
        "Configuration loaded"
    );

    let mut simulator = ReadSimulator::new(
        Arc::new(api),
        Arc::new(renewer),
        Arc::new(notifier),
        builder,
        SimulatorConfig {
            target_count: config.read_num,
            pace: config.pace(),
            push_method: config.push_method,
        },
        SessionStore::new(config.cookies.clone()),
    );

    let summary = simulator.run().await?;
    info!(
        minutes = summary.minutes,
        "Reading finished, {:.1} minutes credited",
        summary.minutes
    );
    Ok(summary)
}
