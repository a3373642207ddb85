//! Shared helpers for tests that talk to a mock verification service.
#![allow(dead_code)] // Test utility module - not all helpers used in every test

use std::net::TcpListener;

use gatekeep::GatekeepConfig;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub const SEARCH_PATH: &str = "/email/thread/search";

/// Short enough to keep the suite fast, long enough to measure.
pub const RETRY_DELAY_MS: u64 = 20;

/// Configuration pointing at `uri` with a test-sized retry delay.
pub fn config(uri: impl Into<String>) -> GatekeepConfig {
    GatekeepConfig {
        retry_delay_ms: RETRY_DELAY_MS,
        request_timeout_secs: 2,
        connect_timeout_secs: 1,
        ..GatekeepConfig::new(uri)
    }
}

/// A base URI nothing is listening on.
pub fn refused_uri() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    format!("http://{addr}")
}

/// Answer every search request with `status`.
pub async fn respond_always(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Answer the next `times` search requests with `status`, taking precedence
/// over anything mounted afterwards.
pub async fn respond_times(server: &MockServer, status: u16, times: u64) {
    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(status))
        .up_to_n_times(times)
        .mount(server)
        .await;
}

pub const MESSAGE: &[u8] = b"From: customer@example.com\r\n\
    To: support@example.org\r\n\
    Message-ID: <reply-7@example.com>\r\n\
    In-Reply-To:   <thread-42@example.org>  \r\n\
    Subject: Re: your ticket\r\n\
    \r\n\
    Thanks!\r\n";
