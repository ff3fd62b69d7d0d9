//! End-to-end cycle tests
//!
//! Runs the orchestrator against mock provider and image servers.

use pingrab::prelude::*;
use pingrab::providers::PinterestClient;
use pingrab::Error;
use tokio::time::timeout;
use wiremock::MockServer;

mod common;
use common::{TEST_TIMEOUT, UNREACHABLE_URL, cycle_config, file_count, mount_image, mount_search};

/// Checks `{keyword}_{timestamp_ms}_{index}{extension}`.
fn matches_naming(name: &str, keyword: &str, index: usize, extension: &str) -> bool {
    let Some(rest) = name.strip_prefix(&format!("{}_", keyword)) else {
        return false;
    };
    let Some(stamp) = rest.strip_suffix(&format!("_{}{}", index, extension)) else {
        return false;
    };
    !stamp.is_empty() && stamp.chars().all(|c| c.is_ascii_digit())
}

fn quiet(client: PinterestClient) -> Orchestrator {
    Orchestrator::new(client).with_delay_policy(FixedDelay::none())
}

#[cfg(test)]
mod cycle_tests {
    use super::*;

    #[tokio::test]
    async fn test_partial_failure_scenario() {
        let server = MockServer::start().await;
        let first = mount_image(&server, "/pins/first.jpg", 12_345).await;
        let mut urls = vec![first, UNREACHABLE_URL.to_string()];
        for i in 0..3 {
            urls.push(mount_image(&server, &format!("/pins/extra{}.jpg", i), 10).await);
        }
        mount_search(&server, &urls).await;

        let temp = tempfile::tempdir().unwrap();
        let config = cycle_config("cats", temp.path(), 2);
        let stats = timeout(
            TEST_TIMEOUT,
            quiet(PinterestClient::with_base_url(server.uri())).search_and_download(&config),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(stats.found_count, 5);
        assert_eq!(stats.attempted_count, 2);
        assert_eq!(stats.succeeded_count, 1);
        assert_eq!(stats.failed_count, 1);
        assert_eq!(stats.total_bytes, 12_345);
        assert_eq!(stats.downloaded_filenames.len(), 1);
        assert!(matches_naming(&stats.downloaded_filenames[0], "cats", 1, ".jpg"));

        // The failed attempt leaves nothing behind.
        assert_eq!(file_count(temp.path()), 1);
    }

    #[tokio::test]
    async fn test_limit_exceeds_found_count() {
        let server = MockServer::start().await;
        let mut urls = Vec::new();
        for (i, ext) in ["png", "gif", "webp"].iter().enumerate() {
            urls.push(mount_image(&server, &format!("/pins/{}.{}", i, ext), 100 + i).await);
        }
        mount_search(&server, &urls).await;

        let temp = tempfile::tempdir().unwrap();
        let config = cycle_config("birds", temp.path(), 10);
        let stats = quiet(PinterestClient::with_base_url(server.uri()))
            .search_and_download(&config)
            .await
            .unwrap();

        assert_eq!(stats.attempted_count, 3);
        assert_eq!(stats.succeeded_count, 3);
        assert_eq!(stats.total_bytes, 100 + 101 + 102);
        assert!(matches_naming(&stats.downloaded_filenames[0], "birds", 1, ".png"));
        assert!(matches_naming(&stats.downloaded_filenames[1], "birds", 2, ".gif"));
        assert!(matches_naming(&stats.downloaded_filenames[2], "birds", 3, ".webp"));
        assert_eq!(file_count(temp.path()), 3);
    }

    #[tokio::test]
    async fn test_attempted_is_min_of_limit_and_found() {
        let server = MockServer::start().await;
        let mut urls = Vec::new();
        for i in 0..4 {
            urls.push(mount_image(&server, &format!("/p/{}", i), 8).await);
        }
        mount_search(&server, &urls).await;

        for limit in [1usize, 3, 4, 7] {
            let temp = tempfile::tempdir().unwrap();
            let stats = quiet(PinterestClient::with_base_url(server.uri()))
                .search_and_download(&cycle_config("fish", temp.path(), limit))
                .await
                .unwrap();
            assert_eq!(stats.attempted_count, limit.min(4), "limit {}", limit);
            assert_eq!(
                stats.succeeded_count + stats.failed_count,
                stats.attempted_count
            );
            assert_eq!(stats.total_bytes, 8 * stats.succeeded_count as u64);
        }
    }

    #[tokio::test]
    async fn test_fully_failed_batch_still_reports() {
        let server = MockServer::start().await;
        let urls = vec![UNREACHABLE_URL.to_string(), format!("{}/gone.jpg", server.uri())];
        mount_search(&server, &urls).await;

        let temp = tempfile::tempdir().unwrap();
        let stats = quiet(PinterestClient::with_base_url(server.uri()))
            .search_and_download(&cycle_config("ghosts", temp.path(), 5))
            .await
            .unwrap();

        assert_eq!(stats.attempted_count, 2);
        assert_eq!(stats.succeeded_count, 0);
        assert_eq!(stats.failed_count, 2);
        assert_eq!(stats.total_bytes, 0);
        assert!(stats.downloaded_filenames.is_empty());
        assert_eq!(file_count(temp.path()), 0);
    }

    #[tokio::test]
    async fn test_empty_search_result() {
        let server = MockServer::start().await;
        mount_search(&server, &[]).await;

        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("new").join("folder");
        let stats = quiet(PinterestClient::with_base_url(server.uri()))
            .search_and_download(&cycle_config("nothing", &nested, 5))
            .await
            .unwrap();

        assert_eq!(stats.found_count, 0);
        assert_eq!(stats.attempted_count, 0);
        assert_eq!(stats.succeeded_count, 0);
        assert_eq!(stats.failed_count, 0);
        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn test_provider_outage_aborts_cycle() {
        let server = MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let temp = tempfile::tempdir().unwrap();
        let err = quiet(PinterestClient::with_base_url(server.uri()))
            .search_and_download(&cycle_config("cats", temp.path(), 5))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Provider { .. }));
        assert_eq!(file_count(temp.path()), 0);
    }

    #[tokio::test]
    async fn test_run_cycle_with_given_assets() {
        let server = MockServer::start().await;
        let assets = vec![
            AssetDescriptor::new(mount_image(&server, "/a.jpg", 5).await),
            AssetDescriptor::new(mount_image(&server, "/b.jpg", 6).await),
        ];

        let temp = tempfile::tempdir().unwrap();
        let stats = quiet(PinterestClient::with_base_url(server.uri()))
            .run_cycle(&assets, &cycle_config("given", temp.path(), 1))
            .await
            .unwrap();

        assert_eq!(stats.found_count, 2);
        assert_eq!(stats.attempted_count, 1);
        assert_eq!(stats.total_bytes, 5);
    }
}
