//! Integration tests for CLI commands

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to run artifetch command
fn artifetch(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_artifetch"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute artifetch")
}

/// Write a configuration with one Helm account and one Bitbucket account
fn write_config(dir: &TempDir, helm_repository: &str) -> PathBuf {
    let path = dir.path().join("artifacts.yaml");
    std::fs::write(
        &path,
        format!(
            r#"http:
  timeout: 5s
helm:
  enabled: true
  accounts:
    - name: stable
      repository: {helm_repository}
bitbucket:
  enabled: true
  accounts:
    - name: bb
      token: secret
"#
        ),
    )
    .unwrap();
    path
}

const INDEX: &str = r#"apiVersion: v1
entries:
  nginx:
    - name: nginx
      version: "15.1.0"
      urls: ["charts/nginx-15.1.0.tgz"]
    - name: nginx
      version: "15.0.0"
      urls: ["charts/nginx-15.0.0.tgz"]
  redis:
    - name: redis
      version: "18.0.0"
      urls: ["charts/redis-18.0.0.tgz"]
"#;

/// Serve an index whose candidate URLs point back at the server
async fn helm_server() -> MockServer {
    let server = MockServer::start().await;
    let index = INDEX.replace("charts/", &format!("{}/charts/", server.uri()));

    Mock::given(method("GET"))
        .and(path("/index.yaml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/charts/nginx-15.0.0.tgz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"nginx-15.0.0".to_vec()))
        .mount(&server)
        .await;
    server
}

/// Run the binary off the async runtime so the mock server keeps serving
async fn run(config: PathBuf, args: &[&str]) -> Output {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        artifetch(&config, &args)
    })
    .await
    .unwrap()
}

mod accounts_command {
    use super::*;

    #[test]
    fn test_lists_configured_accounts() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, "https://charts.example.com");

        let output = artifetch(&config, &["accounts"]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("stable"));
        assert!(stdout.contains("bb"));
        assert!(stdout.contains("helm/chart"));
    }

    #[test]
    fn test_json_output() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, "https://charts.example.com");

        let output = artifetch(&config, &["accounts", "--json"]);

        let json: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("Output should be valid JSON");
        let accounts = json.as_array().unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0]["name"], "stable");
        assert_eq!(accounts[0]["providerType"], "helm");
        assert_eq!(accounts[0]["listable"], true);
        assert_eq!(accounts[1]["types"][0], "bitbucket/file");
    }

    #[test]
    fn test_missing_config_is_usage_error() {
        let dir = TempDir::new().unwrap();
        let output = artifetch(&dir.path().join("missing.yaml"), &["accounts"]);

        assert_eq!(output.status.code(), Some(64));
    }

    #[test]
    fn test_helm_account_without_repository_is_rejected() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("artifacts.yaml");
        std::fs::write(
            &config,
            "helm:\n  enabled: true\n  accounts:\n    - name: stable\n",
        )
        .unwrap();

        let output = artifetch(&config, &["accounts"]);

        assert_eq!(output.status.code(), Some(64));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("stable"));
    }
}

mod list_commands {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_names_and_versions() {
        let server = helm_server().await;
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, &server.uri());

        let output = run(config.clone(), &["names", "--account", "stable", "--json"]).await;
        assert!(output.status.success());
        let names: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(names, vec!["nginx", "redis"]);

        let output = run(config, &["versions", "--account", "stable", "nginx"]).await;
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["15.1.0", "15.0.0"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_versions_of_unknown_chart_is_not_found() {
        let server = helm_server().await;
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, &server.uri());

        let output = run(config, &["versions", "--account", "stable", "postgres"]).await;

        assert_eq!(output.status.code(), Some(2));
    }

    #[test]
    fn test_bitbucket_account_cannot_list() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, "https://charts.example.com");

        let output = artifetch(&config, &["names", "--account", "bb"]);

        assert_eq!(output.status.code(), Some(64));
    }

    #[test]
    fn test_unknown_account() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, "https://charts.example.com");

        let output = artifetch(&config, &["names", "--account", "missing"]);

        assert_eq!(output.status.code(), Some(2));
    }
}

mod download_command {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_download_chart_to_file() {
        let server = helm_server().await;
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, &server.uri());
        let target = dir.path().join("nginx.tgz");

        let output = run(
            config,
            &[
                "download",
                "--account",
                "stable",
                "--type",
                "helm/chart",
                "--name",
                "nginx",
                "--version",
                "15.0.0",
                "-o",
                target.to_str().unwrap(),
            ],
        )
        .await;

        assert!(
            output.status.success(),
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        assert_eq!(std::fs::read(&target).unwrap(), b"nginx-15.0.0");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_download_index_to_stdout() {
        let server = helm_server().await;
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, &server.uri());

        let output = run(config, &["download", "--type", "helm/index"]).await;

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.starts_with("apiVersion: v1"));
        assert!(stdout.contains("redis"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failed_candidate_exits_with_error() {
        let server = helm_server().await;
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, &server.uri());
        let target = dir.path().join("redis.tgz");

        // redis-18.0.0.tgz is not served: the only candidate returns 404
        let output = run(
            config,
            &[
                "download",
                "--type",
                "helm/chart",
                "--name",
                "redis",
                "--version",
                "18.0.0",
                "-o",
                target.to_str().unwrap(),
            ],
        )
        .await;

        assert_eq!(output.status.code(), Some(1));
        assert!(!target.exists());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("404"));
    }

    #[test]
    fn test_type_not_served_by_account() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, "https://charts.example.com");

        let output = artifetch(
            &config,
            &["download", "--account", "bb", "--type", "helm/chart", "--name", "nginx"],
        );

        assert_eq!(output.status.code(), Some(64));
    }
}
