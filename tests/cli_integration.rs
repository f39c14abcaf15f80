//! CLI Integration Tests
//!
//! Tests the command-line interface end-to-end.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Get the binary to test.
fn risksight() -> Command {
    let mut cmd = Command::cargo_bin("risksight").unwrap();
    cmd.env_remove("RISKSIGHT_API_BASE_URL").env_remove("RISKSIGHT_API_KEY");
    cmd
}

const RESULT_JSON: &str = r#"{
  "document_analysis": {
    "document_type": "meeting_transcript",
    "industry": "technology",
    "company_scale": "startup",
    "analysis_timestamp": "2025-01-13T11:08:11.838962",
    "document_length": 1297
  },
  "identified_risk": [
    {
      "risk_id": "RISK_001",
      "title": "Insufficient Operational Runway",
      "description": "Cash covers only six months of operations.",
      "category": "financial",
      "severity": "critical",
      "probability": "high",
      "risk_score": 9.0,
      "impact_areas": ["operations"],
      "mitigation_recommendations": ["Accelerate investor outreach"],
      "context_evidence": "Our runway is only six months."
    },
    {
      "risk_id": "RISK_002",
      "title": "Competitor Pricing Pressure",
      "description": "A funded competitor undercuts pricing.",
      "category": "market",
      "severity": "medium",
      "probability": "medium",
      "risk_score": 5.0,
      "impact_areas": ["revenue"],
      "mitigation_recommendations": ["Differentiate on service"],
      "context_evidence": "They launched at half our price."
    }
  ],
  "risk_summary": {
    "total_risks": 2,
    "risk_distribution": { "critical": 1, "high": 0, "medium": 1, "low": 0 },
    "top_categories": ["financial", "market"],
    "overall_risk_score": 7.0,
    "key_concerns": ["Short runway"]
  },
  "processing_time": 32.26
}"#;

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    risksight()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("AI business-risk analysis"));
}

#[test]
fn test_version_flag() {
    risksight()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_invalid_subcommand() {
    risksight().arg("invalid-command-that-does-not-exist").assert().failure();
}

#[test]
fn test_analyze_rejects_unknown_industry() {
    risksight()
        .args(["analyze", "notes.txt", "--industry", "mining"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("possible values"));
}

// ============================================================================
// Validate Command Tests
// ============================================================================

#[test]
fn test_validate_accepts_text_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("meeting.txt").write_str("Quarterly review notes").unwrap();

    risksight()
        .args(["validate", "meeting.txt"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("meeting.txt").and(predicate::str::contains("text/plain")));

    temp.close().unwrap();
}

#[test]
fn test_validate_rejects_executable() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("setup.exe").write_binary(&[0x4d, 0x5a, 0x90, 0x00]).unwrap();

    risksight()
        .args(["validate", "setup.exe"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Only PDF, DOCX, DOC, and TXT files are allowed"));

    temp.close().unwrap();
}

#[test]
fn test_validate_rejects_large_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("huge.pdf").write_binary(&vec![0u8; 10 * 1024 * 1024 + 1]).unwrap();

    risksight()
        .args(["validate", "huge.pdf"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("File size must be less than 10MB"));

    temp.close().unwrap();
}

#[test]
fn test_validate_missing_file() {
    risksight()
        .args(["validate", "/nonexistent/risksight/meeting.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open"));
}

// ============================================================================
// Report & Template Tests
// ============================================================================

#[test]
fn test_report_from_json() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("risk-analysis-result.json").write_str(RESULT_JSON).unwrap();

    risksight()
        .args(["report", "risk-analysis-result.json"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("RISK ANALYSIS REPORT")
                .and(predicate::str::contains("Insufficient Operational Runway"))
                .and(predicate::str::contains("Critical: 1 (50.0%)"))
                .and(predicate::str::contains("Generated by RiskSight AI")),
        );

    temp.close().unwrap();
}

#[test]
fn test_report_to_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("result.json").write_str(RESULT_JSON).unwrap();

    risksight()
        .args(["report", "result.json", "--output", "report.txt"])
        .current_dir(temp.path())
        .assert()
        .success();

    temp.child("report.txt").assert(predicate::str::contains("Competitor Pricing Pressure"));
    temp.close().unwrap();
}

#[test]
fn test_report_rejects_malformed_json() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("broken.json").write_str("{\"identified_risk\": 3}").unwrap();

    risksight()
        .args(["report", "broken.json"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid analysis JSON"));

    temp.close().unwrap();
}

#[test]
fn test_template() {
    risksight()
        .arg("template")
        .assert()
        .success()
        .stdout(predicate::str::contains("Meeting Transcript"));
}

// ============================================================================
// Config & Completions Tests
// ============================================================================

#[test]
fn test_config_display_masks_key() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("risksight.toml")
        .write_str("[api]\nbase_url = \"https://risk.example.com/api/v1\"\napi_key = \"secret\"\n")
        .unwrap();

    risksight()
        .args(["--config", "risksight.toml", "config"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("https://risk.example.com/api/v1")
                .and(predicate::str::contains("secret").not()),
        );

    temp.close().unwrap();
}

#[test]
fn test_config_path_flag() {
    risksight().args(["config", "--path"]).assert().success();
}

#[test]
fn test_completions() {
    risksight()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("risksight"));
}

// ============================================================================
// Analyze Command Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_analyze_against_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/file-processor/process-upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "filename": "meeting.txt",
            "file_type": "txt",
            "file_size_mb": 0.01,
            "processing_time_ms": 8.0,
            "extracted_text": "Our runway is only six months.",
            "text_length": 30,
            "word_count": 6,
            "line_count": 1
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULT_JSON))
        .expect(1)
        .mount(&server)
        .await;

    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("meeting.txt").write_str("Our runway is only six months.").unwrap();
    temp.child("risksight.toml").write_str("").unwrap();

    risksight()
        .args(["--config", "risksight.toml", "analyze", "meeting.txt"])
        .args(["--industry", "technology", "--scale", "startup", "--json"])
        .env("RISKSIGHT_API_BASE_URL", format!("{}/api/v1", server.uri()))
        .env("RISKSIGHT_API_KEY", "test-token")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Insufficient Operational Runway"))
        .stderr(predicate::str::contains("2 risks have been identified"));

    temp.child("risk-analysis-result.json").assert(predicate::str::contains("RISK_002"));
    temp.close().unwrap();
}

#[test]
fn test_analyze_requires_metadata() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("meeting.txt").write_str("notes").unwrap();
    temp.child("risksight.toml").write_str("").unwrap();

    risksight()
        .args(["--config", "risksight.toml", "analyze", "meeting.txt"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please complete all required fields!"));

    temp.close().unwrap();
}
