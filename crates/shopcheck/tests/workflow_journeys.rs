//! Scenario runs end to end: sessions, reports and credentials files.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use shopcheck::{
    run_suite, CheckoutForm, CredentialFixture, FakeClock, Harness, HarnessConfig, MockStorefront,
    ReportSink, RetryPolicy, Scenario, ScenarioInputs, ScenarioStatus, SessionGuard, Workflow,
};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_suite_writes_report_and_quits_sessions() {
    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("reports").join("TestResults.txt");
    let report = ReportSink::new(&report_path);
    report.reset(shopcheck::REPORT_HEADER).unwrap();

    let clock = FakeClock::shared();
    let mut sites = Vec::new();
    let suite = run_suite("ui", &Scenario::ALL, &ScenarioInputs::default(), |scenario| {
        let site = MockStorefront::new(clock.clone());
        sites.push(site.clone());
        Ok(Harness::with_parts(
            SessionGuard::new(site, scenario.name()),
            HarnessConfig::default(),
            clock.clone(),
            report.clone(),
        ))
    });

    assert!(suite.all_passed(), "{:?}", suite.failures());
    assert_eq!(suite.passed_count(), Scenario::ALL.len());
    assert!(sites.iter().all(|s| s.quit_count() == 1));

    let text = fs::read_to_string(&report_path).unwrap();
    assert!(text.starts_with("Test Results:"));
    for scenario in Scenario::ALL {
        assert!(text.contains(&format!("Scenario {scenario}: Passed")), "{scenario}");
    }
    let line = text.lines().find(|l| l.contains("Scenario started")).unwrap();
    // "YYYY-MM-DD HH:MM:SS : message"
    assert_eq!(&line[19..22], " : ");
}

#[test]
fn test_session_quit_even_when_scenario_fails() {
    let clock = FakeClock::shared();
    let site = MockStorefront::new(clock.clone()).with_disabled_checkout();
    let inspect = site.clone();
    let suite = run_suite("ui", &[Scenario::Checkout], &ScenarioInputs::default(), move |scenario| {
        Ok(Harness::with_parts(
            SessionGuard::new(site.clone(), scenario.name()),
            HarnessConfig::default(),
            clock.clone(),
            ReportSink::disabled(),
        ))
    });
    assert_eq!(suite.failed_count(), 1);
    assert_eq!(
        suite.results[0].error.as_deref(),
        Some("Invalid state: Checkout button is not clickable.")
    );
    assert!(inspect.is_quit());
}

#[test]
fn test_credentials_file_drives_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("testdata.json");
    fs::write(
        &path,
        r#"{ "Usernames": ["standard_user", "locked_out_user", "problem_user"], "Password": "secret_sauce" }"#,
    )
    .unwrap();
    let inputs = ScenarioInputs::default().with_credentials(CredentialFixture::load(&path).unwrap());

    let clock = FakeClock::shared();
    let site = MockStorefront::new(clock.clone());
    let h = Harness::with_parts(site.clone(), HarnessConfig::default(), clock, ReportSink::disabled());
    let result = Workflow::new(&h, &inputs).run(Scenario::EndToEnd);

    assert!(result.passed(), "{:?}", result.error);
    assert_eq!(result.notes.len(), 3);
    assert_eq!(site.orders_completed(), 2);
}

#[test]
fn test_valid_user_from_users_list_with_expected_url() {
    let json = r#"{ "users": [
        { "username": "", "password": "" },
        { "username": "standard_user", "password": "secret_sauce",
          "expectedUrl": "https://www.saucedemo.com/inventory.html" }
    ] }"#;
    let inputs = ScenarioInputs::default().with_credentials(CredentialFixture::from_json_str(json).unwrap());
    let clock = FakeClock::shared();
    let h = Harness::with_parts(MockStorefront::new(clock.clone()), HarnessConfig::default(), clock, ReportSink::disabled());
    let result = Workflow::new(&h, &inputs).run(Scenario::LoginValid);
    assert!(result.passed(), "{:?}", result.error);
    assert_eq!(result.notes, vec!["Logged in as standard_user".to_string()]);
}

#[test]
fn test_wrong_expected_url_fails_after_wait() {
    let json = r#"{ "validUser": { "username": "standard_user", "password": "secret_sauce",
                    "expectedUrl": "https://www.saucedemo.com/cart.html" } }"#;
    let inputs = ScenarioInputs::default().with_credentials(CredentialFixture::from_json_str(json).unwrap());
    let clock = FakeClock::shared();
    let h = Harness::with_parts(
        MockStorefront::new(clock.clone()),
        HarnessConfig::default(),
        clock.clone(),
        ReportSink::disabled(),
    );
    let result = Workflow::new(&h, &inputs).run(Scenario::LoginValid);
    assert_eq!(result.status, ScenarioStatus::Failed);
    assert!(result.error.unwrap().contains("but was https://www.saucedemo.com/inventory.html"));
    assert_eq!(result.duration, Duration::from_secs(10));
}

#[test]
fn test_single_attempt_policy_misses_late_cart() {
    let clock = FakeClock::shared();
    let site = MockStorefront::new(clock.clone()).with_cart_render_lag(Duration::from_secs(1));
    let config = HarnessConfig::default().with_retry(RetryPolicy::new(1, 2_000));
    let h = Harness::with_parts(site, config, clock.clone(), ReportSink::disabled());
    let result = Workflow::new(&h, &ScenarioInputs::default()).run(Scenario::CartValidation);
    assert!(!result.passed());
    assert_eq!(clock.sleeps_of(Duration::from_secs(2)), 0);
}

#[test]
fn test_custom_form_is_used_for_checkout() {
    let inputs = ScenarioInputs::default().with_form(CheckoutForm::new("Ada", "Lovelace", "90210"));
    let clock = FakeClock::shared();
    let site = MockStorefront::new(clock.clone());
    let h = Harness::with_parts(site.clone(), HarnessConfig::default(), clock, ReportSink::disabled());
    assert!(Workflow::new(&h, &inputs).run(Scenario::Checkout).passed());
    assert_eq!(
        site.shipping(),
        Some(("Ada".into(), "Lovelace".into(), "90210".into()))
    );
}
