use serde::Serialize;
use storefront_client::HttpStorefrontApi;
use storefront_core::api::{StorefrontApi, WarrantyCheckOutcome};
use storefront_core::config::{AppConfig, LoadOptions};

use crate::commands::current_thread_runtime;

const PROBE_SERIAL: &str = "doctor-probe";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool, probe: bool) -> String {
    let report = build_report(probe);

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report(probe: bool) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_admin_token(&config));
            match HttpStorefrontApi::from_config(&config.api) {
                Ok(api) => {
                    checks.push(DoctorCheck {
                        name: "api_client",
                        status: CheckStatus::Pass,
                        details: format!("http client ready for `{}`", api.base_url()),
                    });
                    checks.push(if probe {
                        check_backend_reachability(&api)
                    } else {
                        skipped("backend_reachability", "pass --probe to contact the backend")
                    });
                }
                Err(error) => {
                    checks.push(DoctorCheck {
                        name: "api_client",
                        status: CheckStatus::Fail,
                        details: error.to_string(),
                    });
                    checks.push(skipped(
                        "backend_reachability",
                        "skipped because the http client could not be built",
                    ));
                }
            }
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["admin_token", "api_client", "backend_reachability"] {
                checks.push(skipped(name, "skipped because configuration did not load"));
            }
        }
    }

    let any_failed = checks.iter().any(|check| check.status == CheckStatus::Fail);
    let overall_status = if any_failed { CheckStatus::Fail } else { CheckStatus::Pass };
    let summary = if any_failed {
        "doctor: one or more readiness checks failed".to_string()
    } else {
        "doctor: all readiness checks passed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn skipped(name: &'static str, details: &str) -> DoctorCheck {
    DoctorCheck { name, status: CheckStatus::Skipped, details: details.to_string() }
}

fn check_admin_token(config: &AppConfig) -> DoctorCheck {
    if config.api.has_admin_token() {
        DoctorCheck {
            name: "admin_token",
            status: CheckStatus::Pass,
            details: "admin token configured for directory commands".to_string(),
        }
    } else {
        skipped("admin_token", "no admin token configured; `warranties` is unavailable")
    }
}

fn check_backend_reachability(api: &HttpStorefrontApi) -> DoctorCheck {
    let runtime = match current_thread_runtime() {
        Ok(runtime) => runtime,
        Err(details) => {
            return DoctorCheck { name: "backend_reachability", status: CheckStatus::Fail, details };
        }
    };

    match runtime.block_on(api.check_warranty(PROBE_SERIAL)) {
        Ok(outcome) => DoctorCheck {
            name: "backend_reachability",
            status: CheckStatus::Pass,
            details: match outcome {
                WarrantyCheckOutcome::NotFound => "backend answered the warranty probe".to_string(),
                other => format!("backend answered the warranty probe with {other:?}"),
            },
        },
        Err(error) => DoctorCheck {
            name: "backend_reachability",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
