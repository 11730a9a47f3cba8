//! Smoke test a deployed site.
//!
//! Usage:
//!   smoke-test https://conference.example

use anyhow::bail;
use clap::Parser;
use reqwest::{Client, Method};
use serde_json::{json, Value};
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "smoke-test")]
#[command(about = "Check the health, content and payment routes of a running site")]
struct Args {
    /// Base URL of the site
    #[arg(default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, default_value_t = 10)]
    timeout_seconds: u64,

    /// Skip creating a test order
    #[arg(long)]
    skip_payment: bool,
}

struct Check {
    name: &'static str,
    method: Method,
    path: &'static str,
    body: Option<Value>,
}

async fn run(client: &Client, base: &str, check: &Check) -> Result<String, String> {
    let url = format!("{base}{}", check.path);
    let mut request = client.request(check.method.clone(), &url);
    if let Some(body) = &check.body {
        request = request.json(body);
    }
    let response = request.send().await.map_err(|e| e.to_string())?;
    let status = response.status();
    let body: Value = response.json().await.map_err(|e| format!("{status}: non-JSON body ({e})"))?;
    if !status.is_success() {
        return Err(format!("{status}: {}", body["error"].as_str().unwrap_or("request failed")));
    }
    let detail = match (body.get("status"), body.get("count")) {
        (Some(s), _) => format!("status {s}"),
        (_, Some(c)) => format!("{c} item(s){}", if body["fallback"] == json!(true) { ", fallback" } else { "" }),
        _ => match body["order"]["id"].as_str() {
            Some(id) => format!("order {id}"),
            None => "ok".to_string(),
        },
    };
    Ok(detail)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let base = args.base_url.trim_end_matches('/').to_string();
    let client = Client::builder().timeout(Duration::from_secs(args.timeout_seconds)).build()?;

    let mut checks = vec![
        Check { name: "health", method: Method::GET, path: "/api/health", body: None },
        Check { name: "events", method: Method::GET, path: "/api/events", body: None },
        Check { name: "conference locations", method: Method::GET, path: "/api/conference-locations", body: None },
    ];
    if !args.skip_payment {
        checks.push(Check {
            name: "create order",
            method: Method::POST,
            path: "/api/payment/create-order",
            body: Some(json!({"amount": 1, "currency": "INR", "receipt": "smoke-test"})),
        });
    }

    println!("🔎 Smoke testing {base}");
    let mut failures = 0;
    for check in &checks {
        let started = Instant::now();
        match run(&client, &base, check).await {
            Ok(detail) => println!("  ✅ {:<22} {} ({} ms)", check.name, detail, started.elapsed().as_millis()),
            Err(e) => {
                failures += 1;
                println!("  ❌ {:<22} {}", check.name, e);
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} check(s) failed", checks.len());
    }
    println!("All checks passed");
    Ok(())
}
