//! PaperAPI CLI: health checks, account introspection and PDF rendering from the command line.
//!
//! Usage:
//!   paperapi-cli health                                   Check service health
//!   paperapi-cli whoami                                   Show the account behind the API key
//!   paperapi-cli usage                                    Show usage counters
//!   paperapi-cli generate <html-file> <out.pdf>           Render synchronously
//!   paperapi-cli job <html-file> <out.pdf> [options]      Render through an async job

use paperapi_rust::{
    CancellationToken, ClientConfig, Error, PaperApiClient, PdfGenerateRequest, PollPolicy,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return ExitCode::FAILURE;
    }

    let command = args[1].as_str();
    match command {
        "version" | "--version" | "-V" => {
            println!("paperapi-cli {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        "help" | "--help" | "-h" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    let client = match ClientConfig::from_env().and_then(PaperApiClient::from_config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Set PAPERAPI_API_KEY (and optionally PAPERAPI_BASE_URL).");
            return ExitCode::FAILURE;
        }
    };

    let token = CancellationToken::new();
    let ctrl_c = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });
    let client = client.with_cancellation(token);

    let result = match command {
        "health" => cmd_health(&client).await,
        "whoami" => cmd_whoami(&client).await,
        "usage" => cmd_usage(&client).await,
        "generate" => cmd_generate(&client, &args[2..]).await,
        "job" => cmd_job(&client, &args[2..]).await,
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    println!(
        r#"paperapi-cli: PaperAPI command-line client

USAGE:
    paperapi-cli <COMMAND> [OPTIONS]

COMMANDS:
    health                                  Check service health
    whoami                                  Show the account behind the API key
    usage                                   Show usage counters
    generate <html-file> <out.pdf>          Render a PDF synchronously
    job <html-file> <out.pdf> [OPTIONS]     Render a PDF through an async job
        --attempts <N>                      Maximum status polls (default 30)
        --interval-ms <MS>                  Delay between polls (default 2000)
    version                                 Show version information
    help                                    Show this help message

ENVIRONMENT:
    PAPERAPI_API_KEY                        API key (required)
    PAPERAPI_BASE_URL                       Base URL override
    RUST_LOG                                Log filter, e.g. paperapi_rust=debug"#
    );
}

fn report(err: &Error) {
    eprintln!("error: {err}");
    if let Some(status) = err.status() {
        eprintln!("  http status: {status}");
    }
    if let Error::Api(api) = err {
        if let Some(code) = &api.error_code {
            eprintln!("  error code:  {code}");
        }
    }
    if let Some(id) = err.request_id() {
        eprintln!("  request id:  {id}");
    }
    if let Some(body) = err.raw_body().filter(|b| !b.trim().is_empty()) {
        eprintln!("  body:        {body}");
    }
}

async fn cmd_health(client: &PaperApiClient) -> paperapi_rust::Result<()> {
    client.check_health().await?;
    println!("PaperAPI health check succeeded");
    Ok(())
}

async fn cmd_whoami(client: &PaperApiClient) -> paperapi_rust::Result<()> {
    let profile = client.get_who_am_i().await?;
    println!(
        "Authenticated as {} ({}) on plan {} [{}]",
        profile.name, profile.email, profile.plan.name, profile.plan.code
    );
    Ok(())
}

async fn cmd_usage(client: &PaperApiClient) -> paperapi_rust::Result<()> {
    let usage = client.get_usage_summary().await?;
    println!(
        "Usage: {}/{} (remaining {}, overage {}), resets {}",
        usage.used, usage.monthly_limit, usage.remaining, usage.overage, usage.next_recharge_at
    );
    Ok(())
}

async fn cmd_generate(client: &PaperApiClient, args: &[String]) -> paperapi_rust::Result<()> {
    let (input, output) = io_paths(args)?;
    let request = read_request(&input).await?;
    let pdf = client.generate_pdf(&request).await?;
    write_pdf(&output, &pdf).await?;
    println!("PDF saved to {} ({} bytes)", output.display(), pdf.len());
    Ok(())
}

async fn cmd_job(client: &PaperApiClient, args: &[String]) -> paperapi_rust::Result<()> {
    let (input, output) = io_paths(args)?;
    let attempts = flag_value(args, "--attempts")?.unwrap_or(PollPolicy::DEFAULT_MAX_ATTEMPTS);
    let interval = flag_value::<u64>(args, "--interval-ms")?
        .map(Duration::from_millis)
        .unwrap_or(PollPolicy::DEFAULT_INTERVAL);
    let policy = PollPolicy::fixed(attempts, interval);

    let request = read_request(&input).await?;
    let mut job = client.submit_job(&request).await?;
    println!(
        "Enqueued job {} ({}). Track at {}",
        job.id(),
        job.last_status().status,
        job.last_status().links.self_link
    );

    client.poll_until_terminal(&mut job, &policy).await?;
    let pdf = client.fetch_result(&job).await?;
    write_pdf(&output, &pdf).await?;
    println!(
        "Job {} finished after {} polls; PDF saved to {} ({} bytes)",
        job.id(),
        job.polls(),
        output.display(),
        pdf.len()
    );
    Ok(())
}

fn usage_error(msg: impl Into<String>) -> Error {
    Error::validation_with_context(
        msg,
        paperapi_rust::ErrorContext::new().with_source("paperapi_cli"),
    )
}

fn io_paths(args: &[String]) -> paperapi_rust::Result<(PathBuf, PathBuf)> {
    let positional: Vec<&String> = args
        .iter()
        .enumerate()
        .filter(|(i, a)| !a.starts_with("--") && (*i == 0 || !args[i - 1].starts_with("--")))
        .map(|(_, a)| a)
        .collect();
    match positional.as_slice() {
        [input, output, ..] => Ok((PathBuf::from(input), PathBuf::from(output))),
        _ => Err(usage_error("expected <html-file> <out.pdf>")),
    }
}

fn flag_value<T: std::str::FromStr>(args: &[String], flag: &str) -> paperapi_rust::Result<Option<T>> {
    let Some(pos) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    let raw = args
        .get(pos + 1)
        .ok_or_else(|| usage_error(format!("{flag} requires a value")))?;
    raw.parse::<T>()
        .map(Some)
        .map_err(|_| usage_error(format!("invalid value for {flag}: {raw}")))
}

async fn read_request(path: &Path) -> paperapi_rust::Result<PdfGenerateRequest> {
    let html = tokio::fs::read_to_string(path).await?;
    Ok(PdfGenerateRequest::new(html))
}

async fn write_pdf(path: &Path, bytes: &[u8]) -> paperapi_rust::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::write(path, bytes).await?;
    Ok(())
}
