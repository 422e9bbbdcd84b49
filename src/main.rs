//! Command line decoder for terminator-delimited JSON streams.
//!
//! Reads a file or standard input, prints each decoded record as compact
//! JSON on standard output and reports a decode failure on standard error.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use lineframe::{
    BufferedStreamDecoder,
    DecoderConfig,
    ErrorPolicy,
    StreamEvent,
    source::pump_with_capacity,
};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout carries only decoded records.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    let policy = if cli.skip_errors {
        ErrorPolicy::SkipAndContinue
    } else {
        ErrorPolicy::StopOnError
    };
    let config = DecoderConfig::default()
        .terminator(cli.terminator)
        .error_policy(policy);

    let terminator = cli.terminator;
    let decoder = BufferedStreamDecoder::with_config(config, move |bytes: &[u8]| {
        let record = bytes.strip_suffix(&[terminator]).unwrap_or(bytes);
        serde_json::from_slice::<serde_json::Value>(record)
    });

    let mut events = decoder.subscribe();
    let printer = tokio::spawn(async move {
        let mut failed = false;
        while let Some(event) = events.recv().await {
            match event {
                StreamEvent::Value(value) => println!("{value}"),
                StreamEvent::Terminal(err) => {
                    eprintln!("lineframe: {err}");
                    eprintln!("record: {}", String::from_utf8_lossy(err.raw()));
                    failed = true;
                }
            }
        }
        failed
    });

    let summary = match &cli.file {
        Some(path) => {
            let file = tokio::fs::File::open(path).await?;
            pump_with_capacity(file, &decoder, cli.chunk_size).await?
        }
        None => pump_with_capacity(tokio::io::stdin(), &decoder, cli.chunk_size).await?,
    };

    let remainder = decoder.finish();
    if !remainder.is_empty() {
        eprintln!(
            "lineframe: ignored {} trailing bytes without terminator",
            remainder.len()
        );
    }
    tracing::debug!(chunks = summary.chunks, bytes = summary.bytes, "input consumed");

    if printer.await? {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
