//! # canaryfetch CLI
//!
//! Command-line interface for the canaryfetch library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use canaryfetch::cli::Args;
use canaryfetch::pipeline::{self, RunSummary};
use canaryfetch::progress::RunEvent;
use canaryfetch::CanaryfetchError;

#[tokio::main]
async fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("❌ Error: {}", e);
        process::exit(e.exit_code());
    }
}

async fn run() -> Result<(), CanaryfetchError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();
    let config = args.to_config();

    let summary = pipeline::run(&config, print_event).await?;
    print_summary(&summary, total_start.elapsed().as_secs_f64());

    Ok(())
}

fn print_event(event: &RunEvent) {
    match event {
        RunEvent::LoggedIn(_) => println!("✅ {}", event),
        RunEvent::ChannelResolved(_) => println!("{}", event),
        RunEvent::Exported { .. } => println!("\n🎉 Done! {}", event),
    }
}

fn print_summary(summary: &RunSummary, seconds: f64) {
    let stats = &summary.stats;

    println!();
    println!("📊 Summary:");
    println!("   Messages:  {}", stats.messages_seen);
    println!("   Embeds:    {} messages", stats.messages_with_embeds);
    println!(
        "   Dropped:   {} ({:.1}%)",
        stats.dropped(),
        stats.drop_ratio()
    );
    if stats.malformed_fields > 0 {
        println!("   Malformed: {} fields skipped", stats.malformed_fields);
    }
    if let (Some(oldest), Some(newest)) = (stats.oldest, stats.newest) {
        println!(
            "   Span:      {} → {}",
            oldest.format("%Y-%m-%d %H:%M"),
            newest.format("%Y-%m-%d %H:%M")
        );
    }
    println!("   Time:      {:.2}s", seconds);
}
