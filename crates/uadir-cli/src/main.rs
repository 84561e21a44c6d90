//! `uadir`: command-line client for the Ukraine experts directory.
//!
//! # Usage
//!
//! ```text
//! uadir --url http://localhost:8000 list --type organization --city 3
//! uadir --config ~/.config/uadir/config.toml import experts.json
//! ```

mod client;
mod transfer;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uadir_core::expert::{ExpertDetails, ExpertSummary, ExpertType, FocusArea};
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "uadir", about = "Client for the Ukraine experts directory")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the uadir server (default: http://localhost:8000).
  #[arg(long, env = "UADIR_URL")]
  url: Option<String>,

  /// Username for write operations.
  #[arg(long, env = "UADIR_USER")]
  user: Option<String>,

  /// Password for write operations (plaintext).
  #[arg(long, env = "UADIR_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List every city.
  Cities,
  /// List experts, optionally filtered.
  List {
    /// `individual` or `organization`.
    #[arg(long = "type", value_parser = ExpertType::parse)]
    kind:     Option<ExpertType>,
    /// Only experts in this city.
    #[arg(long)]
    city:     Option<i64>,
    /// Only experts working in this focus area.
    #[arg(long, value_parser = FocusArea::parse)]
    focus:    Option<FocusArea>,
    /// Only diaspora experts.
    #[arg(long)]
    diaspora: bool,
  },
  /// Show one expert in full.
  Show { id: Uuid },
  /// Case-insensitive search over names, descriptions and tags.
  Search { term: String },
  /// Print directory statistics.
  Stats,
  /// Create experts from a JSON array of create payloads.
  Import { file: PathBuf },
  /// Write every listing as timestamped JSON files into a directory.
  Export { dir: PathBuf },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

fn non_empty(s: String) -> Option<String> { (!s.is_empty()).then_some(s) }

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // Flags and env override the config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| non_empty(file_cfg.url))
      .unwrap_or_else(|| "http://localhost:8000".to_string()),
    username: args
      .user
      .or_else(|| non_empty(file_cfg.username))
      .unwrap_or_default(),
    password: args
      .password
      .or_else(|| non_empty(file_cfg.password))
      .unwrap_or_default(),
  };
  let client = ApiClient::new(api_config)?;

  match args.command {
    Command::Cities => {
      for c in client.cities().await? {
        println!("{:>4}  {}, {}", c.id, c.name, c.country);
      }
    }
    Command::List { kind, city, focus, diaspora } => {
      let mut experts = match (focus, city) {
        (Some(area), _) => client.experts_by_focus(area).await?,
        (None, Some(city_id)) => client.experts_by_city(city_id).await?,
        (None, None) if diaspora && kind == Some(ExpertType::Organization) => {
          client.diaspora_organizations().await?
        }
        (None, None) => client.experts(kind).await?,
      };
      retain_matching(&mut experts, kind, city, diaspora);
      print_summaries(&experts);
    }
    Command::Show { id } => print_details(&client.expert(id).await?),
    Command::Search { term } => {
      if term.trim().is_empty() {
        bail!("search term must not be empty");
      }
      print_summaries(&client.search(&term).await?);
    }
    Command::Stats => {
      let stats = client.statistics().await?;
      println!("{}", serde_json::to_string_pretty(&stats)?);
    }
    Command::Import { file } => {
      let report = transfer::import(&client, &file).await?;
      println!(
        "created {}, skipped {}, failed {}",
        report.created, report.skipped, report.failed
      );
    }
    Command::Export { dir } => {
      for path in transfer::export(&client, &dir).await? {
        println!("{}", path.display());
      }
    }
  }
  Ok(())
}

// ─── Output ───────────────────────────────────────────────────────────────────

/// Apply the filters the chosen endpoint did not already apply.
fn retain_matching(
  experts: &mut Vec<ExpertSummary>,
  kind: Option<ExpertType>,
  city: Option<i64>,
  diaspora: bool,
) {
  experts.retain(|e| {
    kind.is_none_or(|k| e.expert.kind == k)
      && city.is_none_or(|c| e.expert.city_id == c)
      && (!diaspora || e.expert.is_diaspora)
  });
}

fn print_summaries(experts: &[ExpertSummary]) {
  for e in experts {
    println!(
      "{}  {}  [{}] {}, {}",
      e.expert.id,
      e.expert.name,
      e.expert.kind.as_str(),
      e.city_name,
      e.country
    );
  }
}

fn print_details(d: &ExpertDetails) {
  let e = &d.summary.expert;
  println!("{} [{}]", e.name, e.kind.as_str());
  println!("  id:        {}", e.id);
  println!("  location:  {}, {}", d.summary.city_name, d.summary.country);
  if let Some(title) = &e.title {
    println!("  title:     {title}");
  }
  if let Some(affiliation) = &e.affiliation {
    println!("  at:        {affiliation}");
  }
  if let Some(year) = e.founding_year {
    println!("  founded:   {year}");
  }
  if e.is_diaspora {
    println!("  diaspora:  yes");
  }
  if let Some(description) = &e.description {
    println!("\n{description}\n");
  }
  if !d.focus_areas.is_empty() {
    let areas: Vec<_> = d.focus_areas.iter().map(|a| a.as_str()).collect();
    println!("  focus:     {}", areas.join(", "));
  }
  if !d.tags.is_empty() {
    println!("  tags:      {}", d.tags.join(", "));
  }
  for c in &d.contacts {
    let star = if c.is_primary { "*" } else { " " };
    println!("  {star}{:<10} {}", c.kind.as_str(), c.value);
  }
  for l in &d.links {
    println!("  link:      {}", l.url);
  }
  for k in d.key_figures() {
    match &k.role {
      Some(role) => println!("  figure:    {} ({role})", k.name),
      None => println!("  figure:    {}", k.name),
    }
  }
  for p in d.publications() {
    println!("  published: {}", p.title);
  }
  for a in &d.activities {
    match a.date_start {
      Some(date) => println!("  activity:  {date} {}", a.title),
      None => println!("  activity:  {}", a.title),
    }
  }
}
