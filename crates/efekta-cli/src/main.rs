//! efekta - inspect and exercise the EFEKTA iAQ device definitions

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use efekta_devices::{
    config, configure, decode, models, set, AttributeReport, Config, DeviceDefinition, Variant,
};
use serde_json::Value;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zcl_protocol::{AttributeValue, Cluster, ZclFrame};

mod dry_run;

use dry_run::{parse_ieee, DryRunHost};

/// Inspect EFEKTA iAQ definitions and dry-run their ZCL traffic
#[derive(Parser, Debug)]
#[command(name = "efekta")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// JSON options file
    #[arg(long, global = true, env = "EFEKTA_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List supported variants and their model ids
    Models,
    /// Print the capability descriptor of a model as JSON
    Describe {
        /// Variant name or zigbee model id
        model: String,
    },
    /// Decode a JSON map of attribute id (or standard name) to value
    Decode {
        model: String,
        #[arg(long)]
        cluster: Cluster,
        #[arg(long, default_value_t = 1)]
        endpoint: u8,
        /// e.g. '{"0x0205": 120, "measuredValue": 0.0004}'
        attributes: String,
    },
    /// Decode a hex encoded Report Attributes or Read Attributes Response frame
    DecodeFrame {
        model: String,
        #[arg(long)]
        cluster: Cluster,
        #[arg(long, default_value_t = 1)]
        endpoint: u8,
        frame: String,
    },
    /// Encode a setting and print the write it produces
    Set {
        model: String,
        field: String,
        value: String,
    },
    /// Print the bind and configure reporting frames for a model
    Configure {
        model: String,
        /// Device IEEE address
        #[arg(long, default_value = "0000000000000000")]
        ieee: String,
        /// Coordinator IEEE address
        #[arg(long, default_value = "0000000000000000")]
        coordinator_ieee: String,
        #[arg(long, default_value_t = 1)]
        coordinator_endpoint: u8,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = match &args.config {
        Some(path) => config::load_config(path).await,
        None => Config::default(),
    };

    match args.command {
        Command::Models => {
            for variant in Variant::ALL {
                let definition = variant.definition();
                println!(
                    "{:<12} {:<12} {}",
                    variant.name(),
                    definition.zigbee_model,
                    definition.vendor
                );
            }
        }
        Command::Describe { model } => {
            let definition = lookup(&model, &config)?;
            definition
                .validate()
                .with_context(|| format!("{} definition is inconsistent", definition.variant))?;
            println!("{}", serde_json::to_string_pretty(&definition.exposes())?);
        }
        Command::Decode {
            model,
            cluster,
            endpoint,
            attributes,
        } => {
            let definition = lookup(&model, &config)?;
            let json: serde_json::Map<String, Value> =
                serde_json::from_str(&attributes).context("Attributes must be a JSON object")?;
            let attributes = json
                .iter()
                .map(|(key, value)| -> Result<(u16, AttributeValue)> {
                    Ok((attribute_id(cluster, key)?, attribute_value(value)?))
                })
                .collect::<Result<Vec<_>>>()?;
            let report = AttributeReport::new(cluster, endpoint, attributes);
            println!("{}", Value::Object(decode(definition, &report)));
        }
        Command::DecodeFrame {
            model,
            cluster,
            endpoint,
            frame,
        } => {
            let definition = lookup(&model, &config)?;
            let bytes = hex::decode(frame.trim()).context("Frame must be hex encoded")?;
            let frame = ZclFrame::parse(&bytes)?;
            let report = AttributeReport::from_frame(cluster.id(), endpoint, &frame)?;
            println!("{}", Value::Object(decode(definition, &report)));
        }
        Command::Set {
            model,
            field,
            value,
        } => {
            let definition = lookup(&model, &config)?;
            // Bare words such as ON or 24H are taken as strings
            let value = serde_json::from_str(&value).unwrap_or(Value::String(value));
            let host = DryRunHost::new([0; 8], [0; 8]);
            let state = set(definition, &host, &field, &value, &config).await?;
            println!("{}", Value::Object(state));
        }
        Command::Configure {
            model,
            ieee,
            coordinator_ieee,
            coordinator_endpoint,
        } => {
            let definition = lookup(&model, &config)?;
            let host = DryRunHost::new(
                parse_ieee(&ieee).map_err(|e| anyhow!(e))?,
                parse_ieee(&coordinator_ieee).map_err(|e| anyhow!(e))?,
            );
            configure(definition, &host, coordinator_endpoint).await?;
        }
    }

    Ok(())
}

fn lookup(model: &str, config: &Config) -> Result<&'static DeviceDefinition> {
    models::resolve(model, config).ok_or_else(|| anyhow!("Unknown model: {model}"))
}

/// `0x0205`, `517` or a standard attribute name of the cluster
fn attribute_id(cluster: Cluster, key: &str) -> Result<u16> {
    if let Some(hex) = key.strip_prefix("0x").or_else(|| key.strip_prefix("0X")) {
        return u16::from_str_radix(hex, 16).with_context(|| format!("Invalid attribute id {key}"));
    }
    if let Ok(id) = key.parse::<u16>() {
        return Ok(id);
    }
    cluster
        .attribute_id(key)
        .ok_or_else(|| anyhow!("{cluster} has no attribute named {key}"))
}

fn attribute_value(value: &Value) -> Result<AttributeValue> {
    let converted = match value {
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => {
            if let Some(v) = n.as_u64().and_then(|v| u32::try_from(v).ok()) {
                AttributeValue::Unsigned(v)
            } else if let Some(v) = n.as_i64().and_then(|v| i32::try_from(v).ok()) {
                AttributeValue::Signed(v)
            } else if let Some(v) = n.as_f64() {
                AttributeValue::Float(v)
            } else {
                bail!("Unsupported number {n}");
            }
        }
        Value::String(s) => AttributeValue::Text(s.clone()),
        other => bail!("Unsupported attribute value {other}"),
    };
    Ok(converted)
}
