//! Command-line client for the payment gateway.
//!
//! Credentials come from `PAYGATE_*` environment variables. Fields are given
//! as `name=value` arguments; decoded response fields are printed one per
//! line as `name=value` on stdout, logs go to stderr. A downloaded statement
//! is printed as received.
//!
//! ```text
//! paygate execute transfer https://api.mch.weixin.qq.com/mmpaymkttransfers/promotion/transfers \
//!     partner_trade_no=100000982014 openid=oxTWIuGaIt6gTKsQRLau2M0yL16E amount=100
//! paygate sign pay_bank enc_bank_no=6225760008219524 enc_true_name=Alice
//! ```

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use paygate_auth::{FieldEncryptor, ParameterSet, RequestKind, build_envelope};
use paygate_client::GatewayClient;
use paygate_core::{Credentials, GatewayConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Client version reported in logs.
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(name = "paygate")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true, env = "PAYGATE_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign, send, and verify one gateway call.
    #[command(name = "execute")]
    Execute {
        /// Request kind, e.g. `transfer` or `download_fund_flow`.
        #[arg(value_parser = parse_kind)]
        kind: RequestKind,
        /// Endpoint URL.
        url: String,
        /// Request fields as `name=value`.
        #[arg(value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Print the signed request without sending it.
    #[command(name = "sign")]
    Sign {
        /// Request kind.
        #[arg(value_parser = parse_kind)]
        kind: RequestKind,
        /// Request fields as `name=value`.
        #[arg(value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// List the supported request kinds.
    #[command(name = "kinds")]
    Kinds,
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence over `LOG_LEVEL` when set.
fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

fn parse_kind(value: &str) -> Result<RequestKind, String> {
    value.parse()
}

fn parse_field(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((name, field_value)) if !name.is_empty() => {
            Ok((name.to_owned(), field_value.to_owned()))
        }
        _ => Err(format!("expected name=value, got `{value}`")),
    }
}

fn print_params(params: &ParameterSet) {
    for (name, value) in params.iter() {
        println!("{name}={value}");
    }
}

async fn execute(
    config: &GatewayConfig,
    kind: RequestKind,
    url: &str,
    params: ParameterSet,
) -> Result<bool> {
    let client = GatewayClient::from_config(config).context("failed to build gateway client")?;
    let response = client
        .execute(kind, url, params)
        .await
        .with_context(|| format!("{kind} call to {url} failed"))?;

    if response.is_document() {
        print!("{}", response.body());
    } else {
        print_params(response.params());
    }
    Ok(!response.is_error())
}

fn sign(config: &GatewayConfig, kind: RequestKind, params: ParameterSet) -> Result<()> {
    let credentials = Credentials::from_config(config).context("invalid credentials")?;
    let encryptor = credentials
        .rsa_public_key()
        .map(FieldEncryptor::parse)
        .transpose()
        .context("invalid PAYGATE_RSA_PUBLIC_KEY")?;

    let envelope = build_envelope(kind, params, &credentials, encryptor.as_ref())
        .with_context(|| format!("failed to sign {kind} request"))?;
    print_params(envelope.params());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = GatewayConfig::from_env();

    init_tracing(&config.log_level, cli.log_json)?;

    match cli.command {
        Commands::Execute { kind, url, fields } => {
            info!(
                kind = %kind,
                url = %url,
                encoding = ?config.request_encoding,
                missing_sign = ?config.missing_sign,
                version = VERSION,
                "executing gateway call",
            );
            let params = fields.into_iter().collect();
            let succeeded = execute(&config, kind, &url, params).await?;
            Ok(if succeeded {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            })
        }
        Commands::Sign { kind, fields } => {
            sign(&config, kind, fields.into_iter().collect())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Kinds => {
            for kind in RequestKind::ALL {
                println!("{kind}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
