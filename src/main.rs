use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use mobilpay::interfaces::xml::acknowledgement_writer::build_acknowledgement;
use mobilpay::{AcknowledgementRequest, ClientConfig, PaymentClient, PaymentRequest};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log order documents and decryption failure causes
    #[arg(long, global = true, env = "MOBILPAY_DEVELOPMENT")]
    development: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Seal a payment request (JSON file) into an env_key/data envelope
    Create {
        #[command(flatten)]
        keys: KeyArgs,
        /// Payment request JSON file
        request: PathBuf,
    },
    /// Open and parse a gateway notification
    Notify {
        #[command(flatten)]
        keys: KeyArgs,
        /// The env_key form field
        #[arg(long)]
        env_key: String,
        /// The data form field
        #[arg(long)]
        data: String,
    },
    /// Print the acknowledgement document for a notification
    Ack {
        /// Text echoed back to the gateway, usually the crc
        #[arg(default_value = "")]
        message: String,
        #[arg(long)]
        error_type: Option<String>,
        #[arg(long)]
        error_code: Option<String>,
    },
}

#[derive(Args)]
struct KeyArgs {
    /// JSON config file; takes precedence over the individual options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Merchant signature
    #[arg(long, env = "MOBILPAY_SIGNATURE")]
    signature: Option<String>,

    /// Gateway public key (PEM)
    #[arg(long, env = "MOBILPAY_PUBLIC_KEY")]
    public_key: Option<PathBuf>,

    /// Merchant private key (PEM)
    #[arg(long, env = "MOBILPAY_PRIVATE_KEY")]
    private_key: Option<PathBuf>,
}

impl KeyArgs {
    fn into_config(self, development: bool) -> mobilpay::Result<ClientConfig> {
        let mut config = match self.config {
            Some(path) => ClientConfig::from_json_file(path)?,
            None => ClientConfig {
                signature: self.signature.unwrap_or_default(),
                public_key: self.public_key.unwrap_or_default(),
                private_key: self.private_key.unwrap_or_default(),
                development,
            },
        };
        config.development |= development;
        Ok(config)
    }
}

fn init_tracing(development: bool) {
    let default_level = if development { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

fn build_client(keys: KeyArgs, development: bool) -> Result<PaymentClient> {
    let config = keys.into_config(development).into_diagnostic()?;
    PaymentClient::from_config(&config).into_diagnostic()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.development);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Create { keys, request } => {
            let client = build_client(keys, cli.development)?;
            let raw = fs::read_to_string(request).into_diagnostic()?;
            let request: PaymentRequest = serde_json::from_str(&raw).into_diagnostic()?;
            let envelope = client.create_payment_request(&request).into_diagnostic()?;
            serde_json::to_writer_pretty(&mut out, &envelope).into_diagnostic()?;
        }
        Command::Notify {
            keys,
            env_key,
            data,
        } => {
            let client = build_client(keys, cli.development)?;
            let record = client
                .process_notification(&env_key, &data)
                .into_diagnostic()?;
            serde_json::to_writer_pretty(&mut out, &record).into_diagnostic()?;
        }
        Command::Ack {
            message,
            error_type,
            error_code,
        } => {
            let ack = AcknowledgementRequest {
                message,
                error_type,
                error_code,
            };
            let xml = build_acknowledgement(&ack).into_diagnostic()?;
            out.write_all(&xml).into_diagnostic()?;
        }
    }

    writeln!(out).into_diagnostic()?;
    Ok(())
}
