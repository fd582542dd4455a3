use clap::{Args, Parser, Subcommand};
use netprobe_apiserver::{ApiServer, AppState, Config as ApiConfig};
use netprobe_core::{
    EnvironmentInfo, HttpProbeRequest, ProbeConfig, ProbeRequest, Protocol, ReachabilityRequest,
};
use netprobe_runtime::{ProbeHandler, ProcessExecutor};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "netprobe", about = "Validated network reachability and HTTP probes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the probe API server
    Serve {
        /// Address to listen on
        #[arg(long, env = "NETPROBE_BIND", default_value = "0.0.0.0:5000")]
        bind: String,
        #[command(flatten)]
        probe: ProbeArgs,
        #[command(flatten)]
        environment: EnvironmentArgs,
    },
    /// Run a single probe and print its output
    Probe {
        #[command(flatten)]
        probe: ProbeArgs,
        #[command(subcommand)]
        target: ProbeTarget,
    },
}

#[derive(Subcommand)]
enum ProbeTarget {
    /// Check that a TCP or UDP port accepts connections
    Reachability {
        /// IP address or fully-qualified domain name
        #[arg(long)]
        host: String,
        /// Port number (1-65535)
        #[arg(long)]
        port: String,
        /// Transport protocol (tcp or udp)
        #[arg(long, default_value = "tcp")]
        protocol: Protocol,
    },
    /// Issue an HTTP(S) request
    Http {
        /// Absolute URL, or host[:port] for plain http
        #[arg(long)]
        url: String,
        /// Extra client flags: -v, --verbose, -i, --include, -I, --head
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        flags: String,
    },
}

#[derive(Args)]
struct ProbeArgs {
    /// Program used for reachability probes
    #[arg(long, env = "NETPROBE_TCP_PROGRAM", default_value = "nc")]
    tcp_program: String,
    /// Program used for HTTP probes
    #[arg(long, env = "NETPROBE_HTTP_PROGRAM", default_value = "curl")]
    http_program: String,
    /// Hard time limit for reachability probes, in seconds
    #[arg(
        long,
        env = "NETPROBE_REACHABILITY_TIMEOUT",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    reachability_timeout: u64,
    /// Hard time limit for HTTP probes, in seconds
    #[arg(
        long,
        env = "NETPROBE_HTTP_TIMEOUT",
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    http_timeout: u64,
    /// Grace period between SIGTERM and SIGKILL for timed-out probes, in milliseconds
    #[arg(long, env = "NETPROBE_KILL_GRACE_MS", default_value_t = 500)]
    kill_grace_ms: u64,
}

impl ProbeArgs {
    fn to_config(&self) -> ProbeConfig {
        ProbeConfig {
            tcp_probe_program: self.tcp_program.clone(),
            http_probe_program: self.http_program.clone(),
            reachability_timeout: Duration::from_secs(self.reachability_timeout),
            http_timeout: Duration::from_secs(self.http_timeout),
            kill_grace_period: Duration::from_millis(self.kill_grace_ms),
        }
    }
}

#[derive(Args)]
struct EnvironmentArgs {
    /// Pod name shown to operators
    #[arg(long, env = "POD_NAME")]
    pod_name: Option<String>,
    /// Pod namespace shown to operators
    #[arg(long, env = "POD_NAMESPACE")]
    pod_namespace: Option<String>,
    /// Service name shown to operators
    #[arg(long, env = "SERVICE_NAME")]
    service_name: Option<String>,
    /// App label shown to operators
    #[arg(long, env = "APP_LABEL")]
    app_label: Option<String>,
}

impl EnvironmentArgs {
    fn to_info(&self) -> EnvironmentInfo {
        EnvironmentInfo::from_lookup(|key| match key {
            "POD_NAME" => self.pod_name.clone(),
            "POD_NAMESPACE" => self.pod_namespace.clone(),
            "SERVICE_NAME" => self.service_name.clone(),
            "APP_LABEL" => self.app_label.clone(),
            _ => None,
        })
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize tracing; stdout is reserved for probe output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            probe,
            environment,
        } => run_serve(&bind, probe.to_config(), environment.to_info()).await,
        Commands::Probe { probe, target } => run_probe(probe.to_config(), target).await,
    }
}

/// Run the API server until Ctrl-C
async fn run_serve(
    bind: &str,
    config: ProbeConfig,
    environment: EnvironmentInfo,
) -> miette::Result<()> {
    info!("Starting netprobe API server");

    let listen_addr = bind
        .parse()
        .map_err(|e| miette::miette!("Invalid bind address '{}': {}", bind, e))?;

    info!(
        "Probe limits: reachability {:?}, http {:?}",
        config.reachability_timeout, config.http_timeout
    );

    let state = Arc::new(AppState::new(create_handler(config), environment));
    let server = ApiServer::new(ApiConfig { listen_addr }, state);

    let token = CancellationToken::new();
    let server_token = token.clone();
    let mut server_handle = tokio::spawn(async move {
        if let Err(e) = server.run(server_token).await {
            error!("API server error: {}", e);
        }
    });

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.map_err(|e| miette::miette!("Failed to listen for ctrl-c: {}", e))?;
        }
        _ = &mut server_handle => {
            return Err(miette::miette!("API server stopped unexpectedly"));
        }
    }

    info!("Shutting down gracefully...");
    token.cancel();

    // In-flight probes are bounded by their own timeouts
    let shutdown_timeout = Duration::from_secs(15);
    if tokio::time::timeout(shutdown_timeout, server_handle)
        .await
        .is_err()
    {
        error!("API server did not stop within {:?}", shutdown_timeout);
    }

    info!("Shutdown complete");

    Ok(())
}

/// Run one probe from the command line
async fn run_probe(config: ProbeConfig, target: ProbeTarget) -> miette::Result<()> {
    let request = match target {
        ProbeTarget::Reachability {
            host,
            port,
            protocol,
        } => ProbeRequest::Reachability(ReachabilityRequest {
            host,
            port,
            protocol,
        }),
        ProbeTarget::Http { url, flags } => ProbeRequest::Http(HttpProbeRequest { url, flags }),
    };

    let handler = create_handler(config);
    let result = handler.handle(&request).await;

    print!("{}", result.outcome.text);
    if !result.outcome.text.ends_with('\n') {
        println!();
    }

    if result.is_error() {
        return Err(miette::miette!("{} probe failed", result.kind));
    }

    Ok(())
}

/// Create the probe handler backed by real child processes
fn create_handler(config: ProbeConfig) -> Arc<ProbeHandler> {
    let executor = Arc::new(ProcessExecutor::new(config.kill_grace_period));
    Arc::new(ProbeHandler::new(executor, Arc::new(config)))
}
