use clap::Parser;
use learnsphere_tutor::daemon;
use learnsphere_tutor::error::Result;

#[derive(Parser, Debug)]
#[command(name = "learnsphere-tutord")]
#[command(about = "LearnSphere AI tutor daemon")]
struct Cli {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 5051)]
    port: u16,

    /// Bearer token callers must present on /api/tutor.
    #[arg(long, env = "TUTOR_AUTH_TOKEN")]
    token: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    learnsphere_tutor::logging::init_tracing("learnsphere_tutord");
    let cli = Cli::parse();

    daemon::run(&cli.host, cli.port, &cli.token).await
}
