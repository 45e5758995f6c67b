use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use libreria_app::dashboard::DashboardClient;
use libreria_kernel::settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "libreria", version, about = "Book catalog server and dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run migrations and serve the HTTP API
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Show the book list, one book, or delete a book
    Dashboard(DashboardArgs),
}

#[derive(Args, Debug)]
struct DashboardArgs {
    /// Book API base URL, including the API prefix
    #[arg(long)]
    api_url: Option<String>,

    /// Show the full entry of this book
    #[arg(long, value_name = "ID", conflicts_with = "borrar")]
    detalle: Option<i64>,

    /// Delete this book
    #[arg(long, value_name = "ID")]
    borrar: Option<i64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load libreria settings")?;
    libreria_telemetry::init(&settings.telemetry);

    match cli.command {
        Command::Serve => libreria_app::server::serve(settings).await,
        Command::Migrate => {
            let applied = libreria_app::server::migrate(&settings).await?;
            println!("{applied} migrations applied");
            Ok(())
        }
        Command::Dashboard(args) => dashboard(args, &settings).await,
    }
}

async fn dashboard(args: DashboardArgs, settings: &Settings) -> anyhow::Result<()> {
    let base_url = args
        .api_url
        .unwrap_or_else(|| settings.dashboard.api_base_url.clone());
    let client = DashboardClient::new(base_url);
    let mut out = std::io::stdout().lock();

    tracing::debug!(base_url = client.base_url(), "dashboard starting");

    if let Some(id) = args.detalle {
        client.show_detail(id, &mut out).await?;
    } else if let Some(id) = args.borrar {
        client.delete(id, &mut out).await?;
    } else {
        client.render(&mut out).await?;
    }

    Ok(())
}
