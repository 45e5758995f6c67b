use anyhow::Context;
use libreria_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load libreria settings")?;
    libreria_telemetry::init(&settings.telemetry);

    libreria_app::server::serve(settings).await
}
